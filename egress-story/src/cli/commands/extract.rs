//! Extract command: print job descriptors as JSON

use anyhow::{Context, Result};
use egress_story_core::{intake, pipeline};
use tracing::info;

use super::report_rejected;
use crate::cli::app::ExtractArgs;

/// Execute the extract command
pub fn execute(args: ExtractArgs) -> Result<()> {
    let intake = intake::load(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let jobs = pipeline::describe(&intake.sources);
    info!("Extracted {} job descriptors", jobs.len());

    let json = serde_json::to_string_pretty(&jobs).context("Failed to serialize job descriptors")?;
    println!("{}", json);

    report_rejected(&intake.rejected);
    Ok(())
}
