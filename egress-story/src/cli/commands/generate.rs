//! Generate command: print stories and write the export file

use anyhow::{Context, Result};
use egress_story_core::{Config, ExportFormat, StoryRenderer, StoryRow, export, pipeline};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::report_rejected;
use crate::cli::app::GenerateArgs;

/// Execute the generate command
pub fn execute(args: GenerateArgs, mut config: Config) -> Result<()> {
    config.export.format =
        resolve_format(config.export.format, args.format.as_deref(), args.output.as_deref())?;

    let renderer = StoryRenderer::from_config(&config.story);
    let batch = pipeline::run(&args.path, &renderer)
        .with_context(|| format!("Failed to process {}", args.path.display()))?;

    report_rejected(&batch.rejected);
    if batch.rows.is_empty() {
        warn!("No job files found in {}", args.path.display());
        return Ok(());
    }

    print_stories(&batch.rows);

    if args.no_export {
        return Ok(());
    }

    let output = args.output.unwrap_or_else(|| PathBuf::from(config.export.file_name()));
    let bytes = export::export(&batch.rows, &config.export).context("Failed to build export")?;
    std::fs::write(&output, bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} stories as {} to {}", batch.rows.len(), config.export.format, output.display());
    println!("\nExported {} stories to {}", batch.rows.len(), output.display());
    Ok(())
}

/// Pick the export format: an explicit flag wins, then the output file
/// extension, then the configured format
pub fn resolve_format(
    configured: ExportFormat,
    flag: Option<&str>,
    output: Option<&Path>,
) -> Result<ExportFormat> {
    if let Some(flag) = flag {
        return Ok(flag.parse::<ExportFormat>()?);
    }

    let inferred = output
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse::<ExportFormat>().ok());
    Ok(inferred.unwrap_or(configured))
}

/// Print numbered stories
pub fn print_stories(rows: &[StoryRow]) {
    for row in rows {
        println!("**{}.** {}", row.index, row.story);
    }
}
