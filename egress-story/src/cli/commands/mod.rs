// Command implementations

pub mod extract;
pub mod generate;
pub mod push;

use anyhow::{Context, Result};
use egress_story_core::Config;
use egress_story_core::intake::RejectedFile;
use std::path::Path;
use tracing::{debug, warn};

/// Load the configuration file if one was given, otherwise use defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

/// Report inputs that were left out of the batch
pub fn report_rejected(rejected: &[RejectedFile]) {
    for file in rejected {
        if !file.error.is_per_file() {
            warn!("Input error for {}: {}", file.name, file.error);
        }
        eprintln!("{}", rejection_message(file));
    }
}

/// Single-file problems are skipped; anything else points at the input itself
pub fn rejection_message(file: &RejectedFile) -> String {
    if file.error.is_per_file() {
        format!("Skipped {}: {}", file.name, file.error)
    } else {
        format!("Could not read {}: {}", file.name, file.error)
    }
}
