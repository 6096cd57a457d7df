//! Job descriptor extraction
//!
//! A [`JobDescriptor`] is built by one pass of the `sql_patterns` extractors
//! over one script and is never modified afterwards.

use chrono::Local;
use serde::Serialize;
use std::path::Path;

/// Format of the capture timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata extracted from one egress script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    job_name: String,
    table: String,
    columns: Vec<String>,
    conditions: Option<String>,
    schedule: String,
    target_path: Option<String>,
    timestamp: String,
}

impl JobDescriptor {
    /// Extract a descriptor from a script, stamped with the current local time
    pub fn extract(filename: &str, content: &str) -> Self {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::extract_at(filename, content, timestamp)
    }

    /// Extract a descriptor with an explicit capture timestamp
    pub fn extract_at(filename: &str, content: &str, timestamp: impl Into<String>) -> Self {
        Self {
            job_name: job_name_from_filename(filename),
            table: sql_patterns::extract_table(content),
            columns: sql_patterns::extract_columns(content),
            conditions: sql_patterns::extract_conditions(content),
            schedule: sql_patterns::extract_schedule(content),
            target_path: sql_patterns::extract_target_path(content),
            timestamp: timestamp.into(),
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn conditions(&self) -> Option<&str> {
        self.conditions.as_deref()
    }

    /// Lowercased schedule match; empty when the script names none
    pub fn schedule(&self) -> &str {
        &self.schedule
    }

    pub fn target_path(&self) -> Option<&str> {
        self.target_path.as_deref()
    }

    /// Capture time, informational only
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Derive a job name from a file name: directories and the last extension are dropped
pub fn job_name_from_filename(filename: &str) -> String {
    // Archive entries may carry Windows separators
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    Path::new(base)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.to_string())
}
