//! Configuration for story rendering, export and the issue tracker
//!
//! Loaded from a TOML file. Every section has defaults, so an empty file or
//! no file at all yields a usable configuration; command-line flags override
//! individual values afterwards.

use crate::error::{Result, StoryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Story wording
    pub story: StoryConfig,

    /// Spreadsheet export
    pub export: ExportConfig,

    /// Issue tracker connection
    pub tracker: TrackerConfig,
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StoryError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| StoryError::config(format!("Failed to parse config: {}", e)))
    }
}

/// Story wording
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoryConfig {
    /// Team named in the opening of every story
    pub team: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self { team: "ICS".to_string() }
    }
}

/// Export file format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(StoryError::config(format!(
                "Unknown export format '{}', expected xlsx or csv",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Spreadsheet export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Output file stem; the extension follows the format
    pub file_stem: String,

    /// Worksheet name
    pub sheet_name: String,

    /// Output format
    pub format: ExportFormat,
}

impl ExportConfig {
    /// Default output file name for the configured format
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem, self.format.extension())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_stem: "ics_egress_user_stories".to_string(),
            sheet_name: "UserStories".to_string(),
            format: ExportFormat::Xlsx,
        }
    }
}

/// Issue tracker connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL, e.g. `https://yourdomain.atlassian.net`
    pub base_url: Option<String>,

    /// Account email used for basic auth
    pub email: Option<String>,

    /// Project key, e.g. `ICS`
    pub project_key: Option<String>,

    /// Environment variable holding the API token
    pub token_env: String,

    /// Issue type name sent with every issue
    pub issue_type: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            email: None,
            project_key: None,
            token_env: "JIRA_API_TOKEN".to_string(),
            issue_type: "Story".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Everything needed to authenticate and address the tracker
#[derive(Clone, PartialEq)]
pub struct TrackerCredentials {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
}

impl fmt::Debug for TrackerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerCredentials")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("project_key", &self.project_key)
            .finish()
    }
}

impl TrackerConfig {
    /// Resolve credentials, taking the token from `token` or from `token_env`
    pub fn credentials(&self, token: Option<String>) -> Result<TrackerCredentials> {
        let api_token = match token {
            Some(token) => token,
            None => std::env::var(&self.token_env).map_err(|_| {
                StoryError::config(format!("tracker API token not found in {}", self.token_env))
            })?,
        };

        Ok(TrackerCredentials {
            base_url: required(&self.base_url, "base_url")?,
            email: required(&self.email, "email")?,
            api_token: non_empty(api_token, "api token")?,
            project_key: required(&self.project_key, "project_key")?,
        })
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) => non_empty(v.clone(), name),
        None => Err(StoryError::config(format!("tracker {} is not set", name))),
    }
}

fn non_empty(value: String, name: &str) -> Result<String> {
    if value.trim().is_empty() {
        Err(StoryError::config(format!("tracker {} is empty", name)))
    } else {
        Ok(value)
    }
}
