//! Issue tracker client (Jira REST v3)
//!
//! Stories are submitted one at a time. A failed submission is recorded in its
//! [`SubmissionOutcome`] and the remaining stories are still sent; there are no
//! retries.

use crate::config::{TrackerConfig, TrackerCredentials};
use crate::pipeline::StoryRow;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Path of the issue creation endpoint, relative to the base URL
pub const ISSUE_PATH: &str = "/rest/api/3/issue";

/// Error type for issue submission
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Request could not be built or sent
    #[error("Network error: {message}")]
    Transport { message: String },

    /// Tracker answered with anything other than 201 Created
    #[error("{status} {body}")]
    Rejected { status: u16, body: String },

    /// 201 Created without an issue key in the body
    #[error("Issue created but response has no key: {body}")]
    MalformedResponse { body: String },
}

impl TrackerError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct IssueRequest<'a> {
    fields: IssueFields<'a>,
}

#[derive(Debug, Serialize)]
struct IssueFields<'a> {
    project: ProjectRef<'a>,
    summary: &'a str,
    description: &'a str,
    issuetype: IssueTypeRef<'a>,
}

#[derive(Debug, Serialize)]
struct ProjectRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct IssueTypeRef<'a> {
    name: &'a str,
}

/// Result of submitting one story
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub job_name: String,
    /// Created issue key on success
    pub result: Result<String, TrackerError>,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Client for creating story issues
pub struct IssueClient {
    client: Client,
    credentials: TrackerCredentials,
    issue_type: String,
}

impl IssueClient {
    /// Create a client using the tracker configuration's timeout and issue type
    pub fn new(credentials: TrackerCredentials, config: &TrackerConfig) -> Result<Self, TrackerError> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self::with_client(client, credentials, &config.issue_type))
    }

    /// Create a client around an existing HTTP client
    pub fn with_client(client: Client, credentials: TrackerCredentials, issue_type: &str) -> Self {
        Self { client, credentials, issue_type: issue_type.to_string() }
    }

    /// Full URL of the issue endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.credentials.base_url.trim_end_matches('/'), ISSUE_PATH)
    }

    fn request<'a>(&'a self, summary: &'a str, description: &'a str) -> IssueRequest<'a> {
        IssueRequest {
            fields: IssueFields {
                project: ProjectRef { key: &self.credentials.project_key },
                summary,
                description,
                issuetype: IssueTypeRef { name: &self.issue_type },
            },
        }
    }

    /// Create one issue and return its key
    pub async fn create_issue(&self, summary: &str, description: &str) -> Result<String, TrackerError> {
        let url = self.endpoint();
        debug!("POST {} ({})", url, summary);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .basic_auth(&self.credentials.email, Some(&self.credentials.api_token))
            .json(&self.request(summary, description))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        interpret_response(status, body)
    }

    /// Submit every row in order; each row gets an outcome
    pub async fn submit_all(&self, rows: &[StoryRow]) -> Vec<SubmissionOutcome> {
        let mut outcomes = Vec::with_capacity(rows.len());

        for row in rows {
            let result = self.create_issue(&row.job_name, &row.story).await;
            match &result {
                Ok(key) => info!("Created {} for {}", key, row.job_name),
                Err(e) => warn!("Failed to create issue for {}: {}", row.job_name, e),
            }
            outcomes.push(SubmissionOutcome { job_name: row.job_name.clone(), result });
        }

        outcomes
    }
}

/// Map a tracker response to an issue key or an error
pub fn interpret_response(status: StatusCode, body: String) -> Result<String, TrackerError> {
    if status != StatusCode::CREATED {
        return Err(TrackerError::Rejected { status: status.as_u16(), body });
    }

    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("key").and_then(|k| k.as_str()).map(str::to_string))
        .ok_or(TrackerError::MalformedResponse { body })
}
