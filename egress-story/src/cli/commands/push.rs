//! Push command: create one tracker issue per generated story

use anyhow::{Context, Result, bail};
use egress_story_core::{Config, IssueClient, StoryRenderer, SubmissionOutcome, TrackerConfig, pipeline};
use tracing::{info, warn};

use super::generate::print_stories;
use super::report_rejected;
use crate::cli::app::PushArgs;

/// Execute the push command
pub async fn execute(args: PushArgs, mut config: Config) -> Result<()> {
    apply_overrides(&mut config.tracker, &args);

    // Fail on missing credentials before reading any input
    let credentials = config.tracker.credentials(args.token.clone())?;

    let renderer = StoryRenderer::from_config(&config.story);
    let batch = pipeline::run(&args.path, &renderer)
        .with_context(|| format!("Failed to process {}", args.path.display()))?;

    report_rejected(&batch.rejected);
    if batch.rows.is_empty() {
        warn!("No job files found in {}", args.path.display());
        return Ok(());
    }
    print_stories(&batch.rows);

    let client = IssueClient::new(credentials, &config.tracker)
        .context("Failed to create tracker client")?;
    info!("Submitting {} stories to {}", batch.rows.len(), client.endpoint());

    let outcomes = client.submit_all(&batch.rows).await;
    summarize(&outcomes)
}

/// Command-line values take precedence over the configuration file
pub fn apply_overrides(tracker: &mut TrackerConfig, args: &PushArgs) {
    if let Some(base_url) = &args.base_url {
        tracker.base_url = Some(base_url.clone());
    }
    if let Some(email) = &args.email {
        tracker.email = Some(email.clone());
    }
    if let Some(project) = &args.project {
        tracker.project_key = Some(project.clone());
    }
}

/// Print one line per submission and fail if any submission failed
pub fn summarize(outcomes: &[SubmissionOutcome]) -> Result<()> {
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(key) => println!("Created: {}", key),
            Err(e) => {
                failed += 1;
                println!("Failed: {}", e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} submissions failed", failed, outcomes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use egress_story_core::TrackerError;

    fn push_args(argv: &[&str]) -> PushArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Push(args) => args,
            other => panic!("expected push, got {:?}", other),
        }
    }

    fn outcome(job_name: &str, result: std::result::Result<String, TrackerError>) -> SubmissionOutcome {
        SubmissionOutcome { job_name: job_name.to_string(), result }
    }

    #[test]
    fn test_flags_override_config() {
        let mut tracker = TrackerConfig {
            base_url: Some("https://config.atlassian.net".to_string()),
            email: Some("config@example.com".to_string()),
            project_key: Some("CFG".to_string()),
            ..TrackerConfig::default()
        };

        let args = push_args(&[
            "egress-story",
            "push",
            "jobs",
            "--base-url",
            "https://cli.atlassian.net",
            "--project",
            "CLI",
        ]);
        apply_overrides(&mut tracker, &args);

        assert_eq!(tracker.base_url.as_deref(), Some("https://cli.atlassian.net"));
        assert_eq!(tracker.email.as_deref(), Some("config@example.com"));
        assert_eq!(tracker.project_key.as_deref(), Some("CLI"));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut tracker = TrackerConfig::default();
        tracker.email = Some("config@example.com".to_string());
        let before = tracker.clone();

        apply_overrides(&mut tracker, &push_args(&["egress-story", "push", "jobs"]));
        assert_eq!(tracker, before);
    }

    #[test]
    fn test_summarize_all_created() {
        let outcomes = [outcome("a", Ok("ICS-1".to_string())), outcome("b", Ok("ICS-2".to_string()))];
        assert!(summarize(&outcomes).is_ok());
        assert!(summarize(&[]).is_ok());
    }

    #[test]
    fn test_summarize_fails_on_any_rejection() {
        let outcomes = [
            outcome("a", Ok("ICS-1".to_string())),
            outcome("b", Err(TrackerError::Rejected { status: 400, body: "bad".to_string() })),
            outcome("c", Err(TrackerError::transport("connection refused"))),
        ];

        let err = summarize(&outcomes).unwrap_err();
        assert_eq!(err.to_string(), "2 of 3 submissions failed");
    }
}
