//! User story rendering

use crate::config::StoryConfig;
use crate::job::JobDescriptor;

/// Column text used when no columns were extracted
pub const UNKNOWN_COLUMNS: &str = "1 or more columns";

/// Renders one story sentence per job descriptor
#[derive(Debug, Clone)]
pub struct StoryRenderer {
    team: String,
}

impl StoryRenderer {
    /// Create a renderer with the default team name
    pub fn new() -> Self {
        Self::from_config(&StoryConfig::default())
    }

    /// Create a renderer from configuration
    pub fn from_config(config: &StoryConfig) -> Self {
        Self { team: config.team.clone() }
    }

    /// Render the story sentence for a job
    pub fn render(&self, job: &JobDescriptor) -> String {
        let columns = if job.columns().is_empty() {
            UNKNOWN_COLUMNS.to_string()
        } else {
            job.columns().join(", ")
        };

        let mut story = format!(
            "The {} team will develop and deploy the egress job **{}** to extract data from columns ({}) from the table **{}**",
            self.team,
            job.job_name(),
            columns,
            job.table()
        );

        if let Some(conditions) = job.conditions().filter(|c| !c.is_empty()) {
            story.push_str(&format!(" with the condition `{}`", conditions));
        }
        if !job.schedule().is_empty() {
            story.push_str(&format!(", scheduled for `{}` execution", job.schedule()));
        }
        if let Some(target) = job.target_path().filter(|t| !t.is_empty()) {
            story.push_str(&format!(", targeting **{}**", target));
        }
        story.push('.');

        story
    }
}

impl Default for StoryRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a story with the default renderer
pub fn generate_user_story(job: &JobDescriptor) -> String {
    StoryRenderer::new().render(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(content: &str) -> JobDescriptor {
        JobDescriptor::extract_at("egress_job_07.sql", content, "2025-01-01 00:00:00")
    }

    #[test]
    fn test_minimal_story() {
        assert_eq!(
            generate_user_story(&job("")),
            "The ICS team will develop and deploy the egress job **egress_job_07** to extract data \
             from columns (1 or more columns) from the table **unspecified_table**."
        );
    }

    #[test]
    fn test_full_story() {
        let story = generate_user_story(&job(
            "SELECT x, y FROM my_table WHERE x > 1;\n-- daily\nEXPORT uri = 'gs://out/path'",
        ));

        assert_eq!(
            story,
            "The ICS team will develop and deploy the egress job **egress_job_07** to extract data \
             from columns (x, y) from the table **my_table** with the condition `x > 1`, \
             scheduled for `daily` execution, targeting **gs://out/path**."
        );
    }

    #[test]
    fn test_story_contains_every_field() {
        let descriptor = job(
            "SELECT acct_id, balance, region FROM fin.accounts WHERE balance > 0 GROUP BY region\n\
             schedule: hourly\nuri = \"s3://bucket/accounts\"",
        );
        let story = generate_user_story(&descriptor);

        assert!(story.contains(descriptor.job_name()));
        assert!(story.contains(descriptor.table()));
        for column in descriptor.columns() {
            assert!(story.contains(column.as_str()));
        }
        assert!(story.contains(descriptor.conditions().unwrap()));
        assert!(story.contains(descriptor.schedule()));
        assert!(story.contains(descriptor.target_path().unwrap()));
        assert!(story.ends_with('.'));
    }

    #[test]
    fn test_segments_are_optional() {
        let story = generate_user_story(&job("SELECT a FROM t hourly"));
        assert!(!story.contains("with the condition"));
        assert!(story.contains(", scheduled for `hourly` execution."));
        assert!(!story.contains("targeting"));
    }

    #[test]
    fn test_custom_team() {
        let renderer = StoryRenderer::from_config(&StoryConfig { team: "Data Platform".to_string() });
        assert!(renderer.render(&job("")).starts_with("The Data Platform team will"));
    }

    #[test]
    fn test_deterministic() {
        let descriptor = job("SELECT a, b FROM t WHERE a = 'x'");
        let renderer = StoryRenderer::new();
        assert_eq!(renderer.render(&descriptor), renderer.render(&descriptor));
    }
}
