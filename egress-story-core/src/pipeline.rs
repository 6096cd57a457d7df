//! Input-to-story pipeline
//!
//! Each file is handled on its own: one extraction pass, one rendered story.
//! Rows keep the order in which intake produced the files.

use crate::error::Result;
use crate::intake::{self, RejectedFile, SourceFile};
use crate::job::JobDescriptor;
use crate::story::StoryRenderer;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One exported line: a numbered story for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryRow {
    /// 1-based position in the batch
    pub index: usize,
    pub job_name: String,
    pub story: String,
    pub timestamp: String,
}

/// Everything produced from one input
#[derive(Debug, Default)]
pub struct Batch {
    pub jobs: Vec<JobDescriptor>,
    pub rows: Vec<StoryRow>,
    pub rejected: Vec<RejectedFile>,
}

/// Extract a descriptor for every source file
pub fn describe(sources: &[SourceFile]) -> Vec<JobDescriptor> {
    sources
        .iter()
        .map(|source| JobDescriptor::extract(&source.name, &source.content))
        .collect()
}

/// Render a numbered story row for every descriptor
pub fn build_rows(jobs: &[JobDescriptor], renderer: &StoryRenderer) -> Vec<StoryRow> {
    jobs.iter()
        .enumerate()
        .map(|(offset, job)| StoryRow {
            index: offset + 1,
            job_name: job.job_name().to_string(),
            story: renderer.render(job),
            timestamp: job.timestamp().to_string(),
        })
        .collect()
}

/// Load an input path and produce descriptors and stories for it
pub fn run(path: &Path, renderer: &StoryRenderer) -> Result<Batch> {
    let intake = intake::load(path)?;
    let jobs = describe(&intake.sources);
    let rows = build_rows(&jobs, renderer);

    info!("Generated {} stories from {}", rows.len(), path.display());
    Ok(Batch { jobs, rows, rejected: intake.rejected })
}
