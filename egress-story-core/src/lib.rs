//! Core functionality for egress-story
//!
//! This crate turns egress job scripts into job descriptors and user stories,
//! exports the stories as a spreadsheet and files them in an issue tracker.

pub mod config;
pub mod error;
pub mod export;
pub mod intake;
pub mod job;
pub mod pipeline;
pub mod story;
pub mod tracker;

pub use config::{Config, ExportConfig, ExportFormat, StoryConfig, TrackerConfig, TrackerCredentials};
pub use error::{Result, StoryError};
pub use job::JobDescriptor;
pub use pipeline::{Batch, StoryRow};
pub use story::{StoryRenderer, generate_user_story};
pub use tracker::{IssueClient, SubmissionOutcome, TrackerError};
