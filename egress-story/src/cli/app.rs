use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "egress-story",
    version,
    about = "Egress Story - Turn egress job scripts into user stories",
    long_about = "Egress Story extracts table, column, filter, schedule and target metadata from SQL, BTEQ and PL/SQL egress scripts, writes one user story per job to a spreadsheet, and can file the stories as tracker issues."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract job descriptors
    #[command(about = "Extract job descriptors and print them as JSON")]
    Extract(ExtractArgs),

    /// Generate user stories
    #[command(about = "Generate user stories and export them to a spreadsheet")]
    Generate(GenerateArgs),

    /// Push user stories to the issue tracker
    #[command(about = "Generate user stories and create one tracker issue per story")]
    Push(PushArgs),
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Job script, directory or zip archive
    #[arg(help = "Path to a job script (.sql, .bteq, .plsql, .txt), a directory or a .zip archive")]
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Job script, directory or zip archive
    #[arg(help = "Path to a job script (.sql, .bteq, .plsql, .txt), a directory or a .zip archive")]
    pub path: PathBuf,

    /// Output file
    #[arg(short, long, help = "Export file (defaults to the configured file name)")]
    pub output: Option<PathBuf>,

    /// Export format (xlsx or csv)
    #[arg(short, long, help = "Export format: xlsx or csv")]
    pub format: Option<String>,

    /// Only print the stories
    #[arg(long, help = "Print the stories without writing an export file")]
    pub no_export: bool,
}

#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Job script, directory or zip archive
    #[arg(help = "Path to a job script (.sql, .bteq, .plsql, .txt), a directory or a .zip archive")]
    pub path: PathBuf,

    /// Tracker base URL
    #[arg(long, help = "Tracker base URL, e.g. https://yourdomain.atlassian.net")]
    pub base_url: Option<String>,

    /// Account email
    #[arg(long, help = "Account email used for authentication")]
    pub email: Option<String>,

    /// Project key
    #[arg(long, help = "Project key, e.g. ICS")]
    pub project: Option<String>,

    /// API token
    #[arg(long, help = "API token (defaults to the environment variable named by tracker.token_env)")]
    pub token: Option<String>,
}
