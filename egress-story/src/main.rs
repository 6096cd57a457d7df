use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = cli::commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract(args) => {
            info!("Extract command: {:?}", args);
            cli::commands::extract::execute(args)?;
        }
        Commands::Generate(args) => {
            info!("Generate command: {:?}", args);
            cli::commands::generate::execute(args, config)?;
        }
        Commands::Push(args) => {
            // Token stays out of the log
            info!("Push command: {}", args.path.display());
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::commands::push::execute(args, config))?;
        }
    }

    Ok(())
}
