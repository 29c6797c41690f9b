use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;

use cli::commands::{config_command, demo_command};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(path) = &cli.log_file {
        // Truncate on each run
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;
        logger.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    logger.init();

    info!("Starting viewbind");

    match cli.command {
        Commands::Demo(args) => demo_command(args).await,
        Commands::Config(args) => config_command(args),
    }
}
