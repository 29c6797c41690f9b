use super::commands::{ConfigCommand, DemoCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "viewbind")]
#[command(about = "Binding resolution and routed navigation for headless widgets")]
pub struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted navigation against a headless window
    Demo(DemoCommand),
    /// Print the effective settings as TOML
    Config(ConfigCommand),
}
