use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use viewbind::Settings;

#[derive(Args)]
pub struct ConfigCommand {
    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn config_command(args: ConfigCommand) -> Result<()> {
    let settings = Settings::load_or_default(args.config.as_deref())?;
    print!("{}", settings.to_toml()?);
    Ok(())
}
