use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text, required};
use weather_core::{Config, Pipeline};

use crate::app::App;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive dashboard (default).
    Dashboard {
        /// Location shown on startup; defaults to the configured location.
        #[arg(long)]
        location: Option<String>,
    },

    /// Store the geocoding API key and default location.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Dashboard { location: None }) {
            Command::Dashboard { location } => {
                let config = Config::load()?;
                let pipeline = Pipeline::from_config(&config)?;
                let initial = location.unwrap_or_else(|| config.default_location.clone());

                App::new(pipeline).run(&initial).await
            }
            Command::Configure => configure(),
        }
    }
}

/// Interactive configuration. Reads the file directly so environment
/// overrides are never written back to disk.
fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(required!("An API key is required"))
        .prompt()
        .context("Failed to read API key")?;

    let default_location = Text::new("Default location:")
        .with_default(&config.default_location)
        .with_validator(required!("A default location is required"))
        .prompt()
        .context("Failed to read default location")?;

    config.set_api_key(api_key.trim().to_string());
    config.default_location = default_location.trim().to_string();
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
