pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use wayfare_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "wayfare",
    about = "Wayfare booking dialog CLI",
    long_about = "Chat with the flight-booking dialog from a terminal, or inspect the \
                  effective configuration.",
    after_help = "Examples:\n  wayfare chat\n  wayfare chat --remote\n  wayfare config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a wayfare.toml config file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    pub log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive booking conversation on stdin/stdout")]
    Chat {
        #[arg(
            long,
            help = "Use the hosted prediction endpoint instead of the offline recognizer"
        )]
        remote: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

impl Cli {
    /// An explicitly passed config path must exist; the default search
    /// locations are optional.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                log_level: self.log_level.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<ExitCode> {
    match cli.command {
        Command::Chat { remote } => commands::chat::run(&config, remote).await,
        Command::Config => {
            println!("{}", commands::config::run(&config, cli.config.as_deref()));
            Ok(ExitCode::SUCCESS)
        }
    }
}
