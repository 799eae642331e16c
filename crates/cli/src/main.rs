use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use wayfare_cli::Cli;
use wayfare_core::config::AppConfig;

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use wayfare_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load config and initialize logging before any other operations
    let cli = Cli::parse();
    let config = AppConfig::load(cli.load_options())?;
    init_logging(&config);

    wayfare_cli::run(cli, config).await
}
