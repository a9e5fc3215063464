//! Homework bot CLI
//!
//! Command-line interface for the homework review status notifier.

use std::path::PathBuf;

use clap::Parser;
use homework_bot::{load_config, logging, Config, HomeworkBotBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Polls the homework review API and relays status changes to Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between polls (overrides config file)
    #[arg(long)]
    retry_period: Option<u64>,

    /// Log file path (overrides config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not write a log file
    #[arg(long, conflicts_with = "log_file")]
    no_log_file: bool,

    /// Log level
    #[arg(short, long, default_value = "debug", value_parser = parse_log_level)]
    log_level: Level,
}

fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Use: trace, debug, info, warn, error",
            s
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing .env is fine; the variables may come from the real environment
    let dotenv = dotenvy::dotenv();

    let mut config = match &args.config {
        Some(config_path) => match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                // No file sink is known yet, so report on stdout only
                logging::init(args.log_level, None)?;
                tracing::error!(
                    "CRITICAL: bot stopped before polling: cannot load {:?}: {}",
                    config_path,
                    e
                );
                return Err(e.into());
            }
        },
        None => Config::default(),
    };

    if let Some(retry_period) = args.retry_period {
        config.polling.retry_period_seconds = retry_period;
    }
    if let Some(log_file) = args.log_file {
        config.logging.file = Some(log_file);
    }
    if args.no_log_file {
        config.logging.file = None;
    }

    logging::init(args.log_level, config.logging.file.as_deref())?;

    tracing::debug!(
        "Parsed command line arguments: config={:?}, retry_period={:?}, log_level={:?}",
        args.config,
        args.retry_period,
        args.log_level
    );
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) => tracing::debug!("No .env file loaded: {}", e),
    }

    config.resolve_secrets();

    let bot = match HomeworkBotBuilder::new(config).build() {
        Ok(bot) => bot,
        Err(e) => {
            tracing::error!("CRITICAL: bot stopped before polling: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting homework bot");
    bot.start().await?;

    Ok(())
}
