pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use sourcedesk_core::config::{AppConfig, LogFormat};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "sourcedesk",
    about = "Sourcedesk operator CLI",
    long_about = "Operate the Sourcedesk workflow store: config inspection, demo seeding, and end-to-end flow validation.",
    after_help = "Examples:\n  sourcedesk config\n  sourcedesk seed\n  sourcedesk demo"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Load the deterministic demo dataset and write it to the snapshot file")]
    Seed,
    #[command(about = "Run the full RFQ to order flow against an in-memory store and report each step")]
    Demo,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Seed => commands::seed::run(),
        Command::Demo => commands::demo::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_tracing() {
    let Ok(config) = AppConfig::load(Default::default()) else {
        // config problems are reported by the command itself
        return;
    };

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}
