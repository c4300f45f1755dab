//! emorec CLI - Facial emotion recognition from the command line.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::classify::ClassifyArgs;
use commands::practice::PracticeArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let result = match cli.command {
        Some(Commands::Classify(args)) => {
            commands::classify::run(&ClassifyArgs::with_config(args, &config)).map(|r| r.exit_code)
        }
        Some(Commands::Practice(args)) => {
            commands::practice::run(&PracticeArgs::with_config(args, &config)).map(|r| r.exit_code)
        }
        Some(Commands::Emotions(ref args)) => {
            commands::emotions::run(args).map(|()| ExitCode::Success)
        }
        Some(Commands::Models(ref args)) => {
            commands::models::run(args, &config).map(|()| ExitCode::Success)
        }
        None => {
            // Default behavior: classify with flattened args
            if cli.classify.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            commands::classify::run(&ClassifyArgs::with_config(cli.classify, &config))
                .map(|r| r.exit_code)
        }
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error.into()
        }
    }
}
