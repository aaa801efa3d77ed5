mod args;
mod commands;
mod config;
mod infrastructure;
mod render;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use crate::{args::Cli, config::build_config, infrastructure::ServiceProvider};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(cli.config.as_deref()) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("{}: {e}", "Failed to build config".red());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::initialize_telemetry(&config.telemetry) {
        eprintln!("{}: {e}", "Failed to initialize logger".red());
        return ExitCode::FAILURE;
    };

    let provider = match ServiceProvider::build(config) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("{}: {e:#}", "Failed to start".red());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = provider.session.restore().await {
        eprintln!("{}: {e}", "Failed to restore session".red());
        return ExitCode::FAILURE;
    }

    let result = commands::run(&provider, cli.command).await;

    for signal in provider.signals.try_iter() {
        eprintln!("{}", render::signal(&signal));
    }
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            eprintln!("{}", render::error(&e));
            ExitCode::FAILURE
        }
    }
}
