//! Perf-warden: supervise `perf record` and relay its lifecycle.

mod app;
mod cli;
mod config;
mod error;
mod recording_state;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    cli::Cli,
    error::{AppError, Result as AppResult},
    recording_state::RecordingState,
};

use crate::config::Config;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

/// Application entry point.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("perf_warden=info")
        .init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    match App::new(cli, config).run().await {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "App error");
            ExitCode::FAILURE
        }
    }
}
