//! projtrack - a command-line client for the project tracker.
//!
//! Each subcommand opens one screen of the tracker (login, dashboard,
//! projects, tasks, ...). Protected screens need a signed-in session, which
//! is kept between runs in the cache directory.

mod app;
mod cli;
mod commands;
mod logging;
mod utils;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use projtrack_core::routes::{self, GuardDecision};
use projtrack_core::{ApiError, Config};
use tracing::{debug, info};

use app::App;
use cli::{Cli, Commands};

/// Subdirectory of the cache directory holding the daily log files
const LOG_DIR: &str = "logs";

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {:#}. Using defaults.", e);
            Config::default()
        }
    };

    let log_dir = config.cache_dir().ok().map(|dir| dir.join(LOG_DIR));
    let _log_guard = logging::init_logging(log_dir.as_deref());
    info!("projtrack starting");

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    let mut app = match App::new(config) {
        Ok(app) => app,
        // The about screen needs neither a backend nor a session
        Err(e) if matches!(cli.command, Commands::About) => {
            debug!(error = %e, "Showing about without a backend");
            commands::about();
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e),
    };

    let command = match cli.command.route().map(|route| app.navigate(route)) {
        None | Some(GuardDecision::Allow) => cli.command,
        Some(GuardDecision::Redirect(target)) if target == routes::DASHBOARD => {
            println!("Already signed in.");
            Commands::Dashboard { refresh: false }
        }
        Some(GuardDecision::Redirect(_)) => {
            eprintln!("Not signed in. Run `projtrack login` first.");
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!(path = %app.current_path(), "Running command");

    let signing_out = command.ends_session();
    let result = commands::run(&mut app, command, cli.json).await;

    // A failed refresh ends the session: nothing cached for it may outlive it
    let expired = app.session_expired();
    if expired {
        app.sign_out_locally();
    }
    app.persist_session();

    if expired && !signing_out {
        eprintln!("Session expired. Run `projtrack login` to sign in again.");
        return Ok(ExitCode::FAILURE);
    }
    result?;
    Ok(ExitCode::SUCCESS)
}

/// Print an error, listing the backend's field messages when it sent any
fn report_error(err: &anyhow::Error) {
    if let Some(http) = err.downcast_ref::<ApiError>().and_then(ApiError::as_http) {
        let messages = http.validation_messages();
        if !messages.is_empty() {
            eprintln!("Error: request rejected ({})", http.status);
            for (field, message) in messages {
                if field.is_empty() {
                    eprintln!("  {}", message);
                } else {
                    eprintln!("  {}: {}", field, message);
                }
            }
            return;
        }
    }
    eprintln!("Error: {:#}", err);
}
