//! Logging setup: stderr for the user, a daily file for diagnostics.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter for the log file; stderr follows `RUST_LOG` (default `warn`)
const FILE_FILTER: &str = "projtrack=debug,projtrack_core=debug";

/// Number of daily log files kept
const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber. The returned guard flushes the file log
/// and must be held until exit. Without a usable log directory only stderr
/// logging is set up.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(stderr_filter);

    let appender = log_dir.and_then(|dir| {
        std::fs::create_dir_all(dir)
            .map_err(|e| eprintln!("Warning: file logging disabled: {}", e))
            .ok()?;
        Builder::new()
            .rotation(Rotation::DAILY)
            .filename_prefix("projtrack")
            .filename_suffix("log")
            .max_log_files(MAX_LOG_FILES)
            .build(dir)
            .map_err(|e| eprintln!("Warning: file logging disabled: {}", e))
            .ok()
    });

    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(FILE_FILTER));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
