//! Tracing setup for the CLI.
//!
//! Logs go to stderr so that command output on stdout stays pipeable.
//! An optional log file gets a daily-rotated copy of the same stream.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `debug` selects the `debug` filter level (otherwise `info`); the
/// `SUPERCLAUDE_LOG` env var overrides either. Returns the appender guard
/// when a log file is active — hold it for the process lifetime or buffered
/// lines are lost.
pub fn setup_logging(debug: bool, log_file: Option<&Path>, json_logs: bool) -> Option<WorkerGuard> {
    let filter = std::env::var("SUPERCLAUDE_LOG")
        .unwrap_or_else(|_| if debug { "debug" } else { "info" }.to_string());

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("superclaude.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stderr",
                dir.display()
            );
            init_stderr_only(&filter, json_logs);
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if json_logs {
            tracing_subscriber::registry()
                .with(EnvFilter::new(&filter))
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(&filter))
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else {
        init_stderr_only(&filter, json_logs);
        None
    }
}

fn init_stderr_only(filter: &str, json_logs: bool) {
    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
