//! Logging setup: stderr plus a daily-rolling `app.log`.
//!
//! stdout is reserved for tool output and MCP protocol messages.

use std::{io, path::Path};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_PREFIX: &str = "app.log";

/// Non-blocking writer to `{dir}/app.log.YYYY-MM-DD`, creating `dir` if needed.
pub fn file_writer(dir: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

/// `RUST_LOG` wins over the `-v` count. Keep the returned guard alive for
/// the life of the process so buffered file output is flushed.
pub fn init(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let file = log_dir.and_then(|dir| match file_writer(dir) {
        Ok(pair) => Some(pair),
        Err(err) => {
            eprintln!("weather: file logging disabled, cannot use {}: {err}", dir.display());
            None
        }
    });
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false).with_target(true)),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    guard
}
