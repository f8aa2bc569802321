//! Tracing subscriber setup.
//!
//! Environment variables:
//!   LOG_FILE  - path to log file (optional, enables file logging with daily rotation)
//!   LOG_ANSI  - "true"/"false" override ANSI colors (auto-detected by default)
//!   RUST_LOG  - standard env filter (default: [`DEFAULT_FILTER`])
//!
//! The output format comes from `--log-format` / `LOG_FORMAT`.

use std::path::Path;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use geonote_core::logging::SUBSYSTEM_CLI;

use crate::cli::LogFormat;

pub const DEFAULT_FILTER: &str = "geonote=info,geonote_db=info,geonote_core=info";

const DEFAULT_LOG_FILE_NAME: &str = "geonote.log";

/// Parse a `LOG_ANSI` value. Unrecognized values leave detection to the terminal.
pub fn parse_ansi(value: Option<&str>) -> Option<bool> {
    match value?.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Install the global subscriber. Logs go to stderr unless `LOG_FILE` is set,
/// keeping stdout for command output. Hold the returned guard until exit so
/// buffered file output is flushed.
pub fn init(format: LogFormat) -> Option<WorkerGuard> {
    let log_file = std::env::var("LOG_FILE").ok().filter(|v| !v.is_empty());
    let log_ansi = parse_ansi(std::env::var("LOG_ANSI").ok().as_deref());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = Path::new(path);
        let file_dir = path.parent().unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE_NAME);
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(log_ansi.unwrap_or(false)),
                )
                .init(),
        }
        Some(guard)
    } else {
        match format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
                if let Some(ansi) = log_ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        None
    };

    info!(
        subsystem = SUBSYSTEM_CLI,
        log_format = ?format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );

    guard
}
