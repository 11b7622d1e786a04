//! Logging setup: human console output plus JSON audit log files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_DIR: &str = "output/logs";
pub const LOG_FILE: &str = "aegis-oracle.log";

/// Used when `RUST_LOG` is unset. Transport crates only report problems.
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn,tower_http=info";

/// Flushes the non-blocking file writer on drop.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

pub fn log_filter() -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {}", EnvFilter::DEFAULT_ENV)),
        _ => EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES).context("invalid default log directives"),
    }
}

/// Console layer for operators, hourly rolling JSON lines for audit trails.
/// Structured fields such as `audit_id` and `phase` become top-level keys in
/// the file output.
pub fn setup_logging() -> Result<LoggingGuard> {
    let file_appender = tracing_appender::rolling::hourly(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(true)
                .with_level(true)
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false)
        )
        .with(log_filter()?)
        .try_init()?;

    Ok(LoggingGuard { _guard: guard })
}

pub fn setup_output_directories() -> Result<PathBuf> {
    let dir = Path::new(LOG_DIR);
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir.to_path_buf())
}
