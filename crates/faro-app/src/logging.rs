// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logging setup. Console output goes to stderr so stdout stays clean for
// command results; an optional daily-rotated JSON file sits alongside it.

use faro_core::config::LoggingConfig;
use faro_core::error::{FaroError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the file writer flushing until dropped.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(&config.level)?;
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()))
    };

    let mut layers = Vec::new();

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.json {
        layers.push(console.json().with_filter(filter()).boxed());
    } else {
        layers.push(console.with_filter(filter()).boxed());
    }

    let file_guard = match &config.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                FaroError::Config(format!("cannot create log directory {}: {e}", dir.display()))
            })?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "faro.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_filter(filter())
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| FaroError::Config(format!("logging already initialised: {e}")))?;

    tracing::debug!(
        level = %level,
        file_dir = ?config.file_dir,
        json = config.json,
        "Logging initialised"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(FaroError::Config(format!(
            "invalid log level {raw:?}, expected trace, debug, info, warn, or error"
        ))),
    }
}
