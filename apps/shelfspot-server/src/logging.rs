//! Tracing subscriber setup
//!
//! Console output plus a daily rolling file in the log directory. The level
//! filter sits behind a reload handle so the server settings module can
//! change it at runtime.

use anyhow::{Context, Result};
use server_settings::domain::LogLevelSwitch;
use server_settings::LogLevel;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Live log level control backed by a reloadable [`EnvFilter`]
pub struct TracingLevelSwitch {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelSwitch for TracingLevelSwitch {
    fn switch_level(&self, level: LogLevel) -> anyhow::Result<()> {
        self.handle
            .reload(level_filter(level))
            .context("failed to reload log filter")?;
        tracing::info!(level = %level.as_str(), "Log level changed");
        Ok(())
    }
}

fn level_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(format!("{},sqlx=warn,hyper=info", level.as_directive()))
}

/// Initial filter: `RUST_LOG` when present, debug otherwise. The stored
/// level replaces it once the settings module starts.
fn initial_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(LogLevel::Debug))
}

/// Install the global subscriber. The returned guard must be held for the
/// lifetime of the process or buffered file output is lost.
pub fn init(config: &LoggingConfig, log_directory: &Path) -> Result<(TracingLevelSwitch, WorkerGuard)> {
    std::fs::create_dir_all(log_directory).with_context(|| {
        format!("failed to create log directory {}", log_directory.display())
    })?;

    let (filter, handle) = reload::Layer::new(initial_filter());

    let appender = tracing_appender::rolling::daily(log_directory, &config.file_prefix);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);

    let console_layer = if config.json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok((TracingLevelSwitch { handle }, guard))
}
