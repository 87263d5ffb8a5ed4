use crate::config;
use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging to the console and, when `log_dir` is given, to a
/// daily-rotated JSON file in that directory
pub fn init_logging(log_dir: Option<&Path>) -> Result<()> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, config::LOG_FILE_NAME);

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .json(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            // Console output
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .with(
            // RUST_LOG wins; info otherwise
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
