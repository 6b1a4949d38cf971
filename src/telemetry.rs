//! Logging setup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Installs the global tracing subscriber.
///
/// Logs go to stderr unless a log file is configured, in which case they are
/// appended to it without ANSI colors.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let writer = log_writer(config.log_file.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(config.log_file.is_none())
                .compact(),
        )
        .with(config.log_level)
        .try_init()
        .context("failed to install tracing subscriber")
}

fn log_writer(path: Option<&Path>) -> anyhow::Result<BoxMakeWriter> {
    let Some(path) = path else {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    Ok(BoxMakeWriter::new(Mutex::new(file)))
}
