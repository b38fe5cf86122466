//! Tracing subscriber setup
//!
//! Library crates log through `log`; the `tracing-log` bridge forwards those
//! records into the subscriber installed here.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LogConfig;

/// File name prefix of the daily-rotated log.
pub const LOG_FILE_PREFIX: &str = "opencap.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of the process.
pub fn init(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(if config.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    });

    let guard = if config.directory.is_empty() {
        None
    } else {
        std::fs::create_dir_all(&config.directory)
            .with_context(|| format!("Failed to create log directory {}", config.directory))?;
        let appender = tracing_appender::rolling::daily(&config.directory, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(if config.json {
            fmt::layer().json().with_writer(writer).boxed()
        } else {
            fmt::layer().with_ansi(false).with_writer(writer).boxed()
        });
        Some(guard)
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
