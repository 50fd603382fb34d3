//! Logging setup for the command-line interface
//!
//! Library code emits `tracing` events under the `parsec::*` targets; this installs a
//! subscriber that writes them to stderr so token dumps on stdout stay clean.

use parsec_engine::parsec::config::{LogFormat, LoggingConfig};
use std::io;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Install the global subscriber for the configured level and format
pub fn init(config: &LoggingConfig) -> Result<(), String> {
    let level = LevelFilter::from_str(&config.level)
        .map_err(|_| format!("Unknown log level '{}'", config.level))?;

    let targets = Targets::new()
        .with_default(LevelFilter::WARN.min(level))
        .with_target("parsec::tokenizer", level)
        .with_target("parsec::parser", level)
        .with_target("parsec::registry", level)
        .with_target("parsec::cli", level);

    let layer = format_layer(config.format, io::stderr).with_filter(targets);
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| e.to_string())
}

fn format_layer<W, F>(format: LogFormat, make_writer: F) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(make_writer)
            .boxed(),
    }
}
