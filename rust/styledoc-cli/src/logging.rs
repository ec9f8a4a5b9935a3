//! Terminal logging setup: level, output format, and a compact formatter
//! for interactive use.

use std::io::IsTerminal;

use clap::ValueEnum;
use eyre::{bail, Context, Result};
use tracing::metadata::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, registry, EnvFilter};

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LoggingLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LoggingLevel> for LevelFilter {
    fn from(value: LoggingLevel) -> Self {
        match value {
            LoggingLevel::Trace => LevelFilter::TRACE,
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Warn => LevelFilter::WARN,
            LoggingLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl LoggingLevel {
    fn as_filter_str(self) -> &'static str {
        match self {
            LoggingLevel::Trace => "trace",
            LoggingLevel::Debug => "debug",
            LoggingLevel::Info => "info",
            LoggingLevel::Warn => "warn",
            LoggingLevel::Error => "error",
        }
    }
}

/// A `tracing-subscriber` output format
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LoggingFormat {
    Auto,
    Simple,
    Compact,
    Pretty,
    Json,
}

/// Set up the global `tracing` subscriber.
///
/// `level` is the minimum level for entries from this crate's own code;
/// `filter` additionally scopes entries from dependencies (e.g.
/// `hyper=info,tower_http=debug`).
pub fn setup(level: LoggingLevel, filter: &str, format: LoggingFormat) -> Result<()> {
    let is_term = std::io::stderr().is_terminal();
    let (format, ansi) = match format {
        LoggingFormat::Auto => {
            if is_term {
                (LoggingFormat::Compact, true)
            } else {
                (LoggingFormat::Json, false)
            }
        }
        other => (other, is_term),
    };

    let filter = format!("{}{}{}", level.as_filter_str(), if filter.is_empty() { "" } else { "," }, filter);
    let filter_layer = EnvFilter::builder().parse(&filter).wrap_err_with(|| format!("unable to parse logging filter: {filter}"))?;

    let registry = registry().with(filter_layer).with(ErrorLayer::default());
    let format_layer = fmt::layer().with_ansi(ansi).with_writer(std::io::stderr);

    match format {
        LoggingFormat::Simple => registry.with(format_layer.event_format(SimpleFormatter)).init(),
        LoggingFormat::Compact => registry.with(format_layer.compact()).init(),
        LoggingFormat::Pretty => registry.with(format_layer.pretty()).init(),
        LoggingFormat::Json => registry.with(format_layer.json()).init(),
        LoggingFormat::Auto => bail!("auto format should already have been resolved"),
    }

    tracing::trace!("logging set up");
    Ok(())
}

struct SimpleFormatter;

impl<S, N> FormatEvent<S, N> for SimpleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &tracing::Event<'_>) -> std::fmt::Result {
        write!(writer, "{} ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
