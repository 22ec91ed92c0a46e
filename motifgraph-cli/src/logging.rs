//! Structured logging for the motifgraph CLI.
//!
//! Diagnostics go to `stderr` through a global `tracing` subscriber so the
//! generated graph on `stdout` stays machine-readable. `RUST_LOG` selects
//! the verbosity and `MOTIFGRAPH_LOG_FORMAT` chooses between human and JSON
//! lines. Records emitted through the `log` facade are bridged in.

use std::{env, fmt, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing::warn;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable naming the output format.
pub const LOG_FORMAT_ENV: &str = "MOTIFGRAPH_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Line format of emitted diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Human,
    /// One JSON object per line, including the active span list.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Human => "human",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Errors raised while configuring logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format variable was not valid UTF-8.
    #[error("environment variable `{name}` is not valid UTF-8")]
    InvalidUnicode {
        /// Name of the offending variable.
        name: &'static str,
    },
    /// The format variable named an unknown format.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Value found in the environment.
        provided: String,
    },
}

/// Reads the requested [`LogFormat`] from `MOTIFGRAPH_LOG_FORMAT`.
///
/// # Errors
/// Returns [`LoggingError`] when the variable is not UTF-8 or names an
/// unknown format.
pub fn format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => raw.parse(),
        Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
        Err(env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
        }),
    }
}

/// Installs the global subscriber once and returns the active format.
///
/// Later calls return the format chosen by the first call. When another
/// subscriber already owns the global slot it is kept and a warning is
/// emitted through it.
///
/// # Errors
/// Returns [`LoggingError`] when the format variable is invalid.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = INSTALLED.get() {
        return Ok(*format);
    }
    let format = format_from_env()?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    let layer = match format {
        LogFormat::Human => layer.compact().boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // The `log` bridge is optional; a logger installed elsewhere wins.
    let _ = LogTracer::init();
    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
    {
        warn!(%err, "keeping previously installed tracing subscriber");
    }
    Ok(*INSTALLED.get_or_init(|| format))
}
