//! # Diagnostics
//!
//! The client never touches process-wide logging state. Every client owns a
//! [`tracing::Dispatch`] and attaches it to each future and task it runs, so two clients in
//! the same process can log at different levels to different outputs.
//!
//! * When a log level or an output is configured, [`sink`] builds a `fmt` subscriber for it.
//!   The level defaults to `info` and the output to stdout.
//! * Otherwise the client captures the dispatcher that is current when it is built (see
//!   [`current`]), which is the global subscriber in most applications.
use crate::config::ConfigError;
use std::str::FromStr;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Parses `error`, `warn`, `info`, `debug` or `trace` (case-insensitive).
pub fn parse_level(level: &str) -> Result<Level, ConfigError> {
    Level::from_str(level).map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))
}

/// A formatted diagnostics sink writing events at or above `level` to `output`.
pub fn sink(level: Level, output: Option<BoxMakeWriter>) -> Dispatch {
    let output = output.unwrap_or_else(|| BoxMakeWriter::new(std::io::stdout));

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(output)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    Dispatch::new(subscriber)
}

/// The dispatcher in effect for the calling thread.
pub fn current() -> Dispatch {
    tracing::dispatcher::get_default(Dispatch::clone)
}
