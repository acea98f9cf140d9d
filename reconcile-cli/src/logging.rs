//! Subscriber setup for the binary.
//!
//! Info and debug lines go to stdout, warnings and errors to stderr. When a
//! command reserves stdout for machine-readable output, everything goes to
//! stderr instead.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::{fmt, fmt::writer::MakeWriterExt, EnvFilter};

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

pub fn init(format: LogFormat, stdout_reserved: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_is_tty = std::io::stdout().is_terminal();
    let stderr_is_tty = std::io::stderr().is_terminal();

    if stdout_reserved {
        let builder = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(use_ansi(stdout_reserved, stdout_is_tty, stderr_is_tty))
            .with_writer(std::io::stderr);
        let _ = match format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        return;
    }

    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(use_ansi(stdout_reserved, stdout_is_tty, stderr_is_tty))
        .with_writer(writer);
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// One formatter feeds both streams unless stdout is reserved, so colour is
/// only enabled when every stream it writes to is a terminal.
fn use_ansi(stdout_reserved: bool, stdout_is_tty: bool, stderr_is_tty: bool) -> bool {
    if stdout_reserved {
        stderr_is_tty
    } else {
        stdout_is_tty && stderr_is_tty
    }
}
