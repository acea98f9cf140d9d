//! Error types for reconcile-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading and validating configuration.
///
/// Every variant is fatal: the run must not start.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist at the resolved path.
    #[error("config file not found {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure while reading the configuration file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and serde_yaml line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required key is absent from the `common` section.
    #[error("missing [common] config option {option}")]
    MissingOption { option: &'static str },

    /// A key is present but its value cannot be used.
    #[error("invalid value for config option {option}: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    /// A TLS material path from the config does not exist on disk.
    #[error("certificate file not found {path}")]
    CertificateNotFound { path: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
