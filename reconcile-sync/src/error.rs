//! Error types for reconcile-sync.
//!
//! [`ApiError`] is returned by every remote call and says *how* the call
//! failed. [`SyncError`] is reserved for conditions that abort the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single remote call. `endpoint` names the operation
/// (`effective_member`, `users.list`, `scim.deactivate`, ...).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, TLS, ...).
    #[error("transport failure on {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The server answered with a non-success status.
    #[error("bad http response on {endpoint}: {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// HTTP succeeded but the platform reported `ok: false`.
    #[error("bad status on {endpoint}: {error}")]
    Application {
        endpoint: &'static str,
        error: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("undecodable response on {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A field the caller depends on was absent from an `ok` response.
    #[error("no {field} provided by {endpoint}")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
}

/// Conditions that abort the run before any workspace mutation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The directory fetch failed; nothing is known about who is permitted.
    #[error("directory fetch failed: {0}")]
    Directory(#[source] ApiError),

    /// The permitted set is implausibly small.
    #[error("membership of permit group ({found}) is too small, abort (minimum {minimum})")]
    FailsafeTriggered { found: usize, minimum: usize },

    /// Client TLS material could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A PEM file held no block of the expected kind.
    #[error("no PEM {expected} found in {path}")]
    Pem {
        path: PathBuf,
        expected: &'static str,
    },

    /// Client TLS material was read but could not be used.
    #[error("TLS setup failed for {path}: {source}")]
    Tls {
        path: PathBuf,
        #[source]
        source: rustls::Error,
    },

    /// A configured base URL cannot carry the request path.
    #[error("invalid endpoint URL {url}")]
    InvalidEndpoint { url: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn tls_err(path: impl Into<PathBuf>, source: rustls::Error) -> SyncError {
    SyncError::Tls {
        path: path.into(),
        source,
    }
}
