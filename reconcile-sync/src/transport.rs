//! HTTP agents and response classification shared by both clients.

use std::path::Path;
use std::sync::Arc;

use reconcile_core::config::ClientTls;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, RootCertStore};
use serde::de::DeserializeOwned;
use ureq::{Agent, AgentBuilder, Response};

use crate::error::{io_err, tls_err, ApiError, SyncError};

/// Agent that presents a client certificate and trusts only the
/// certificates in `ca_file`.
pub fn mutual_tls_agent(tls: &ClientTls) -> Result<Agent, SyncError> {
    let config = client_config(tls)?;
    Ok(AgentBuilder::new().tls_config(config).build())
}

/// TLS client settings for the directory service.
///
/// Every certificate in the `ca_file` bundle becomes a trust root, in any
/// order, and no platform roots are added. `key_file` may hold a PKCS#8,
/// PKCS#1 (`RSA PRIVATE KEY`) or SEC1 (`EC PRIVATE KEY`) key.
pub fn client_config(tls: &ClientTls) -> Result<Arc<ClientConfig>, SyncError> {
    let chain = read_certs(&tls.cert_file)?;
    let key = read_key(&tls.key_file)?;

    let mut roots = RootCertStore::empty();
    for ca in read_certs(&tls.ca_file)? {
        roots.add(ca).map_err(|e| tls_err(&tls.ca_file, e))?;
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| tls_err(&tls.ca_file, e))?
        .with_root_certificates(roots)
        .with_client_auth_cert(chain, key)
        .map_err(|e| tls_err(&tls.key_file, e))?;
    Ok(Arc::new(config))
}

fn read_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, SyncError> {
    let pem = read(path)?;
    let certs = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(path, e))?;
    if certs.is_empty() {
        return Err(SyncError::Pem {
            path: path.to_path_buf(),
            expected: "certificate",
        });
    }
    Ok(certs)
}

fn read_key(path: &Path) -> Result<PrivateKeyDer<'static>, SyncError> {
    let pem = read(path)?;
    rustls_pemfile::private_key(&mut pem.as_slice())
        .map_err(|e| io_err(path, e))?
        .ok_or_else(|| SyncError::Pem {
            path: path.to_path_buf(),
            expected: "private key",
        })
}

/// Agent with the platform's default trust store and no client identity.
pub fn default_agent() -> Agent {
    AgentBuilder::new().build()
}

fn read(path: &Path) -> Result<Vec<u8>, SyncError> {
    std::fs::read(path).map_err(|e| io_err(path, e))
}

/// Map a `ureq` outcome onto [`ApiError`]. Any 2xx is success.
pub(crate) fn classify(
    endpoint: &'static str,
    result: Result<Response, ureq::Error>,
) -> Result<Response, ApiError> {
    match result {
        Ok(response) if (200..300).contains(&response.status()) => Ok(response),
        Ok(response) => Err(ApiError::Status {
            endpoint,
            status: response.status(),
        }),
        Err(ureq::Error::Status(status, _)) => Err(ApiError::Status { endpoint, status }),
        Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport {
            endpoint,
            source: Box::new(transport),
        }),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ApiError> {
    response
        .into_json::<T>()
        .map_err(|source| ApiError::Decode { endpoint, source })
}
