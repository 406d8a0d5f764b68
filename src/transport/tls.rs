//! TLS trust material
//!
//! Builds the rustls client configuration used for FTPS control and data
//! connections. Trust decisions are left entirely to rustls; this module
//! only assembles the trust anchors.

use std::fmt;
use std::sync::Arc;

use log::debug;
use rustls_pki_types::CertificateDer;
use rustls_pki_types::pem::PemObject;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

use crate::config::TlsConfig;
use crate::error::FtpClientError;

/// TLS material bound to one transport.
#[derive(Clone)]
pub struct TlsSettings {
    connector: TlsConnector,
    implicit: bool,
}

impl TlsSettings {
    pub fn connector(&self) -> &TlsConnector {
        &self.connector
    }

    /// Secure from the first byte rather than after `AUTH TLS`.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }
}

impl fmt::Debug for TlsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsSettings")
            .field("implicit", &self.implicit)
            .finish_non_exhaustive()
    }
}

/// Builds the trust store: the configured PEM bundle if any, else empty,
/// plus the inline certificate when one is configured.
pub fn build_trust_store(config: &TlsConfig) -> Result<RootCertStore, FtpClientError> {
    let mut roots = RootCertStore::empty();

    if let Some(path) = &config.trust_store {
        let certs = CertificateDer::pem_file_iter(path).map_err(|e| {
            FtpClientError::Config(format!(
                "unable to read trust store {}: {e}",
                path.display()
            ))
        })?;
        for (i, cert) in certs.enumerate() {
            let cert = cert.map_err(|e| {
                FtpClientError::Config(format!(
                    "invalid certificate #{i} in trust store {}: {e}",
                    path.display()
                ))
            })?;
            roots.add(cert).map_err(|e| {
                FtpClientError::Config(format!(
                    "unusable certificate #{i} in trust store {}: {e}",
                    path.display()
                ))
            })?;
        }
        debug!("Loaded {} trust anchors from {}", roots.len(), path.display());
    }

    if let Some(pem) = config.certificate.as_deref().filter(|p| !p.trim().is_empty()) {
        let cert = CertificateDer::from_pem_slice(pem.as_bytes()).map_err(|e| {
            FtpClientError::Config(format!("invalid inline certificate: {e}"))
        })?;
        roots.add(cert).map_err(|e| {
            FtpClientError::Config(format!("unusable inline certificate: {e}"))
        })?;
    }

    Ok(roots)
}

pub fn build_tls_settings(config: &TlsConfig) -> Result<TlsSettings, FtpClientError> {
    let roots = build_trust_store(config)?;
    let client_config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(TlsSettings {
        connector: TlsConnector::from(Arc::new(client_config)),
        implicit: config.implicit,
    })
}
