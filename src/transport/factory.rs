//! Transport factory
//!
//! Produces an unconnected transport for a host: plain, or bound to TLS
//! trust material when the host asks for FTPS. Trust material problems fail
//! here, before any network I/O.

use log::debug;

use crate::config::HostConfig;
use crate::error::FtpClientError;
use crate::transport::FtpControlChannel;
use crate::transport::tls::build_tls_settings;

pub fn create_transport(host: &HostConfig) -> Result<FtpControlChannel, FtpClientError> {
    match &host.tls {
        Some(tls_config) => {
            let settings = build_tls_settings(tls_config)?;
            debug!(
                "Created {} TLS transport for host {}",
                if settings.is_implicit() { "implicit" } else { "explicit" },
                host.name
            );
            Ok(FtpControlChannel::with_tls(settings))
        }
        None => {
            debug!("Created plain transport for host {}", host.name);
            Ok(FtpControlChannel::new())
        }
    }
}
