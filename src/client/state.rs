//! Module `state`
//!
//! Defines the `FtpClient` session: one live transport, the host snapshot
//! it was built from, and the resolved absolute remote root.

use crate::config::HostConfig;
use crate::transport::FtpTransport;

/// An established, authenticated FTP session.
///
/// Only the connector hands these out, after the root has been resolved.
/// Every operation takes `&mut self`, so the control channel is never
/// shared; `disconnect` consumes the session.
pub struct FtpClient<T: FtpTransport> {
    transport: T,
    host: HostConfig,
    absolute_remote_root: String,
}

impl<T: FtpTransport> FtpClient<T> {
    pub(crate) fn new(transport: T, host: HostConfig) -> Self {
        Self {
            transport,
            host,
            absolute_remote_root: String::new(),
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    /// The session's operating root. Always starts with `/` or `\`.
    pub fn absolute_remote_root(&self) -> &str {
        &self.absolute_remote_root
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.host
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // --------------------
    // Setter methods
    // --------------------

    pub(crate) fn set_absolute_remote_root(&mut self, root: String) {
        self.absolute_remote_root = root;
    }
}
