//! Session teardown

use log::{info, warn};

use crate::client::FtpClient;
use crate::error::FtpClientError;
use crate::transport::FtpTransport;

impl<T: FtpTransport> FtpClient<T> {
    /// Closes the control channel. Does nothing if it is already closed.
    pub async fn disconnect(mut self) -> Result<(), FtpClientError> {
        if !self.is_connected() {
            return Ok(());
        }

        self.transport_mut()
            .disconnect()
            .await
            .map_err(FtpClientError::Disconnect)?;
        info!("Disconnected from {}", self.host_config().name);
        Ok(())
    }

    /// Like [`disconnect`](Self::disconnect) but only logs failures.
    pub async fn disconnect_quietly(self) {
        let name = self.host_config().name.clone();
        if let Err(e) = self.disconnect().await {
            warn!("Ignoring failure while disconnecting from {}: {}", name, e);
        }
    }
}
