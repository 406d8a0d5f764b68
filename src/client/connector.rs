//! Session connector
//!
//! Drives a fresh transport through connect, optional data protection,
//! login and root resolution. A session is only returned once every step
//! has succeeded; on any failure the transport is closed quietly first.

use log::{debug, info};

use crate::client::FtpClient;
use crate::config::{Credentials, HostConfig};
use crate::error::FtpClientError;
use crate::protocol::responses::is_positive_completion;
use crate::transfer::DataConnectionMode;
use crate::transport::{FtpControlChannel, FtpTransport, create_transport};

/// Builds a transport for `host` and connects it.
///
/// `credentials` replaces the host's own username and password for this
/// login only.
pub async fn create_client(
    host: &HostConfig,
    credentials: Option<&Credentials>,
) -> Result<FtpClient<FtpControlChannel>, FtpClientError> {
    let transport = create_transport(host)?;
    connect_client(transport, host, credentials).await
}

/// Connects an already built transport.
pub async fn connect_client<T: FtpTransport>(
    transport: T,
    host: &HostConfig,
    credentials: Option<&Credentials>,
) -> Result<FtpClient<T>, FtpClientError> {
    let mut client = FtpClient::new(transport, host.clone());
    match client.init(credentials).await {
        Ok(()) => Ok(client),
        Err(e) => {
            client.disconnect_quietly().await;
            Err(e)
        }
    }
}

/// Opens a session and closes it again.
pub async fn test_connection(
    host: &HostConfig,
    credentials: Option<&Credentials>,
) -> Result<(), FtpClientError> {
    let client = create_client(host, credentials).await?;
    client.disconnect_quietly().await;
    info!("Connection test for {} succeeded", host.name);
    Ok(())
}

impl<T: FtpTransport> FtpClient<T> {
    async fn init(&mut self, credentials: Option<&Credentials>) -> Result<(), FtpClientError> {
        let host = self.host_config().clone();
        let hostname = host.hostname_trimmed();

        let transport = self.transport_mut();
        transport.set_default_timeout(host.timeout());
        transport.set_data_timeout(host.timeout());
        if let Some(label) = host.control_encoding() {
            transport
                .set_control_encoding(label)
                .map_err(FtpClientError::ClientCreation)?;
        }
        transport.set_remote_verification(!host.disable_remote_verification);

        info!("Connecting to {}:{}", hostname, host.port);
        transport
            .connect(hostname, host.port)
            .await
            .map_err(FtpClientError::ClientCreation)?;
        let reply_code = transport.reply_code();
        if !is_positive_completion(reply_code) {
            return Err(FtpClientError::Connection {
                host: hostname.to_string(),
                port: host.port,
                reply_code,
            });
        }

        let mode = DataConnectionMode::from_use_active_data(host.use_active_data);
        debug!("Using {:?} data connections", mode);
        transport.set_data_connection_mode(mode);

        if host.tls.as_ref().is_some_and(|tls| tls.implicit) {
            transport
                .exec_pbsz(0)
                .await
                .map_err(FtpClientError::ClientCreation)?;
            transport
                .exec_prot("P")
                .await
                .map_err(FtpClientError::ClientCreation)?;
        }

        let (username, password) = match credentials {
            Some(c) => (c.username.as_str(), c.password.as_str()),
            None => (host.username.as_str(), host.password.as_str()),
        };
        let logged_in = transport
            .login(username, password)
            .await
            .map_err(FtpClientError::ClientCreation)?;
        if !logged_in {
            return Err(FtpClientError::Authentication {
                username: username.to_string(),
            });
        }
        info!("Logged in to {} as {}", host.name, username);

        self.change_to_root_directory().await?;
        self.resolve_absolute_root().await
    }
}
