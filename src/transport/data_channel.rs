//! Module `data_channel`
//!
//! Opens the per-transfer data connection for LIST and STOR, in passive
//! (client connects to the address from a 227 reply) or active (server
//! connects to a listener announced with PORT) mode.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};

use log::debug;
use tokio::net::{TcpListener, TcpStream};

use crate::protocol::Command;
use crate::protocol::parser::parse_pasv_227_reply;
use crate::protocol::responses::ENTERING_PASSIVE_MODE;
use crate::transfer::DataConnectionMode;
use crate::transport::control::{FtpControlChannel, with_timeout};
use crate::transport::stream::NetStream;

impl FtpControlChannel {
    /// Sets up the data connection and issues `command` over the control channel.
    ///
    /// Returns `None` when the server refuses either the mode command or
    /// `command` itself. On success the server has sent its preliminary 1xx
    /// reply and the final reply is still pending.
    pub(super) async fn open_data_connection(
        &mut self,
        command: &Command,
    ) -> io::Result<Option<NetStream>> {
        let stream = match self.data_mode {
            DataConnectionMode::Passive => self.open_passive(command).await?,
            DataConnectionMode::Active => self.open_active(command).await?,
        };
        match stream {
            Some(stream) => self.secure_data_stream(stream).await.map(Some),
            None => Ok(None),
        }
    }

    async fn open_passive(&mut self, command: &Command) -> io::Result<Option<NetStream>> {
        let reply = self.send_command(&Command::PASV).await?;
        if reply.code != ENTERING_PASSIVE_MODE {
            return Ok(None);
        }
        let mut data_addr = parse_pasv_227_reply(reply.text()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("could not parse passive reply: {}", reply.text()),
            )
        })?;

        let peer = self.control_peer_addr()?;
        if self.remote_verification && data_addr.ip() != peer.ip() {
            debug!(
                "Passive address {} differs from control peer {}, using the peer",
                data_addr.ip(),
                peer.ip()
            );
            data_addr.set_ip(peer.ip());
        }

        let tcp = with_timeout(self.default_timeout, TcpStream::connect(data_addr)).await?;
        debug!("Passive data connection open to {}", data_addr);

        let reply = self.send_command(command).await?;
        if !reply.is_positive_preliminary() {
            return Ok(None);
        }
        Ok(Some(NetStream::Plain(tcp)))
    }

    async fn open_active(&mut self, command: &Command) -> io::Result<Option<NetStream>> {
        let local = self.control_local_addr()?;
        let announced = port_host(local.ip())?;
        let listener = TcpListener::bind(SocketAddr::new(local.ip(), 0)).await?;
        let data_addr = SocketAddrV4::new(announced, listener.local_addr()?.port());

        let reply = self.send_command(&Command::PORT(data_addr)).await?;
        if !reply.is_positive_completion() {
            return Ok(None);
        }
        let reply = self.send_command(command).await?;
        if !reply.is_positive_preliminary() {
            return Ok(None);
        }

        let (tcp, remote) = with_timeout(self.data_timeout, listener.accept()).await?;
        if self.remote_verification {
            let peer = self.control_peer_addr()?;
            if remote.ip() != peer.ip() {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!(
                        "data connection from {} does not match control peer {}",
                        remote,
                        peer.ip()
                    ),
                ));
            }
        }
        debug!("Active data connection accepted from {}", remote);
        Ok(Some(NetStream::Plain(tcp)))
    }

    async fn secure_data_stream(&self, stream: NetStream) -> io::Result<NetStream> {
        match (&self.tls, &self.server_name) {
            (Some(tls), Some(server_name)) if self.protect_data => {
                with_timeout(self.data_timeout, stream.secure(tls, server_name)).await
            }
            _ => Ok(stream),
        }
    }
}

/// The address PORT can announce for a listener on `local`.
///
/// PORT carries IPv4 only, so an IPv6 control connection without a mapped
/// IPv4 form cannot use active mode.
fn port_host(local: IpAddr) -> io::Result<Ipv4Addr> {
    match local {
        IpAddr::V4(ip) => Ok(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                format!(
                    "active mode needs an IPv4 control connection, local address is {}",
                    ip
                ),
            )
        }),
    }
}
