//! Module `control`
//!
//! tokio implementation of [`FtpTransport`]: a line-oriented command/reply
//! conversation over a plain or TLS control connection.

use std::borrow::Cow;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use encoding_rs::Encoding;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;

use crate::protocol::parser::{is_final_line, parse_pwd_257_reply, parse_reply_line};
use crate::protocol::responses::{
    PATHNAME_CREATED, SECURITY_DATA_EXCHANGE_COMPLETE, is_positive_intermediate,
};
use crate::protocol::{Command, RemoteEntry, Reply, parse_listing};
use crate::transfer::{DataConnectionMode, FileType, to_network_ascii};
use crate::transport::FtpTransport;
use crate::transport::stream::NetStream;
use crate::transport::tls::TlsSettings;

const DATA_BUFFER_SIZE: usize = 8192;
/// Upper bound on writing QUIT and closing the socket.
const QUIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs `fut`, failing with `TimedOut` once `limit` elapses. A zero limit waits forever.
pub(super) async fn with_timeout<T, F>(limit: Duration, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    if limit.is_zero() {
        return fut.await;
    }
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("no response within {} ms", limit.as_millis()),
        )),
    }
}

/// The session timeout, capped at [`QUIT_TIMEOUT`]. Zero counts as unbounded.
fn quit_timeout(default_timeout: Duration) -> Duration {
    if default_timeout.is_zero() {
        QUIT_TIMEOUT
    } else {
        default_timeout.min(QUIT_TIMEOUT)
    }
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "control channel is not connected")
}

/// FTP control channel over tokio.
pub struct FtpControlChannel {
    control: Option<BufReader<NetStream>>,
    pub(super) tls: Option<TlsSettings>,
    pub(super) server_name: Option<ServerName<'static>>,
    pub(super) default_timeout: Duration,
    pub(super) data_timeout: Duration,
    encoding: &'static Encoding,
    pub(super) data_mode: DataConnectionMode,
    pub(super) remote_verification: bool,
    pub(super) protect_data: bool,
    file_type: FileType,
    list_hidden: bool,
    last_reply: Option<Reply>,
}

impl Default for FtpControlChannel {
    fn default() -> Self {
        Self {
            control: None,
            tls: None,
            server_name: None,
            default_timeout: Duration::ZERO,
            data_timeout: Duration::ZERO,
            encoding: encoding_rs::UTF_8,
            data_mode: DataConnectionMode::default(),
            remote_verification: true,
            protect_data: false,
            file_type: FileType::default(),
            list_hidden: false,
            last_reply: None,
        }
    }
}

impl FtpControlChannel {
    /// A plaintext channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel secured with `tls`, implicitly or via `AUTH TLS`.
    pub fn with_tls(tls: TlsSettings) -> Self {
        Self {
            tls: Some(tls),
            ..Self::default()
        }
    }

    pub fn is_secure(&self) -> bool {
        self.tls.is_some()
    }

    fn control_mut(&mut self) -> io::Result<&mut BufReader<NetStream>> {
        self.control.as_mut().ok_or_else(not_connected)
    }

    pub(super) fn control_peer_addr(&self) -> io::Result<SocketAddr> {
        let control = self.control.as_ref().ok_or_else(not_connected)?;
        control.get_ref().tcp().peer_addr()
    }

    pub(super) fn control_local_addr(&self) -> io::Result<SocketAddr> {
        let control = self.control.as_ref().ok_or_else(not_connected)?;
        control.get_ref().tcp().local_addr()
    }

    /// Sends one command and reads its complete reply.
    pub(super) async fn send_command(&mut self, command: &Command) -> io::Result<Reply> {
        self.write_command(command, self.default_timeout).await?;
        self.read_reply().await
    }

    async fn write_command(&mut self, command: &Command, limit: Duration) -> io::Result<()> {
        debug!("> {}", command.loggable());
        let line = format!("{}\r\n", command);
        let (bytes, _, _) = self.encoding.encode(&line);
        let control = self.control_mut()?;
        with_timeout(limit, async {
            control.get_mut().write_all(&bytes).await?;
            control.get_mut().flush().await
        })
        .await
    }

    /// Reads the final reply of a command whose data transfer just finished.
    pub(super) async fn complete_pending_command(&mut self) -> io::Result<bool> {
        Ok(self.read_reply().await?.is_positive_completion())
    }

    async fn read_reply(&mut self) -> io::Result<Reply> {
        let first = self.read_line().await?;
        let parsed = parse_reply_line(&first).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed server reply: {}", first),
            )
        })?;

        let mut lines = vec![first];
        if parsed.continued {
            loop {
                let line = self.read_line().await?;
                let done = is_final_line(&line, parsed.code);
                lines.push(line);
                if done {
                    break;
                }
            }
        }

        let reply = Reply::new(parsed.code, lines);
        debug!("< {}", reply.reply_string().trim_end());
        self.last_reply = Some(reply.clone());
        Ok(reply)
    }

    async fn read_line(&mut self) -> io::Result<String> {
        let timeout = self.default_timeout;
        let encoding = self.encoding;
        let control = self.control_mut()?;

        let mut buf = Vec::new();
        let n = with_timeout(timeout, control.read_until(b'\n', &mut buf)).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed without indication",
            ));
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        let (text, _) = encoding.decode_without_bom_handling(&buf);
        Ok(text.into_owned())
    }

    async fn upgrade_control_channel(&mut self, tls: &TlsSettings) -> io::Result<()> {
        let reply = self.send_command(&Command::AUTH("TLS".into())).await?;
        if reply.code != SECURITY_DATA_EXCHANGE_COMPLETE {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("server refused AUTH TLS: {}", reply.reply_string().trim_end()),
            ));
        }
        let server_name = self.server_name.clone().ok_or_else(not_connected)?;
        let control = self.control.take().ok_or_else(not_connected)?;
        let secured = with_timeout(
            self.default_timeout,
            control.into_inner().secure(tls, &server_name),
        )
        .await?;
        self.control = Some(BufReader::new(secured));
        debug!("Control channel upgraded to TLS");
        Ok(())
    }

    async fn simple_command(&mut self, command: Command) -> io::Result<bool> {
        Ok(self.send_command(&command).await?.is_positive_completion())
    }

    async fn required_command(&mut self, command: Command) -> io::Result<()> {
        let reply = self.send_command(&command).await?;
        if reply.is_positive_completion() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "{} refused: {}",
                    command.loggable(),
                    reply.reply_string().trim_end()
                ),
            ))
        }
    }
}

impl FtpTransport for FtpControlChannel {
    fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    fn set_data_timeout(&mut self, timeout: Duration) {
        self.data_timeout = timeout;
    }

    fn set_control_encoding(&mut self, label: &str) -> io::Result<()> {
        self.encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported control encoding: {}", label),
            )
        })?;
        Ok(())
    }

    fn set_data_connection_mode(&mut self, mode: DataConnectionMode) {
        self.data_mode = mode;
    }

    fn set_remote_verification(&mut self, enabled: bool) {
        self.remote_verification = enabled;
    }

    fn set_list_hidden_files(&mut self, list_hidden: bool) {
        self.list_hidden = list_hidden;
    }

    async fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        let tcp = with_timeout(self.default_timeout, TcpStream::connect((host, port))).await?;
        info!("Control channel open to {}:{}", host, port);

        let mut stream = NetStream::Plain(tcp);
        let tls = self.tls.clone();
        if let Some(tls) = &tls {
            let server_name = ServerName::try_from(host)
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("invalid TLS server name {}: {}", host, e),
                    )
                })?
                .to_owned();
            if tls.is_implicit() {
                stream = with_timeout(self.default_timeout, stream.secure(tls, &server_name)).await?;
                debug!("Implicit TLS established with {}", host);
            }
            self.server_name = Some(server_name);
        }
        self.control = Some(BufReader::new(stream));

        let greeting = self.read_reply().await?;
        if let Some(tls) = &tls {
            if !tls.is_implicit() && greeting.is_positive_completion() {
                self.upgrade_control_channel(tls).await?;
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.control.is_some()
    }

    fn reply_code(&self) -> u16 {
        self.last_reply.as_ref().map(|r| r.code).unwrap_or(0)
    }

    fn reply_string(&self) -> String {
        self.last_reply
            .as_ref()
            .map(Reply::reply_string)
            .unwrap_or_default()
    }

    async fn exec_pbsz(&mut self, size: u64) -> io::Result<()> {
        self.required_command(Command::PBSZ(size)).await
    }

    async fn exec_prot(&mut self, level: &str) -> io::Result<()> {
        self.required_command(Command::PROT(level.to_string())).await?;
        self.protect_data = level == "P";
        Ok(())
    }

    async fn login(&mut self, username: &str, password: &str) -> io::Result<bool> {
        let reply = self.send_command(&Command::USER(username.to_string())).await?;
        if reply.is_positive_completion() {
            return Ok(true);
        }
        if !is_positive_intermediate(reply.code) {
            return Ok(false);
        }
        let reply = self.send_command(&Command::PASS(password.to_string())).await?;
        Ok(reply.is_positive_completion())
    }

    async fn print_working_directory(&mut self) -> io::Result<Option<String>> {
        let reply = self.send_command(&Command::PWD).await?;
        if reply.code != PATHNAME_CREATED {
            return Ok(None);
        }
        Ok(parse_pwd_257_reply(reply.text()))
    }

    async fn change_working_directory(&mut self, directory: &str) -> io::Result<bool> {
        self.simple_command(Command::CWD(directory.to_string())).await
    }

    async fn change_to_parent_directory(&mut self) -> io::Result<bool> {
        self.simple_command(Command::CDUP).await
    }

    async fn make_directory(&mut self, directory: &str) -> io::Result<bool> {
        self.simple_command(Command::MKD(directory.to_string())).await
    }

    async fn remove_directory(&mut self, directory: &str) -> io::Result<bool> {
        self.simple_command(Command::RMD(directory.to_string())).await
    }

    async fn delete_file(&mut self, file: &str) -> io::Result<bool> {
        self.simple_command(Command::DELE(file.to_string())).await
    }

    async fn set_file_type(&mut self, file_type: FileType) -> io::Result<bool> {
        let accepted = self.simple_command(Command::TYPE(file_type)).await?;
        if accepted {
            self.file_type = file_type;
        }
        Ok(accepted)
    }

    async fn list_entries(&mut self) -> io::Result<Option<Vec<Option<RemoteEntry>>>> {
        let command = Command::LIST {
            all: self.list_hidden,
        };
        let Some(mut data) = self.open_data_connection(&command).await? else {
            return Ok(None);
        };

        let mut raw = Vec::new();
        let mut chunk = vec![0u8; DATA_BUFFER_SIZE];
        loop {
            match with_timeout(self.data_timeout, data.read(&mut chunk)).await {
                Ok(0) => break,
                Ok(n) => raw.extend_from_slice(&chunk[..n]),
                // TLS peers that close without close_notify
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }
        drop(data);

        if !self.complete_pending_command().await? {
            return Err(io::Error::other(format!(
                "listing did not complete: {}",
                self.reply_string().trim_end()
            )));
        }

        let (text, _) = self.encoding.decode_without_bom_handling(&raw);
        Ok(Some(parse_listing(&text)))
    }

    async fn store_file<R>(&mut self, remote_name: &str, content: &mut R) -> io::Result<bool>
    where
        R: AsyncRead + Unpin,
    {
        let command = Command::STOR(remote_name.to_string());
        let Some(mut data) = self.open_data_connection(&command).await? else {
            return Ok(false);
        };

        let ascii = self.file_type == FileType::Ascii;
        let data_timeout = self.data_timeout;
        let sent = async {
            let mut last_was_cr = false;
            let mut chunk = vec![0u8; DATA_BUFFER_SIZE];
            loop {
                let n = content.read(&mut chunk).await?;
                if n == 0 {
                    break;
                }
                let out: Cow<'_, [u8]> = if ascii {
                    Cow::Owned(to_network_ascii(&chunk[..n], &mut last_was_cr))
                } else {
                    Cow::Borrowed(&chunk[..n])
                };
                with_timeout(data_timeout, data.write_all(&out)).await?;
            }
            with_timeout(data_timeout, data.shutdown()).await
        }
        .await;
        drop(data);

        if let Err(e) = sent {
            // The server still answers STOR once the data connection closes
            if let Err(drain) = self.read_reply().await {
                debug!("No reply to the aborted STOR: {}", drain);
            }
            return Err(e);
        }
        self.complete_pending_command().await
    }

    async fn disconnect(&mut self) -> io::Result<()> {
        if self.control.is_none() {
            return Ok(());
        }
        // The reply to QUIT is not awaited; the socket is closed either way
        let limit = quit_timeout(self.default_timeout);
        if let Err(e) = self.write_command(&Command::QUIT, limit).await {
            debug!("QUIT failed: {}", e);
        }
        if let Some(mut control) = self.control.take() {
            with_timeout(limit, control.get_mut().shutdown()).await?;
            debug!("Control channel closed");
        }
        Ok(())
    }
}
