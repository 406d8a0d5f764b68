//! Transport layer
//!
//! The FTP control/data channel abstraction the session drives, its tokio
//! implementation, and the factory that builds plain or TLS transports from
//! a host configuration.

pub mod control;
pub mod data_channel;
pub mod factory;
pub mod stream;
pub mod tls;

#[cfg(test)]
pub(crate) mod mock;

use std::io;
use std::time::Duration;

use tokio::io::AsyncRead;

use crate::protocol::RemoteEntry;
use crate::transfer::{DataConnectionMode, FileType};

pub use control::FtpControlChannel;
pub use factory::create_transport;
pub use tls::TlsSettings;

/// A stateful FTP conversation: one command, then its reply.
///
/// Boolean results report whether the server accepted the command; `Err`
/// is reserved for transport faults (I/O errors, timeouts, malformed
/// replies).
#[allow(async_fn_in_trait)]
pub trait FtpTransport {
    /// Timeout for connecting and for each control channel read.
    fn set_default_timeout(&mut self, timeout: Duration);

    /// Timeout for each data channel read or write.
    fn set_data_timeout(&mut self, timeout: Duration);

    /// Character encoding of the control channel, by label.
    fn set_control_encoding(&mut self, label: &str) -> io::Result<()>;

    fn set_data_connection_mode(&mut self, mode: DataConnectionMode);

    /// Accept passive mode replies naming a host other than the control peer.
    fn set_remote_verification(&mut self, enabled: bool);

    fn set_list_hidden_files(&mut self, list_hidden: bool);

    /// Opens the control channel and reads the greeting.
    async fn connect(&mut self, host: &str, port: u16) -> io::Result<()>;

    fn is_connected(&self) -> bool;

    /// Code of the last reply read.
    fn reply_code(&self) -> u16;

    /// Full text of the last reply read.
    fn reply_string(&self) -> String;

    async fn exec_pbsz(&mut self, size: u64) -> io::Result<()>;

    async fn exec_prot(&mut self, level: &str) -> io::Result<()>;

    async fn login(&mut self, username: &str, password: &str) -> io::Result<bool>;

    /// `None` when the server does not answer PWD with a 257 reply.
    async fn print_working_directory(&mut self) -> io::Result<Option<String>>;

    async fn change_working_directory(&mut self, directory: &str) -> io::Result<bool>;

    async fn change_to_parent_directory(&mut self) -> io::Result<bool>;

    async fn make_directory(&mut self, directory: &str) -> io::Result<bool>;

    async fn remove_directory(&mut self, directory: &str) -> io::Result<bool>;

    async fn delete_file(&mut self, file: &str) -> io::Result<bool>;

    async fn set_file_type(&mut self, file_type: FileType) -> io::Result<bool>;

    /// Lists the current directory.
    ///
    /// `None` when the listing could not be initiated. A `None` entry marks
    /// a line that could not be parsed.
    async fn list_entries(&mut self) -> io::Result<Option<Vec<Option<RemoteEntry>>>>;

    async fn store_file<R>(&mut self, remote_name: &str, content: &mut R) -> io::Result<bool>
    where
        R: AsyncRead + Unpin;

    /// Closes the control channel.
    async fn disconnect(&mut self) -> io::Result<()>;
}
