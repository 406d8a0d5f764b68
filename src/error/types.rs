//! Error types
//!
//! A single tagged error type for every failure the publisher's FTP session
//! can raise. Wrapped transport faults are kept as the error source.

use std::error::Error;
use std::fmt;
use std::io;

/// Which directory command a [`FtpClientError::Directory`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOperation {
    Change,
    Make,
    Remove,
    ChangeToParent,
}

impl fmt::Display for DirectoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryOperation::Change => write!(f, "change to directory"),
            DirectoryOperation::Make => write!(f, "make directory"),
            DirectoryOperation::Remove => write!(f, "remove directory"),
            DirectoryOperation::ChangeToParent => write!(f, "change to parent of directory"),
        }
    }
}

/// Reasons a directory listing failed during a recursive delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingFailure {
    NotInitiated,
    NullEntry,
}

/// Reasons the representation type could not be set.
#[derive(Debug)]
pub enum TransferModeFailure {
    NoSourceFiles,
    Refused(String),
    Fault(io::Error),
}

/// Discriminant of [`FtpClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Authentication,
    Directory,
    RootNotAbsolute,
    Listing,
    Delete,
    TransferMode,
    Transfer,
    Disconnect,
    ClientCreation,
    Transport,
    Config,
}

/// Errors raised by the FTP publishing session.
#[derive(Debug)]
pub enum FtpClientError {
    /// The server greeting was not a positive completion reply.
    Connection {
        host: String,
        port: u16,
        reply_code: u16,
    },
    /// Login rejected. Only the username is ever carried.
    Authentication { username: String },
    /// A CWD, MKD, RMD or CDUP was refused or faulted.
    Directory {
        operation: DirectoryOperation,
        directory: String,
        source: Option<io::Error>,
    },
    /// PWD returned something that is not an absolute path.
    RootNotAbsolute(Option<String>),
    Listing(ListingFailure),
    /// DELE refused for a file during a recursive delete.
    Delete { file: String },
    TransferMode(TransferModeFailure),
    /// STOR refused; carries the server's last reply.
    Transfer { reply: String },
    Disconnect(io::Error),
    /// Transport fault while building a session.
    ClientCreation(io::Error),
    Transport(io::Error),
    /// Invalid configuration or trust material, raised before any I/O.
    Config(String),
}

impl FtpClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FtpClientError::Connection { .. } => ErrorKind::Connection,
            FtpClientError::Authentication { .. } => ErrorKind::Authentication,
            FtpClientError::Directory { .. } => ErrorKind::Directory,
            FtpClientError::RootNotAbsolute(_) => ErrorKind::RootNotAbsolute,
            FtpClientError::Listing(_) => ErrorKind::Listing,
            FtpClientError::Delete { .. } => ErrorKind::Delete,
            FtpClientError::TransferMode(_) => ErrorKind::TransferMode,
            FtpClientError::Transfer { .. } => ErrorKind::Transfer,
            FtpClientError::Disconnect(_) => ErrorKind::Disconnect,
            FtpClientError::ClientCreation(_) => ErrorKind::ClientCreation,
            FtpClientError::Transport(_) => ErrorKind::Transport,
            FtpClientError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn directory(operation: DirectoryOperation, directory: &str) -> Self {
        FtpClientError::Directory {
            operation,
            directory: directory.to_string(),
            source: None,
        }
    }

    pub(crate) fn directory_fault(
        operation: DirectoryOperation,
        directory: &str,
        source: io::Error,
    ) -> Self {
        FtpClientError::Directory {
            operation,
            directory: directory.to_string(),
            source: Some(source),
        }
    }
}

impl fmt::Display for FtpClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpClientError::Connection {
                host,
                port,
                reply_code,
            } => write!(
                f,
                "Failed to connect to {}:{}, server replied with code {}",
                host, port, reply_code
            ),
            FtpClientError::Authentication { username } => {
                write!(f, "Login failed for user: {}", username)
            }
            FtpClientError::Directory {
                operation,
                directory,
                source: Some(e),
            } => write!(f, "Failed to {} [{}]: {}", operation, directory, e),
            FtpClientError::Directory {
                operation,
                directory,
                source: None,
            } => write!(f, "Failed to {} [{}]", operation, directory),
            FtpClientError::RootNotAbsolute(Some(pwd)) => {
                write!(f, "Working directory is not absolute: [{}]", pwd)
            }
            FtpClientError::RootNotAbsolute(None) => {
                write!(f, "Working directory is not absolute: server returned no directory")
            }
            FtpClientError::Listing(ListingFailure::NotInitiated) => {
                write!(f, "Directory listing could not be initiated")
            }
            FtpClientError::Listing(ListingFailure::NullEntry) => {
                write!(f, "Directory listing returned a file that is null")
            }
            FtpClientError::Delete { file } => write!(f, "Failed to delete file [{}]", file),
            FtpClientError::TransferMode(TransferModeFailure::NoSourceFiles) => {
                write!(f, "No source files configured for the transfer")
            }
            FtpClientError::TransferMode(TransferModeFailure::Refused(reply)) => {
                write!(f, "Failed to set the transfer mode: {}", reply.trim_end())
            }
            FtpClientError::TransferMode(TransferModeFailure::Fault(e)) => {
                write!(f, "Exception when setting the transfer mode: {}", e)
            }
            FtpClientError::Transfer { reply } => {
                write!(f, "Failed to store file: {}", reply.trim_end())
            }
            FtpClientError::Disconnect(e) => write!(f, "Exception on disconnect: {}", e),
            FtpClientError::ClientCreation(e) => {
                write!(f, "Failed to create FTP client: {:?}: {}", e.kind(), e)
            }
            FtpClientError::Transport(e) => write!(f, "Transport error: {}", e),
            FtpClientError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for FtpClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FtpClientError::Directory {
                source: Some(e), ..
            } => Some(e),
            FtpClientError::TransferMode(TransferModeFailure::Fault(e)) => Some(e),
            FtpClientError::Disconnect(e) => Some(e),
            FtpClientError::ClientCreation(e) => Some(e),
            FtpClientError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FtpClientError {
    fn from(error: io::Error) -> Self {
        FtpClientError::Transport(error)
    }
}

impl From<config::ConfigError> for FtpClientError {
    fn from(error: config::ConfigError) -> Self {
        FtpClientError::Config(error.to_string())
    }
}
