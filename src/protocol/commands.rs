//! Module `commands`
//!
//! Defines the FTP commands the publisher sends on the control channel and
//! how each is rendered on the wire.

use std::fmt;
use std::net::SocketAddrV4;

use crate::transfer::FileType;

/// An FTP command issued by the client.
///
/// Commands that take an argument store it as a `String`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    USER(String),
    PASS(String),
    AUTH(String),
    PBSZ(u64),
    PROT(String),
    PWD,
    CWD(String),  // Change working directory
    CDUP,         // Change to parent directory
    MKD(String),  // Make directory
    RMD(String),  // Remove directory
    DELE(String), // Delete file
    TYPE(FileType),
    PASV,         // Enter passive mode
    PORT(SocketAddrV4),
    LIST { all: bool },
    STOR(String), // Store/upload file
    QUIT,
}

impl Command {
    /// Text suitable for logs. Never reveals the password.
    pub fn loggable(&self) -> String {
        match self {
            Command::PASS(_) => "PASS ****".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::USER(user) => write!(f, "USER {}", user),
            Command::PASS(pass) => write!(f, "PASS {}", pass),
            Command::AUTH(mechanism) => write!(f, "AUTH {}", mechanism),
            Command::PBSZ(size) => write!(f, "PBSZ {}", size),
            Command::PROT(level) => write!(f, "PROT {}", level),
            Command::PWD => write!(f, "PWD"),
            Command::CWD(dir) => write!(f, "CWD {}", dir),
            Command::CDUP => write!(f, "CDUP"),
            Command::MKD(dir) => write!(f, "MKD {}", dir),
            Command::RMD(dir) => write!(f, "RMD {}", dir),
            Command::DELE(file) => write!(f, "DELE {}", file),
            Command::TYPE(FileType::Ascii) => write!(f, "TYPE A"),
            Command::TYPE(FileType::Binary) => write!(f, "TYPE I"),
            Command::PASV => write!(f, "PASV"),
            Command::PORT(addr) => write!(f, "PORT {}", format_port_argument(addr)),
            Command::LIST { all: true } => write!(f, "LIST -a"),
            Command::LIST { all: false } => write!(f, "LIST"),
            Command::STOR(file) => write!(f, "STOR {}", file),
            Command::QUIT => write!(f, "QUIT"),
        }
    }
}

/// Formats the `h1,h2,h3,h4,p1,p2` argument of PORT.
fn format_port_argument(addr: &SocketAddrV4) -> String {
    let octets = addr.ip().octets();
    let port = addr.port();
    format!(
        "{},{},{},{},{},{}",
        octets[0],
        octets[1],
        octets[2],
        octets[3],
        port >> 8,
        port & 0xff
    )
}
