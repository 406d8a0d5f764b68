//! FTP Transfer modes
//!
//! Data connection modes and representation types.

/// Which side opens the data connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataConnectionMode {
    /// Client listens, server connects (PORT).
    Active,
    /// Server listens, client connects (PASV).
    #[default]
    Passive,
}

impl DataConnectionMode {
    pub fn from_use_active_data(use_active_data: bool) -> Self {
        if use_active_data {
            DataConnectionMode::Active
        } else {
            DataConnectionMode::Passive
        }
    }
}

/// Representation type set with TYPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    Ascii,
    #[default]
    Binary,
}

impl FileType {
    pub fn from_ascii_mode(ascii_mode: bool) -> Self {
        if ascii_mode {
            FileType::Ascii
        } else {
            FileType::Binary
        }
    }
}

/// Converts bare LF to CRLF for an ASCII transfer.
///
/// `last_was_cr` carries the state across chunk boundaries.
pub fn to_network_ascii(chunk: &[u8], last_was_cr: &mut bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(chunk.len() + chunk.len() / 16);
    for &b in chunk {
        if b == b'\n' && !*last_was_cr {
            out.push(b'\r');
        }
        out.push(b);
        *last_was_cr = b == b'\r';
    }
    out
}
