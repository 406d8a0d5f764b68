//! FTP Response handling
//!
//! Reply codes the client cares about and the reply value read off the
//! control channel.

pub const FILE_STATUS_OK: u16 = 150;
pub const READY: u16 = 220;
pub const ENTERING_PASSIVE_MODE: u16 = 227;
pub const SECURITY_DATA_EXCHANGE_COMPLETE: u16 = 234;
pub const PATHNAME_CREATED: u16 = 257;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const AUTH_FAILED: u16 = 530;

/// A complete server reply, single or multi line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    /// Raw reply lines including the code prefix, without line terminators.
    pub lines: Vec<String>,
}

impl Reply {
    pub fn new(code: u16, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// All reply lines joined with CRLF, terminated by CRLF.
    pub fn reply_string(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push_str("\r\n");
        }
        out
    }

    /// Text of the last line after the code and separator.
    pub fn text(&self) -> &str {
        self.lines
            .last()
            .map(|line| line.get(4..).unwrap_or(""))
            .unwrap_or("")
    }

    pub fn is_positive_preliminary(&self) -> bool {
        is_positive_preliminary(self.code)
    }

    pub fn is_positive_completion(&self) -> bool {
        is_positive_completion(self.code)
    }
}

/// 1xx
pub fn is_positive_preliminary(code: u16) -> bool {
    (100..200).contains(&code)
}

/// 2xx
pub fn is_positive_completion(code: u16) -> bool {
    (200..300).contains(&code)
}

/// 3xx
pub fn is_positive_intermediate(code: u16) -> bool {
    (300..400).contains(&code)
}
