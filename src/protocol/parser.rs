//! FTP reply parsing
//!
//! Parses reply lines read from the control channel, and the payloads of
//! the 227 (PASV) and 257 (PWD) replies.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// First line of a reply: its code and whether more lines follow.
#[derive(Debug, PartialEq, Eq)]
pub struct ReplyLine {
    pub code: u16,
    pub continued: bool,
}

/// Parses the leading `NNN ` or `NNN-` of a reply line.
///
/// Returns `None` for lines that do not start with a valid reply code.
pub fn parse_reply_line(line: &str) -> Option<ReplyLine> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let code = u16::from_str(&line[..3]).ok()?;
    if !(100..600).contains(&code) {
        return None;
    }
    let continued = match bytes.get(3) {
        None | Some(b' ') => false,
        Some(b'-') => true,
        Some(_) => return None,
    };
    Some(ReplyLine { code, continued })
}

/// Whether `line` closes a multi-line reply opened with `code`.
pub fn is_final_line(line: &str, code: u16) -> bool {
    match parse_reply_line(line) {
        Some(parsed) => parsed.code == code && !parsed.continued,
        None => false,
    }
}

/// Extracts the data address from `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)`.
pub fn parse_pasv_227_reply(text: &str) -> Option<SocketAddr> {
    let p_start = text.find('(')?;
    let p_end = p_start + text[p_start..].find(')')?;

    let a: Vec<&str> = text[p_start + 1..p_end].split(',').map(str::trim).collect();
    if a.len() != 6 {
        return None;
    }

    let h1 = u8::from_str(a[0]).ok()?;
    let h2 = u8::from_str(a[1]).ok()?;
    let h3 = u8::from_str(a[2]).ok()?;
    let h4 = u8::from_str(a[3]).ok()?;
    let p1 = u8::from_str(a[4]).ok()?;
    let p2 = u8::from_str(a[5]).ok()?;

    let ip = IpAddr::V4(Ipv4Addr::new(h1, h2, h3, h4));
    let port = ((p1 as u16) << 8) + (p2 as u16);
    Some(SocketAddr::new(ip, port))
}

/// Extracts the quoted directory from `257 "<dir>" ...`.
///
/// Embedded quotes are doubled on the wire (`""`) and are unescaped here.
pub fn parse_pwd_257_reply(text: &str) -> Option<String> {
    let start = text.find('"')? + 1;
    let mut dir = String::new();
    let mut chars = text[start..].chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                dir.push('"');
            } else {
                return Some(dir);
            }
        } else {
            dir.push(c);
        }
    }
    None
}
