//! Directory listing parsing
//!
//! Turns the lines of a LIST reply into [`RemoteEntry`] values. Unix
//! `ls -l` style and DOS/IIS style listings are understood; anything else
//! yields `None` for that line, which callers treat as a null entry.

/// One item of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_directory: bool,
}

impl RemoteEntry {
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_directory: false,
        }
    }

    pub fn directory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_directory: true,
        }
    }
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parses a full listing, one entry per non-blank line.
///
/// `total N` summary lines are dropped before parsing.
pub fn parse_listing(text: &str) -> Vec<Option<RemoteEntry>> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty() && !is_total_line(line))
        .map(parse_list_line)
        .collect()
}

fn is_total_line(line: &str) -> bool {
    let mut parts = line.split_whitespace();
    parts.next() == Some("total")
        && parts.next().is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()))
        && parts.next().is_none()
}

/// Parses one listing line.
pub fn parse_list_line(line: &str) -> Option<RemoteEntry> {
    parse_unix_line(line).or_else(|| parse_dos_line(line))
}

/// Splits `line` on whitespace, keeping each token's byte offset.
fn tokens_with_offsets(line: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, &line[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push((s, &line[s..]));
    }
    tokens
}

fn is_month(token: &str) -> bool {
    MONTHS.contains(&token.to_ascii_lowercase().as_str())
}

fn is_day(token: &str) -> bool {
    token.len() <= 2 && token.chars().all(|c| c.is_ascii_digit())
}

fn is_time_or_year(token: &str) -> bool {
    match token.split_once(':') {
        Some((h, m)) => {
            !h.is_empty()
                && !m.is_empty()
                && h.chars().all(|c| c.is_ascii_digit())
                && m.chars().all(|c| c.is_ascii_digit())
        }
        None => token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()),
    }
}

/// `drwxr-xr-x 2 owner group 4096 Jan 16 14:15 name with spaces`
fn parse_unix_line(line: &str) -> Option<RemoteEntry> {
    let tokens = tokens_with_offsets(line);
    let (_, perms) = *tokens.first()?;
    let type_char = perms.chars().next()?;
    if !matches!(type_char, 'd' | '-' | 'l' | 'b' | 'c' | 'p' | 's') || perms.len() < 10 {
        return None;
    }

    // Locate "<month> <day> <time|year>" and take the rest of the line as the name.
    let date_at = (1..tokens.len().saturating_sub(3)).find(|&i| {
        is_month(tokens[i].1) && is_day(tokens[i + 1].1) && is_time_or_year(tokens[i + 2].1)
    })?;
    let (name_offset, _) = tokens[date_at + 3];
    let mut name = &line[name_offset..];

    if type_char == 'l' {
        if let Some((link, _target)) = name.split_once(" -> ") {
            name = link;
        }
    }
    if name.is_empty() {
        return None;
    }

    Some(RemoteEntry {
        name: name.to_string(),
        is_directory: type_char == 'd',
    })
}

/// `01-16-20  02:15PM       <DIR>          sub`
fn parse_dos_line(line: &str) -> Option<RemoteEntry> {
    let tokens = tokens_with_offsets(line);
    if tokens.len() < 4 {
        return None;
    }
    let (_, date) = tokens[0];
    let (_, time) = tokens[1];
    let (_, size_or_dir) = tokens[2];
    if date.split('-').count() != 3 || !date.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return None;
    }
    let upper_time = time.to_ascii_uppercase();
    if !(upper_time.ends_with("AM") || upper_time.ends_with("PM") || time.contains(':')) {
        return None;
    }
    let is_directory = size_or_dir.eq_ignore_ascii_case("<DIR>");
    if !is_directory && !size_or_dir.chars().all(|c| c.is_ascii_digit() || c == ',') {
        return None;
    }
    let (name_offset, _) = tokens[3];
    Some(RemoteEntry {
        name: line[name_offset..].to_string(),
        is_directory,
    })
}
