//! Transfer specification
//!
//! Per-transfer attributes supplied by the caller.

use serde::Deserialize;

use crate::transfer::FileType;

/// What a group of uploads shares: source files, target directory and
/// representation type.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TransferSpec {
    /// Comma separated list of local files. Blank means nothing configured.
    #[serde(default)]
    pub source_files: String,

    /// Target directory relative to the session root. Blank means the root.
    #[serde(default)]
    pub remote_directory: String,

    #[serde(default)]
    pub ascii_mode: bool,

    /// Delete everything under the target directory before uploading.
    #[serde(default)]
    pub clean_remote: bool,
}

impl TransferSpec {
    pub fn new(source_files: &str, remote_directory: &str, ascii_mode: bool) -> Self {
        Self {
            source_files: source_files.to_string(),
            remote_directory: remote_directory.to_string(),
            ascii_mode,
            clean_remote: false,
        }
    }

    pub fn has_configured_source_files(&self) -> bool {
        !self.source_files.trim().is_empty()
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_ascii_mode(self.ascii_mode)
    }

    /// Source entries, trimmed, blanks dropped.
    pub fn source_paths(&self) -> impl Iterator<Item = &str> {
        self.source_files
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Target directory with surrounding whitespace removed, `None` for the root.
    pub fn remote_directory(&self) -> Option<&str> {
        Some(self.remote_directory.trim()).filter(|d| !d.is_empty())
    }
}
