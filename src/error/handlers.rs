//! Error handlers
//!
//! Reporting helpers for errors that reach the top of a publish run.

use crate::error::types::FtpClientError;
use log::error;
use std::error::Error;

/// Log an error followed by every cause in its chain.
pub fn handle_error(err: &FtpClientError) {
    error!("FTP publish error: {}", err);
    let mut cause = err.source();
    while let Some(e) = cause {
        error!("  caused by: {}", e);
        cause = e.source();
    }
}

/// Render the error the way a connectivity test reports it: kind then message.
pub fn describe_error(err: &FtpClientError) -> String {
    format!("{:?}: {}", err.kind(), err)
}
