//! Root directory resolution
//!
//! Fixes the absolute directory a session operates from: the configured
//! root when it is already absolute, otherwise whatever the server reports
//! as the working directory after login.

use log::{debug, info};

use crate::client::FtpClient;
use crate::error::{DirectoryOperation, FtpClientError};
use crate::transport::FtpTransport;

/// True when the path, ignoring surrounding whitespace, starts with `/` or `\`.
pub fn is_directory_absolute(directory: Option<&str>) -> bool {
    directory
        .map(str::trim)
        .is_some_and(|d| d.starts_with('/') || d.starts_with('\\'))
}

impl<T: FtpTransport> FtpClient<T> {
    /// CWD into the configured root, if one is set. Blank roots are ignored.
    pub(crate) async fn change_to_root_directory(&mut self) -> Result<(), FtpClientError> {
        let Some(root) = self
            .host_config()
            .remote_root_dir
            .clone()
            .filter(|r| !r.trim().is_empty())
        else {
            return Ok(());
        };

        let changed = self
            .transport_mut()
            .change_working_directory(&root)
            .await
            .map_err(FtpClientError::ClientCreation)?;
        if !changed {
            return Err(FtpClientError::directory(DirectoryOperation::Change, &root));
        }
        debug!("Changed to configured root [{}]", root);
        Ok(())
    }

    /// Determines and records the absolute remote root.
    pub(crate) async fn resolve_absolute_root(&mut self) -> Result<(), FtpClientError> {
        let configured = self.host_config().remote_root_dir.clone();

        let root = match configured {
            Some(root) if is_directory_absolute(Some(&root)) => root,
            _ => {
                let pwd = self
                    .transport_mut()
                    .print_working_directory()
                    .await
                    .map_err(FtpClientError::ClientCreation)?;
                if !is_directory_absolute(pwd.as_deref()) {
                    return Err(FtpClientError::RootNotAbsolute(pwd));
                }
                pwd.unwrap_or_default()
            }
        };

        info!("Absolute remote root is [{}]", root);
        self.set_absolute_remote_root(root);
        Ok(())
    }
}
