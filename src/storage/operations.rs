//! Storage operations
//!
//! Recursive removal of a remote directory's contents.

use log::{debug, info};

use crate::client::FtpClient;
use crate::error::{DirectoryOperation, FtpClientError, ListingFailure};
use crate::protocol::RemoteEntry;
use crate::transport::FtpTransport;

impl<T: FtpTransport> FtpClient<T> {
    /// Deletes everything below the current remote directory, hidden
    /// entries included. The directory itself is kept.
    ///
    /// Depth first: a subdirectory is emptied, left with CDUP, then removed
    /// from its parent. The first refusal or fault aborts the whole delete.
    pub async fn delete_tree(&mut self) -> Result<(), FtpClientError> {
        self.transport_mut().set_list_hidden_files(true);
        self.delete_contents().await?;
        info!("Remote directory contents deleted");
        Ok(())
    }

    async fn delete_contents(&mut self) -> Result<(), FtpClientError> {
        let entries = self
            .transport_mut()
            .list_entries()
            .await?
            .ok_or(FtpClientError::Listing(ListingFailure::NotInitiated))?;

        for entry in entries {
            let entry = entry.ok_or(FtpClientError::Listing(ListingFailure::NullEntry))?;
            self.delete_entry(&entry).await?;
        }
        Ok(())
    }

    async fn delete_entry(&mut self, entry: &RemoteEntry) -> Result<(), FtpClientError> {
        let name = entry.name.as_str();
        if name == "." || name == ".." {
            return Ok(());
        }

        if !entry.is_directory {
            if !self.transport_mut().delete_file(name).await? {
                return Err(FtpClientError::Delete {
                    file: name.to_string(),
                });
            }
            debug!("Deleted file [{}]", name);
            return Ok(());
        }

        if !self.change_directory(name).await? {
            return Err(FtpClientError::directory(DirectoryOperation::Change, name));
        }
        Box::pin(self.delete_contents()).await?;
        if !self.transport_mut().change_to_parent_directory().await? {
            return Err(FtpClientError::directory(
                DirectoryOperation::ChangeToParent,
                name,
            ));
        }
        if !self.transport_mut().remove_directory(name).await? {
            return Err(FtpClientError::directory(DirectoryOperation::Remove, name));
        }
        debug!("Removed directory [{}]", name);
        Ok(())
    }
}
