//! Transfer operations
//!
//! Representation type selection before a group of uploads, and the upload
//! itself.

use log::{debug, info};
use tokio::io::AsyncRead;

use crate::client::FtpClient;
use crate::error::{FtpClientError, TransferModeFailure};
use crate::transfer::TransferSpec;
use crate::transport::FtpTransport;

impl<T: FtpTransport> FtpClient<T> {
    /// Sets TYPE A or TYPE I for the transfers described by `spec`.
    ///
    /// Fails without sending anything if `spec` has no source files.
    pub async fn begin_transfers(&mut self, spec: &TransferSpec) -> Result<(), FtpClientError> {
        if !spec.has_configured_source_files() {
            return Err(FtpClientError::TransferMode(
                TransferModeFailure::NoSourceFiles,
            ));
        }

        let file_type = spec.file_type();
        let transport = self.transport_mut();
        let accepted = transport
            .set_file_type(file_type)
            .await
            .map_err(|e| FtpClientError::TransferMode(TransferModeFailure::Fault(e)))?;
        if !accepted {
            return Err(FtpClientError::TransferMode(TransferModeFailure::Refused(
                transport.reply_string(),
            )));
        }
        debug!("Transfer type set to {:?}", file_type);
        Ok(())
    }

    /// STOR `content` as `remote_name` in the current remote directory.
    pub async fn transfer_file<R>(
        &mut self,
        remote_name: &str,
        content: &mut R,
    ) -> Result<(), FtpClientError>
    where
        R: AsyncRead + Unpin,
    {
        let transport = self.transport_mut();
        if !transport.store_file(remote_name, content).await? {
            return Err(FtpClientError::Transfer {
                reply: transport.reply_string(),
            });
        }
        info!("Stored [{}]", remote_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::FtpClient;
    use crate::config::HostConfig;
    use crate::error::{ErrorKind, FtpClientError, TransferModeFailure};
    use crate::transfer::TransferSpec;
    use crate::transport::mock::MockTransport;
    use std::error::Error;

    fn session(mock: MockTransport) -> FtpClient<MockTransport> {
        FtpClient::new(
            mock,
            HostConfig::new("test", "ftp.example.com", "user", "pass"),
        )
    }

    #[tokio::test]
    async fn ascii_flag_selects_type() {
        let mut client = session(MockTransport::connected());
        client
            .begin_transfers(&TransferSpec::new("a.txt", "", true))
            .await
            .unwrap();
        client
            .begin_transfers(&TransferSpec::new("a.bin", "", false))
            .await
            .unwrap();

        assert_eq!(client.transport_mut().calls(), vec!["TYPE A", "TYPE I"]);
    }

    #[tokio::test]
    async fn no_source_files_sends_nothing() {
        let mut client = session(MockTransport::connected());
        let err = client
            .begin_transfers(&TransferSpec::new(" ", "", true))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FtpClientError::TransferMode(TransferModeFailure::NoSourceFiles)
        ));
        assert!(client.transport_mut().calls().is_empty());
    }

    #[tokio::test]
    async fn refused_type_embeds_reply() {
        let mut mock = MockTransport::connected().refusing("TYPE I");
        mock.refusal_reply = "504 Type not implemented.\r\n".into();
        let mut client = session(mock);
        let err = client
            .begin_transfers(&TransferSpec::new("a.bin", "", false))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransferMode);
        assert!(err.to_string().contains("504 Type not implemented."));
    }

    #[tokio::test]
    async fn type_fault_keeps_cause() {
        let mut client = session(MockTransport::connected().faulting("TYPE A"));
        let err = client
            .begin_transfers(&TransferSpec::new("a.txt", "", true))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransferMode);
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn stores_content() {
        let mut client = session(MockTransport::connected());
        let mut content: &[u8] = b"artifact";
        client.transfer_file("build.zip", &mut content).await.unwrap();

        let mock = client.transport_mut();
        assert_eq!(mock.calls(), vec!["STOR build.zip"]);
        assert_eq!(mock.stored, vec![("build.zip".to_string(), b"artifact".to_vec())]);
    }

    #[tokio::test]
    async fn refused_store_carries_reply() {
        let mut mock = MockTransport::connected().refusing("STOR build.zip");
        mock.refusal_reply = "553 Could not create file.\r\n".into();
        let mut client = session(mock);
        let mut content: &[u8] = b"artifact";
        let err = client
            .transfer_file("build.zip", &mut content)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transfer);
        assert!(err.to_string().contains("553 Could not create file."));
    }

    #[tokio::test]
    async fn store_fault_is_a_transport_error() {
        let mut client = session(MockTransport::connected().faulting("STOR build.zip"));
        let mut content: &[u8] = b"artifact";
        let err = client
            .transfer_file("build.zip", &mut content)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
