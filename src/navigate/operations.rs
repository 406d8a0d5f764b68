//! Navigation operations implementation

use log::debug;

use crate::client::FtpClient;
use crate::error::{DirectoryOperation, FtpClientError};
use crate::transport::FtpTransport;

impl<T: FtpTransport> FtpClient<T> {
    /// CWD to the absolute remote root.
    pub async fn change_to_initial_directory(&mut self) -> Result<bool, FtpClientError> {
        let root = self.absolute_remote_root().to_string();
        self.change_directory(&root).await
    }

    /// CWD; returns whether the server accepted it.
    pub async fn change_directory(&mut self, directory: &str) -> Result<bool, FtpClientError> {
        debug!("Changing to directory [{}]", directory);
        self.transport_mut()
            .change_working_directory(directory)
            .await
            .map_err(|e| FtpClientError::directory_fault(DirectoryOperation::Change, directory, e))
    }

    /// MKD; returns whether the server accepted it.
    ///
    /// With nested directory creation disabled, names containing `/` are
    /// not sent and `Ok(false)` is returned.
    pub async fn make_directory(&mut self, directory: &str) -> Result<bool, FtpClientError> {
        if self.host_config().disable_make_nested_dirs && directory.contains('/') {
            debug!("Not creating nested directory [{}]", directory);
            return Ok(false);
        }
        debug!("Making directory [{}]", directory);
        self.transport_mut()
            .make_directory(directory)
            .await
            .map_err(|e| FtpClientError::directory_fault(DirectoryOperation::Make, directory, e))
    }

    /// Enters `directory`, creating it when CWD is refused.
    ///
    /// When the whole path cannot be made with one MKD, for example because
    /// nested creation is disabled, it is entered and created one segment at
    /// a time.
    pub async fn change_or_make_directory(
        &mut self,
        directory: &str,
    ) -> Result<(), FtpClientError> {
        if self.change_directory(directory).await? {
            return Ok(());
        }
        if self.make_directory(directory).await? && self.change_directory(directory).await? {
            return Ok(());
        }
        if !directory.contains('/') {
            return Err(FtpClientError::directory(DirectoryOperation::Change, directory));
        }

        debug!("Creating [{}] one segment at a time", directory);
        if directory.starts_with('/') && !self.change_directory("/").await? {
            return Err(FtpClientError::directory(DirectoryOperation::Change, "/"));
        }
        for segment in directory.split('/').filter(|s| !s.is_empty()) {
            if self.change_directory(segment).await? {
                continue;
            }
            self.make_directory(segment).await?;
            if !self.change_directory(segment).await? {
                return Err(FtpClientError::directory(DirectoryOperation::Change, segment));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::FtpClient;
    use crate::config::HostConfig;
    use crate::error::ErrorKind;
    use crate::transport::mock::MockTransport;
    use std::error::Error;

    fn session(mock: MockTransport) -> FtpClient<MockTransport> {
        let mut client = FtpClient::new(
            mock,
            HostConfig::new("test", "ftp.example.com", "user", "pass"),
        );
        client.set_absolute_remote_root("/srv/ftp".into());
        client
    }

    #[tokio::test]
    async fn initial_directory_is_the_absolute_root() {
        let mut client = session(MockTransport::connected());
        assert!(client.change_to_initial_directory().await.unwrap());
        assert_eq!(client.transport_mut().calls(), vec!["CWD /srv/ftp"]);
    }

    #[tokio::test]
    async fn refused_change_returns_false() {
        let mut client = session(MockTransport::connected().refusing("CWD a/directory"));
        assert!(!client.change_directory("a/directory").await.unwrap());
    }

    #[tokio::test]
    async fn change_fault_is_a_directory_error() {
        let mut client = session(MockTransport::connected().faulting("CWD a/directory"));
        let err = client.change_directory("a/directory").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Directory);
        assert!(err.to_string().contains("a/directory"));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn make_directory_reports_server_answer() {
        let mut client = session(MockTransport::connected().refusing("MKD taken"));
        assert!(client.make_directory("fresh").await.unwrap());
        assert!(!client.make_directory("taken").await.unwrap());
    }

    #[tokio::test]
    async fn nested_make_is_suppressed_when_disabled() {
        let mut host = HostConfig::new("test", "ftp.example.com", "user", "pass");
        host.disable_make_nested_dirs = true;
        let mut client = FtpClient::new(MockTransport::connected(), host);

        assert!(!client.make_directory("a/b").await.unwrap());
        assert!(client.make_directory("flat").await.unwrap());
        assert_eq!(client.transport_mut().calls(), vec!["MKD flat"]);
    }

    #[tokio::test]
    async fn make_fault_is_a_directory_error() {
        let mut client = session(MockTransport::connected().faulting("MKD x"));
        let err = client.make_directory("x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Directory);
        assert!(err.to_string().contains("make directory"));
    }

    fn flat_only_session(mock: MockTransport) -> FtpClient<MockTransport> {
        let mut host = HostConfig::new("test", "ftp.example.com", "user", "pass");
        host.disable_make_nested_dirs = true;
        FtpClient::new(mock, host)
    }

    #[tokio::test]
    async fn existing_directory_is_only_entered() {
        let mut client = session(MockTransport::connected());
        client.change_or_make_directory("site").await.unwrap();
        assert_eq!(client.transport_mut().calls(), vec!["CWD site"]);
    }

    #[tokio::test]
    async fn missing_path_is_made_in_one_step_when_nesting_allowed() {
        let mut client = session(MockTransport::connected().refusing_once("CWD a/b"));
        client.change_or_make_directory("a/b").await.unwrap();

        assert_eq!(
            client.transport_mut().calls(),
            vec!["CWD a/b", "MKD a/b", "CWD a/b"]
        );
    }

    #[tokio::test]
    async fn nested_path_is_made_segment_by_segment_when_disabled() {
        let mock = MockTransport::connected()
            .refusing("CWD a/b")
            .refusing_once("CWD b");
        let mut client = flat_only_session(mock);
        client.change_or_make_directory("a/b").await.unwrap();

        let mock = client.transport_mut();
        assert_eq!(
            mock.calls(),
            vec!["CWD a/b", "CWD a", "CWD b", "MKD b", "CWD b"]
        );
        assert_eq!(mock.cwd_path(), "/a/b");
    }

    #[tokio::test]
    async fn absolute_nested_path_starts_at_server_root() {
        let mock = MockTransport::connected()
            .refusing("CWD /pub/new")
            .refusing_once("CWD new");
        let mut client = flat_only_session(mock);
        client.change_or_make_directory("/pub/new").await.unwrap();

        assert_eq!(
            client.transport_mut().calls(),
            vec!["CWD /pub/new", "CWD /", "CWD pub", "CWD new", "MKD new", "CWD new"]
        );
    }

    #[tokio::test]
    async fn segment_that_cannot_be_entered_is_a_directory_error() {
        let mock = MockTransport::connected()
            .refusing("CWD a/b")
            .refusing("CWD b");
        let mut client = flat_only_session(mock);
        let err = client.change_or_make_directory("a/b").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Directory);
        assert!(err.to_string().contains("change to directory"));
        assert_eq!(
            client.transport_mut().calls().last().map(String::as_str),
            Some("CWD b")
        );
    }
}
