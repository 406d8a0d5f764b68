pub mod client;
pub mod config;
pub mod error;
pub mod navigate;
pub mod protocol;
pub mod storage;
pub mod transfer;
pub mod transport;

pub use client::{FtpClient, create_client, test_connection};
pub use config::{Credentials, HostConfig, HostRegistry, PublisherConfig};
pub use error::FtpClientError;
