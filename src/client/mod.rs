//! FTP session management
//!
//! Session state, connection setup, root resolution and teardown.

pub mod connector;
pub mod operations;
pub mod root;
pub mod state;

pub use connector::{connect_client, create_client, test_connection};
pub use root::is_directory_absolute;
pub use state::FtpClient;
