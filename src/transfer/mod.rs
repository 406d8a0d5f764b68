//! Transfer module
//!
//! Data representation and data connection modes, the per-transfer
//! specification, and the session operations that switch the representation
//! type and store files.

pub mod modes;
pub mod operations;
pub mod spec;

pub use modes::{DataConnectionMode, FileType, to_network_ascii};
pub use spec::TransferSpec;
