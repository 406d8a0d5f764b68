//! FTP Protocol implementation
//!
//! Client-side command rendering, reply parsing and listing parsing.

pub mod commands;
pub mod listing;
pub mod parser;
pub mod responses;

pub use commands::Command;
pub use listing::{RemoteEntry, parse_listing};
pub use responses::Reply;
