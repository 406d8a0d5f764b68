//! Remote storage management
//!
//! Destructive operations on the remote tree.

mod operations;
