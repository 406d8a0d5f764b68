//! Navigate module
//!
//! Directory command wrappers on an established session: changing to the
//! initial directory, changing directory and making directories.

mod operations;
