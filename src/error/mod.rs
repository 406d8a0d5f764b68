//! Error handling
//!
//! Defines the error type and reporting helpers for the publisher.

pub mod handlers;
pub mod types;

pub use types::*;
