//! Common types and utilities shared across the crate.
//!
//! This module provides the unified error type together with the base64,
//! date and XML text helpers used by the plist tree, parser and writer.

// Submodule declarations
pub mod binary;
pub mod date;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use date::Date;
pub use error::{Error, Result};
