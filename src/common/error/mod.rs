//! Unified error types for plistkit.
//!
//! This module provides the error type shared by the namespace registry, the
//! node tree, the XML parser and writer, and the native value converter.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
