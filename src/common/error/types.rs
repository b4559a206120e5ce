//! Unified error types for plistkit.
//!
//! Every failure the tree, parser, converter or writer can report is one of the
//! variants below, so callers match on a single type.
use thiserror::Error;

/// Main error type for plistkit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag is not registered in the namespace
    #[error("`{0}` not in current namespace")]
    InvalidTag(String),

    /// Attributes could not be read as string pairs
    #[error("Invalid attributes: {0}")]
    InvalidAttributes(String),

    /// Operation not valid for this node kind
    #[error("Structural error: {0}")]
    Structural(String),

    /// Value has the wrong type for this node kind
    #[error("Type error: {0}")]
    Type(String),

    /// Bad index target, malformed payload or unsupported value
    #[error("Value error: {0}")]
    Value(String),

    /// Dictionary key not found
    #[error("Key not found: `{0}`")]
    Key(String),

    /// Array position out of range
    #[error("Index {index} out of range for {len} children")]
    Index { index: usize, len: usize },

    /// Malformed XML, or a dictionary failing validation while parsing
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Dictionary failing validation during native conversion
    #[error("Malformed dictionary: {0}")]
    MalformedDict(String),
}

/// Result type for plistkit operations.
pub type Result<T> = std::result::Result<T, Error>;
