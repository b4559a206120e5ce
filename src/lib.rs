//! Plistkit - property list documents in Rust
//!
//! This library reads and writes XML property lists as a typed node tree and
//! converts between that tree and native values.
//!
//! # Features
//!
//! - **Typed tree**: dictionaries, arrays and eight leaf kinds, with text kept
//!   in canonical serialized form
//! - **Runtime tag aliases**: teach the parser that `<int>` means `<integer>`
//!   without touching the node kinds
//! - **Keyed access**: dictionaries index their keys for direct lookup
//! - **Native values**: convert to and from [`plist::Value`], or from any
//!   `serde::Serialize` type
//! - **Logging**: enable the `tracing` feature for structured logs of parse,
//!   convert and write steps
//!
//! # Example - Reading a plist
//!
//! ```rust
//! use plistkit::plist::{self, TypeKind};
//!
//! # fn main() -> Result<(), plistkit::Error> {
//! let root = plist::parse_str(
//!     "<dict><key>2</key><array><integer>5</integer><string>test</string></array></dict>",
//! )?;
//! let item = root.get("2")?.get(1)?;
//! assert_eq!(item.kind(), TypeKind::String);
//! assert_eq!(item.text(), Some("test"));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Writing a plist
//!
//! ```rust
//! use plistkit::plist::{Declaration, PlistNode, WriteOptions, to_xml_string};
//!
//! # fn main() -> Result<(), plistkit::Error> {
//! let mut dict = PlistNode::dict();
//! dict.set("x", PlistNode::integer(3))?;
//!
//! let xml = to_xml_string(&dict, &WriteOptions::new().with_declaration(Declaration::Version))?;
//! assert_eq!(
//!     xml,
//!     r#"<?xml version="1.0"?><plist><dict><key>x</key><integer>3</integer></dict></plist>"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Custom tag spellings
//!
//! ```rust
//! use plistkit::plist::{Namespace, PlistParser, TypeKind};
//!
//! # fn main() -> Result<(), plistkit::Error> {
//! let mut ns = Namespace::new();
//! ns.merge([(TypeKind::Integer, vec!["int", "integer"])])?;
//!
//! let root = PlistParser::new(&ns).parse_str("<dict><key>k1</key><int>2</int></dict>")?;
//! assert_eq!(root.get("k1")?.kind(), TypeKind::Integer);
//! # Ok(())
//! # }
//! ```

// Logging shims must be declared before the modules that use them
mod tracing_macros;

/// Shared utilities
///
/// The unified error type, base64 and ISO-8601 date helpers, and XML text
/// escaping.
pub mod common;

/// Property list tree, parser, writer and native conversion
pub mod plist;

// Re-export commonly used types for convenience
pub use common::{Date, Error, Result};
pub use plist::{Namespace, PlistNode, TypeKind, Value};
