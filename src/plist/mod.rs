//! Property list document tree and its XML codec.
//!
//! A property list is a tree of typed nodes: dictionaries and arrays hold
//! children, every other kind holds a single text payload in its serialized
//! form. This module provides:
//!
//! - [`TypeKind`] and [`Namespace`]: the node kinds and the XML tags that
//!   spell them, including runtime aliases such as `<int>` for `<integer>`
//! - [`PlistNode`]: the tree itself, with keyed and positional access
//! - [`PlistParser`] and [`parse_str`]/[`parse_file`]: XML text to tree
//! - [`to_xml_string`]/[`write_file`]: tree to XML text
//! - [`to_native`], [`from_native`] and [`from_serializable`]: conversion
//!   between trees and [`Value`]
//!
//! # Quick Start
//!
//! ```rust
//! use plistkit::plist::{self, NativeOptions, PlistNode, Value, WriteOptions};
//!
//! # fn main() -> Result<(), plistkit::Error> {
//! let root = plist::parse_str(
//!     "<plist><dict><key>name</key><string>demo</string></dict></plist>",
//! )?;
//! assert_eq!(root.get("name")?.text(), Some("demo"));
//!
//! let mut edited = root.clone();
//! edited.set("count", PlistNode::integer(2))?;
//! let xml = plist::to_xml_string(&edited, &WriteOptions::default())?;
//! assert!(xml.ends_with("<key>count</key><integer>2</integer></dict></plist>"));
//!
//! let native = plist::to_native(&edited, &NativeOptions::default())?;
//! assert_eq!(native.get("count"), Some(&Value::Integer(2)));
//! # Ok(())
//! # }
//! ```
//!
//! The free functions use a process-wide [`Namespace`]; see [`namespace`] for
//! its lifecycle and for the explicit-namespace variants.

mod convert;
mod iter;
mod kind;
pub mod namespace;
mod node;
mod options;
mod parser;
mod ser;
mod validate;
mod value;
mod writer;

pub use convert::{from_native, from_serializable, to_native};
pub use iter::DepthFirst;
pub use kind::TypeKind;
pub use namespace::{Namespace, global, merge_global, reset_global};
pub use node::{Attributes, Index, NodeMut, PlistNode};
pub use options::{Declaration, NativeOptions, ParseOptions, WriteOptions};
pub use parser::{Event, PlistParser, TreeBuilder, parse_file, parse_file_with, parse_str, parse_str_with};
pub use ser::{ValueSerializer, to_value};
pub use validate::validate_dict;
pub use value::{Dictionary, Value};
pub use writer::{to_xml_string, to_xml_string_in, write_file, write_file_in};
