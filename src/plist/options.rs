//! Configuration types for parsing, conversion and writing.
//!
//! Each options struct has public fields, a `Default`, and `with_*` setters
//! that can be chained.

use std::str::FromStr;

use super::Attributes;
use crate::common::{Error, Result};

/// Options for turning XML into a tree.
///
/// # Examples
///
/// ```rust
/// use plistkit::plist::ParseOptions;
///
/// let options = ParseOptions::new().with_validate_dicts(false);
/// assert!(!options.validate_dicts);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Check every dictionary's key/value layout when its end tag is read
    pub validate_dicts: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate_dicts: true,
        }
    }
}

impl ParseOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether dictionaries are validated while parsing.
    ///
    /// Turning this off is faster, but a malformed dictionary then produces a
    /// tree whose key lookups may miss.
    #[inline]
    pub fn with_validate_dicts(mut self, validate: bool) -> Self {
        self.validate_dicts = validate;
        self
    }
}

/// Options for turning a tree into native values.
///
/// # Examples
///
/// ```rust
/// use plistkit::plist::NativeOptions;
///
/// let options = NativeOptions::new().with_decode_data(true);
/// assert!(options.validate_dicts);
/// assert!(options.decode_data);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeOptions {
    /// Check every dictionary's layout before converting it
    pub validate_dicts: bool,
    /// Decode `<data>` payloads to bytes instead of returning the base64 text
    pub decode_data: bool,
}

impl Default for NativeOptions {
    fn default() -> Self {
        Self {
            validate_dicts: true,
            decode_data: false,
        }
    }
}

impl NativeOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_validate_dicts(mut self, validate: bool) -> Self {
        self.validate_dicts = validate;
        self
    }

    #[inline]
    pub fn with_decode_data(mut self, decode: bool) -> Self {
        self.decode_data = decode;
        self
    }
}

/// XML declaration written before the `<plist>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Declaration {
    /// No declaration
    #[default]
    None,
    /// `<?xml version="1.0"?>`
    Version,
    /// `<?xml version="1.0" encoding="UTF-8"?>`
    VersionEncoding,
}

impl FromStr for Declaration {
    type Err = Error;

    /// Parse the short names `""`, `"ver"` and `"enc"`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Declaration::None),
            "ver" => Ok(Declaration::Version),
            "enc" => Ok(Declaration::VersionEncoding),
            other => Err(Error::Value(format!(
                "unknown XML declaration `{}`, expected \"\", \"ver\" or \"enc\"",
                other
            ))),
        }
    }
}

/// Options for writing a tree as XML.
///
/// # Examples
///
/// ```rust
/// use plistkit::plist::{Declaration, WriteOptions};
///
/// let options = WriteOptions::new()
///     .with_declaration(Declaration::VersionEncoding)
///     .with_attribute("version", "1.0")
///     .with_short_empty_elements(false);
/// assert_eq!(options.attributes["version"], "1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Attributes of the `<plist>` wrapper element
    pub attributes: Attributes,
    /// Declaration to put in front of the document
    pub declaration: Declaration,
    /// Write childless, textless elements as `<tag/>` rather than `<tag></tag>`
    pub short_empty_elements: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            attributes: Attributes::new(),
            declaration: Declaration::None,
            short_empty_elements: true,
        }
    }
}

impl WriteOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the wrapper attributes.
    #[inline]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add one wrapper attribute.
    #[inline]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declaration = declaration;
        self
    }

    #[inline]
    pub fn with_short_empty_elements(mut self, short: bool) -> Self {
        self.short_empty_elements = short;
        self
    }
}
