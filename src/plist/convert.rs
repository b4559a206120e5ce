//! Conversion between plist trees and native [`Value`]s.

use serde::Serialize;

use super::ser::to_value;
use super::{Dictionary, NativeOptions, PlistNode, TypeKind, Value, validate_dict};
use crate::common::binary::decode_base64;
use crate::common::{Date, Error, Result};
use crate::tracing_macros::{trace, warning};

/// Convert a tree into native values.
///
/// Dictionaries become [`Value::Dict`] in document order, arrays become
/// [`Value::Array`].
///
/// A root that is not a dictionary or array is converted like any other leaf
/// and comes back wrapped in a one-element array: `<integer>42</integer>`
/// gives `[Integer(42)]`, not the raw text `"42"`. Only dictionaries and
/// arrays are accepted back by [`from_native`], so such a root does not
/// survive a round trip unchanged.
///
/// # Examples
///
/// ```
/// use plistkit::plist::{NativeOptions, Value, parse_str, to_native};
///
/// let root = parse_str("<dict><key>n</key><integer>2</integer><key>ok</key><true/></dict>").unwrap();
/// let value = to_native(&root, &NativeOptions::default()).unwrap();
/// assert_eq!(value.get("n"), Some(&Value::Integer(2)));
/// assert_eq!(value.get("ok"), Some(&Value::Boolean(true)));
///
/// let leaf = parse_str("<plist><integer>42</integer></plist>").unwrap();
/// let value = to_native(&leaf, &NativeOptions::default()).unwrap();
/// assert_eq!(value, Value::Array(vec![Value::Integer(42)]));
/// ```
pub fn to_native(node: &PlistNode, options: &NativeOptions) -> Result<Value> {
    if node.is_directory() {
        native_value(node, options)
    } else {
        trace!(kind = %node.kind(), "wrapping leaf root");
        Ok(Value::Array(vec![native_value(node, options)?]))
    }
}

fn native_value(node: &PlistNode, options: &NativeOptions) -> Result<Value> {
    match node.kind() {
        TypeKind::Dict => {
            if options.validate_dicts && validate_dict(node)? {
                warning!(children = node.len(), "refusing to convert malformed dict");
                return Err(Error::MalformedDict(format!(
                    "dict with {} children does not alternate keys and values",
                    node.len()
                )));
            }
            let mut map = Dictionary::with_capacity(node.len() / 2);
            for (key, value) in node.entries() {
                map.insert(key.to_string(), native_value(value, options)?);
            }
            Ok(Value::Dict(map))
        },
        TypeKind::Array => node
            .children()?
            .iter()
            .map(|child| native_value(child, options))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        TypeKind::Integer => {
            let text = required_text(node)?;
            Ok(Value::Integer(text.trim().parse()?))
        },
        TypeKind::Real => {
            let text = required_text(node)?;
            Ok(Value::Real(text.trim().parse()?))
        },
        TypeKind::BoolTrue => Ok(Value::Boolean(true)),
        TypeKind::BoolFalse => Ok(Value::Boolean(false)),
        TypeKind::Date => Ok(Value::Date(Date::parse(required_text(node)?)?)),
        TypeKind::Data => {
            let text = node.text().unwrap_or_default();
            if options.decode_data {
                Ok(Value::Data(decode_base64(text)?))
            } else {
                Ok(Value::String(text.to_string()))
            }
        },
        TypeKind::String | TypeKind::Key => {
            Ok(Value::String(node.text().unwrap_or_default().to_string()))
        },
    }
}

fn required_text(node: &PlistNode) -> Result<&str> {
    node.text()
        .ok_or_else(|| Error::Value(format!("`{}` node has no text", node.kind())))
}

/// Build a tree from native values.
///
/// The top-level value must be a dictionary or an array.
///
/// # Examples
///
/// ```
/// use plistkit::plist::{Dictionary, Value, from_native};
///
/// let mut map = Dictionary::new();
/// map.insert("x".to_string(), Value::Integer(3));
/// let root = from_native(&Value::Dict(map)).unwrap();
/// assert_eq!(root.get("x").unwrap().text(), Some("3"));
///
/// assert!(from_native(&Value::Integer(3)).is_err());
/// ```
pub fn from_native(value: &Value) -> Result<PlistNode> {
    match value {
        Value::Dict(_) | Value::Array(_) => build_node(value),
        other => Err(Error::Value(format!(
            "top-level value must be a dict or an array, got {}",
            other.type_name()
        ))),
    }
}

fn build_node(value: &Value) -> Result<PlistNode> {
    let node = match value {
        Value::Dict(map) => {
            let mut node = PlistNode::dict();
            for (key, value) in map {
                node.set(key.as_str(), build_node(value)?)?;
            }
            node
        },
        Value::Array(items) => {
            let mut node = PlistNode::array();
            node.extend(items.iter().map(build_node).collect::<Result<Vec<_>>>()?)?;
            node
        },
        Value::String(s) => PlistNode::string(s.as_str()),
        Value::Integer(i) => PlistNode::integer(*i),
        Value::Real(f) => PlistNode::real(*f),
        Value::Boolean(b) => PlistNode::boolean(*b),
        Value::Date(date) => PlistNode::date(*date),
        Value::Data(bytes) => PlistNode::data(bytes),
    };
    Ok(node)
}

/// Build a tree from any serializable value.
///
/// # Examples
///
/// ```
/// use plistkit::plist::from_serializable;
/// use std::collections::BTreeMap;
///
/// let mut settings = BTreeMap::new();
/// settings.insert("retries", vec![1, 2, 3]);
/// let root = from_serializable(&settings).unwrap();
/// assert_eq!(root.get("retries").unwrap().len(), 3);
/// ```
pub fn from_serializable<T>(value: &T) -> Result<PlistNode>
where
    T: Serialize + ?Sized,
{
    from_native(&to_value(value)?)
}
