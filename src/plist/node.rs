//! The plist node tree.
//!
//! A [`PlistNode`] is one element of a property list: a dictionary, an array
//! or a leaf holding text. Directory nodes own their children outright; there
//! are no back references and no sharing between trees.
//!
//! Dictionaries store their entries as alternating key and value children,
//! exactly as they appear in XML, plus an index from key string to the
//! position of the value. Every mutating method keeps that shape:
//!
//! - the child count is even,
//! - even positions hold `Key` nodes, odd positions hold anything else,
//! - each index entry points at a value directly preceded by its key.
//!
//! Leaf text is stored in serialized form: decimal numbers, ISO-8601 dates,
//! base64 data.

use std::collections::HashMap;
use std::ops::Deref;

use indexmap::IndexMap;

use super::iter::DepthFirst;
use super::{Namespace, TypeKind, Value};
use crate::common::binary::encode_base64;
use crate::common::{Date, Error, Result};

/// XML attributes of a node, in insertion order.
pub type Attributes = IndexMap<String, String>;

/// Child address for [`PlistNode::get`], [`PlistNode::set`] and
/// [`PlistNode::remove`].
///
/// Arrays are addressed by position, dictionaries by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index<'a> {
    Position(usize),
    Key(&'a str),
}

impl From<usize> for Index<'_> {
    fn from(position: usize) -> Self {
        Index::Position(position)
    }
}

impl<'a> From<&'a str> for Index<'a> {
    fn from(key: &'a str) -> Self {
        Index::Key(key)
    }
}

impl<'a> From<&'a String> for Index<'a> {
    fn from(key: &'a String) -> Self {
        Index::Key(key)
    }
}

/// A node of a property list tree.
#[derive(Debug, Clone)]
pub struct PlistNode {
    kind: TypeKind,
    // Spelling the node was created with; `None` emits the canonical tag
    tag: Option<String>,
    attributes: Attributes,
    children: Vec<PlistNode>,
    key_index: HashMap<String, usize>,
    text: Option<String>,
}

impl PartialEq for PlistNode {
    /// Structural equality: kind, text, attributes and children.
    ///
    /// Tag spelling and the key index are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.attributes == other.attributes
            && self.children == other.children
    }
}

impl PlistNode {
    /// Create an empty node of the given kind.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            tag: None,
            attributes: Attributes::new(),
            children: Vec::new(),
            key_index: HashMap::new(),
            text: None,
        }
    }

    /// Create a node and set its text through [`set_text`](Self::set_text).
    ///
    /// # Examples
    ///
    /// ```
    /// use plistkit::plist::{PlistNode, TypeKind};
    ///
    /// let node = PlistNode::with_text(TypeKind::Real, 12.5).unwrap();
    /// assert_eq!(node.text(), Some("12.5"));
    /// assert!(PlistNode::with_text(TypeKind::Dict, "text").is_err());
    /// ```
    pub fn with_text(kind: TypeKind, value: impl Into<Value>) -> Result<Self> {
        let mut node = Self::new(kind);
        node.set_text(value)?;
        Ok(node)
    }

    /// Create a node from an XML tag name.
    ///
    /// The tag must be registered in `namespace`; the node keeps that
    /// spelling when written back out.
    pub fn from_tag(
        namespace: &Namespace,
        tag: &str,
        value: impl Into<Value>,
        attributes: Attributes,
    ) -> Result<Self> {
        let mut node = Self::deferred(namespace, tag, attributes)?;
        node.set_text(value)?;
        Ok(node)
    }

    /// Create a node whose text will be filled in later.
    ///
    /// Used by the parser, which sees the start tag before the text.
    pub(crate) fn deferred(namespace: &Namespace, tag: &str, attributes: Attributes) -> Result<Self> {
        let kind = namespace
            .kind_of(tag)
            .ok_or_else(|| Error::InvalidTag(tag.to_string()))?;
        let mut node = Self::new(kind);
        node.tag = Some(tag.to_string());
        node.attributes = attributes;
        Ok(node)
    }

    pub fn dict() -> Self {
        Self::new(TypeKind::Dict)
    }

    pub fn array() -> Self {
        Self::new(TypeKind::Array)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::leaf(TypeKind::String, text.into())
    }

    pub fn key(text: impl Into<String>) -> Self {
        Self::leaf(TypeKind::Key, text.into())
    }

    pub fn integer(value: impl Into<i128>) -> Self {
        Self::leaf(TypeKind::Integer, itoa::Buffer::new().format(value.into()).to_string())
    }

    pub fn real(value: f64) -> Self {
        Self::leaf(TypeKind::Real, ryu::Buffer::new().format(value).to_string())
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(if value {
            TypeKind::BoolTrue
        } else {
            TypeKind::BoolFalse
        })
    }

    pub fn date(value: impl Into<Date>) -> Self {
        Self::leaf(TypeKind::Date, value.into().to_iso_string())
    }

    pub fn data(bytes: &[u8]) -> Self {
        Self::leaf(TypeKind::Data, encode_base64(bytes))
    }

    fn leaf(kind: TypeKind, text: String) -> Self {
        let mut node = Self::new(kind);
        node.text = (!text.is_empty()).then_some(text);
        node
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Tag spelling this node was created with, if any.
    #[inline]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Tag to emit for this node: its own spelling, else the canonical one.
    pub fn tag_in<'a>(&'a self, namespace: &'a Namespace) -> &'a str {
        match &self.tag {
            Some(tag) => tag,
            None => namespace.canonical(self.kind),
        }
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[inline]
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Text payload in its serialized form.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the text payload.
    ///
    /// An empty string clears the text on any kind. Otherwise:
    ///
    /// - dict, array and boolean nodes reject text (`Error::Structural`),
    /// - date nodes take a [`Value::Date`] and store its ISO-8601 form,
    /// - integer and real nodes take a number, or a string that parses as
    ///   one (`Error::Value` if it doesn't),
    /// - data nodes take bytes and store them as base64,
    /// - string and key nodes take a string.
    ///
    /// A value of the wrong type for the kind is `Error::Type`.
    pub fn set_text(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if matches!(&value, Value::String(s) if s.is_empty()) {
            self.text = None;
            return Ok(());
        }
        if !self.kind.is_leaf() {
            return Err(Error::Structural(format!(
                "`{}` cannot have text",
                self.kind
            )));
        }

        let text = match (self.kind, value) {
            (TypeKind::Date, Value::Date(date)) => date.to_iso_string(),
            (TypeKind::Integer | TypeKind::Real, Value::Integer(i)) => {
                itoa::Buffer::new().format(i).to_string()
            },
            (TypeKind::Integer | TypeKind::Real, Value::Real(f)) => {
                ryu::Buffer::new().format(f).to_string()
            },
            (TypeKind::Integer | TypeKind::Real, Value::String(s)) => {
                if s.trim().parse::<f64>().is_err() {
                    return Err(Error::Value(format!(
                        "`{}` is not a valid integer or real",
                        s
                    )));
                }
                s
            },
            (TypeKind::Data, Value::Data(bytes)) => encode_base64(&bytes),
            (TypeKind::String | TypeKind::Key, Value::String(s)) => s,
            (kind, other) => {
                return Err(Error::Type(format!(
                    "`{}` node text cannot be set from a {} value",
                    kind,
                    other.type_name()
                )));
            },
        };
        self.text = (!text.is_empty()).then_some(text);
        Ok(())
    }

    /// Store already-validated text. Used by the parser.
    pub(crate) fn set_parsed_text(&mut self, text: String) {
        self.text = Some(text);
    }

    /// Remove the text payload.
    pub fn clear_text(&mut self) {
        self.text = None;
    }

    /// `true` for dict and array nodes.
    #[inline]
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// `true` for the two boolean kinds.
    #[inline]
    pub fn is_boolean(&self) -> bool {
        self.kind.is_boolean()
    }

    /// Child nodes; dictionaries list keys and values alternately.
    pub fn children(&self) -> Result<&[PlistNode]> {
        self.require_directory()?;
        Ok(&self.children)
    }

    /// Number of children (zero for leaves).
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether a dictionary holds `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.kind == TypeKind::Dict && self.value_position(key).is_some()
    }

    /// Dictionary entries as (key text, value node), in document order.
    ///
    /// Yields nothing for other kinds.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PlistNode)> {
        let children: &[PlistNode] = if self.kind == TypeKind::Dict {
            &self.children
        } else {
            &[]
        };
        children
            .chunks_exact(2)
            .map(|pair| (pair[0].text().unwrap_or(""), &pair[1]))
    }

    /// Dictionary keys, in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|(key, _)| key)
    }

    /// Walk this node and its descendants, pre-order.
    ///
    /// With a filter, only nodes of that kind are yielded, but the whole tree
    /// is still walked. Every call starts a fresh walk.
    pub fn iter_depth_first(&self, filter: Option<TypeKind>) -> DepthFirst<'_> {
        DepthFirst::new(self, filter)
    }

    /// Borrow a child.
    ///
    /// # Examples
    ///
    /// ```
    /// use plistkit::plist::PlistNode;
    ///
    /// let mut dict = PlistNode::dict();
    /// dict.set("name", PlistNode::string("value")).unwrap();
    /// assert_eq!(dict.get("name").unwrap().text(), Some("value"));
    /// assert!(dict.get(0).is_err());
    /// ```
    pub fn get<'k>(&self, index: impl Into<Index<'k>>) -> Result<&PlistNode> {
        let position = self.position(index.into())?;
        Ok(&self.children[position])
    }

    /// Mutably borrow a child.
    ///
    /// The handle edits the child in place through the same checked methods
    /// as [`PlistNode`]; replacing the child as a whole goes through
    /// [`set`](Self::set).
    ///
    /// # Examples
    ///
    /// ```
    /// use plistkit::plist::PlistNode;
    ///
    /// let mut dict = PlistNode::dict();
    /// dict.set("list", PlistNode::array()).unwrap();
    /// dict.get_mut("list").unwrap().append(PlistNode::integer(1)).unwrap();
    /// assert_eq!(dict.get("list").unwrap().len(), 1);
    /// ```
    pub fn get_mut<'k>(&mut self, index: impl Into<Index<'k>>) -> Result<NodeMut<'_>> {
        let position = self.position(index.into())?;
        Ok(NodeMut {
            node: &mut self.children[position],
        })
    }

    /// Replace a child, or insert a new dictionary entry.
    ///
    /// Arrays replace by position (`Error::Index` past the end; use
    /// [`append`](Self::append) to grow). Dictionaries replace the value of an
    /// existing key, or append a new key and value at the end.
    pub fn set<'k>(&mut self, index: impl Into<Index<'k>>, value: PlistNode) -> Result<()> {
        self.require_directory()?;
        match (self.kind, index.into()) {
            (TypeKind::Array, Index::Position(position)) => {
                let len = self.children.len();
                let slot = self
                    .children
                    .get_mut(position)
                    .ok_or(Error::Index { index: position, len })?;
                *slot = value;
                Ok(())
            },
            (TypeKind::Array, Index::Key(_)) => Err(Error::Value(
                "cannot access array nodes by a string key".to_string(),
            )),
            (_, Index::Position(_)) => Err(Error::Value(
                "cannot access dict nodes by an integer index".to_string(),
            )),
            (_, Index::Key(key)) => {
                if value.kind == TypeKind::Key {
                    return Err(Error::Structural(
                        "a key node cannot be stored as a dict value".to_string(),
                    ));
                }
                match self.value_position(key) {
                    Some(position) => self.children[position] = value,
                    None => {
                        self.children.push(PlistNode::key(key));
                        self.children.push(value);
                        self.key_index
                            .insert(key.to_string(), self.children.len() - 1);
                    },
                }
                Ok(())
            },
        }
    }

    /// Append one node to an array.
    pub fn append(&mut self, value: PlistNode) -> Result<()> {
        self.require_array()?;
        self.children.push(value);
        Ok(())
    }

    /// Append several nodes to an array, in order.
    pub fn extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = PlistNode>,
    {
        self.require_array()?;
        self.children.extend(values);
        Ok(())
    }

    /// Remove a child and return it.
    ///
    /// Removing a dictionary entry drops both the key and the value node and
    /// returns the value. When a parsed dictionary repeats a key, the entry
    /// the index points at (the last one) goes and the earlier one becomes
    /// visible again.
    pub fn remove<'k>(&mut self, index: impl Into<Index<'k>>) -> Result<PlistNode> {
        self.require_directory()?;
        match (self.kind, index.into()) {
            (TypeKind::Array, Index::Position(position)) => {
                if position >= self.children.len() {
                    return Err(Error::Index {
                        index: position,
                        len: self.children.len(),
                    });
                }
                Ok(self.children.remove(position))
            },
            (TypeKind::Array, Index::Key(_)) => Err(Error::Value(
                "cannot remove array nodes by a string key".to_string(),
            )),
            (_, Index::Position(_)) => Err(Error::Value(
                "cannot remove dict nodes by an integer index".to_string(),
            )),
            (_, Index::Key(key)) => {
                let position = self
                    .value_position(key)
                    .ok_or_else(|| Error::Key(key.to_string()))?;
                let value = self.children.remove(position);
                if position > 0 && self.children[position - 1].kind == TypeKind::Key {
                    self.children.remove(position - 1);
                }
                self.rebuild_key_index();
                Ok(value)
            },
        }
    }

    /// Attach a closed child during parsing.
    ///
    /// When a key closes inside a dictionary, its value has not been seen yet;
    /// the index records the position the next child will take.
    pub(crate) fn adopt(&mut self, child: PlistNode) {
        let anticipate = self.kind == TypeKind::Dict && child.kind == TypeKind::Key;
        let key = child.text.clone().unwrap_or_default();
        self.children.push(child);
        if anticipate {
            self.key_index.insert(key, self.children.len());
        }
    }

    fn rebuild_key_index(&mut self) {
        self.key_index.clear();
        for (position, child) in self.children.iter().enumerate() {
            if child.kind == TypeKind::Key {
                let key = child.text.clone().unwrap_or_default();
                self.key_index.insert(key, position + 1);
            }
        }
    }

    fn value_position(&self, key: &str) -> Option<usize> {
        self.key_index
            .get(key)
            .copied()
            .filter(|&position| position < self.children.len())
    }

    fn position(&self, index: Index<'_>) -> Result<usize> {
        self.require_directory()?;
        match (self.kind, index) {
            (TypeKind::Array, Index::Position(position)) => {
                if position < self.children.len() {
                    Ok(position)
                } else {
                    Err(Error::Index {
                        index: position,
                        len: self.children.len(),
                    })
                }
            },
            (TypeKind::Array, Index::Key(_)) => Err(Error::Value(
                "cannot access array nodes by a string key".to_string(),
            )),
            (_, Index::Position(_)) => Err(Error::Value(
                "cannot access dict nodes by an integer index".to_string(),
            )),
            (_, Index::Key(key)) => self
                .value_position(key)
                .ok_or_else(|| Error::Key(key.to_string())),
        }
    }

    fn require_directory(&self) -> Result<()> {
        if self.is_directory() {
            Ok(())
        } else {
            Err(Error::Structural(format!(
                "`{}` node can't have any children",
                self.kind
            )))
        }
    }

    fn require_array(&self) -> Result<()> {
        if self.kind == TypeKind::Array {
            Ok(())
        } else {
            Err(Error::Structural(format!(
                "cannot append children to a `{}` node",
                self.kind
            )))
        }
    }

    #[cfg(test)]
    pub(crate) fn key_index(&self) -> &HashMap<String, usize> {
        &self.key_index
    }
}

/// Mutable handle to a child node, returned by [`PlistNode::get_mut`].
///
/// Reads go through `Deref`. Writes are limited to the checked methods, so
/// the parent dictionary keeps its key and value layout.
#[derive(Debug)]
pub struct NodeMut<'a> {
    node: &'a mut PlistNode,
}

impl Deref for NodeMut<'_> {
    type Target = PlistNode;

    fn deref(&self) -> &PlistNode {
        self.node
    }
}

impl NodeMut<'_> {
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        self.node.attributes_mut()
    }

    pub fn set_text(&mut self, value: impl Into<Value>) -> Result<()> {
        self.node.set_text(value)
    }

    pub fn clear_text(&mut self) {
        self.node.clear_text()
    }

    pub fn get_mut<'k>(&mut self, index: impl Into<Index<'k>>) -> Result<NodeMut<'_>> {
        self.node.get_mut(index)
    }

    pub fn set<'k>(&mut self, index: impl Into<Index<'k>>, value: PlistNode) -> Result<()> {
        self.node.set(index, value)
    }

    pub fn append(&mut self, value: PlistNode) -> Result<()> {
        self.node.append(value)
    }

    pub fn extend<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = PlistNode>,
    {
        self.node.extend(values)
    }

    pub fn remove<'k>(&mut self, index: impl Into<Index<'k>>) -> Result<PlistNode> {
        self.node.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn assert_dict_shape(node: &PlistNode) {
        let children = node.children().unwrap();
        assert_eq!(children.len() % 2, 0);
        for (i, child) in children.iter().enumerate() {
            assert_eq!(child.kind() == TypeKind::Key, i % 2 == 0);
        }
        for (key, &position) in node.key_index() {
            assert_eq!(children[position - 1].text().unwrap_or(""), key);
            assert_ne!(children[position].kind(), TypeKind::Key);
        }
        assert_eq!(node.key_index().len(), children.len() / 2);
    }

    #[test]
    fn test_from_tag_rejects_unknown_tag() {
        let ns = Namespace::new();
        let err = PlistNode::from_tag(&ns, "non_existing_tag", "", Attributes::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidTag(ref tag) if tag == "non_existing_tag"));

        let node = PlistNode::from_tag(&ns, "dict", "", Attributes::new()).unwrap();
        assert_eq!(node.kind(), TypeKind::Dict);
        assert_eq!(node.tag(), Some("dict"));
    }

    #[test]
    fn test_deferred_skips_text() {
        let ns = Namespace::new();
        let node = PlistNode::deferred(&ns, "key", Attributes::new()).unwrap();
        assert_eq!(node.text(), None);
    }

    #[test]
    fn test_set_text_on_directory_and_boolean() {
        let mut dict = PlistNode::dict();
        let mut truth = PlistNode::boolean(true);
        assert!(matches!(dict.set_text("test_value"), Err(Error::Structural(_))));
        assert!(matches!(truth.set_text("test_value"), Err(Error::Structural(_))));
        assert!(matches!(dict.set_text(3), Err(Error::Structural(_))));

        let mut array = PlistNode::array();
        assert!(matches!(array.set_text("x"), Err(Error::Structural(_))));
        assert!(matches!(array.set_text(1.5), Err(Error::Structural(_))));

        // empty text is always accepted
        dict.set_text("").unwrap();
        truth.set_text("").unwrap();
        array.set_text("").unwrap();
        assert_eq!(dict.text(), None);
        assert_eq!(array.text(), None);
    }

    #[test]
    fn test_set_text_date() {
        let mut node = PlistNode::new(TypeKind::Date);
        assert!(matches!(node.set_text("not_a_date"), Err(Error::Type(_))));

        node.set_text(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(node.text(), Some("2020-01-01"));

        let datetime = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_micro_opt(1, 1, 1, 1)
            .unwrap();
        node.set_text(datetime).unwrap();
        assert_eq!(node.text(), Some("2020-01-01T01:01:01.000001"));
    }

    #[test]
    fn test_set_text_numbers() {
        let mut real = PlistNode::with_text(TypeKind::Real, 12.1).unwrap();
        assert_eq!(real.text(), Some("12.1"));
        assert!(matches!(real.set_text("not_a_string_number"), Err(Error::Value(_))));
        assert!(matches!(real.set_text(vec![0u8]), Err(Error::Type(_))));
        assert!(matches!(real.set_text(true), Err(Error::Type(_))));

        real.set_text("12").unwrap();
        assert_eq!(real.text(), Some("12"));

        let integer = PlistNode::with_text(TypeKind::Integer, 0).unwrap();
        assert_eq!(integer.text(), Some("0"));
        assert_eq!(PlistNode::real(2.0).text(), Some("2.0"));
    }

    #[test]
    fn test_set_text_data_and_string() {
        let mut data = PlistNode::new(TypeKind::Data);
        data.set_text(b"some_text").unwrap();
        assert_eq!(data.text(), Some("c29tZV90ZXh0"));
        assert!(matches!(data.set_text("c29tZV90ZXh0"), Err(Error::Type(_))));

        let mut string = PlistNode::new(TypeKind::String);
        string.set_text("hello").unwrap();
        assert_eq!(string.text(), Some("hello"));
        assert!(matches!(string.set_text(5), Err(Error::Type(_))));
    }

    #[test]
    fn test_array_access() {
        let mut array = PlistNode::array();
        array.append(PlistNode::boolean(false)).unwrap();
        array
            .extend([PlistNode::integer(1), PlistNode::string("x")])
            .unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(1).unwrap().text(), Some("1"));
        assert!(matches!(array.get(3), Err(Error::Index { index: 3, len: 3 })));
        assert!(matches!(array.get("a"), Err(Error::Value(_))));

        array.set(0, PlistNode::boolean(true)).unwrap();
        assert_eq!(array.get(0).unwrap().kind(), TypeKind::BoolTrue);
        assert!(matches!(array.set(9, PlistNode::dict()), Err(Error::Index { .. })));

        let removed = array.remove(1).unwrap();
        assert_eq!(removed.text(), Some("1"));
        assert_eq!(array.len(), 2);
        assert!(matches!(array.remove("a"), Err(Error::Value(_))));
        assert!(matches!(array.remove(5), Err(Error::Index { .. })));
    }

    #[test]
    fn test_dict_access() {
        let mut dict = PlistNode::dict();
        dict.set("a", PlistNode::integer(1)).unwrap();
        dict.set("b", PlistNode::integer(2)).unwrap();
        dict.set("a", PlistNode::string("one")).unwrap();

        assert_eq!(dict.len(), 4);
        assert_eq!(dict.get("a").unwrap().text(), Some("one"));
        assert!(matches!(dict.get("zzz"), Err(Error::Key(ref k)) if k == "zzz"));
        assert!(matches!(dict.get(0), Err(Error::Value(_))));
        assert!(matches!(dict.set(0, PlistNode::dict()), Err(Error::Value(_))));
        assert!(matches!(dict.append(PlistNode::dict()), Err(Error::Structural(_))));
        assert!(matches!(
            dict.set("c", PlistNode::key("c")),
            Err(Error::Structural(_))
        ));
        assert_eq!(dict.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_dict_shape(&dict);
    }

    #[test]
    fn test_dict_remove_shifts_index() {
        let mut dict = PlistNode::dict();
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            dict.set(*key, PlistNode::integer(i as i64)).unwrap();
        }
        let removed = dict.remove("a").unwrap();
        assert_eq!(removed.text(), Some("0"));
        assert_eq!(dict.get("c").unwrap().text(), Some("2"));
        assert!(!dict.contains_key("a"));
        assert!(matches!(dict.remove("a"), Err(Error::Key(_))));
        assert!(matches!(dict.remove(0), Err(Error::Value(_))));
        assert_dict_shape(&dict);
    }

    #[test]
    fn test_dict_remove_repeated_key() {
        let mut dict = PlistNode::dict();
        dict.adopt(PlistNode::key("a"));
        dict.adopt(PlistNode::integer(1));
        dict.adopt(PlistNode::key("b"));
        dict.adopt(PlistNode::integer(2));
        dict.adopt(PlistNode::key("a"));
        dict.adopt(PlistNode::integer(3));
        assert_eq!(dict.get("a").unwrap().text(), Some("3"));

        let removed = dict.remove("a").unwrap();
        assert_eq!(removed.text(), Some("3"));
        assert_eq!(dict.get("a").unwrap().text(), Some("1"));
        assert_eq!(dict.get("b").unwrap().text(), Some("2"));
        assert_eq!(dict.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_dict_shape(&dict);

        dict.remove("a").unwrap();
        assert!(matches!(dict.get("a"), Err(Error::Key(_))));
        assert_eq!(dict.get("b").unwrap().text(), Some("2"));
        assert_dict_shape(&dict);
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut dict = PlistNode::dict();
        dict.set("list", PlistNode::array()).unwrap();
        dict.set("name", PlistNode::string("old")).unwrap();

        {
            let mut list = dict.get_mut("list").unwrap();
            list.append(PlistNode::integer(1)).unwrap();
            list.extend([PlistNode::dict(), PlistNode::boolean(false)]).unwrap();
            list.get_mut(1).unwrap().set("inner", PlistNode::real(0.5)).unwrap();
            assert_eq!(list.len(), 3);
        }
        let mut name = dict.get_mut("name").unwrap();
        name.set_text("new").unwrap();
        assert!(matches!(name.set_text(vec![1u8]), Err(Error::Type(_))));
        name.attributes_mut().insert("id".to_string(), "n".to_string());

        assert_eq!(dict.get("name").unwrap().text(), Some("new"));
        assert_eq!(dict.get("name").unwrap().attributes()["id"], "n");
        let list = dict.get("list").unwrap();
        assert_eq!(list.get(1).unwrap().get("inner").unwrap().text(), Some("0.5"));
        assert_dict_shape(&dict);
        assert!(!crate::plist::validate_dict(&dict).unwrap());
    }

    #[test]
    fn test_leaf_rejects_directory_operations() {
        let mut leaf = PlistNode::string("x");
        assert!(matches!(leaf.get(0), Err(Error::Structural(_))));
        assert!(matches!(leaf.get("k"), Err(Error::Structural(_))));
        assert!(matches!(leaf.set("k", PlistNode::dict()), Err(Error::Structural(_))));
        assert!(matches!(leaf.append(PlistNode::dict()), Err(Error::Structural(_))));
        assert!(matches!(leaf.remove(0), Err(Error::Structural(_))));
        assert!(matches!(leaf.children(), Err(Error::Structural(_))));
    }

    #[test]
    fn test_adopt_anticipates_value_position() {
        let mut dict = PlistNode::dict();
        dict.set("k1", PlistNode::integer(2)).unwrap();
        dict.adopt(PlistNode::key("empty_key"));
        assert_eq!(dict.key_index()["empty_key"], 3);
        // the value has not arrived yet
        assert!(matches!(dict.get("empty_key"), Err(Error::Key(_))));
        dict.adopt(PlistNode::integer(7));
        assert_eq!(dict.get("empty_key").unwrap().text(), Some("7"));
    }

    #[test]
    fn test_structural_equality_ignores_tag() {
        let ns = Namespace::new();
        let parsed = PlistNode::from_tag(&ns, "integer", 3, Attributes::new()).unwrap();
        assert_eq!(parsed, PlistNode::integer(3));
        assert_eq!(parsed.tag_in(&ns), "integer");
        assert_eq!(PlistNode::integer(3).tag_in(&ns), "integer");
    }

    #[derive(Debug, Clone)]
    enum DictOp {
        Set(u8, i64),
        Remove(u8),
    }

    fn dict_op() -> impl Strategy<Value = DictOp> {
        prop_oneof![
            (0u8..8, any::<i64>()).prop_map(|(k, v)| DictOp::Set(k, v)),
            (0u8..8).prop_map(DictOp::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_dict_shape_survives_mutation(ops in prop::collection::vec(dict_op(), 0..40)) {
            let mut dict = PlistNode::dict();
            for op in ops {
                match op {
                    DictOp::Set(k, v) => {
                        dict.set(format!("k{}", k).as_str(), PlistNode::integer(v)).unwrap();
                        let stored = dict.get(format!("k{}", k).as_str()).unwrap();
                        prop_assert_eq!(stored.text().map(str::to_string), Some(v.to_string()));
                    },
                    DictOp::Remove(k) => {
                        let key = format!("k{}", k);
                        let existed = dict.contains_key(&key);
                        prop_assert_eq!(dict.remove(key.as_str()).is_ok(), existed);
                    },
                }
                assert_dict_shape(&dict);
            }
        }
    }
}
