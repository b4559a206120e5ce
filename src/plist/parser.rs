//! XML to plist tree.
//!
//! Parsing is split in two. [`TreeBuilder`] is a small state machine fed with
//! three kinds of [`Event`] (start tag, character data, end tag) that keeps a
//! stack of open elements and assembles the tree. [`PlistParser`] drives it
//! from `quick-xml`, merging adjacent text, CDATA and entity references into a
//! single character-data event per run of text.
//!
//! The `<plist>` wrapper element (any letter case) carries no node and is
//! skipped wherever it appears.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event as XmlEvent};

use super::namespace::{self, Namespace};
use super::{Attributes, ParseOptions, PlistNode, TypeKind, validate_dict};
use crate::common::binary::normalize_base64;
use crate::common::{Date, Error, Result};
use crate::tracing_macros::{debug, trace, warning};

/// Source name used in errors for in-memory input.
const STRING_SOURCE: &str = "<string>";

/// One tokenizer event, as consumed by [`TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartTag { tag: String, attributes: Attributes },
    CharacterData(String),
    EndTag(String),
}

/// Builds a [`PlistNode`] tree from a stream of [`Event`]s.
///
/// The root element stays on the stack once closed; [`finish`](Self::finish)
/// hands it out.
#[derive(Debug)]
pub struct TreeBuilder<'ns> {
    namespace: &'ns Namespace,
    validate_dicts: bool,
    stack: Vec<PlistNode>,
    root_closed: bool,
}

impl<'ns> TreeBuilder<'ns> {
    pub fn new(namespace: &'ns Namespace, options: &ParseOptions) -> Self {
        Self {
            namespace,
            validate_dicts: options.validate_dicts,
            stack: Vec::new(),
            root_closed: false,
        }
    }

    /// Feed one event.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::StartTag { tag, attributes } => self.start(&tag, attributes),
            Event::CharacterData(text) => self.data(&text),
            Event::EndTag(tag) => self.end(&tag),
        }
    }

    /// Return the completed root node.
    pub fn finish(mut self) -> Result<PlistNode> {
        if self.stack.is_empty() {
            return Err(Error::Syntax("no plist element found".to_string()));
        }
        if !self.root_closed || self.stack.len() > 1 {
            return Err(Error::Syntax("unclosed element at end of input".to_string()));
        }
        self.stack
            .pop()
            .ok_or_else(|| Error::Syntax("no plist element found".to_string()))
    }

    fn start(&mut self, tag: &str, attributes: Attributes) -> Result<()> {
        if is_wrapper(tag) {
            return Ok(());
        }
        if self.root_closed {
            return Err(Error::Syntax(format!(
                "`{}` found after the top-level element was closed",
                tag
            )));
        }
        trace!(tag, depth = self.stack.len(), "open element");
        let node = PlistNode::deferred(self.namespace, tag, attributes)?;
        self.stack.push(node);
        Ok(())
    }

    fn data(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        if self.root_closed {
            return Err(Error::Syntax(format!(
                "character data `{}` after the top-level element",
                text
            )));
        }
        let target = self.stack.last_mut().ok_or_else(|| {
            Error::Syntax(format!("character data `{}` outside of any element", text))
        })?;

        match target.kind() {
            TypeKind::Date => {
                let date = Date::parse(text)?;
                target.set_parsed_text(date.to_iso_string());
            },
            TypeKind::Data => {
                let payload = normalize_base64(text)?;
                target.set_parsed_text(payload);
            },
            _ => target.set_text(text)?,
        }
        Ok(())
    }

    fn end(&mut self, tag: &str) -> Result<()> {
        if is_wrapper(tag) {
            return Ok(());
        }
        let closing = match self.stack.last() {
            Some(node) if !(self.root_closed && self.stack.len() == 1) => node,
            _ => return Err(Error::Syntax(format!("unexpected end tag `{}`", tag))),
        };
        if closing.tag() != Some(tag) {
            return Err(Error::Syntax(format!(
                "end tag `{}` does not match `{}`",
                tag,
                closing.tag_in(self.namespace)
            )));
        }

        if closing.kind() == TypeKind::Dict && self.validate_dicts && validate_dict(closing)? {
            warning!(tag, "dictionary failed validation");
            return Err(Error::Syntax("parsed dict is not valid".to_string()));
        }

        if self.stack.len() > 1 {
            let parent = &self.stack[self.stack.len() - 2];
            if !parent.is_directory() {
                return Err(Error::Syntax(format!(
                    "`{}` element cannot contain `{}`",
                    parent.tag_in(self.namespace),
                    tag
                )));
            }
            if let Some(child) = self.stack.pop()
                && let Some(parent) = self.stack.last_mut()
            {
                parent.adopt(child);
            }
        } else {
            self.root_closed = true;
        }
        Ok(())
    }

    #[cfg(test)]
    fn top(&self) -> Option<&PlistNode> {
        self.stack.last()
    }
}

fn is_wrapper(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("plist")
}

/// Parses XML text into a [`PlistNode`] tree against a given namespace.
///
/// # Examples
///
/// ```
/// use plistkit::plist::{Namespace, PlistParser, TypeKind};
///
/// let mut ns = Namespace::new();
/// ns.merge([(TypeKind::Integer, vec!["int", "integer"])]).unwrap();
///
/// let root = PlistParser::new(&ns)
///     .parse_str("<plist><dict><key>k1</key><int>2</int></dict></plist>")
///     .unwrap();
/// assert_eq!(root.get("k1").unwrap().text(), Some("2"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlistParser<'ns> {
    namespace: &'ns Namespace,
    options: ParseOptions,
}

impl<'ns> PlistParser<'ns> {
    pub fn new(namespace: &'ns Namespace) -> Self {
        Self {
            namespace,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse an XML document held in memory.
    pub fn parse_str(&self, text: &str) -> Result<PlistNode> {
        self.parse_source(text, STRING_SOURCE)
    }

    /// Read a whole file and parse it.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PlistNode> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        self.parse_source(&text, &path.display().to_string())
    }

    fn parse_source(&self, text: &str, source: &str) -> Result<PlistNode> {
        debug!(source, validate_dicts = self.options.validate_dicts, "parsing plist");
        let mut reader = Reader::from_str(text);
        let mut builder = TreeBuilder::new(self.namespace, &self.options);
        let mut pending: Option<String> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| tokenizer_error(source, err))?;
            match event {
                XmlEvent::Text(t) => {
                    let text = t.decode().map_err(|err| tokenizer_error(source, err))?;
                    pending.get_or_insert_with(String::new).push_str(&text);
                },
                XmlEvent::CData(c) => {
                    let text = c.decode().map_err(|err| tokenizer_error(source, err))?;
                    pending.get_or_insert_with(String::new).push_str(&text);
                },
                XmlEvent::GeneralRef(r) => {
                    let text = resolve_reference(&r).map_err(|err| tokenizer_error(source, err))?;
                    pending.get_or_insert_with(String::new).push_str(&text);
                },
                XmlEvent::Start(e) => {
                    flush_text(&mut builder, &mut pending)?;
                    let tag = element_name(&e).map_err(|err| tokenizer_error(source, err))?;
                    let attributes = read_attributes(&e)?;
                    builder.handle(Event::StartTag { tag, attributes })?;
                },
                XmlEvent::Empty(e) => {
                    flush_text(&mut builder, &mut pending)?;
                    let tag = element_name(&e).map_err(|err| tokenizer_error(source, err))?;
                    let attributes = read_attributes(&e)?;
                    builder.handle(Event::StartTag {
                        tag: tag.clone(),
                        attributes,
                    })?;
                    builder.handle(Event::EndTag(tag))?;
                },
                XmlEvent::End(e) => {
                    flush_text(&mut builder, &mut pending)?;
                    let tag = std::str::from_utf8(e.name().as_ref())
                        .map_err(|err| tokenizer_error(source, err))?
                        .to_string();
                    builder.handle(Event::EndTag(tag))?;
                },
                XmlEvent::Eof => {
                    flush_text(&mut builder, &mut pending)?;
                    break;
                },
                // declarations, comments, processing instructions, doctype
                _ => {},
            }
        }

        let root = builder.finish().map_err(|err| match err {
            Error::Syntax(msg) => Error::Syntax(format!("'{}' cannot be parsed: {}", source, msg)),
            other => other,
        })?;
        debug!(source, kind = %root.kind(), "parsed plist");
        Ok(root)
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn tokenizer_error(source: &str, err: impl std::fmt::Display) -> Error {
    warning!(source, error = %err, "XML tokenizer failed");
    Error::Syntax(format!("'{}' cannot be parsed", source))
}

fn flush_text(builder: &mut TreeBuilder<'_>, pending: &mut Option<String>) -> Result<()> {
    match pending.take() {
        Some(text) => builder.handle(Event::CharacterData(text)),
        None => Ok(()),
    }
}

fn element_name(start: &BytesStart<'_>) -> std::result::Result<String, std::str::Utf8Error> {
    std::str::from_utf8(start.name().as_ref()).map(str::to_string)
}

fn read_attributes(start: &BytesStart<'_>) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| Error::InvalidAttributes("invalid UTF-8 in attribute name".to_string()))?;
        let raw = std::str::from_utf8(&attr.value).map_err(|_| {
            Error::InvalidAttributes(format!("invalid UTF-8 in value of `{}`", key))
        })?;
        let value = quick_xml::escape::unescape(raw)
            .map_err(|err| Error::InvalidAttributes(format!("`{}`: {}", key, err)))?;
        attributes.insert(key.to_string(), value.into_owned());
    }
    Ok(attributes)
}

fn resolve_reference(reference: &BytesRef<'_>) -> std::result::Result<String, String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(|err| err.to_string())? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|err| err.to_string())?;
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| format!("unknown entity `&{};`", name))
}

/// Parse a document held in memory with the global namespace.
///
/// # Examples
///
/// ```
/// use plistkit::plist::{TypeKind, parse_str};
///
/// let root = parse_str(
///     "<dict><key>2</key><array><integer>5</integer><string>test</string></array></dict>",
/// )
/// .unwrap();
/// let item = root.get("2").unwrap().get(1).unwrap();
/// assert_eq!(item.kind(), TypeKind::String);
/// assert_eq!(item.text(), Some("test"));
/// ```
pub fn parse_str(text: &str) -> Result<PlistNode> {
    parse_str_with(text, &ParseOptions::default())
}

/// Parse a document held in memory with the global namespace and explicit options.
pub fn parse_str_with(text: &str, options: &ParseOptions) -> Result<PlistNode> {
    let ns = namespace::global();
    PlistParser::new(&ns).with_options(*options).parse_str(text)
}

/// Read and parse a file with the global namespace.
pub fn parse_file(path: impl AsRef<Path>) -> Result<PlistNode> {
    parse_file_with(path, &ParseOptions::default())
}

/// Read and parse a file with the global namespace and explicit options.
pub fn parse_file_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<PlistNode> {
    let ns = namespace::global();
    PlistParser::new(&ns).with_options(*options).parse_file(path)
}
