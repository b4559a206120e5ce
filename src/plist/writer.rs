//! Plist tree to XML text.
//!
//! The `<plist>` wrapper and the optional declaration are written around the
//! node tree; element tags come from each node's own spelling or, failing
//! that, the canonical tag in the namespace.

use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::namespace::{self, Namespace};
use super::{Declaration, PlistNode, WriteOptions};
use crate::common::Result;
use crate::common::xml::{escape_text, header_attributes};
use crate::tracing_macros::debug;

/// Render `node` as an XML document using the global namespace.
///
/// # Examples
///
/// ```
/// use plistkit::plist::{Declaration, PlistNode, WriteOptions, to_xml_string};
///
/// let mut dict = PlistNode::dict();
/// dict.set("x", PlistNode::integer(3)).unwrap();
///
/// let options = WriteOptions::new().with_declaration(Declaration::Version);
/// assert_eq!(
///     to_xml_string(&dict, &options).unwrap(),
///     r#"<?xml version="1.0"?><plist><dict><key>x</key><integer>3</integer></dict></plist>"#,
/// );
/// ```
pub fn to_xml_string(node: &PlistNode, options: &WriteOptions) -> Result<String> {
    let ns = namespace::global();
    to_xml_string_in(&ns, node, options)
}

/// Render `node` as an XML document, resolving tags in `namespace`.
pub fn to_xml_string_in(
    namespace: &Namespace,
    node: &PlistNode,
    options: &WriteOptions,
) -> Result<String> {
    debug!(
        kind = %node.kind(),
        declaration = ?options.declaration,
        "writing plist"
    );
    let mut writer = Writer::new(Vec::new());

    match options.declaration {
        Declaration::None => {},
        Declaration::Version => {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        },
        Declaration::VersionEncoding => {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        },
    }

    let header = format!("<plist{}>", header_attributes(&options.attributes));
    writer.get_mut().extend_from_slice(header.as_bytes());
    write_node(&mut writer, namespace, node, options.short_empty_elements)?;
    writer.get_mut().extend_from_slice(b"</plist>");

    Ok(String::from_utf8(writer.into_inner())?)
}

/// Write `node` to `path` as an XML document using the global namespace.
pub fn write_file(path: impl AsRef<Path>, node: &PlistNode, options: &WriteOptions) -> Result<()> {
    let ns = namespace::global();
    write_file_in(&ns, path, node, options)
}

/// Write `node` to `path`, resolving tags in `namespace`.
pub fn write_file_in(
    namespace: &Namespace,
    path: impl AsRef<Path>,
    node: &PlistNode,
    options: &WriteOptions,
) -> Result<()> {
    let xml = to_xml_string_in(namespace, node, options)?;
    std::fs::write(path, xml)?;
    Ok(())
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    namespace: &Namespace,
    node: &PlistNode,
    short_empty: bool,
) -> Result<()> {
    let tag = node.tag_in(namespace);
    let mut start = BytesStart::new(tag);
    for (key, value) in node.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = node.text().filter(|text| !text.is_empty());
    if node.is_empty() && text.is_none() {
        if short_empty {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    }
    if let Ok(children) = node.children() {
        for child in children {
            write_node(writer, namespace, child, short_empty)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
