use std::borrow::Cow;

use crate::plist::Attributes;

/// Escape text content for an element body.
///
/// Only `&`, `<` and `>` are replaced; quotes are left alone inside text.
///
/// # Examples
///
/// ```
/// use plistkit::common::xml::escape_text;
/// assert_eq!(escape_text("a & b"), "a &amp; b");
/// assert_eq!(escape_text("<tag>\"hello\"</tag>"), "&lt;tag&gt;\"hello\"&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    quick_xml::escape::partial_escape(s)
}

/// Render attributes for the `<plist>` wrapper.
///
/// Each pair becomes ` key="value"` with `"` inside the value written as `\"`.
/// An empty map renders as an empty string.
///
/// # Examples
///
/// ```
/// use plistkit::common::xml::header_attributes;
/// use plistkit::plist::Attributes;
///
/// let mut attrs = Attributes::new();
/// attrs.insert("version".to_string(), "1.0".to_string());
/// attrs.insert("note".to_string(), "say \"hi\"".to_string());
/// assert_eq!(header_attributes(&attrs), " version=\"1.0\" note=\"say \\\"hi\\\"\"");
/// ```
pub fn header_attributes(attributes: &Attributes) -> String {
    let mut out = String::new();
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        for ch in value.chars() {
            if ch == '"' {
                out.push('\\');
            }
            out.push(ch);
        }
        out.push('"');
    }
    out
}
