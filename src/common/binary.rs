//! Base64 helpers for `<data>` payloads.
//!
//! Payloads are stored in the tree as standard-alphabet, padded base64. The
//! validity rule is the textual one: the length is a multiple of four, only
//! `A-Z a-z 0-9 + /` appear, and `=` padding (one or two) only at the end.

use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};

use crate::common::{Error, Result};

// Padding is required and canonical, but the unused low bits of the last
// symbol are not checked.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Encode raw bytes as padded standard base64.
///
/// # Examples
///
/// ```
/// use plistkit::common::binary::encode_base64;
/// assert_eq!(encode_base64(b"some_text"), "c29tZV90ZXh0");
/// assert_eq!(encode_base64(&[0, 1, 2]), "AAEC");
/// ```
#[inline]
pub fn encode_base64(data: &[u8]) -> String {
    ENGINE.encode(data)
}

/// Decode padded standard base64 into raw bytes.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    Ok(ENGINE.decode(text)?)
}

/// Check whether `text` is well-formed padded base64.
///
/// # Examples
///
/// ```
/// use plistkit::common::binary::is_base64;
/// assert!(is_base64("dGVzdF9zdHJpbmc="));
/// assert!(is_base64(""));
/// assert!(!is_base64("not_valid_base64"));
/// assert!(!is_base64("abc"));
/// ```
pub fn is_base64(text: &str) -> bool {
    if text.len() % 4 != 0 {
        return false;
    }
    ENGINE.decode(text).is_ok()
}

/// Remove ASCII whitespace from a base64 block.
///
/// Property lists written by Apple tools wrap long payloads over several
/// indented lines.
pub fn compact_base64(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Validate a base64 block and return its compact form.
pub fn normalize_base64(text: &str) -> Result<String> {
    let compact = compact_base64(text);
    if !is_base64(&compact) {
        return Err(Error::Value(format!("`{}` is not valid base64", text)));
    }
    Ok(compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let encoded = encode_base64(b"test_string");
        assert_eq!(encoded, "dGVzdF9zdHJpbmc=");
        assert_eq!(decode_base64(&encoded).unwrap(), b"test_string");
    }

    #[test]
    fn test_is_base64_padding_rules() {
        assert!(is_base64("AAEC"));
        assert!(is_base64("AAE="));
        assert!(is_base64("AA=="));
        assert!(!is_base64("A==="));
        assert!(!is_base64("AA=A"));
        assert!(!is_base64("AAE"));
        assert!(!is_base64("AA-_"));
    }

    #[test]
    fn test_trailing_bits_are_tolerated() {
        // "AB==" carries non-zero unused bits
        assert!(is_base64("AB=="));
        assert_eq!(decode_base64("AB==").unwrap(), vec![0x00]);
    }

    #[test]
    fn test_normalize_wrapped_block() {
        let wrapped = "\n\tc29tZV\n\t90ZXh0\n";
        assert_eq!(normalize_base64(wrapped).unwrap(), "c29tZV90ZXh0");
        assert!(matches!(normalize_base64("not base64!"), Err(Error::Value(_))));
    }
}
