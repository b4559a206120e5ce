//! Dictionary shape check.

use super::{PlistNode, TypeKind};
use crate::common::{Error, Result};

/// Check a dictionary's key/value layout.
///
/// Returns `true` when the dictionary is **invalid**: an odd number of
/// children, a non-key at an even position, or a key at an odd position. An
/// empty dictionary is valid. Duplicate keys are not checked here.
///
/// Passing a node that is not a dictionary is `Error::Value`.
///
/// # Examples
///
/// ```
/// use plistkit::plist::{PlistNode, validate_dict};
///
/// let mut dict = PlistNode::dict();
/// assert!(!validate_dict(&dict).unwrap());
/// dict.set("k", PlistNode::integer(1)).unwrap();
/// assert!(!validate_dict(&dict).unwrap());
/// assert!(validate_dict(&PlistNode::array()).is_err());
/// ```
pub fn validate_dict(node: &PlistNode) -> Result<bool> {
    if node.kind() != TypeKind::Dict {
        return Err(Error::Value(format!("`{}` node is not a dict", node.kind())));
    }
    let children = node.children()?;
    if children.is_empty() {
        return Ok(false);
    }
    if children.len() % 2 != 0 {
        return Ok(true);
    }
    let keys_valid = children
        .iter()
        .step_by(2)
        .all(|child| child.kind() == TypeKind::Key);
    let values_valid = children
        .iter()
        .skip(1)
        .step_by(2)
        .all(|child| child.kind() != TypeKind::Key);
    Ok(!(keys_valid && values_valid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_dict() {
        assert!(matches!(validate_dict(&PlistNode::key("k")), Err(Error::Value(_))));
    }

    #[test]
    fn test_empty_dict_is_valid() {
        assert!(!validate_dict(&PlistNode::dict()).unwrap());
    }

    #[test]
    fn test_invalid_layouts() {
        // odd number of children
        let mut dict = PlistNode::dict();
        dict.adopt(PlistNode::key("test_key"));
        assert!(validate_dict(&dict).unwrap());

        // the value is a key
        dict.adopt(PlistNode::key("linked_value"));
        assert!(validate_dict(&dict).unwrap());

        // the first child is not a key
        let mut dict = PlistNode::dict();
        dict.adopt(PlistNode::boolean(true));
        dict.adopt(PlistNode::integer(1));
        assert!(validate_dict(&dict).unwrap());
    }

    #[test]
    fn test_programmatic_dicts_are_valid() {
        let mut dict = PlistNode::dict();
        dict.set("a", PlistNode::array()).unwrap();
        dict.set("b", PlistNode::boolean(false)).unwrap();
        dict.remove("a").unwrap();
        assert!(!validate_dict(&dict).unwrap());
    }
}
