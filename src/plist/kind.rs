//! The ten node kinds of a property list.

use std::fmt;
use std::str::FromStr;

use phf::{Map, phf_map};

use crate::common::{Error, Result};

/// Registry identifiers, as used by [`Namespace::merge_ids`](super::Namespace::merge_ids).
static KIND_IDS: Map<&'static str, TypeKind> = phf_map! {
    "dict" => TypeKind::Dict,
    "array" => TypeKind::Array,
    "string" => TypeKind::String,
    "int" => TypeKind::Integer,
    "float" => TypeKind::Real,
    "true" => TypeKind::BoolTrue,
    "false" => TypeKind::BoolFalse,
    "date" => TypeKind::Date,
    "data" => TypeKind::Data,
    "key" => TypeKind::Key,
};

/// Kind of a [`PlistNode`](super::PlistNode).
///
/// The kind is fixed when a node is created. Which XML tags map to which kind
/// is decided by a [`Namespace`](super::Namespace), not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    Dict,
    Array,
    String,
    Integer,
    Real,
    BoolTrue,
    BoolFalse,
    Date,
    Data,
    Key,
}

impl TypeKind {
    /// Every kind, in registry order.
    pub const ALL: [TypeKind; 10] = [
        TypeKind::Dict,
        TypeKind::Array,
        TypeKind::String,
        TypeKind::Integer,
        TypeKind::Real,
        TypeKind::BoolTrue,
        TypeKind::BoolFalse,
        TypeKind::Date,
        TypeKind::Data,
        TypeKind::Key,
    ];

    /// Registry identifier of this kind (`"int"`, `"float"`, `"dict"`, ...).
    pub fn id(self) -> &'static str {
        match self {
            TypeKind::Dict => "dict",
            TypeKind::Array => "array",
            TypeKind::String => "string",
            TypeKind::Integer => "int",
            TypeKind::Real => "float",
            TypeKind::BoolTrue => "true",
            TypeKind::BoolFalse => "false",
            TypeKind::Date => "date",
            TypeKind::Data => "data",
            TypeKind::Key => "key",
        }
    }

    /// XML tag used for this kind by a fresh namespace.
    pub fn default_tag(self) -> &'static str {
        match self {
            TypeKind::Integer => "integer",
            TypeKind::Real => "real",
            other => other.id(),
        }
    }

    /// Look up a kind by its registry identifier.
    pub fn from_id(id: &str) -> Option<TypeKind> {
        KIND_IDS.get(id).copied()
    }

    /// `true` for kinds that hold children (dict and array).
    #[inline]
    pub fn is_directory(self) -> bool {
        matches!(self, TypeKind::Dict | TypeKind::Array)
    }

    /// `true` for the two boolean kinds.
    #[inline]
    pub fn is_boolean(self) -> bool {
        matches!(self, TypeKind::BoolTrue | TypeKind::BoolFalse)
    }

    /// `true` for kinds that carry text.
    #[inline]
    pub fn is_leaf(self) -> bool {
        !self.is_directory() && !self.is_boolean()
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TypeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TypeKind::from_id(s).ok_or_else(|| Error::Value(format!("unknown plist type `{}`", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for kind in TypeKind::ALL {
            assert_eq!(kind.id().parse::<TypeKind>().unwrap(), kind);
        }
        assert!(matches!("integer".parse::<TypeKind>(), Err(Error::Value(_))));
    }

    #[test]
    fn test_default_tags() {
        assert_eq!(TypeKind::Integer.default_tag(), "integer");
        assert_eq!(TypeKind::Real.default_tag(), "real");
        assert_eq!(TypeKind::BoolTrue.default_tag(), "true");
        assert_eq!(TypeKind::Dict.default_tag(), "dict");
    }

    #[test]
    fn test_capabilities() {
        assert!(TypeKind::Dict.is_directory());
        assert!(TypeKind::Array.is_directory());
        assert!(!TypeKind::BoolTrue.is_directory());
        assert!(TypeKind::BoolFalse.is_boolean());
        assert!(!TypeKind::Key.is_boolean());
        assert!(TypeKind::Key.is_leaf());
        assert!(!TypeKind::BoolTrue.is_leaf());
        assert!(!TypeKind::Array.is_leaf());
    }
}
