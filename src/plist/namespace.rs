//! Tag namespace for plist element names.
//!
//! A [`Namespace`] maps every [`TypeKind`] to the list of XML tags accepted for
//! it. The first tag of each list is the canonical one, used whenever a node
//! has no spelling of its own. Lists can be replaced at runtime with
//! [`Namespace::merge`]; a merge replaces the whole list of each kind it names
//! and leaves the others alone.
//!
//! Parsing and writing take a namespace explicitly. For convenience there is
//! also a process-wide registry ([`global`], [`merge_global`], [`reset_global`])
//! used by the top-level entry points. Updates to it should happen at startup,
//! before other threads parse or write.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use parking_lot::{RwLock, RwLockReadGuard};

use super::TypeKind;
use crate::common::{Error, Result};
use crate::tracing_macros::debug;

static GLOBAL: Lazy<RwLock<Namespace>> = Lazy::new(|| RwLock::new(Namespace::new()));

/// Registry of accepted tag spellings per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    aliases: BTreeMap<TypeKind, Vec<String>>,
    // Flat tag table, rebuilt after every merge
    tags: HashMap<String, TypeKind>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    /// Create a namespace with the standard plist tags.
    pub fn new() -> Self {
        let aliases = TypeKind::ALL
            .iter()
            .map(|&kind| (kind, vec![kind.default_tag().to_string()]))
            .collect();
        let mut namespace = Self {
            aliases,
            tags: HashMap::new(),
        };
        namespace.rebuild();
        namespace
    }

    /// Accepted tags for `kind`, canonical first.
    pub fn lookup(&self, kind: TypeKind) -> &[String] {
        self.aliases.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Canonical tag for `kind`.
    pub fn canonical(&self, kind: TypeKind) -> &str {
        self.lookup(kind)
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_tag())
    }

    /// Whether `tag` is one of the spellings of `kind`.
    pub fn is_kind(&self, tag: &str, kind: TypeKind) -> bool {
        self.lookup(kind).iter().any(|t| t == tag)
    }

    /// Kind a tag belongs to.
    ///
    /// A tag listed under several kinds resolves to the first of them in
    /// [`TypeKind::ALL`] order.
    pub fn kind_of(&self, tag: &str) -> Option<TypeKind> {
        self.tags.get(tag).copied()
    }

    /// Whether `tag` is recognized at all.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// All recognized tags.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Replace the tag lists of the given kinds.
    ///
    /// Each supplied list replaces the previous one entirely. Kinds not
    /// mentioned keep their tags. An empty list is rejected and leaves the
    /// namespace untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use plistkit::plist::{Namespace, TypeKind};
    ///
    /// let mut ns = Namespace::new();
    /// ns.merge([(TypeKind::Integer, vec!["num", "integer"])]).unwrap();
    /// assert!(ns.is_kind("num", TypeKind::Integer));
    /// assert_eq!(ns.canonical(TypeKind::Integer), "num");
    /// assert!(ns.is_kind("key", TypeKind::Key));
    /// ```
    pub fn merge<I, S>(&mut self, defs: I) -> Result<()>
    where
        I: IntoIterator<Item = (TypeKind, Vec<S>)>,
        S: Into<String>,
    {
        let mut updates = Vec::new();
        for (kind, tags) in defs {
            if tags.is_empty() {
                return Err(Error::Value(format!(
                    "tag list for `{}` must not be empty",
                    kind
                )));
            }
            updates.push((kind, tags.into_iter().map(Into::into).collect::<Vec<String>>()));
        }

        for (kind, tags) in updates {
            debug!(kind = %kind, tags = ?tags, "replacing namespace tags");
            self.aliases.insert(kind, tags);
        }
        self.rebuild();
        Ok(())
    }

    /// Like [`merge`](Self::merge), with kinds named by registry identifier
    /// (`"int"`, `"float"`, `"dict"`, ...).
    pub fn merge_ids<I, K, S>(&mut self, defs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Vec<S>)>,
        K: AsRef<str>,
        S: Into<String>,
    {
        let defs = defs
            .into_iter()
            .map(|(id, tags)| Ok((id.as_ref().parse::<TypeKind>()?, tags)))
            .collect::<Result<Vec<_>>>()?;
        self.merge(defs)
    }

    fn rebuild(&mut self) {
        self.tags.clear();
        for kind in TypeKind::ALL {
            for tag in self.lookup(kind).to_vec() {
                self.tags.entry(tag).or_insert(kind);
            }
        }
    }
}

/// Read access to the process-wide namespace.
///
/// Do not hold the guard across a call to [`merge_global`] or
/// [`reset_global`] on the same thread.
pub fn global() -> RwLockReadGuard<'static, Namespace> {
    GLOBAL.read()
}

/// Merge tag lists into the process-wide namespace.
pub fn merge_global<I, S>(defs: I) -> Result<()>
where
    I: IntoIterator<Item = (TypeKind, Vec<S>)>,
    S: Into<String>,
{
    GLOBAL.write().merge(defs)
}

/// Restore the process-wide namespace to the standard plist tags.
pub fn reset_global() {
    debug!("resetting global namespace");
    *GLOBAL.write() = Namespace::new();
}
