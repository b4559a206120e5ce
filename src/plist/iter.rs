//! Depth-first traversal of a plist tree.

use super::{PlistNode, TypeKind};

/// Pre-order iterator over a node and its descendants.
///
/// Created by [`PlistNode::iter_depth_first`]. A node is yielded before its
/// children, children in document order.
#[derive(Debug, Clone)]
pub struct DepthFirst<'a> {
    stack: Vec<&'a PlistNode>,
    filter: Option<TypeKind>,
}

impl<'a> DepthFirst<'a> {
    pub(crate) fn new(root: &'a PlistNode, filter: Option<TypeKind>) -> Self {
        Self {
            stack: vec![root],
            filter,
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a PlistNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            let children = node.children().unwrap_or_default();
            self.stack.extend(children.iter().rev());
            if self.filter.is_none_or(|kind| node.kind() == kind) {
                return Some(node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlistNode {
        let mut inner = PlistNode::array();
        inner
            .extend([PlistNode::integer(5), PlistNode::string("test")])
            .unwrap();
        let mut root = PlistNode::dict();
        root.set("2", inner).unwrap();
        root.set("3", PlistNode::integer(9)).unwrap();
        root
    }

    #[test]
    fn test_pre_order() {
        let root = sample();
        let kinds: Vec<TypeKind> = root.iter_depth_first(None).map(PlistNode::kind).collect();
        assert_eq!(
            kinds,
            [
                TypeKind::Dict,
                TypeKind::Key,
                TypeKind::Array,
                TypeKind::Integer,
                TypeKind::String,
                TypeKind::Key,
                TypeKind::Integer,
            ]
        );
    }

    #[test]
    fn test_filter_and_restart() {
        let root = sample();
        let texts: Vec<_> = root
            .iter_depth_first(Some(TypeKind::Integer))
            .filter_map(PlistNode::text)
            .collect();
        assert_eq!(texts, ["5", "9"]);
        // a second walk sees the same nodes
        assert_eq!(root.iter_depth_first(Some(TypeKind::Integer)).count(), 2);
        assert_eq!(root.iter_depth_first(Some(TypeKind::Date)).count(), 0);
    }

    #[test]
    fn test_leaf_yields_itself() {
        let leaf = PlistNode::string("x");
        assert_eq!(leaf.iter_depth_first(None).count(), 1);
    }
}
