use std::collections::VecDeque;

use crate::tree::NodeView;

/// Ancestor and descendant walks over [`NodeView`]s.
pub trait NodeNavigationExt<'t> {
    /// Whether this is the `(0, 0)` node of its tree
    fn is_root(&self) -> bool;

    /// Ancestor `generations` levels up. `0` yields the node itself; `None`
    /// when the chain ends first.
    fn parent_at(&self, generations: usize) -> Option<NodeView<'t>>;

    /// Ultimate ancestor, `None` when the node has no parent (the root).
    fn top_parent(&self) -> Option<NodeView<'t>>;

    /// Ancestors from the immediate parent up to the root, `None` when the
    /// node has no parent.
    fn all_parents(&self) -> Option<Vec<NodeView<'t>>>;

    /// Every descendant, level by level in position order. `None` for files.
    fn all_children(&self) -> Option<Vec<NodeView<'t>>>;
}

impl<'t> NodeNavigationExt<'t> for NodeView<'t> {
    fn is_root(&self) -> bool {
        self.tree().root().is_some_and(|root| root == *self)
    }

    fn parent_at(&self, generations: usize) -> Option<NodeView<'t>> {
        let mut current = *self;
        for _ in 0..generations {
            current = current.parent()?;
        }
        Some(current)
    }

    fn top_parent(&self) -> Option<NodeView<'t>> {
        let mut current = self.parent()?;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        Some(current)
    }

    fn all_parents(&self) -> Option<Vec<NodeView<'t>>> {
        let mut current = self.parent()?;
        let mut parents = vec![current];
        while let Some(parent) = current.parent() {
            parents.push(parent);
            current = parent;
        }
        Some(parents)
    }

    fn all_children(&self) -> Option<Vec<NodeView<'t>>> {
        if !self.entry().is_directory() {
            return None;
        }

        let mut descendants = Vec::new();
        let mut pending = VecDeque::from([*self]);
        while let Some(node) = pending.pop_front() {
            for child in node.children() {
                descendants.push(child);
                pending.push_back(child);
            }
        }
        Some(descendants)
    }
}
