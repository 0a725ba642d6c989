use crate::filesystem::EntryRef;
use crate::tree::DetachedNode;

/// Tree-owned record behind every [`NodeView`](crate::tree::NodeView).
///
/// Links are positions, not references: `parent` is a position on
/// `level - 1` and `children` are positions on `level + 1`. Both are
/// rewritten whenever a level is compacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) entry: EntryRef,
    pub(crate) level: usize,
    pub(crate) position: usize,
    pub(crate) unauthorized_children: bool,
    pub(crate) children: Vec<usize>,
    pub(crate) parent: Option<usize>,
}

impl Node {
    pub(crate) fn root(entry: EntryRef) -> Self {
        Self {
            entry,
            level: 0,
            position: 0,
            unauthorized_children: false,
            children: Vec::new(),
            parent: None,
        }
    }

    pub(crate) fn child(entry: EntryRef, parent: &Node, position: usize) -> Self {
        Self {
            entry,
            level: parent.level + 1,
            position,
            unauthorized_children: false,
            children: Vec::new(),
            parent: Some(parent.position),
        }
    }

    /// Drops the tree linkage, keeping only the entry data
    pub(crate) fn detach(self) -> DetachedNode {
        DetachedNode::new(self.entry, self.unauthorized_children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_is_one_level_below_parent() {
        let parent = Node::root(EntryRef::directory("/root"));

        let child = Node::child(EntryRef::file("/root/a.txt"), &parent, 3);

        assert_eq!(child.level, 1);
        assert_eq!(child.position, 3);
        assert_eq!(child.parent, Some(0));
        assert!(child.children.is_empty());
    }

    #[test]
    fn detach_keeps_entry_and_flag() {
        let mut node = Node::root(EntryRef::directory("/locked"));
        node.unauthorized_children = true;

        let detached = node.detach();

        assert_eq!(detached.entry(), &EntryRef::directory("/locked"));
        assert!(detached.unauthorized_children());
    }
}
