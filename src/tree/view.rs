use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::filesystem::{EntryKind, EntryRef};
use crate::tree::node::Node;
use crate::tree::{FileTree, TreeId};

/// Read-only view of a node of a [`FileTree`].
///
/// Views borrow the tree they were produced from, so they always describe the
/// current state of that tree. Use [`NodeView::key`] to keep a handle across a
/// mutation such as [`FileTree::remove_nodes`].
///
/// Two views are equal when they refer to the same entry, regardless of the
/// tree they come from.
#[derive(Clone, Copy)]
pub struct NodeView<'t> {
    tree: &'t FileTree,
    node: &'t Node,
}

impl<'t> NodeView<'t> {
    pub(crate) fn new(tree: &'t FileTree, node: &'t Node) -> Self {
        Self { tree, node }
    }

    pub fn entry(&self) -> &'t EntryRef {
        &self.node.entry
    }

    pub fn name(&self) -> &'t str {
        self.node.entry.name()
    }

    pub fn path(&self) -> &'t Path {
        self.node.entry.path()
    }

    pub fn kind(&self) -> EntryKind {
        self.node.entry.kind()
    }

    pub fn level(&self) -> usize {
        self.node.level
    }

    pub fn position(&self) -> usize {
        self.node.position
    }

    /// Whether listing this directory's children was denied
    pub fn unauthorized_children(&self) -> bool {
        self.node.unauthorized_children
    }

    pub fn tree(&self) -> &'t FileTree {
        self.tree
    }

    /// Looks the parent up in the owning tree; `None` for the root.
    pub fn parent(&self) -> Option<NodeView<'t>> {
        let parent_position = self.node.parent?;
        self.tree
            .node_at(self.node.level.checked_sub(1)?, parent_position)
    }

    /// Immediate children in enumeration order, empty for files.
    pub fn children(&self) -> Vec<NodeView<'t>> {
        self.tree.child_views(self.node)
    }

    pub fn key(&self) -> NodeKey {
        NodeKey {
            tree: self.tree.id(),
            level: self.node.level,
            position: self.node.position,
            entry: self.node.entry.clone(),
        }
    }
}

impl PartialEq for NodeView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node.entry == other.node.entry
    }
}

impl Eq for NodeView<'_> {}

impl fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("tree", &self.tree.id())
            .field("entry", &self.node.entry)
            .field("level", &self.node.level)
            .field("position", &self.node.position)
            .field("unauthorized_children", &self.node.unauthorized_children)
            .finish()
    }
}

impl fmt::Display for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Type: {}, Level: {}, Position: {}, Path: {}, UnauthorizedChildren: {}",
            self.name(),
            self.kind(),
            self.level(),
            self.position(),
            self.path().display(),
            self.unauthorized_children()
        )
    }
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRecord {
            name: self.name(),
            path: self.path(),
            kind: self.kind(),
            level: Some(self.level()),
            position: Some(self.position()),
            unauthorized_children: self.unauthorized_children(),
        }
        .serialize(serializer)
    }
}

/// Serialized form of a node. Tree and parent links are never part of it.
#[derive(Serialize)]
struct NodeRecord<'a> {
    name: &'a str,
    path: &'a Path,
    kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
    unauthorized_children: bool,
}

/// Owned handle to a node, tagged with the tree it was taken from.
///
/// A key records the coordinate and entry of the node at the time it was
/// taken. Consumers re-validate it against the tree, so a key whose node was
/// removed, or whose coordinate now holds another entry, is recognized as
/// stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    tree: TreeId,
    level: usize,
    position: usize,
    entry: EntryRef,
}

impl NodeKey {
    pub fn tree(&self) -> TreeId {
        self.tree
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn entry(&self) -> &EntryRef {
        &self.entry
    }

    pub fn path(&self) -> &Path {
        self.entry.path()
    }
}

impl<'t> From<NodeView<'t>> for NodeKey {
    fn from(view: NodeView<'t>) -> Self {
        view.key()
    }
}

impl<'t> From<&NodeView<'t>> for NodeKey {
    fn from(view: &NodeView<'t>) -> Self {
        view.key()
    }
}

/// A node that was removed from its tree.
///
/// It keeps the entry data but has no level, position, parent or tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedNode {
    entry: EntryRef,
    unauthorized_children: bool,
}

impl DetachedNode {
    pub(crate) fn new(entry: EntryRef, unauthorized_children: bool) -> Self {
        Self {
            entry,
            unauthorized_children,
        }
    }

    pub fn entry(&self) -> &EntryRef {
        &self.entry
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }

    pub fn path(&self) -> &Path {
        self.entry.path()
    }

    pub fn kind(&self) -> EntryKind {
        self.entry.kind()
    }

    pub fn unauthorized_children(&self) -> bool {
        self.unauthorized_children
    }
}

impl fmt::Display for DetachedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Type: {}, Path: {}, UnauthorizedChildren: {}",
            self.name(),
            self.kind(),
            self.path().display(),
            self.unauthorized_children
        )
    }
}

impl Serialize for DetachedNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRecord {
            name: self.name(),
            path: self.path(),
            kind: self.kind(),
            level: None,
            position: None,
            unauthorized_children: self.unauthorized_children,
        }
        .serialize(serializer)
    }
}
