use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;
use hashlink::LinkedHashMap;
use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::filesystem::EntryRef;
use crate::tree::node::Node;
use crate::tree::{CancellationError, CancellationFlag, DetachedNode, NodeKey, NodeView};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`FileTree`], used to tell whether a view or
/// key belongs to a given tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("tree#{_0}")]
pub struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Slot sequence of one level. A slot is only empty while a removal is in
/// progress.
pub(crate) type Slots = Vec<Option<Node>>;

/// In-memory snapshot of a directory subtree, indexed by level.
///
/// Every entry reachable from the base directory is stored in the bucket of
/// its level (depth below the base) at a position that is contiguous within
/// that level. Nodes are handed out as [`NodeView`]s.
#[derive(Debug)]
pub struct FileTree {
    id: TreeId,
    base: EntryRef,
    pub(crate) levels: LinkedHashMap<usize, Slots>,
}

impl FileTree {
    pub(crate) fn with_root(base: EntryRef) -> Self {
        let mut levels = LinkedHashMap::new();
        levels.insert(0, vec![Some(Node::root(base.clone()))]);
        Self {
            id: TreeId::next(),
            base,
            levels,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    /// The directory the tree was built from
    pub fn base(&self) -> &EntryRef {
        &self.base
    }

    /// Node at `(0, 0)`; `None` once the root itself was removed
    pub fn root(&self) -> Option<NodeView<'_>> {
        self.node_at(0, 0)
    }

    /// Number of levels, the root level included
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.levels
            .values()
            .map(|slots| slots.iter().flatten().count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_at(&self, level: usize, position: usize) -> Option<NodeView<'_>> {
        self.slot(level, position)
            .map(|node| NodeView::new(self, node))
    }

    pub fn nodes_at_level(&self, level: usize) -> Option<Vec<NodeView<'_>>> {
        let slots = self.levels.get(&level)?;
        Some(
            slots
                .iter()
                .flatten()
                .map(|node| NodeView::new(self, node))
                .collect(),
        )
    }

    /// Every node, level by level in position order
    pub fn all(&self) -> Vec<NodeView<'_>> {
        self.levels
            .values()
            .flat_map(|slots| slots.iter().flatten())
            .map(|node| NodeView::new(self, node))
            .collect()
    }

    /// Immediate children of `view`, in enumeration order.
    ///
    /// Fails when `view` was produced by another tree.
    pub fn children_of<'v>(&self, view: &NodeView<'v>) -> Result<Vec<NodeView<'v>>, TreeError> {
        ensure!(
            view.tree().id() == self.id,
            ForeignNodeSnafu {
                path: view.path().to_path_buf(),
            }
        );

        Ok(view.children())
    }

    /// Removes the requested nodes and, for directories, their whole subtree.
    ///
    /// Keys taken from another tree fail the whole call before anything is
    /// removed. Keys that no longer resolve to their entry are skipped. The
    /// returned nodes are every node actually detached, each requested node
    /// followed by its descendants.
    pub fn remove_nodes(
        &mut self,
        requested: impl IntoIterator<Item = NodeKey>,
        cancel: &CancellationFlag,
    ) -> Result<Vec<DetachedNode>, TreeError> {
        let requested = requested.into_iter().collect::<Vec<_>>();
        if let Some(foreign) = requested.iter().find(|key| key.tree() != self.id) {
            return ForeignNodeSnafu {
                path: foreign.path().to_path_buf(),
            }
            .fail();
        }

        let mut removed = Vec::new();
        for key in &requested {
            cancel.check().context(CancelledSnafu)?;

            let Some(node) = self.slot(key.level(), key.position()) else {
                debug!(
                    "Skipping {}: no node at ({}, {})",
                    key.path().best_effort_path_display(),
                    key.level(),
                    key.position()
                );
                continue;
            };
            if node.entry != *key.entry() {
                debug!(
                    "Skipping {}: ({}, {}) now holds {}",
                    key.path().best_effort_path_display(),
                    key.level(),
                    key.position(),
                    node.entry.path().best_effort_path_display()
                );
                continue;
            }

            let targets = if node.entry.is_directory() {
                self.subtree(key.level(), key.position(), cancel)
                    .context(CancelledSnafu)?
            } else {
                vec![(key.level(), key.position())]
            };
            removed.extend(
                targets
                    .into_iter()
                    .filter_map(|(level, position)| self.detach(level, position)),
            );
        }

        self.compact(cancel).context(CancelledSnafu)?;
        info!(
            "Removed {} nodes, {} remaining in {} levels",
            removed.len(),
            self.len(),
            self.level_count()
        );
        Ok(removed)
    }

    pub(crate) fn child_views<'t>(&'t self, node: &Node) -> Vec<NodeView<'t>> {
        node.children
            .iter()
            .filter_map(|&child| self.node_at(node.level + 1, child))
            .collect()
    }

    fn slot(&self, level: usize, position: usize) -> Option<&Node> {
        self.levels.get(&level)?.get(position)?.as_ref()
    }

    fn slot_mut(&mut self, level: usize, position: usize) -> Option<&mut Node> {
        self.levels.get_mut(&level)?.get_mut(position)?.as_mut()
    }

    /// Coordinates of a node and all of its descendants, the node first
    fn subtree(
        &self,
        level: usize,
        position: usize,
        cancel: &CancellationFlag,
    ) -> Result<Vec<(usize, usize)>, CancellationError> {
        let mut collected = vec![(level, position)];
        let mut pending = vec![(level, position)];

        while let Some((level, position)) = pending.pop() {
            cancel.check()?;
            let Some(node) = self.slot(level, position) else {
                continue;
            };
            for &child in &node.children {
                collected.push((level + 1, child));
                if self
                    .slot(level + 1, child)
                    .is_some_and(|child| child.entry.is_directory())
                {
                    pending.push((level + 1, child));
                }
            }
        }

        Ok(collected)
    }

    /// Empties the slot and unlinks the node from its parent
    fn detach(&mut self, level: usize, position: usize) -> Option<DetachedNode> {
        let node = self.levels.get_mut(&level)?.get_mut(position)?.take()?;

        if let (Some(parent_level), Some(parent_position)) = (level.checked_sub(1), node.parent) {
            if let Some(parent) = self.slot_mut(parent_level, parent_position) {
                parent.children.retain(|&child| child != position);
            }
        }

        Some(node.detach())
    }

    /// Drops empty slots, renumbers positions, rewrites parent and child links
    /// to the new positions and drops empty levels.
    pub(crate) fn compact(&mut self, cancel: &CancellationFlag) -> Result<(), CancellationError> {
        let mut renumbered: HashMap<usize, Vec<Option<usize>>> = HashMap::new();
        for (&level, slots) in self.levels.iter_mut() {
            cancel.check()?;
            let mut next_position = 0;
            let mapping = slots
                .iter()
                .map(|slot| {
                    slot.as_ref().map(|_| {
                        next_position += 1;
                        next_position - 1
                    })
                })
                .collect();
            slots.retain(Option::is_some);
            renumbered.insert(level, mapping);
        }

        let new_position = |level: usize, position: usize| {
            renumbered
                .get(&level)
                .and_then(|mapping| mapping.get(position).copied().flatten())
        };
        for (&level, slots) in self.levels.iter_mut() {
            cancel.check()?;
            for (position, node) in slots.iter_mut().flatten().enumerate() {
                node.position = position;
                node.parent = level
                    .checked_sub(1)
                    .zip(node.parent)
                    .and_then(|(parent_level, parent)| new_position(parent_level, parent));
                node.children = node
                    .children
                    .iter()
                    .filter_map(|&child| new_position(level + 1, child))
                    .collect();
            }
        }

        let empty_levels = self
            .levels
            .iter()
            .filter(|(_, slots)| slots.is_empty())
            .map(|(&level, _)| level)
            .collect::<Vec<_>>();
        for level in empty_levels {
            debug!("Dropping empty level {}", level);
            self.levels.remove(&level);
        }

        Ok(())
    }
}

impl fmt::Display for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, slots) in self.levels.iter() {
            writeln!(f, "{level}")?;
            for slot in slots {
                match slot {
                    Some(node) => writeln!(f, "\t{}", NodeView::new(self, node))?,
                    None => writeln!(f, "\t<empty>")?,
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display(
        "{} does not belong to this tree",
        path.best_effort_path_display()
    ))]
    ForeignNode { path: PathBuf },
    #[snafu(display("Tree operation was cancelled"))]
    Cancelled { source: CancellationError },
}
