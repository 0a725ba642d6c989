use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, info, warn};

use crate::ext::BestEffortPathExt;
use crate::filesystem::{
    DirectoryEnumerator, EntryError, EntryRef, EnumerationError, StdEnumerator,
};
use crate::tree::node::Node;
use crate::tree::tree::Slots;
use crate::tree::{CancellationError, CancellationFlag, FileTree};

impl FileTree {
    /// Builds the tree of the directory at `path` from the local filesystem.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TreeBuildError> {
        Self::from_path_with_cancellation(path, &CancellationFlag::default())
    }

    pub fn from_path_with_cancellation(
        path: impl AsRef<Path>,
        cancel: &CancellationFlag,
    ) -> Result<Self, TreeBuildError> {
        let path = path.as_ref();
        let canonical = path.canonicalize().context(RootPathSnafu {
            path: path.to_path_buf(),
        })?;
        let root = EntryRef::from_path(&canonical).context(RootEntrySnafu)?;
        Self::build(root, &StdEnumerator, cancel)
    }

    /// Builds the tree below `root` breadth first, one level at a time.
    ///
    /// A directory whose listing is denied is kept as a childless node with
    /// its unauthorized flag set. Any failure to list the root itself, and any
    /// other listing failure, aborts construction.
    pub fn build(
        root: EntryRef,
        enumerator: &impl DirectoryEnumerator,
        cancel: &CancellationFlag,
    ) -> Result<Self, TreeBuildError> {
        ensure!(
            root.is_directory(),
            RootNotDirectorySnafu {
                path: root.path().to_path_buf(),
            }
        );
        debug!(
            "Building tree of {}",
            root.path().best_effort_path_display()
        );

        let mut tree = FileTree::with_root(root);
        let mut level = 0;
        loop {
            cancel.check().context(CancelledSnafu)?;
            let Some(next_level) = tree.expand_level(level, enumerator, cancel)? else {
                break;
            };
            debug!("Level {} holds {} nodes", level + 1, next_level.len());
            tree.levels.insert(level + 1, next_level);
            level += 1;
        }

        tree.compact(cancel).context(CancelledSnafu)?;
        info!(
            "Built tree of {} with {} nodes in {} levels",
            tree.base().path().best_effort_path_display(),
            tree.len(),
            tree.level_count()
        );
        Ok(tree)
    }

    /// Lists the children of every directory on `level`.
    ///
    /// Returns `None` when no deeper level exists.
    fn expand_level(
        &mut self,
        level: usize,
        enumerator: &impl DirectoryEnumerator,
        cancel: &CancellationFlag,
    ) -> Result<Option<Slots>, TreeBuildError> {
        let Some(slots) = self.levels.get_mut(&level) else {
            return Ok(None);
        };
        if slots.iter().flatten().all(|node| node.entry.is_file()) {
            debug!("Level {} holds only files", level);
            return Ok(None);
        }

        let mut next_level: Slots = Vec::new();
        for node in slots.iter_mut().flatten() {
            cancel.check().context(CancelledSnafu)?;
            if !node.entry.is_directory() {
                continue;
            }

            match enumerator.enumerate(&node.entry) {
                Ok(listing) => {
                    for entry in listing.into_entries() {
                        let position = next_level.len();
                        next_level.push(Some(Node::child(entry, node, position)));
                        node.children.push(position);
                    }
                }
                Err(source) if level == 0 => {
                    return Err(source).context(RootEnumerationSnafu);
                }
                Err(EnumerationError::AccessDenied { path }) => {
                    warn!(
                        "Access to {} was denied, its children are not listed",
                        path.best_effort_path_display()
                    );
                    node.unauthorized_children = true;
                }
                Err(source) => {
                    return Err(source).context(EnumerationSnafu);
                }
            }
        }

        Ok((!next_level.is_empty()).then_some(next_level))
    }
}

#[derive(Debug, Snafu)]
pub enum TreeBuildError {
    #[snafu(display("Failed to resolve tree root {}", path.best_effort_path_display()))]
    RootPath {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read tree root"))]
    RootEntry { source: EntryError },
    #[snafu(display(
        "Tree root {} is not a directory",
        path.best_effort_path_display()
    ))]
    RootNotDirectory { path: PathBuf },
    #[snafu(display("Failed to list the tree root"))]
    RootEnumeration { source: EnumerationError },
    #[snafu(display("Failed to list a directory of the tree"))]
    Enumeration { source: EnumerationError },
    #[snafu(display("Tree construction was cancelled"))]
    Cancelled { source: CancellationError },
}
