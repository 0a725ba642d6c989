//! Level-indexed tree of a directory subtree.
//!
//! A [`FileTree`] is built once from a base directory and stores every entry
//! below it in per-level buckets. Nodes are addressed by `(level, position)`
//! and exposed as borrowed [`NodeView`]s; [`NodeNavigationExt`] walks their
//! ancestors and descendants. Removal takes owned [`NodeKey`]s and hands the
//! removed nodes back as [`DetachedNode`]s.

mod build;
mod cancellation;
mod navigation;
mod node;
#[cfg(test)]
mod test_support;
mod tree;
mod view;

pub use build::TreeBuildError;
pub use cancellation::{CancellationError, CancellationFlag};
pub use navigation::NodeNavigationExt;
pub use tree::{FileTree, TreeError, TreeId};
pub use view::{DetachedNode, NodeKey, NodeView};
