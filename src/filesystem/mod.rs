//! Filesystem entries and directory enumeration.
//!
//! This module is the only part of the crate that touches the disk: it turns
//! paths into typed [`EntryRef`]s and lists the immediate children of a
//! directory through the [`DirectoryEnumerator`] trait.

mod entry;
mod enumerator;

pub use entry::{EntryError, EntryKind, EntryRef};
pub use enumerator::{DirectoryEnumerator, EnumerationError, Listing, StdEnumerator};
