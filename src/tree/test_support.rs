//! Fixtures shared by the tree tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rstest::fixture;
use tempfile::TempDir;

use crate::filesystem::{DirectoryEnumerator, EntryRef, EnumerationError, Listing};
use crate::tree::{CancellationFlag, FileTree};

pub(crate) const FIXTURE_ROOT_NAME: &str = "FileTreeFixture";

#[derive(Debug, Clone)]
enum MemoryListing {
    Listed(Listing),
    Denied,
    Broken,
}

/// In-memory directory layout. Directories without a registered listing are
/// empty.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryEnumerator {
    listings: HashMap<PathBuf, MemoryListing>,
}

impl MemoryEnumerator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_dir(mut self, path: &str, directories: &[&str], files: &[&str]) -> Self {
        let listing = Listing {
            directories: directories.iter().copied().map(EntryRef::directory).collect(),
            files: files.iter().copied().map(EntryRef::file).collect(),
        };
        self.listings
            .insert(PathBuf::from(path), MemoryListing::Listed(listing));
        self
    }

    pub(crate) fn with_denied(mut self, path: &str) -> Self {
        self.listings
            .insert(PathBuf::from(path), MemoryListing::Denied);
        self
    }

    pub(crate) fn with_broken(mut self, path: &str) -> Self {
        self.listings
            .insert(PathBuf::from(path), MemoryListing::Broken);
        self
    }
}

impl DirectoryEnumerator for MemoryEnumerator {
    fn enumerate(&self, directory: &EntryRef) -> Result<Listing, EnumerationError> {
        let path = directory.path().to_path_buf();
        match self.listings.get(&path) {
            Some(MemoryListing::Listed(listing)) => Ok(listing.clone()),
            Some(MemoryListing::Denied) => Err(EnumerationError::AccessDenied { path }),
            Some(MemoryListing::Broken) => Err(EnumerationError::ReadDirectory {
                path,
                source: std::io::Error::other("device went away"),
            }),
            None => Ok(Listing::default()),
        }
    }
}

pub(crate) fn build_memory_tree(root: &str, enumerator: &MemoryEnumerator) -> FileTree {
    FileTree::build(
        EntryRef::directory(root),
        enumerator,
        &CancellationFlag::default(),
    )
    .expect("Failed to build in-memory tree")
}

/// On-disk tree: three directories per level for three levels below the
/// root, and three files in every deepest directory.
///
/// Names follow `<parent name>.<index>`, files end in `.txt`, so the file
/// `FileTreeFixture.0.1.2.2.txt` lives in `FileTreeFixture/FileTreeFixture.0/
/// FileTreeFixture.0.1/FileTreeFixture.0.1.2`.
pub(crate) struct NestedFixture {
    // Keeps the directory alive for the duration of the test
    _temp_dir: TempDir,
    pub(crate) root: PathBuf,
}

#[fixture]
pub(crate) fn nested_fixture() -> NestedFixture {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path().join(FIXTURE_ROOT_NAME);
    populate(&root, 3);
    NestedFixture {
        _temp_dir: temp_dir,
        root,
    }
}

fn populate(directory: &Path, remaining_levels: usize) {
    fs::create_dir_all(directory).expect("Failed to create fixture directory");
    let name = directory
        .file_name()
        .expect("Fixture directories have names")
        .to_string_lossy()
        .into_owned();

    for index in 0..3 {
        if remaining_levels == 0 {
            let file = directory.join(format!("{name}.{index}.txt"));
            fs::write(&file, file.display().to_string()).expect("Failed to write fixture file");
        } else {
            populate(&directory.join(format!("{name}.{index}")), remaining_levels - 1);
        }
    }
}

#[fixture]
pub(crate) fn nested_tree(nested_fixture: NestedFixture) -> (NestedFixture, FileTree) {
    let tree = FileTree::from_path(&nested_fixture.root).expect("Failed to build fixture tree");
    (nested_fixture, tree)
}
