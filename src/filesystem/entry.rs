use std::fs::{self, FileType};
use std::path::{Path, PathBuf};

use derive_more::Display;
use serde::Serialize;
use snafu::{OptionExt, ResultExt, Snafu};

use crate::ext::BestEffortPathExt;

/// Kind tag of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum EntryKind {
    #[display("File")]
    File,
    #[display("Directory")]
    Directory,
}

impl EntryKind {
    /// Classifies a file type without following symlinks.
    ///
    /// Symlinks are reported as files so that a walk never leaves the subtree
    /// it started in. Sockets, fifos and devices have no kind.
    pub fn from_file_type(file_type: FileType) -> Option<Self> {
        if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() || file_type.is_symlink() {
            Some(EntryKind::File)
        } else {
            None
        }
    }
}

/// A single file or directory, identified by its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryRef {
    kind: EntryKind,
    path: PathBuf,
    name: String,
}

impl EntryRef {
    pub fn new(kind: EntryKind, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = entry_name(&path);
        Self { kind, path, name }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(EntryKind::File, path)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(EntryKind::Directory, path)
    }

    /// Reads the metadata of `path` and builds the matching entry reference.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EntryError> {
        let path = path.as_ref();
        let metadata = fs::symlink_metadata(path).context(MetadataSnafu {
            path: path.to_path_buf(),
        })?;
        let kind = EntryKind::from_file_type(metadata.file_type()).context(
            UnsupportedTypeSnafu {
                path: path.to_path_buf(),
            },
        )?;
        Ok(Self::new(kind, path))
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

fn entry_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        // `/` and `C:\` have no file name
        None => path.display().to_string(),
    }
}

#[derive(Debug, Snafu)]
pub enum EntryError {
    #[snafu(display("Failed to read metadata of {}", path.best_effort_path_display()))]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "{} is neither a file nor a directory",
        path.best_effort_path_display()
    ))]
    UnsupportedType { path: PathBuf },
}
