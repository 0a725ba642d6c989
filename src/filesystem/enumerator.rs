use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use snafu::Snafu;
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::filesystem::{EntryKind, EntryRef};

/// Immediate children of a directory, sub-directories and files listed separately
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub directories: Vec<EntryRef>,
    pub files: Vec<EntryRef>,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// Sub-directories first, then files
    pub fn into_entries(self) -> impl Iterator<Item = EntryRef> {
        self.directories.into_iter().chain(self.files)
    }
}

/// Lists the immediate children of a directory.
///
/// Implementations must return [`EnumerationError::AccessDenied`] when the
/// directory exists but may not be read, so that tree construction can record
/// the denial on the node instead of failing.
pub trait DirectoryEnumerator {
    fn enumerate(&self, directory: &EntryRef) -> Result<Listing, EnumerationError>;
}

/// [`DirectoryEnumerator`] backed by [`std::fs::read_dir`].
///
/// Entries of each list are sorted by file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnumerator;

impl DirectoryEnumerator for StdEnumerator {
    fn enumerate(&self, directory: &EntryRef) -> Result<Listing, EnumerationError> {
        let path = directory.path();
        let read_dir = fs::read_dir(path).map_err(|source| classify(path.to_path_buf(), source))?;

        let mut listing = Listing::default();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|source| classify(path.to_path_buf(), source))?;
            let file_type = dir_entry
                .file_type()
                .map_err(|source| classify(dir_entry.path(), source))?;

            match EntryKind::from_file_type(file_type) {
                Some(EntryKind::Directory) => listing
                    .directories
                    .push(EntryRef::directory(dir_entry.path())),
                Some(EntryKind::File) => listing.files.push(EntryRef::file(dir_entry.path())),
                None => debug!(
                    "Skipping special file {}",
                    dir_entry.path().best_effort_path_display()
                ),
            }
        }

        listing.directories.sort_by(by_file_name);
        listing.files.sort_by(by_file_name);
        Ok(listing)
    }
}

/// Orders on the raw file name, so non UTF-8 names sort deterministically
fn by_file_name(a: &EntryRef, b: &EntryRef) -> Ordering {
    a.path().file_name().cmp(&b.path().file_name())
}

fn classify(path: PathBuf, source: std::io::Error) -> EnumerationError {
    match source.kind() {
        ErrorKind::PermissionDenied => EnumerationError::AccessDenied { path },
        _ => EnumerationError::ReadDirectory { path, source },
    }
}

#[derive(Debug, Snafu)]
pub enum EnumerationError {
    #[snafu(display("Access to {} was denied", path.best_effort_path_display()))]
    AccessDenied { path: PathBuf },
    #[snafu(display("Failed to read directory {}", path.best_effort_path_display()))]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn enumerate_lists_directories_then_files_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for dir in ["b_dir", "a_dir"] {
            fs::create_dir(temp_dir.path().join(dir)).expect("Failed to create directory");
        }
        for file in ["z.txt", "m.txt"] {
            fs::write(temp_dir.path().join(file), file).expect("Failed to write file");
        }

        let listing = StdEnumerator
            .enumerate(&EntryRef::directory(temp_dir.path()))
            .expect("Failed to enumerate");

        let names = listing
            .clone()
            .into_entries()
            .map(|entry| entry.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a_dir", "b_dir", "m.txt", "z.txt"]);
        assert_eq!(listing.len(), 4);
        assert!(listing.directories.iter().all(EntryRef::is_directory));
        assert!(listing.files.iter().all(EntryRef::is_file));
    }

    #[test]
    fn enumerate_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let listing = StdEnumerator
            .enumerate(&EntryRef::directory(temp_dir.path()))
            .expect("Failed to enumerate");

        assert!(listing.is_empty());
    }

    #[test]
    fn enumerate_missing_directory_is_fatal() {
        let result = StdEnumerator.enumerate(&EntryRef::directory("/this/path/does/not/exist"));
        assert!(matches!(
            result,
            Err(EnumerationError::ReadDirectory { .. })
        ));
    }

    #[test]
    fn permission_denied_is_classified_as_access_denied() {
        let error = classify(
            PathBuf::from("/locked"),
            std::io::Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(error, EnumerationError::AccessDenied { .. }));
        assert!(error.to_string().contains("/locked"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_listed_as_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("target");
        fs::create_dir(&target).expect("Failed to create directory");
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link"))
            .expect("Failed to create symlink");

        let listing = StdEnumerator
            .enumerate(&EntryRef::directory(temp_dir.path()))
            .expect("Failed to enumerate");

        assert_eq!(listing.directories.len(), 1);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].name(), "link");
    }

    #[cfg(unix)]
    #[test]
    fn special_files_are_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("plain.txt"), "content").expect("Failed to write file");
        let _listener = std::os::unix::net::UnixListener::bind(temp_dir.path().join("socket"))
            .expect("Failed to bind socket");

        let listing = StdEnumerator
            .enumerate(&EntryRef::directory(temp_dir.path()))
            .expect("Failed to enumerate");

        assert!(listing.directories.is_empty());
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].name(), "plain.txt");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_sorted_by_raw_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let names: [&[u8]; 3] = [b"\xffc", b"\xffa", b"\xffb"];
        for name in names {
            fs::write(temp_dir.path().join(OsStr::from_bytes(name)), "content")
                .expect("Failed to write file");
        }

        let listing = StdEnumerator
            .enumerate(&EntryRef::directory(temp_dir.path()))
            .expect("Failed to enumerate");

        let listed = listing
            .files
            .iter()
            .map(|entry| entry.path().file_name().map(OsStr::as_bytes))
            .collect::<Vec<_>>();
        assert_eq!(
            listed,
            vec![
                Some(&b"\xffa"[..]),
                Some(&b"\xffb"[..]),
                Some(&b"\xffc"[..])
            ]
        );
    }
}
