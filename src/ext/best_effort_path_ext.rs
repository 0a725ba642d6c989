use std::path::{Component, Path, PathBuf};

/// Renders `path` for log and error messages.
///
/// Existing paths are canonicalized. Paths that cannot be canonicalized (they
/// were removed, or access is denied) are made absolute against the current
/// directory and lexically normalized instead.
pub fn best_effort_path_display(path: &Path) -> String {
    match path.canonicalize() {
        Ok(canonical_path) => canonical_path.display().to_string(),
        Err(_) => {
            let absolute_path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|current_dir| current_dir.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            };
            normalize_path(&absolute_path).display().to_string()
        }
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> BestEffortPathExt for P {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("/missing/./dir/../file.txt", "/missing/file.txt")]
    #[case("/missing/a/b/../../c", "/missing/c")]
    #[case("/../missing", "/missing")]
    fn missing_paths_are_normalized(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(input.best_effort_path_display(), expected);
    }

    #[test]
    fn existing_paths_are_canonicalized() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let canonical = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize");

        let display = temp_dir.path().join(".").best_effort_path_display();

        assert_eq!(display, canonical.display().to_string());
    }
}
