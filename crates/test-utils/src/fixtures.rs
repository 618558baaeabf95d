use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway project directory.
///
/// The directory is deleted when the value is dropped. Paths handed out
/// are canonical, so they compare equal to what the cache stores.
///
/// ```
/// use graphql_test_utils::TempProject;
///
/// let project = TempProject::new();
/// project.write_config("schema: schema.graphql\ndocuments: \"**/*.graphql\"\n");
/// let path = project.write("ops/user.graphql", "{ user { id } }");
/// assert!(path.starts_with(project.path()));
/// ```
#[derive(Debug)]
pub struct TempProject {
    // Held for its drop, which deletes the directory.
    _dir: TempDir,
    root: PathBuf,
}

impl TempProject {
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir()
            .unwrap_or_else(|err| panic!("failed to create temp project: {err}"));
        let root = fs::canonicalize(dir.path())
            .unwrap_or_else(|err| panic!("failed to resolve temp project: {err}"));
        Self { _dir: dir, root }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a project-relative file.
    #[must_use]
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write `contents` to `relative`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics on any I/O failure.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|err| panic!("failed to create {}: {err}", parent.display()));
        }
        fs::write(&path, contents)
            .unwrap_or_else(|err| panic!("failed to write {}: {err}", path.display()));
        path
    }

    /// Write `.graphqlrc.yml` at the project root.
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        self.write(".graphqlrc.yml", yaml)
    }

    /// # Panics
    ///
    /// Panics when the file cannot be removed.
    pub fn remove(&self, relative: &str) {
        let path = self.join(relative);
        fs::remove_file(&path)
            .unwrap_or_else(|err| panic!("failed to remove {}: {err}", path.display()));
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}
