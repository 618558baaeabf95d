//! Finding the GraphQL files of a project on disk.

use std::path::{Path, PathBuf};

use graphql_config::{matches_any, ProjectConfig};
use walkdir::{DirEntry, WalkDir};

/// Paths never indexed, relative to the config directory.
pub const DEFAULT_IGNORES: &[&str] = &[
    "generated/relay",
    "**/__flow__/**",
    "**/__generated__/**",
    "**/__github__/**",
    "**/__mocks__/**",
    "**/node_modules/**",
    "**/__flowtests__/**",
];

/// File extensions holding GraphQL source.
pub const GRAPHQL_EXTENSIONS: &[&str] = &["graphql", "graphqls", "gql"];

#[must_use]
pub fn is_graphql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| GRAPHQL_EXTENSIONS.contains(&ext))
}

/// Whether `path` sits under one of the [`DEFAULT_IGNORES`].
#[must_use]
pub fn is_ignored(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let relative = relative.to_string_lossy().replace('\\', "/");
    DEFAULT_IGNORES
        .iter()
        .any(|ignore| relative.starts_with(&format!("{ignore}/")) || relative == *ignore)
        || matches_any(DEFAULT_IGNORES.iter().copied(), &relative)
}

/// Should a file at `path` be indexed for `project`?
#[must_use]
pub fn is_project_file(path: &Path, root: &Path, project: &ProjectConfig) -> bool {
    is_graphql_file(path) && !is_ignored(path, root) && project.matches(path, root)
}

/// Walk `root` and collect the files any of `projects` claims, sorted.
///
/// Ignored directories are pruned rather than walked.
pub fn discover_files<'a>(
    root: &Path,
    projects: impl IntoIterator<Item = &'a ProjectConfig> + Clone,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, root));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::trace!(%error, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if projects
            .clone()
            .into_iter()
            .any(|project| is_project_file(path, root, project))
        {
            tracing::trace!(path = %path.display(), "found project file");
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files
}

fn is_pruned(entry: &DirEntry, root: &Path) -> bool {
    entry.file_type().is_dir() && entry.depth() > 0 && is_ignored(entry.path(), root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_test_utils::TempProject;

    #[test]
    fn test_extensions() {
        assert!(is_graphql_file(Path::new("a/b.graphql")));
        assert!(is_graphql_file(Path::new("schema.graphqls")));
        assert!(is_graphql_file(Path::new("q.gql")));
        assert!(!is_graphql_file(Path::new("q.ts")));
        assert!(!is_graphql_file(Path::new("graphql")));
    }

    #[test]
    fn test_default_ignores() {
        let root = Path::new("/project");
        assert!(is_ignored(Path::new("/project/node_modules/x/a.graphql"), root));
        assert!(is_ignored(Path::new("/project/src/__generated__/a.graphql"), root));
        assert!(is_ignored(Path::new("/project/generated/relay/a.graphql"), root));
        assert!(!is_ignored(Path::new("/project/src/a.graphql"), root));
    }

    #[test]
    fn test_discover_files() {
        let project = TempProject::new();
        project.write("schema.graphql", "type Query { a: Int }");
        project.write("src/query.graphql", "{ a }");
        project.write("src/fragments.gql", "fragment F on Query { a }");
        project.write("src/notes.txt", "not graphql");
        project.write("src/__generated__/gen.graphql", "{ a }");
        project.write("node_modules/pkg/dep.graphql", "{ a }");

        let config = ProjectConfig::new("schema.graphql").with_documents(&["src/**/*.{graphql,gql}"]);
        let files = discover_files(project.path(), [&config]);
        let relative: Vec<_> = files
            .iter()
            .map(|path| {
                path.strip_prefix(project.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(
            relative,
            vec!["schema.graphql", "src/fragments.gql", "src/query.graphql"]
        );
    }
}
