//! Parsed files and the per-project definition indexes built from them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use apollo_compiler::ast;
use dashmap::DashMap;
use graphql_ide::{FragmentInfo, ObjectTypeInfo};

use crate::reader::{FileStamp, ReadFile};

/// One indexed file.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub content: Arc<str>,
    pub stamp: FileStamp,
    /// Parsed definitions; empty when the file does not parse.
    pub document: Arc<ast::Document>,
}

impl FileEntry {
    #[must_use]
    pub fn parse(file: ReadFile) -> Self {
        let document = match ast::Document::parse(file.content.as_str(), &file.path) {
            Ok(document) => document,
            Err(with_errors) => {
                tracing::trace!(
                    path = %file.path.display(),
                    errors = with_errors.errors.len(),
                    "unparseable file indexed without definitions"
                );
                ast::Document::new()
            }
        };
        Self {
            path: file.path,
            content: Arc::from(file.content),
            stamp: file.stamp,
            document: Arc::new(document),
        }
    }

    #[must_use]
    pub fn fragments(&self) -> Vec<FragmentInfo> {
        self.document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                ast::Definition::FragmentDefinition(fragment) => Some(FragmentInfo {
                    file_path: self.path.clone(),
                    content: Arc::clone(&self.content),
                    definition: fragment.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Named type definitions (not extensions).
    #[must_use]
    pub fn object_types(&self) -> Vec<ObjectTypeInfo> {
        self.document
            .definitions
            .iter()
            .filter(|definition| {
                matches!(
                    definition,
                    ast::Definition::ObjectTypeDefinition(_)
                        | ast::Definition::InputObjectTypeDefinition(_)
                        | ast::Definition::EnumTypeDefinition(_)
                        | ast::Definition::InterfaceTypeDefinition(_)
                        | ast::Definition::UnionTypeDefinition(_)
                        | ast::Definition::ScalarTypeDefinition(_)
                )
            })
            .map(|definition| ObjectTypeInfo {
                file_path: self.path.clone(),
                content: Arc::clone(&self.content),
                definition: definition.clone(),
            })
            .collect()
    }

    /// Every definition that is not an operation or a fragment.
    #[must_use]
    pub fn type_system_definitions(&self) -> Vec<ast::Definition> {
        self.document
            .definitions
            .iter()
            .filter(|definition| {
                !matches!(
                    definition,
                    ast::Definition::OperationDefinition(_) | ast::Definition::FragmentDefinition(_)
                )
            })
            .cloned()
            .collect()
    }
}

/// Fragment and type definitions of one project, by name.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    fragments: DashMap<String, FragmentInfo>,
    object_types: DashMap<String, ObjectTypeInfo>,
}

impl ProjectIndex {
    /// Add the definitions of `entry`, replacing whatever the same file
    /// contributed before.
    pub fn insert(&self, entry: &FileEntry) {
        self.remove(&entry.path);
        for fragment in entry.fragments() {
            self.fragments.insert(fragment.name().to_string(), fragment);
        }
        for object_type in entry.object_types() {
            if let Some(name) = object_type.name() {
                self.object_types.insert(name.to_string(), object_type);
            }
        }
    }

    /// Drop every definition contributed by `path`.
    pub fn remove(&self, path: &Path) {
        self.fragments.retain(|_, info| info.file_path != path);
        self.object_types.retain(|_, info| info.file_path != path);
    }

    #[must_use]
    pub fn fragments(&self) -> HashMap<String, FragmentInfo> {
        self.fragments
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    #[must_use]
    pub fn object_types(&self) -> HashMap<String, ObjectTypeInfo> {
        self.object_types
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, content: &str) -> FileEntry {
        FileEntry::parse(ReadFile {
            path: PathBuf::from(path),
            content: content.to_string(),
            stamp: FileStamp {
                size: content.len() as u64,
                modified: None,
            },
        })
    }

    #[test]
    fn test_entry_definitions() {
        let file = entry(
            "mixed.graphql",
            "fragment A on User { id }\nquery Q { a }\ntype User { id: ID }\nextend type Query { me: User }",
        );
        let fragments: Vec<_> = file.fragments().iter().map(|f| f.name().to_string()).collect();
        assert_eq!(fragments, vec!["A"]);
        let types: Vec<_> = file
            .object_types()
            .iter()
            .filter_map(|t| t.name().map(ToString::to_string))
            .collect();
        assert_eq!(types, vec!["User"]);
        assert_eq!(file.type_system_definitions().len(), 2);
    }

    #[test]
    fn test_unparseable_file_has_no_definitions() {
        let file = entry("broken.graphql", "fragment A on User { id");
        assert!(file.document.definitions.is_empty());
        assert!(file.fragments().is_empty());
        assert_eq!(&*file.content, "fragment A on User { id");
    }

    #[test]
    fn test_reinsert_replaces_previous_definitions() {
        let index = ProjectIndex::default();
        index.insert(&entry("a.graphql", "fragment A on User { id } fragment B on User { id }"));
        index.insert(&entry("c.graphql", "fragment C on User { id }"));
        assert_eq!(index.fragment_count(), 3);

        index.insert(&entry("a.graphql", "fragment A on User { id }"));
        let mut names: Vec<_> = index.fragments().into_keys().collect();
        names.sort();
        assert_eq!(names, vec!["A", "C"]);

        index.remove(Path::new("c.graphql"));
        assert_eq!(index.fragments().len(), 1);
    }
}
