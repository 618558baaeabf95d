use std::path::PathBuf;
use std::sync::Arc;

use apollo_compiler::schema::ExtendedType;
use graphql_cache::{CacheError, GraphQLCache};
use graphql_test_utils::TempProject;
use graphql_types::Position;
use notify::event::{CreateKind, DataChange, EventKind, Flag, ModifyKind, RemoveKind};
use notify::Event;

const SCHEMA: &str = "type Query { me: User } type User { id: ID! name: String }";

fn project() -> TempProject {
    let project = TempProject::new();
    project.write_config("schema: schema.graphql\ndocuments: \"src/**/*.graphql\"\n");
    project.write("schema.graphql", SCHEMA);
    project.write(
        "src/fragments.graphql",
        "fragment UserFields on User { id ...NameFields }\nfragment NameFields on User { name }",
    );
    project.write("src/query.graphql", "query Me { me { ...UserFields } }");
    project
}

async fn populated(project: &TempProject) -> GraphQLCache {
    let cache = GraphQLCache::discover(project.path()).unwrap();
    cache.populate().await.unwrap();
    cache
}

fn modified(path: PathBuf) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(path)
}

fn sorted_fragments(cache: &GraphQLCache) -> Vec<String> {
    let mut names: Vec<_> = cache
        .fragment_definitions("default")
        .unwrap()
        .into_keys()
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_populate_indexes_project_files() {
    let project = project();
    project.write("node_modules/lib/vendor.graphql", "fragment Vendor on User { id }");
    project.write("src/broken.graphql", "fragment Broken on User {");

    let cache = populated(&project).await;
    assert_eq!(sorted_fragments(&cache), vec!["NameFields", "UserFields"]);
    assert!(cache.file(&project.join("src/broken.graphql")).is_some());
    assert!(cache.file(&project.join("node_modules/lib/vendor.graphql")).is_none());
    assert_eq!(
        cache.project_for(&project.join("src/query.graphql")),
        Some("default")
    );
    assert_eq!(cache.documents("default").unwrap().len(), 3);
}

#[tokio::test]
async fn test_fragment_dependencies_are_transitive() {
    let project = project();
    let cache = populated(&project).await;

    let mut names: Vec<_> = cache
        .fragment_dependencies("{ me { ...UserFields } }", "default")
        .unwrap()
        .iter()
        .map(|fragment| fragment.name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["NameFields", "UserFields"]);

    assert!(cache
        .fragment_dependencies("{ me { ...UserFields ", "default")
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_fragment_cycle_across_files() {
    let project = project();
    project.write("src/a.graphql", "fragment A on User { id ...B }");
    project.write("src/b.graphql", "fragment B on User { name ...A }");
    let cache = populated(&project).await;

    let found = cache
        .fragment_dependencies("{ me { ...A } }", "default")
        .unwrap();
    let names: Vec<_> = found.iter().map(|fragment| fragment.name()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_unknown_project() {
    let project = project();
    let cache = populated(&project).await;
    assert!(matches!(
        cache.fragment_definitions("missing"),
        Err(CacheError::ProjectNotFound(name)) if name == "missing"
    ));
}

#[tokio::test]
async fn test_diagnostics_see_fragments_from_other_files() {
    let project = project();
    let cache = populated(&project).await;

    let clean = cache
        .diagnostics("default", "query Me { me { ...UserFields } }")
        .unwrap();
    assert!(clean.is_empty(), "{clean:?}");

    let unknown = cache
        .diagnostics("default", "query Me { me { ...Missing } }")
        .unwrap();
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].message.contains("Missing"));
}

#[tokio::test]
async fn test_diagnostics_without_schema_only_check_syntax() {
    let project = TempProject::new();
    project.write_config("schema: missing.graphql\ndocuments: \"src/**/*.graphql\"\n");
    let cache = populated(&project).await;

    assert!(cache
        .diagnostics("default", "{ anything }")
        .unwrap()
        .is_empty());
    assert_eq!(cache.diagnostics("default", "qeury").unwrap().len(), 1);
}

#[tokio::test]
async fn test_definition_resolves_through_index() {
    let project = project();
    let cache = populated(&project).await;

    let text = "query Me { me { ...UserFields } }";
    let result = cache
        .definition(
            "default",
            &project.join("src/query.graphql"),
            text,
            Position::new(0, 22),
        )
        .unwrap()
        .unwrap();
    assert_eq!(result.definitions.len(), 1);
    assert_eq!(result.definitions[0].name, "UserFields");
    assert_eq!(result.definitions[0].path, project.join("src/fragments.graphql"));
    assert_eq!(result.definitions[0].position, Position::new(0, 9));
}

#[tokio::test]
async fn test_field_definition_resolves_into_schema_file() {
    let project = project();
    let cache = populated(&project).await;

    let result = cache
        .definition(
            "default",
            &project.join("src/query.graphql"),
            "query Me { me { name } }",
            Position::new(0, 17),
        )
        .unwrap()
        .unwrap();
    assert_eq!(result.definitions.len(), 1);
    assert_eq!(result.definitions[0].name, "name");
    assert_eq!(result.definitions[0].path, project.join("schema.graphql"));
    assert_eq!(result.definitions[0].position, Position::new(0, 44));
}

#[tokio::test]
async fn test_schema_extensions_are_cached_by_hash() {
    let project = project();
    project.write("src/extensions.graphql", "extend type User { nickname: String }");
    let cache = populated(&project).await;

    let first = cache.schema("default", true).unwrap();
    let second = cache.schema("default", true).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(matches!(
        &first.types["User"],
        ExtendedType::Object(user) if user.fields.contains_key("nickname")
    ));

    let path = project.write(
        "src/extensions.graphql",
        "extend type User { nickname: String avatar: String }",
    );
    cache.handle_watch_event(&modified(path)).await.unwrap();
    let third = cache.schema("default", true).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert!(matches!(
        &third.types["User"],
        ExtendedType::Object(user) if user.fields.contains_key("avatar")
    ));
}

#[tokio::test]
async fn test_schema_file_change_invalidates_schema() {
    let project = project();
    let cache = populated(&project).await;
    let before = cache.schema("default", false).unwrap();

    let path = project.write(
        "schema.graphql",
        "type Query { me: User version: String } type User { id: ID! name: String }",
    );
    cache.handle_watch_event(&modified(path)).await.unwrap();

    let after = cache.schema("default", false).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.get_object("Query").is_some_and(|query| query.fields.contains_key("version")));
}

#[tokio::test]
async fn test_repeated_event_is_a_no_op() {
    let project = project();
    let cache = populated(&project).await;
    let path = project.join("src/fragments.graphql");

    let changed = cache.handle_watch_event(&modified(path.clone())).await.unwrap();
    assert!(changed.is_empty());
    let changed = cache.handle_watch_event(&modified(path)).await.unwrap();
    assert!(changed.is_empty());
    assert_eq!(sorted_fragments(&cache), vec!["NameFields", "UserFields"]);
}

#[tokio::test]
async fn test_changed_and_created_files_are_reindexed() {
    let project = project();
    let cache = populated(&project).await;

    let path = project.write("src/fragments.graphql", "fragment Renamed on User { id }");
    let changed = cache.handle_watch_event(&modified(path.clone())).await.unwrap();
    assert_eq!(changed, vec![path]);
    assert_eq!(sorted_fragments(&cache), vec!["Renamed"]);

    let created = project.write("src/more.graphql", "fragment More on User { name }");
    let event = Event::new(EventKind::Create(CreateKind::File)).add_path(created);
    cache.handle_watch_event(&event).await.unwrap();
    assert_eq!(sorted_fragments(&cache), vec!["More", "Renamed"]);
}

#[tokio::test]
async fn test_deleted_file_drops_its_fragments() {
    let project = project();
    let cache = populated(&project).await;

    project.remove("src/fragments.graphql");
    let path = project.join("src/fragments.graphql");
    let event = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
    let changed = cache.handle_watch_event(&event).await.unwrap();

    assert_eq!(changed, vec![path.clone()]);
    assert!(cache.file(&path).is_none());
    assert!(sorted_fragments(&cache).is_empty());
}

#[tokio::test]
async fn test_untracked_paths_are_ignored() {
    let project = project();
    let cache = populated(&project).await;

    let outside = project.write("notes/todo.graphql", "fragment Stray on User { id }");
    let vendored = project.write("src/__generated__/gen.graphql", "fragment Gen on User { id }");
    let event = modified(outside).add_path(vendored);
    assert!(cache.handle_watch_event(&event).await.unwrap().is_empty());
    assert_eq!(sorted_fragments(&cache), vec!["NameFields", "UserFields"]);
}

#[tokio::test]
async fn test_rescan_resyncs_everything() {
    let project = project();
    let cache = populated(&project).await;

    project.remove("src/query.graphql");
    let added = project.write("src/added.graphql", "fragment Added on User { id }");
    let rescan = Event::new(EventKind::Other).set_flag(Flag::Rescan);

    let mut changed = cache.handle_watch_event(&rescan).await.unwrap();
    changed.sort();
    assert_eq!(changed, vec![added, project.join("src/query.graphql")]);
    assert_eq!(
        sorted_fragments(&cache),
        vec!["Added", "NameFields", "UserFields"]
    );

    assert!(cache.handle_watch_event(&rescan).await.unwrap().is_empty());
}

/// `path` spelled relative to the current directory.
#[cfg(unix)]
fn relative_to_cwd(path: &std::path::Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap();
    let mut relative: PathBuf = cwd.components().skip(1).map(|_| "..").collect();
    relative.push(path.strip_prefix("/").unwrap());
    relative
}

#[cfg(unix)]
#[tokio::test]
async fn test_relative_root_sees_absolute_event_paths() {
    let project = project();
    let root = relative_to_cwd(project.path());
    assert!(root.is_relative());

    let cache = GraphQLCache::discover(&root).unwrap();
    cache.populate().await.unwrap();
    assert_eq!(cache.root_dir(), project.path());

    let path = project.write("src/fragments.graphql", "fragment Renamed on User { id }");
    let changed = cache.handle_watch_event(&modified(path.clone())).await.unwrap();
    assert_eq!(changed, vec![path]);
    assert_eq!(sorted_fragments(&cache), vec!["Renamed"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_root_and_event_paths() {
    let project = project();
    let links = TempProject::new();
    let link = links.join("linked");
    std::os::unix::fs::symlink(project.path(), &link).unwrap();

    let cache = GraphQLCache::discover(&link).unwrap();
    cache.populate().await.unwrap();
    assert_eq!(cache.root_dir(), project.path());
    assert_eq!(sorted_fragments(&cache), vec!["NameFields", "UserFields"]);

    project.remove("src/fragments.graphql");
    let event = Event::new(EventKind::Remove(RemoveKind::File))
        .add_path(link.join("src/fragments.graphql"));
    let changed = cache.handle_watch_event(&event).await.unwrap();

    assert_eq!(changed, vec![project.join("src/fragments.graphql")]);
    assert!(sorted_fragments(&cache).is_empty());
}
