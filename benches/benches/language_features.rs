use std::collections::HashMap;
use std::hint::black_box;
use std::path::PathBuf;
use std::sync::Arc;

use apollo_compiler::{ast, Schema};
use criterion::{criterion_group, criterion_main, Criterion};
use graphql_ide::{
    autocomplete_suggestions, diagnostics, document_symbols, CompletionOptions,
    DiagnosticsOptions, FragmentInfo, Position,
};
use graphql_online_parser::{tokenize_line, State};

const SCHEMA: &str = r#"
type Query {
  user(id: ID!): User
  users(first: Int, after: String): [User!]!
  post(id: ID!): Post
}

type User {
  id: ID!
  name: String!
  email: String! @deprecated(reason: "Use contacts")
  posts(status: PostStatus): [Post!]!
}

type Post {
  id: ID!
  title: String!
  body: String!
  author: User!
  status: PostStatus!
}

enum PostStatus { DRAFT PUBLISHED ARCHIVED }
"#;

const OPERATION: &str = r"
query GetUser($id: ID!) {
  user(id: $id) {
    ...UserFields
    posts(status: PUBLISHED) {
      id
      title
      author { ...UserFields }
    }
  }
}
";

const FRAGMENTS: &str = r"
fragment UserFields on User {
  id
  name
  ...MoreUserFields
}

fragment MoreUserFields on User {
  email
  posts { ...PostFields }
}

fragment PostFields on Post {
  id
  title
  author { ...UserFields }
}
";

fn schema() -> apollo_compiler::validation::Valid<Schema> {
    Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap()
}

fn fragment_index() -> HashMap<String, FragmentInfo> {
    let content: Arc<str> = Arc::from(FRAGMENTS);
    ast::Document::parse(FRAGMENTS, "fragments.graphql")
        .unwrap()
        .definitions
        .into_iter()
        .filter_map(|definition| match definition {
            ast::Definition::FragmentDefinition(fragment) => Some((
                fragment.name.to_string(),
                FragmentInfo {
                    file_path: PathBuf::from("fragments.graphql"),
                    content: Arc::clone(&content),
                    definition: fragment,
                },
            )),
            _ => None,
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let document = OPERATION.repeat(50);
    c.bench_function("tokenize_document", |b| {
        b.iter(|| {
            let mut state = State::new();
            let mut tokens = 0;
            for line in black_box(&document).lines() {
                let (line_tokens, next) = tokenize_line(line, &state);
                tokens += line_tokens.len();
                state = next;
            }
            black_box(tokens)
        });
    });
}

fn bench_completion(c: &mut Criterion) {
    let schema = schema();
    let text = "query GetUser($id: ID!) {\n  user(id: $id) {\n    posts(status: ) {\n      ";
    let options = CompletionOptions::default();

    c.bench_function("complete_field", |b| {
        b.iter(|| {
            black_box(autocomplete_suggestions(
                &schema,
                black_box(text),
                Position::new(3, 6),
                &options,
            ))
        });
    });
    c.bench_function("complete_enum_argument", |b| {
        b.iter(|| {
            black_box(autocomplete_suggestions(
                &schema,
                black_box(text),
                Position::new(2, 18),
                &options,
            ))
        });
    });
}

fn bench_diagnostics(c: &mut Criterion) {
    let schema = schema();
    let index = fragment_index();
    let fragments: Vec<FragmentInfo> = index.into_values().collect();
    let options = DiagnosticsOptions {
        external_fragments: &fragments,
        ..DiagnosticsOptions::default()
    };

    c.bench_function("diagnostics_valid_document", |b| {
        b.iter(|| black_box(diagnostics(black_box(OPERATION), Some(&schema), &options)));
    });
    c.bench_function("diagnostics_syntax_error", |b| {
        b.iter(|| black_box(diagnostics(black_box("qeury { user"), Some(&schema), &options)));
    });
}

fn bench_fragment_dependencies(c: &mut Criterion) {
    let index = fragment_index();
    let document = ast::Document::parse(OPERATION, "operation.graphql").unwrap();

    c.bench_function("fragment_dependencies_cycle", |b| {
        b.iter(|| {
            black_box(graphql_cache::fragment_dependencies_for_ast(
                black_box(&document),
                &index,
            ))
        });
    });
}

fn bench_document_symbols(c: &mut Criterion) {
    let document = OPERATION.repeat(20);
    c.bench_function("document_symbols", |b| {
        b.iter(|| black_box(document_symbols(black_box(&document))));
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_completion,
    bench_diagnostics,
    bench_fragment_dependencies,
    bench_document_symbols
);
criterion_main!(benches);
