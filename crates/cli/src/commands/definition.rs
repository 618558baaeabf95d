use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use graphql_ide::{DefinitionQueryResult, Position};
use serde_json::json;

use crate::context::Context;
use crate::output::display_path;
use crate::{ExitCode, OutputFormat};

pub fn run(
    ctx: &Context,
    file: &Path,
    line: u32,
    character: u32,
    format: OutputFormat,
) -> Result<ExitCode> {
    let (path, text) = Context::read(file)?;
    let result = ctx
        .cache
        .definition(&ctx.project, &path, &text, Position::new(line, character))?;

    match format {
        OutputFormat::Human => match &result {
            Some(result) => {
                for line in human_lines(ctx.cache.root_dir(), result) {
                    println!("{line}");
                }
            }
            None => println!("{}", "No definition found".dimmed()),
        },
        OutputFormat::Json => {
            let value = result.map_or(serde_json::Value::Null, |result| {
                json_result(ctx.cache.root_dir(), &result)
            });
            println!("{value}");
        }
    }
    Ok(ExitCode::Success)
}

fn human_lines(root: &Path, result: &DefinitionQueryResult) -> Vec<String> {
    result
        .definitions
        .iter()
        .map(|definition| {
            format!(
                "{}:{}:{}: {}",
                display_path(&definition.path, root).display(),
                definition.position.line + 1,
                definition.position.character + 1,
                definition.name
            )
        })
        .collect()
}

fn json_result(root: &Path, result: &DefinitionQueryResult) -> serde_json::Value {
    let definitions: Vec<_> = result
        .definitions
        .iter()
        .map(|definition| {
            json!({
                "path": display_path(&definition.path, root).display().to_string(),
                "name": definition.name,
                "position": {
                    "line": definition.position.line,
                    "character": definition.position.character,
                },
                "range": {
                    "start": {
                        "line": definition.range.start.line,
                        "character": definition.range.start.character,
                    },
                    "end": {
                        "line": definition.range.end.line,
                        "character": definition.range.end.character,
                    },
                },
            })
        })
        .collect();
    json!({
        "definitions": definitions,
        "queryRange": {
            "start": {
                "line": result.query_range.start.line,
                "character": result.query_range.start.character,
            },
            "end": {
                "line": result.query_range.end.line,
                "character": result.query_range.end.character,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_test_utils::{extract_cursor, TempProject};

    #[tokio::test]
    async fn test_definition_output() {
        let project = TempProject::new();
        project.write_config("schema: schema.graphql\ndocuments: \"src/**/*.graphql\"\n");
        project.write("schema.graphql", "type Query { me: User } type User { id: ID }");
        project.write("src/user.graphql", "fragment UserId on User { id }");
        let ctx = Context::load(Some(&project.join(".graphqlrc.yml")), None)
            .await
            .unwrap();

        let (text, position) = extract_cursor("{ me { ...User*Id } }");
        let path = project.join("src/query.graphql");
        let result = ctx
            .cache
            .definition(&ctx.project, &path, &text, position)
            .unwrap()
            .unwrap();

        assert_eq!(
            human_lines(ctx.cache.root_dir(), &result),
            vec!["src/user.graphql:1:10: UserId"]
        );
        let value = json_result(ctx.cache.root_dir(), &result);
        assert_eq!(value["definitions"][0]["path"], "src/user.graphql");
        assert_eq!(value["queryRange"]["start"]["character"], 7);
    }
}
