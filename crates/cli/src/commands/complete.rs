use std::path::Path;

use anyhow::{Context as _, Result};
use colored::Colorize;
use graphql_ide::{autocomplete_suggestions, CompletionItem, CompletionOptions, Position};
use serde_json::json;

use crate::context::Context;
use crate::{ExitCode, OutputFormat};

pub fn run(
    ctx: &Context,
    file: &Path,
    line: u32,
    character: u32,
    format: OutputFormat,
) -> Result<ExitCode> {
    let (path, text) = Context::read(file)?;
    let items = complete(ctx, &path, &text, Position::new(line, character))?;

    match format {
        OutputFormat::Human => {
            for item in &items {
                println!("{}", human_item(item));
            }
        }
        OutputFormat::Json => {
            let items: Vec<_> = items.iter().map(json_item).collect();
            println!("{}", serde_json::Value::Array(items));
        }
    }
    Ok(ExitCode::Success)
}

fn complete(
    ctx: &Context,
    path: &Path,
    text: &str,
    position: Position,
) -> Result<Vec<CompletionItem>> {
    let schema = ctx
        .cache
        .schema(&ctx.project, false)
        .context("Failed to load schema")?;
    let fragments = ctx.cache.fragment_dependencies(text, &ctx.project)?;
    let uri = path.to_string_lossy().into_owned();
    let options = CompletionOptions {
        uri: Some(uri.as_str()),
        external_fragments: &fragments,
        ..CompletionOptions::default()
    };
    Ok(autocomplete_suggestions(&schema, text, position, &options))
}

fn human_item(item: &CompletionItem) -> String {
    let mut line = item.label.bold().to_string();
    if let Some(detail) = &item.detail {
        line = format!("{line}  {}", detail.dimmed());
    }
    line = format!("{line}  ({})", item.kind.as_str());
    if item.deprecated {
        line = format!("{line} {}", "deprecated".yellow());
    }
    line
}

fn json_item(item: &CompletionItem) -> serde_json::Value {
    json!({
        "label": item.label,
        "kind": item.kind.as_str(),
        "detail": item.detail,
        "documentation": item.documentation,
        "deprecated": item.deprecated,
        "deprecationReason": item.deprecation_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_test_utils::{extract_cursor, TempProject};

    #[tokio::test]
    async fn test_complete_fields() {
        let project = TempProject::new();
        project.write_config("schema: schema.graphql\ndocuments: \"src/**/*.graphql\"\n");
        project.write(
            "schema.graphql",
            "type Query { human(id: String): Human } type Human { id: String name: String }",
        );
        let ctx = Context::load(Some(&project.join(".graphqlrc.yml")), None)
            .await
            .unwrap();

        let (text, position) = extract_cursor("{ human(id: \"1\") { *");
        let items = complete(&ctx, &project.join("src/q.graphql"), &text, position).unwrap();
        let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["id", "name"]);

        let value = json_item(&items[0]);
        assert_eq!(value["kind"], "field");
        assert_eq!(value["detail"], "String");
    }
}
