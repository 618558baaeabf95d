use std::path::Path;

use anyhow::{Context as _, Result};
use colored::Colorize;
use graphql_ide::{document_symbols, outline, OutlineTree};
use serde_json::json;

use crate::{ExitCode, OutputFormat};

pub fn run(file: &Path, format: OutputFormat) -> Result<ExitCode> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    match format {
        OutputFormat::Human => match outline(&text) {
            Some(trees) => {
                for line in human_lines(&trees) {
                    println!("{line}");
                }
            }
            None => println!("{}", "No outline: the document has syntax errors".dimmed()),
        },
        OutputFormat::Json => println!("{}", json_symbols(&text)),
    }
    Ok(ExitCode::Success)
}

/// One line per node, indented by depth, with the 1-based start position.
fn human_lines(trees: &[OutlineTree]) -> Vec<String> {
    fn walk(tree: &OutlineTree, depth: usize, lines: &mut Vec<String>) {
        lines.push(format!(
            "{}{} {}",
            "  ".repeat(depth),
            tree.label(),
            tree.range.start
        ));
        for child in &tree.children {
            walk(child, depth + 1, lines);
        }
    }
    let mut lines = Vec::new();
    for tree in trees {
        walk(tree, 0, &mut lines);
    }
    lines
}

fn json_symbols(text: &str) -> serde_json::Value {
    let symbols: Vec<_> = document_symbols(text)
        .into_iter()
        .map(|symbol| {
            json!({
                "name": symbol.name,
                "kind": symbol.kind.as_str(),
                "containerName": symbol.container_name,
                "range": {
                    "start": {
                        "line": symbol.range.start.line,
                        "character": symbol.range.start.character,
                    },
                    "end": {
                        "line": symbol.range.end.line,
                        "character": symbol.range.end.character,
                    },
                },
            })
        })
        .collect();
    serde_json::Value::Array(symbols)
}
