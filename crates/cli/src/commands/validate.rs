use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use graphql_ide::{Diagnostic, DiagnosticSeverity};
use serde_json::json;

use crate::context::Context;
use crate::output::{display_path, human_diagnostic, json_diagnostic};
use crate::{ExitCode, OutputFormat};

/// Diagnostics of one document.
pub struct FileDiagnostics {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileDiagnostics {
    fn count(&self, severity: DiagnosticSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }
}

#[tracing::instrument(skip(ctx), fields(project = %ctx.project))]
pub async fn run(ctx: &Context, format: OutputFormat, watch: bool) -> Result<ExitCode> {
    let start = std::time::Instant::now();
    let paths = ctx
        .cache
        .documents(&ctx.project)?
        .into_iter()
        .map(|document| document.path)
        .collect();
    let results = validate_files(ctx, paths)?;
    tracing::info!(
        files = results.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "validation finished"
    );

    let errors = print_results(ctx, format, &results);
    if watch {
        return super::watch::run(ctx, format).await;
    }
    Ok(ExitCode::from_error_count(errors))
}

/// Diagnostics for each of `paths` that is still indexed, in order.
pub fn validate_files(ctx: &Context, paths: Vec<PathBuf>) -> Result<Vec<FileDiagnostics>> {
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(entry) = ctx.cache.file(&path) else {
            continue;
        };
        let diagnostics = ctx.cache.diagnostics(&ctx.project, &entry.content)?;
        results.push(FileDiagnostics { path, diagnostics });
    }
    Ok(results)
}

/// Print `results` and return the number of errors among them.
pub fn print_results(ctx: &Context, format: OutputFormat, results: &[FileDiagnostics]) -> usize {
    let errors: usize = results
        .iter()
        .map(|file| file.count(DiagnosticSeverity::Error))
        .sum();
    let warnings: usize = results
        .iter()
        .map(|file| file.count(DiagnosticSeverity::Warning))
        .sum();
    let root = ctx.cache.root_dir();

    match format {
        OutputFormat::Human => {
            for file in results {
                let path = display_path(&file.path, root);
                for diagnostic in &file.diagnostics {
                    println!("{}", human_diagnostic(path, diagnostic));
                }
            }
            if errors == 0 && warnings == 0 {
                println!(
                    "{} {}",
                    "✓".green().bold(),
                    format!("No problems in {} documents", results.len()).green()
                );
            } else {
                let with_problems = results
                    .iter()
                    .filter(|file| !file.diagnostics.is_empty())
                    .count();
                println!(
                    "\n{} {} error(s), {} warning(s) in {} of {} documents",
                    if errors == 0 { "!".yellow().bold() } else { "✗".red().bold() },
                    errors,
                    warnings,
                    with_problems,
                    results.len()
                );
            }
        }
        OutputFormat::Json => {
            let diagnostics: Vec<_> = results
                .iter()
                .flat_map(|file| {
                    let path = display_path(&file.path, root);
                    file.diagnostics
                        .iter()
                        .map(move |diagnostic| json_diagnostic(path, diagnostic))
                })
                .collect();
            let report = json!({
                "project": ctx.project,
                "documents": results.len(),
                "errors": errors,
                "warnings": warnings,
                "diagnostics": diagnostics,
            });
            println!("{report}");
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_test_utils::TempProject;

    #[tokio::test]
    async fn test_validate_files_reports_per_document() {
        let project = TempProject::new();
        project.write_config("schema: schema.graphql\ndocuments: \"src/**/*.graphql\"\n");
        project.write("schema.graphql", "type Query { user: User } type User { id: ID }");
        project.write("src/fragments.graphql", "fragment UserId on User { id }");
        project.write("src/good.graphql", "{ user { ...UserId } }");
        project.write("src/bad.graphql", "{ user { nope } }");

        let ctx = Context::load(Some(&project.join(".graphqlrc.yml")), None)
            .await
            .unwrap();
        let paths = ctx
            .cache
            .documents(&ctx.project)
            .unwrap()
            .into_iter()
            .map(|document| document.path)
            .collect();
        let results = validate_files(&ctx, paths).unwrap();

        let problems: Vec<_> = results
            .iter()
            .map(|file| {
                (
                    file.path.file_name().unwrap().to_string_lossy().to_string(),
                    file.diagnostics.len(),
                )
            })
            .collect();
        assert_eq!(
            problems,
            vec![
                ("bad.graphql".to_string(), 1),
                ("fragments.graphql".to_string(), 0),
                ("good.graphql".to_string(), 0),
            ]
        );
        assert_eq!(results[0].count(DiagnosticSeverity::Error), 1);
    }
}
