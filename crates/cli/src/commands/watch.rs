use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use colored::Colorize;
use graphql_config::FileType;

use super::validate::{print_results, validate_files};
use crate::context::Context;
use crate::output::display_path;
use crate::{ExitCode, OutputFormat};

/// Apply file changes to the cache as they happen and re-validate the
/// documents they affect. Runs until the watcher shuts down.
pub async fn run(ctx: &Context, format: OutputFormat) -> Result<ExitCode> {
    let mut watcher = ctx.cache.watch().context("Failed to start file watcher")?;
    if format == OutputFormat::Human {
        println!(
            "{} {}",
            "Watching".cyan().bold(),
            ctx.cache.root_dir().display()
        );
    }

    while let Some(changed) = watcher.next().await {
        let changed = match changed {
            Ok(changed) => changed,
            Err(error) => {
                tracing::warn!(%error, "watch event failed");
                continue;
            }
        };
        if changed.is_empty() {
            continue;
        }

        let to_validate = affected_documents(ctx, &changed)?;
        if format == OutputFormat::Human {
            for path in changed.iter().filter(|path| ctx.cache.file(path).is_none()) {
                println!(
                    "{} {}",
                    "removed".dimmed(),
                    display_path(path, ctx.cache.root_dir()).display()
                );
            }
        }
        if to_validate.is_empty() {
            continue;
        }
        let results = validate_files(ctx, to_validate)?;
        print_results(ctx, format, &results);
    }

    Ok(ExitCode::Success)
}

/// Documents to re-check after `changed`: all of them when a schema file
/// changed, otherwise the changed documents that still exist.
fn affected_documents(ctx: &Context, changed: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let schema_changed = changed
        .iter()
        .any(|path| file_type(ctx, path) == Some(FileType::Schema));
    if schema_changed {
        tracing::debug!("schema changed, re-validating every document");
        return Ok(ctx
            .cache
            .documents(&ctx.project)?
            .into_iter()
            .map(|document| document.path)
            .collect());
    }

    Ok(changed
        .iter()
        .filter(|path| file_type(ctx, path) == Some(FileType::Document))
        .filter(|path| ctx.cache.file(path).is_some())
        .cloned()
        .collect())
}

fn file_type(ctx: &Context, path: &Path) -> Option<FileType> {
    ctx.cache
        .config()
        .get_file_type(path, ctx.cache.root_dir(), &ctx.project)
}
