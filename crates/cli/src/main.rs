mod commands;
mod context;
mod exit_code;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::context::Context;
pub use crate::exit_code::ExitCode;

#[derive(Parser)]
#[command(name = "graphql")]
#[command(about = "GraphQL validation, completion and navigation from the command line", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to GraphQL config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Project name (for multi-project configs)
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every project document for syntax and validation errors
    Validate {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Watch mode - re-validate on file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List completions at a position in a document
    Complete {
        file: PathBuf,
        /// Zero-based line
        line: u32,
        /// Zero-based byte column
        character: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Find where the symbol at a position is defined
    Definition {
        file: PathBuf,
        /// Zero-based line
        line: u32,
        /// Zero-based byte column
        character: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the token styles of every line of a file
    Tokenize { file: PathBuf },

    /// Print the outline of a document
    Outline {
        file: PathBuf,

        /// Output format; JSON prints the flattened symbol list
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Keep the project cache live and re-validate files as they change
    Watch {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    match run(cli).await {
        Ok(code) => code.exit(),
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::Failure.exit();
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Tokenizing and outlining need neither a config nor a schema.
    match &cli.command {
        Commands::Tokenize { file } => return commands::tokenize::run(file),
        Commands::Outline { file, format } => return commands::outline::run(file, *format),
        _ => {}
    }

    let ctx = Context::load(cli.config.as_deref(), cli.project.as_deref()).await?;
    match cli.command {
        Commands::Validate { format, watch } => commands::validate::run(&ctx, format, watch).await,
        Commands::Complete {
            file,
            line,
            character,
            format,
        } => commands::complete::run(&ctx, &file, line, character, format),
        Commands::Definition {
            file,
            line,
            character,
            format,
        } => commands::definition::run(&ctx, &file, line, character, format),
        Commands::Watch { format } => commands::watch::run(&ctx, format).await,
        Commands::Tokenize { .. } | Commands::Outline { .. } => Ok(ExitCode::Success),
    }
}

/// Log to stderr, filtered by `RUST_LOG` and silent by default.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// `--color` and `--no-color` win. Otherwise `NO_COLOR` disables colors,
/// a non-zero `CLICOLOR_FORCE` forces them and `CLICOLOR=0` disables them.
/// With none of these set the `colored` crate falls back to TTY detection.
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "graphql",
            "complete",
            "src/query.graphql",
            "3",
            "14",
            "--project",
            "api",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.project.as_deref(), Some("api"));
        assert!(matches!(
            cli.command,
            Commands::Complete {
                line: 3,
                character: 14,
                format: OutputFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_defaults() {
        let cli = Cli::try_parse_from(["graphql", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate {
                format: OutputFormat::Human,
                watch: false
            }
        ));
    }

    #[test]
    fn test_color_flags_conflict() {
        assert!(Cli::try_parse_from(["graphql", "--color", "--no-color", "watch"]).is_err());
    }
}
