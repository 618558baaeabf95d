use std::path::Path;

use colored::Colorize;
use graphql_ide::{Diagnostic, DiagnosticSeverity};
use serde_json::json;

/// `file:line:column: severity: message`, with 1-based line and column.
pub fn human_diagnostic(path: &Path, diagnostic: &Diagnostic) -> String {
    let start = diagnostic.range.start;
    let severity = match diagnostic.severity {
        DiagnosticSeverity::Error => "error:".red().bold(),
        DiagnosticSeverity::Warning => "warning:".yellow().bold(),
        DiagnosticSeverity::Information | DiagnosticSeverity::Hint => "info:".blue().bold(),
    };
    format!(
        "{}:{}:{}: {severity} {}",
        path.display(),
        start.line + 1,
        start.character + 1,
        diagnostic.message
    )
}

pub fn json_diagnostic(path: &Path, diagnostic: &Diagnostic) -> serde_json::Value {
    json!({
        "file": path.display().to_string(),
        "severity": diagnostic.severity.to_string(),
        "source": diagnostic.source,
        "code": diagnostic.code,
        "message": diagnostic.message,
        "range": {
            "start": {
                "line": diagnostic.range.start.line,
                "character": diagnostic.range.start.character,
            },
            "end": {
                "line": diagnostic.range.end.line,
                "character": diagnostic.range.end.character,
            },
        },
    })
}

/// Path relative to `root` when it is inside it.
pub fn display_path<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_types::{Position, Range};

    fn diagnostic() -> Diagnostic {
        Diagnostic::new(
            Range::new(Position::new(2, 4), Position::new(2, 9)),
            DiagnosticSeverity::Error,
            "Cannot query field \"nope\" on type \"Query\".",
            graphql_ide::VALIDATION_SOURCE,
        )
    }

    #[test]
    fn test_json_diagnostic() {
        let value = json_diagnostic(Path::new("src/q.graphql"), &diagnostic());
        assert_eq!(value["file"], "src/q.graphql");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["source"], "GraphQL: Validation");
        assert_eq!(value["range"]["start"]["line"], 2);
        assert_eq!(value["range"]["end"]["character"], 9);
        assert!(value["code"].is_null());
    }

    #[test]
    fn test_human_diagnostic_is_one_based() {
        let line = human_diagnostic(Path::new("q.graphql"), &diagnostic());
        assert!(line.starts_with("q.graphql:3:5: "), "{line}");
        assert!(line.ends_with("Cannot query field \"nope\" on type \"Query\"."));
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/project");
        assert_eq!(
            display_path(Path::new("/project/src/a.graphql"), root),
            Path::new("src/a.graphql")
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/a.graphql"), root),
            Path::new("/elsewhere/a.graphql")
        );
    }
}
