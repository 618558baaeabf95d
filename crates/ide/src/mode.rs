use apollo_parser::cst;
use apollo_parser::Parser;

/// What kind of definitions a document holds, as far as we can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentMode {
    /// Schema definitions (SDL).
    TypeSystem,
    /// Operations and fragments.
    Executable,
    /// Empty or unparseable.
    Unknown,
}

/// Classify a document. A `.graphqls` URI always means SDL; otherwise the
/// text decides.
#[must_use]
pub fn document_mode(text: &str, uri: Option<&str>) -> DocumentMode {
    if uri.is_some_and(|uri| uri.ends_with(".graphqls")) {
        return DocumentMode::TypeSystem;
    }
    if text.trim().is_empty() {
        return DocumentMode::Unknown;
    }

    let tree = Parser::new(text).parse();
    if tree.errors().next().is_some() {
        return DocumentMode::Unknown;
    }

    let has_type_system = tree.document().definitions().any(|definition| {
        !matches!(
            definition,
            cst::Definition::OperationDefinition(_) | cst::Definition::FragmentDefinition(_)
        )
    });

    if has_type_system {
        DocumentMode::TypeSystem
    } else {
        DocumentMode::Executable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable() {
        assert_eq!(
            document_mode("query Q { a } fragment F on T { b }", None),
            DocumentMode::Executable
        );
    }

    #[test]
    fn test_type_system() {
        assert_eq!(
            document_mode("type T { a: String }", None),
            DocumentMode::TypeSystem
        );
        assert_eq!(
            document_mode("{ a } extend type Query { b: Int }", None),
            DocumentMode::TypeSystem
        );
    }

    #[test]
    fn test_uri_wins() {
        assert_eq!(
            document_mode("{ a }", Some("file:///schema.graphqls")),
            DocumentMode::TypeSystem
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(document_mode("", None), DocumentMode::Unknown);
        assert_eq!(document_mode("query {", None), DocumentMode::Unknown);
    }
}
