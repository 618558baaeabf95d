//! Validation rules that run on top of the schema validator.
//!
//! A rule walks the parsed document and reports [`RuleViolation`]s as byte
//! ranges. The diagnostics pipeline turns them into positioned
//! [`Diagnostic`](crate::Diagnostic)s with the rule's severity and source.

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use apollo_parser::cst;
use graphql_types::{DiagnosticSeverity, OffsetRange};

mod no_deprecated;

pub use no_deprecated::NoDeprecated;

/// A check over an executable document that needs the schema.
pub trait ValidationRule: Send + Sync {
    /// Identifier of the rule, reported as the diagnostic code.
    fn name(&self) -> &'static str;

    fn severity(&self) -> DiagnosticSeverity {
        DiagnosticSeverity::Error
    }

    /// Value of [`Diagnostic::source`](crate::Diagnostic::source) for this rule.
    fn source(&self) -> &'static str {
        "GraphQL: Validation"
    }

    fn check(&self, document: &cst::Document, schema: &Valid<Schema>) -> Vec<RuleViolation>;
}

/// One problem found by a [`ValidationRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub message: String,
    /// One range per offending node. Each becomes its own diagnostic.
    pub ranges: Vec<OffsetRange>,
}

impl RuleViolation {
    #[must_use]
    pub fn new(message: impl Into<String>, range: OffsetRange) -> Self {
        Self {
            message: message.into(),
            ranges: vec![range],
        }
    }
}
