//! Severity of a reported diagnostic.

/// Diagnostic severity level.
///
/// Syntax and validation problems are errors; deprecated usage is reported
/// as a warning. The numeric [`code`](Self::code) follows the 1-4 scale
/// editor protocols use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    /// Error - indicates a problem that prevents correct execution
    Error,
    /// Warning - indicates a potential problem
    Warning,
    /// Information - informational message
    Information,
    /// Hint - a suggestion or style recommendation
    Hint,
}

impl DiagnosticSeverity {
    /// Returns true if this severity indicates an error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if this severity is at least a warning (warning or error).
    #[must_use]
    pub const fn is_warning_or_higher(self) -> bool {
        matches!(self, Self::Error | Self::Warning)
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Information => write!(f, "info"),
            Self::Hint => write!(f, "hint"),
        }
    }
}
