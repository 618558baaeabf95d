//! Exit codes for the GraphQL CLI.
//!
//! Scripts and CI systems can tell "the documents have errors" apart from
//! "the tool could not run".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// No errors
    Success = 0,
    /// Syntax or validation errors found in GraphQL documents
    ValidationError = 1,
    /// Config, schema or I/O failure before any result was produced
    Failure = 2,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    /// [`Self::ValidationError`] when `errors` is non-zero.
    #[must_use]
    pub const fn from_error_count(errors: usize) -> Self {
        if errors == 0 {
            Self::Success
        } else {
            Self::ValidationError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success as i32, 0);
        assert_eq!(ExitCode::from_error_count(0), ExitCode::Success);
        assert_eq!(ExitCode::from_error_count(3), ExitCode::ValidationError);
        assert_eq!(ExitCode::Failure as i32, 2);
    }
}
