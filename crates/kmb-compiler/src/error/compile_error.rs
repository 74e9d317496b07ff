//! The error type returned when compilation aborts.

use thiserror::Error;

use crate::error::{Diagnostic, ErrorCode};

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Fatal compilation failure.
///
/// Wraps the single error diagnostic that stopped the pipeline. No source
/// text is produced when this is returned.
#[derive(Debug, Error)]
#[error("{diagnostic}")]
pub struct CompileError {
    diagnostic: Diagnostic,
}

impl CompileError {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }

    /// Get the diagnostic that aborted compilation.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// Shorthand for the diagnostic's code.
    pub fn code(&self) -> Option<ErrorCode> {
        self.diagnostic.code()
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        self.diagnostic
    }
}

impl From<Diagnostic> for CompileError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_from_diagnostic() {
        let diag = Diagnostic::error("test error").with_code(ErrorCode::E101);
        let err: CompileError = diag.into();

        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.diagnostic().message(), "test error");
    }

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::new(Diagnostic::error("no input").with_code(ErrorCode::E100));

        assert_eq!(err.to_string(), "error[E100]: no input");
    }
}
