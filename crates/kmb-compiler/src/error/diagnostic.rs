//! The core diagnostic type for the KMB error system.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! code, labeled document spans, and help text.

use std::fmt;

use kmb_core::span::Span;

use crate::error::{Severity, error_code::ErrorCode, label::Label};

/// A diagnostic message about a document.
///
/// # Example
///
/// ```text
/// error[E200]: `Dense:dense_1` is connected to `42`, which does not exist
///   --> model.toml:18:1
///    |
/// 18 | output = "42"
///    | ^^^^^^^^^^^^^ dangling connection
///    |
///    = help: reconnect the layer or remove the edge
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use kmb_compiler::error::{Diagnostic, ErrorCode};
    ///
    /// let diag = Diagnostic::error("the document has no Input layer")
    ///     .with_code(ErrorCode::E100)
    ///     .with_help("add an Input layer and connect it to the graph");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Add a primary label if the entity has a known location.
    pub fn with_label_at(self, span: Option<Span>, message: impl Into<String>) -> Self {
        match span {
            Some(span) => self.with_label(span, message),
            None => self,
        }
    }

    /// Add a secondary label if the entity has a known location.
    pub fn with_secondary_label_at(self, span: Option<Span>, message: impl Into<String>) -> Self {
        match span {
            Some(span) => self.with_secondary_label(span, message),
            None => self,
        }
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("the document has no Model node").with_code(ErrorCode::E101);

        assert_eq!(
            diag.to_string(),
            "error[E101]: the document has no Model node"
        );
    }

    #[test]
    fn test_warning_display_with_code() {
        let diag = Diagnostic::warning("layer `Dense:d` is never used").with_code(ErrorCode::W001);

        assert_eq!(diag.to_string(), "warning[W001]: layer `Dense:d` is never used");
    }

    #[test]
    fn test_label_at_skips_missing_span() {
        let diag = Diagnostic::error("dangling")
            .with_label_at(None, "ignored")
            .with_secondary_label_at(Some(Span::new(3..9)), "kept");

        assert_eq!(diag.labels().len(), 1);
        assert!(diag.labels()[0].is_secondary());
        assert_eq!(diag.labels()[0].message(), "kept");
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("missing required argument")
            .with_code(ErrorCode::E300)
            .with_label(Span::new(100..120), "argument declared here")
            .with_secondary_label(Span::new(50..70), "owning layer")
            .with_help("set a value for the argument");

        assert_eq!(diag.code(), Some(ErrorCode::E300));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert_eq!(diag.help(), Some("set a value for the argument"));
    }
}
