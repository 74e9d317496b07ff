//! The result of a successful compilation.

use crate::{error::Diagnostic, statement::Statement};

/// Everything the code assembler needs to write a class definition.
#[derive(Debug, Clone)]
pub struct Compilation {
    statements: Vec<Statement>,
    endpoints: Vec<String>,
    placeholders: Vec<String>,
    sources: Vec<String>,
    warnings: Vec<Diagnostic>,
}

impl Compilation {
    pub(crate) fn new(
        statements: Vec<Statement>,
        endpoints: Vec<String>,
        placeholders: Vec<String>,
        sources: Vec<String>,
        warnings: Vec<Diagnostic>,
    ) -> Self {
        Self {
            statements,
            endpoints,
            placeholders,
            sources,
            warnings,
        }
    }

    /// Statements of the build method in emission order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Variables of released models in release order.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Constructor parameter names in first-use order.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Import groups in first-use order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Appends a warning raised after compilation, e.g. while exporting.
    pub fn add_warning(&mut self, warning: Diagnostic) {
        self.warnings.push(warning);
    }

    /// Renders every statement as one line of text.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.statements.iter().map(Statement::to_string)
    }
}
