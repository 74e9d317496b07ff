//! Collector for warnings raised while a document is compiled.

use crate::error::Diagnostic;

/// Accumulates non-fatal diagnostics in the order they are raised.
///
/// Errors never pass through the collector: they abort compilation
/// immediately through `?`.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a warning to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        debug_assert!(diagnostic.severity().is_warning());
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Finish collection and return the warnings in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
