//! KMB - Keras Model Builder.
//!
//! Loads model graph documents, compiles them into build statements, and
//! assembles a Python class that constructs the model with Keras.

pub mod assemble;
pub mod config;
pub mod load;

mod error;

pub use kmb_compiler::{Compilation, CompileError, Diagnostic, ErrorCode, Label, Severity};
pub use kmb_core::{argument, document, identifier, span};

pub use error::KmbError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use assemble::Assembler;
use config::AppConfig;
use document::Document;

/// Generated module text together with everything reported while producing it.
#[derive(Debug, Clone)]
pub struct GeneratedModel {
    file_name: String,
    code: String,
    compilation: Compilation,
}

impl GeneratedModel {
    /// File name the module is exported under, e.g. `model.py`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The generated Python source.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }

    /// Warnings in the order they were raised.
    pub fn warnings(&self) -> &[Diagnostic] {
        self.compilation.warnings()
    }

    /// Warnings as numbered lines, `Warning 1: ...`, joined by `;\n`.
    pub fn warning_report(&self) -> String {
        warning_report(self.warnings())
    }
}

/// Builder for loading, compiling, and exporting KMB documents.
///
/// # Examples
///
/// ```rust,no_run
/// use kmb::{ModelBuilder, config::AppConfig};
///
/// let source = std::fs::read_to_string("demos/mlp.toml").unwrap();
///
/// let builder = ModelBuilder::new(AppConfig::default());
/// let mut generated = builder.build(&source).expect("Failed to build");
/// let path = builder.export(&mut generated, "out").expect("Failed to export");
///
/// println!("{}", path.display());
/// println!("{}", generated.warning_report());
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    config: AppConfig,
    date: Option<String>,
}

impl ModelBuilder {
    /// Create a new model builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config, date: None }
    }

    /// Fix the date written into the header instead of using today's date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse TOML source into a document.
    ///
    /// # Errors
    ///
    /// Returns `KmbError::Load` for malformed documents and duplicate ids.
    pub fn parse(&self, source: &str) -> Result<Document, KmbError> {
        info!("Loading document");

        let document =
            load::parse(source).map_err(|err| KmbError::new_load_error(err, source))?;

        debug!(entities = document.len(); "Document loaded successfully");
        Ok(document)
    }

    /// Compile a document and assemble the module text.
    ///
    /// # Errors
    ///
    /// Returns `KmbError::Compile` with the fatal diagnostic. The error has no
    /// source attached; [`ModelBuilder::build`] attaches it.
    pub fn generate(&self, document: &Document) -> Result<GeneratedModel, KmbError> {
        let compilation = kmb_compiler::compile(document)?;

        let mut assembler = Assembler::new(self.config.model());
        if let Some(date) = &self.date {
            assembler = assembler.with_date(date.clone());
        }

        let code = assembler.assemble(&compilation);
        trace!(code; "Generated module");
        info!(
            title = assembler.title(),
            warnings = compilation.warnings().len();
            "Model generated"
        );

        Ok(GeneratedModel {
            file_name: assembler.file_name(),
            code,
            compilation,
        })
    }

    /// Parse and generate in one step, keeping the source for error reports.
    pub fn build(&self, source: &str) -> Result<GeneratedModel, KmbError> {
        let document = self.parse(source)?;
        self.generate(&document)
            .map_err(|err| err.with_source(source))
    }

    /// Write the module into `dir` and return the written path.
    ///
    /// An existing file is overwritten and reported as a `W003` warning on
    /// `generated`.
    ///
    /// # Errors
    ///
    /// Returns `KmbError::Export` if the file cannot be written.
    pub fn export(
        &self,
        generated: &mut GeneratedModel,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, KmbError> {
        let path = dir.as_ref().join(&generated.file_name);

        if path.exists() {
            generated.compilation.add_warning(
                Diagnostic::warning(format!(
                    "existing file `{}` was covered by the new model",
                    path.display()
                ))
                .with_code(ErrorCode::W003),
            );
        }

        fs::write(&path, &generated.code).map_err(|source| KmbError::Export {
            path: path.clone(),
            source,
        })?;

        info!(path = path.display().to_string(); "Model exported");
        Ok(path)
    }
}

/// Formats warnings as numbered lines joined by `;\n`.
///
/// # Examples
///
/// ```
/// use kmb::{Diagnostic, warning_report};
///
/// let warnings = [Diagnostic::warning("a"), Diagnostic::warning("b")];
/// assert_eq!(warning_report(&warnings), "Warning 1: a;\nWarning 2: b");
/// ```
pub fn warning_report(warnings: &[Diagnostic]) -> String {
    warnings
        .iter()
        .enumerate()
        .map(|(i, warning)| format!("Warning {}: {}", i + 1, warning.message()))
        .collect::<Vec<_>>()
        .join(";\n")
}
