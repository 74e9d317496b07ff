//! KMB CLI library
//!
//! This module contains the core CLI logic for the Keras Model Builder.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::PathBuf};

use log::info;

use kmb::{Diagnostic, KmbError, ModelBuilder};

/// What a successful run produced.
#[derive(Debug)]
pub struct Report {
    path: PathBuf,
    source: String,
    warnings: Vec<Diagnostic>,
}

impl Report {
    /// Path of the written module.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// The document source the warnings point into.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Run the KMB CLI application
///
/// This function loads the input document, compiles it into a Python
/// module, and writes the module into the output directory.
///
/// # Errors
///
/// Returns `KmbError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed documents
/// - Compilation errors
/// - Export errors
pub fn run(args: &Args) -> Result<Report, KmbError> {
    info!(
        input_path = args.input,
        output_dir = args.output;
        "Processing document"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    let model = app_config.model_mut();
    if let Some(name) = &args.name {
        model.set_name(name);
    }
    if let Some(author) = &args.author {
        model.set_author(author);
    }
    if let Some(comment) = &args.comment {
        model.set_comment(comment);
    }

    let source = fs::read_to_string(&args.input)?;

    let builder = ModelBuilder::new(app_config);
    let mut generated = builder.build(&source)?;

    fs::create_dir_all(&args.output)?;
    let path = builder.export(&mut generated, &args.output)?;

    info!(
        output_file = path.display().to_string(),
        warnings = generated.warnings().len();
        "Module exported successfully"
    );

    Ok(Report {
        path,
        source,
        warnings: generated.warnings().to_vec(),
    })
}
