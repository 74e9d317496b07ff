//! Compiler from KMB model documents to build statements.
//!
//! [`compile`] validates a [`Document`], walks it from its entrance layers,
//! and returns the ordered build statements together with the information
//! needed to wrap them in a class: released model variables, constructor
//! parameters, import groups, and warnings.
//!
//! # Example
//!
//! ```
//! use kmb_compiler::compile;
//! use kmb_core::{
//!     argument::{ArgClass, Argument},
//!     document::{Document, Inputs, LayerNode, ModelNode},
//! };
//!
//! let mut doc = Document::new();
//! doc.insert(
//!     LayerNode::new("1", "input_1", "Input")
//!         .entrance()
//!         .with_arg(Argument::new("shape", "(784,)", ArgClass::Seq))
//!         .with_output(&["2".into()]),
//! )
//! .unwrap();
//! doc.insert(
//!     LayerNode::new("2", "dense_1", "Dense")
//!         .with_arg(Argument::new("units", "10", ArgClass::Num))
//!         .with_input(Inputs::parse("1"))
//!         .with_output(&["3".into()]),
//! )
//! .unwrap();
//! doc.insert(
//!     ModelNode::new("3", "model")
//!         .with_inputs(&["2".into()])
//!         .with_outputs(&["2".into()]),
//! )
//! .unwrap();
//!
//! let compilation = compile(&doc).unwrap();
//! assert_eq!(compilation.endpoints(), &["model".to_string()]);
//! assert_eq!(
//!     compilation.lines().last().unwrap(),
//!     "model = models.Model(inputs=dense_1, outputs=dense_1)"
//! );
//! ```

pub mod error;

mod compilation;
mod registry;
mod resolve;
mod statement;
mod validate;
mod walker;

use log::{debug, info};

use kmb_core::document::Document;

pub use compilation::Compilation;
pub use error::{CompileError, Diagnostic, ErrorCode, Label, Severity};
pub use statement::{LAYER_SOURCE, MODEL_SOURCE, Statement};

/// Compiles a document into build statements.
///
/// # Errors
///
/// Returns the first fatal diagnostic found. Warnings never fail the
/// compilation; they are returned in [`Compilation::warnings`].
pub fn compile(document: &Document) -> Result<Compilation, CompileError> {
    info!(entities = document.len(); "Compiling document");

    validate::validate(document)?;
    debug!("Document validated");

    let compilation = walker::Walker::new(document).walk()?;
    info!(
        statements = compilation.statements().len(),
        warnings = compilation.warnings().len();
        "Compilation finished"
    );
    Ok(compilation)
}
