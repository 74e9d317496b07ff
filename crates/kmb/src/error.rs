//! Error types for KMB operations.
//!
//! This module provides the main error type [`KmbError`] which wraps the
//! error conditions that can occur while loading, compiling, and exporting
//! a model document.

use std::{io, path::PathBuf};

use thiserror::Error;

use kmb_compiler::{CompileError, Diagnostic};

/// The main error type for KMB operations.
///
/// # Diagnostic Variants
///
/// `Load` and `Compile` carry a structured [`Diagnostic`] whose labels point
/// into the document source. The source is kept alongside so callers can
/// render the labeled snippets.
#[derive(Debug, Error)]
pub enum KmbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Load { err: Diagnostic, src: String },

    #[error("{err}")]
    Compile {
        err: CompileError,
        src: Option<String>,
    },

    #[error("Export error: failed to write `{}`: {source}", .path.display())]
    Export { path: PathBuf, source: io::Error },
}

impl KmbError {
    /// Create a new `Load` error with the associated document source.
    pub fn new_load_error(err: Diagnostic, src: impl Into<String>) -> Self {
        Self::Load {
            err,
            src: src.into(),
        }
    }

    /// Attach the document source to a `Compile` error that lacks one.
    pub fn with_source(self, src: &str) -> Self {
        match self {
            Self::Compile { err, src: None } => Self::Compile {
                err,
                src: Some(src.to_string()),
            },
            other => other,
        }
    }
}

impl From<CompileError> for KmbError {
    fn from(err: CompileError) -> Self {
        Self::Compile { err, src: None }
    }
}
