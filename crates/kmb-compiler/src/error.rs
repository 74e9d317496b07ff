//! Error and diagnostic system for the KMB compiler.
//!
//! This module provides an error handling system with:
//! - Diagnostic codes for documentation and searchability
//! - Labeled spans pointing back into the loaded document
//! - Severity levels separating fatal errors from warnings
//! - A collector for accumulating warnings during traversal
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional code, source locations,
//! and help text. A fatal diagnostic is wrapped in [`CompileError`] when it
//! is returned from compilation; warnings travel alongside a successful
//! [`Compilation`](crate::Compilation).
//!
//! # Example
//!
//! ```
//! # use kmb_compiler::error::{Diagnostic, ErrorCode};
//! # use kmb_core::span::Span;
//!
//! let diag = Diagnostic::error("missing required argument `units` of `Dense:dense_1`")
//!     .with_code(ErrorCode::E300)
//!     .with_label(Span::new(40..52), "declared here")
//!     .with_help("set a value for `units` before exporting");
//! ```

mod collector;
mod compile_error;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use compile_error::Result;

pub use compile_error::CompileError;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
