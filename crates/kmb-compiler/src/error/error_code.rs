//! Diagnostic codes for the KMB compiler.
//!
//! Codes are organized by phase:
//! - `E0xx` - Document loading errors
//! - `E1xx` - Document-level structure errors
//! - `E2xx` - Connection errors found during validation or traversal
//! - `E3xx` - Argument resolution errors
//! - `W0xx` - Warnings

use std::fmt;

/// Codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Loading Errors (E0xx)
    // =========================================================================
    /// Malformed document.
    ///
    /// The document text could not be read into entities.
    E001,

    /// Duplicate entity id.
    ///
    /// Two entities share the same id.
    E002,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Missing input.
    ///
    /// No layer is flagged as a traversal entrance.
    E100,

    /// Missing model.
    ///
    /// The document contains no model node, so nothing can be returned.
    E101,

    // =========================================================================
    // Connection Errors (E2xx)
    // =========================================================================
    /// Missing necessary connection.
    ///
    /// An output edge leads to an id that is not in the document, or to a
    /// node that does not declare the edge's origin as a predecessor.
    E200,

    /// Cyclic graph.
    ///
    /// Following output edges leads back to a node already on the path.
    E201,

    /// Inline layer wired into the data flow.
    ///
    /// A `CA` layer is only ever emitted inside another node's arguments and
    /// cannot be the target of an output edge.
    E202,

    // =========================================================================
    // Argument Errors (E3xx)
    // =========================================================================
    /// Missing required argument.
    ///
    /// An argument still holds the `!REQ` marker.
    E300,

    /// Unresolved argument reference.
    ///
    /// An `id` argument names an entity that does not exist or cannot be
    /// used as an argument.
    E301,

    /// Cyclic argument reference.
    ///
    /// Inline arguments refer back to the node being resolved.
    E302,

    // =========================================================================
    // Warnings (W0xx)
    // =========================================================================
    /// Unused layer.
    W001,

    /// Unreleased model.
    W002,

    /// Existing file overwritten by export.
    W003,

    /// Argument refers to a layer that is built later in the method.
    W004,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::W001 => "W001",
            ErrorCode::W002 => "W002",
            ErrorCode::W003 => "W003",
            ErrorCode::W004 => "W004",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed document",
            ErrorCode::E002 => "duplicate entity id",
            ErrorCode::E100 => "missing input",
            ErrorCode::E101 => "missing model",
            ErrorCode::E200 => "missing necessary connection",
            ErrorCode::E201 => "cyclic graph",
            ErrorCode::E202 => "inline layer in data flow",
            ErrorCode::E300 => "missing required argument",
            ErrorCode::E301 => "unresolved argument reference",
            ErrorCode::E302 => "cyclic argument reference",
            ErrorCode::W001 => "unused layer",
            ErrorCode::W002 => "unreleased model",
            ErrorCode::W003 => "existing file covered",
            ErrorCode::W004 => "forward layer reference",
        }
    }

    /// Returns `true` for codes reported as warnings.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ErrorCode::W001 | ErrorCode::W002 | ErrorCode::W003 | ErrorCode::W004
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
