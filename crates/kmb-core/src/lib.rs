//! KMB Core Types and Definitions
//!
//! This crate provides the document model that the KMB compiler consumes:
//!
//! - **Identifiers**: Interned entity identifiers ([`identifier::NodeId`])
//! - **Spans**: Byte ranges into the source a document was loaded from ([`span::Span`])
//! - **Arguments**: Typed argument items attached to nodes ([`argument`] module)
//! - **Document**: The id-addressed graph of layers, models, units and
//!   placeholders ([`document`] module)

pub mod argument;
pub mod document;
pub mod identifier;
pub mod span;
