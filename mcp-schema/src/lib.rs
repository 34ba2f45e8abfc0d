//! Type-to-schema mapping for MCP tool descriptors.
//!
//! The mapper converts native type shapes into the JSON-Schema-like nodes the
//! MCP wire format expects. Mapping is total: shapes the mapper does not
//! understand degrade to a generic object node instead of failing, so schema
//! generation can never block tool registration. The same shapes drive the
//! inverse direction at invoke time, when raw JSON arguments are coerced back
//! into native parameter values.

#![warn(missing_docs, clippy::pedantic)]

mod fieldtag;
mod mapper;
mod node;
mod shape;
mod vocabulary;

/// Field-parameter tag parsing (`desc=<text>`, `required`).
pub use fieldtag::FieldTag;
/// The shape-to-schema mapper.
pub use mapper::TypeMapper;
/// Schema tree nodes and kinds.
pub use node::{SchemaKind, SchemaNode};
/// Native type shapes describing tool parameters.
pub use shape::{CompositeShape, FieldShape, TypeShape};
/// Configurable default descriptions for generated leaf schemas.
pub use vocabulary::SchemaVocabulary;
