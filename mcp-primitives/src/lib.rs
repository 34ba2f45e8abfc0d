//! Core shared types for the MCP host runtime.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod identity;
mod ids;
mod protocol;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Server identity advertised to transports and the service catalog.
pub use identity::{ServerIdentity, ServerIdentityBuilder};
/// Unique identifier attached to each tool invocation.
pub use ids::InvocationId;
/// Transport protocols a hosted server can speak.
pub use protocol::Protocol;
