//! Server facade for hosting MCP tools.
//!
//! [`McpServer`] ties the workspace together: a builder-configured identity,
//! the tool registry populated during the startup registration phase, the
//! kernel's dispatch handler, and — for networked protocols — a bundled HTTP
//! transport serving the list/invoke/info endpoints. The lifecycle state
//! machine enforces that registration completes before serving begins.

#![warn(missing_docs, clippy::pedantic)]

mod http;
mod lifecycle;
mod server;

pub use lifecycle::{LifecycleError, ServerEvent, ServerLifecycle, ServerState};
pub use server::{McpServer, McpServerBuilder, ServerError};

/// Re-export of the shared primitives.
pub use mcp_primitives as primitives;
/// Re-export of the schema mapper.
pub use mcp_schema as schema;
/// Re-export of the descriptor extractor.
pub use mcp_scanner as scanner;
/// Re-export of the tool registry.
pub use mcp_registry as registry;
/// Re-export of the invocation kernel.
pub use mcp_kernel as kernel;
/// Re-export of the catalog client.
pub use mcp_discovery as discovery;
