//! The published view of a hosted server.

use mcp_primitives::ServerIdentity;
use mcp_schema::SchemaNode;
use serde::Serialize;

/// Published digest of one registered tool.
#[derive(Clone, Debug, Serialize)]
pub struct ToolDigest {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Generated input schema.
    #[serde(rename = "inputSchema")]
    pub input_schema: SchemaNode,
}

/// Everything the catalog needs to know about a server: its identity, a
/// version string, and the digests of its registered tools.
#[derive(Clone, Debug)]
pub struct ServerSnapshot {
    identity: ServerIdentity,
    version: String,
    tools: Vec<ToolDigest>,
}

impl ServerSnapshot {
    /// Creates a snapshot with the default `1.0.0` version.
    #[must_use]
    pub fn new(identity: ServerIdentity, tools: Vec<ToolDigest>) -> Self {
        Self {
            identity,
            version: "1.0.0".to_owned(),
            tools,
        }
    }

    /// Overrides the published version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Returns the server identity.
    #[must_use]
    pub const fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Returns the published version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the tool digests.
    #[must_use]
    pub fn tools(&self) -> &[ToolDigest] {
        &self.tools
    }
}
