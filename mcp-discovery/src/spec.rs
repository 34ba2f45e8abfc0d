//! Wire-level structures for the catalog console's admin API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::snapshot::{ServerSnapshot, ToolDigest};

/// Export path advertised for remote tool invocation.
pub const EXPORT_PATH: &str = "/mcp";

/// Server specification document submitted at registration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpecification {
    /// Wire protocol label.
    pub protocol: String,
    /// Protocol the console's front end uses to reach the server.
    pub front_protocol: String,
    /// Service name.
    pub name: String,
    /// Catalog-assigned id; empty on first registration.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Version information.
    pub version_detail: VersionDetail,
    /// Whether the server is enabled on registration.
    pub enabled: bool,
    /// Local configuration, present only for stdio servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_server_config: Option<Map<String, Value>>,
    /// Remote configuration, present for networked servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_server_config: Option<RemoteServerConfig>,
}

impl ServerSpecification {
    /// Builds the specification from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &ServerSnapshot) -> Self {
        let identity = snapshot.identity();
        let protocol = identity.protocol();

        let (local, remote) = if protocol.is_networked() {
            (
                None,
                Some(RemoteServerConfig {
                    export_path: EXPORT_PATH.to_owned(),
                    service_ref: ServiceRef {
                        namespace_id: identity.namespace().to_owned(),
                        group_name: identity.group().to_owned(),
                        service_name: identity.name().to_owned(),
                        transport_protocol: protocol.transport_protocol().to_owned(),
                    },
                }),
            )
        } else {
            (Some(Map::new()), None)
        };

        Self {
            protocol: protocol.as_str().to_owned(),
            front_protocol: protocol.front_protocol().to_owned(),
            name: identity.name().to_owned(),
            id: String::new(),
            description: format!("MCP Server: {}", identity.name()),
            version_detail: VersionDetail {
                version: snapshot.version().to_owned(),
            },
            enabled: true,
            local_server_config: local,
            remote_server_config: remote,
        }
    }
}

/// Version details of a registered server.
#[derive(Clone, Debug, Serialize)]
pub struct VersionDetail {
    /// Semantic version string.
    pub version: String,
}

/// Remote-server configuration advertised to the console.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteServerConfig {
    /// Path under which tools are invocable.
    pub export_path: String,
    /// Reference to the backing service instance.
    pub service_ref: ServiceRef,
}

/// Service reference inside a [`RemoteServerConfig`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    /// Namespace identifier.
    pub namespace_id: String,
    /// Service group name.
    pub group_name: String,
    /// Service name.
    pub service_name: String,
    /// Transport protocol label.
    pub transport_protocol: String,
}

/// Tool specification document submitted at registration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpecification {
    /// The published tool digests.
    pub tools: Vec<ToolDigest>,
    /// Per-tool invocation metadata, keyed by tool name.
    pub tools_meta: Map<String, Value>,
}

impl ToolSpecification {
    /// Builds the specification from a snapshot's tool digests.
    #[must_use]
    pub fn from_snapshot(snapshot: &ServerSnapshot) -> Self {
        let mut tools_meta = Map::new();
        for tool in snapshot.tools() {
            tools_meta.insert(
                tool.name.clone(),
                json!({
                    "invokeContext": {
                        "path": EXPORT_PATH,
                        "method": "POST",
                    },
                    "enabled": true,
                }),
            );
        }

        Self {
            tools: snapshot.tools().to_vec(),
            tools_meta,
        }
    }
}

/// Endpoint specification document, submitted for networked servers only.
#[derive(Clone, Debug, Serialize)]
pub struct EndpointSpecification {
    /// Endpoint resolution type; always `DIRECT`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Address data.
    pub data: EndpointData,
}

/// Address data of an [`EndpointSpecification`].
#[derive(Clone, Debug, Serialize)]
pub struct EndpointData {
    /// Host address.
    pub address: String,
    /// Port, as a string per the console contract.
    pub port: String,
}

impl EndpointSpecification {
    /// Builds the direct endpoint specification from a snapshot, or `None`
    /// for non-networked servers.
    #[must_use]
    pub fn from_snapshot(snapshot: &ServerSnapshot) -> Option<Self> {
        let identity = snapshot.identity();
        identity.protocol().is_networked().then(|| Self {
            kind: "DIRECT".to_owned(),
            data: EndpointData {
                address: identity.host().to_owned(),
                port: identity.port().to_string(),
            },
        })
    }
}

/// Envelope wrapping every console response.
#[derive(Clone, Debug, Deserialize)]
pub struct ConsoleEnvelope<T> {
    /// Response code; `200` means success.
    pub code: i64,
    /// Informational message.
    #[serde(default)]
    pub message: String,
    /// Payload.
    pub data: T,
}

/// Access-token response returned by the console login endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    /// Bearer token to attach to subsequent requests.
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
