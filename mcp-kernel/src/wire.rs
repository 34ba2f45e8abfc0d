//! Transport-facing request and response shapes.
//!
//! The HTTP layer (or any other transport) serializes these structs; the
//! shapes are part of the engine's contract even though the transport
//! itself lives elsewhere.

use std::collections::BTreeMap;

use mcp_primitives::ServerIdentity;
use mcp_schema::SchemaNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InvokeError;

/// Published view of one registered tool.
#[derive(Clone, Debug, Serialize)]
pub struct ToolSummary {
    /// Tool name, unique within the registry.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Generated input schema.
    #[serde(rename = "inputSchema")]
    pub input_schema: SchemaNode,
}

/// Response to a list-tools request: every descriptor in registration order.
#[derive(Clone, Debug, Serialize)]
pub struct ListToolsResponse {
    /// The registered tools.
    pub tools: Vec<ToolSummary>,
}

/// Body of an invoke request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InvokeToolRequest {
    /// The untyped argument bag; a missing object is treated as empty.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// One block of invoke-response content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Content kind; always `text` for extracted results.
    #[serde(rename = "type")]
    pub kind: String,
    /// The rendered content.
    pub text: String,
}

impl ContentBlock {
    /// Creates a text content block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_owned(),
            text: text.into(),
        }
    }
}

/// Response to an invoke request: the single extracted result wrapped as
/// textual content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvokeToolResponse {
    /// The content blocks; exactly one for a successful invocation.
    pub content: Vec<ContentBlock>,
}

impl InvokeToolResponse {
    /// Wraps an extracted result value: strings pass through verbatim,
    /// anything else renders as compact JSON.
    #[must_use]
    pub fn from_result(value: &Value) -> Self {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            content: vec![ContentBlock::text(text)],
        }
    }
}

/// Server information exposed alongside the tool listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Service name.
    pub name: String,
    /// Wire protocol label.
    pub protocol: String,
    /// Namespace, empty when unset.
    pub namespace: String,
    /// Service group.
    pub group: String,
    /// Metadata key/value pairs.
    pub metadata: BTreeMap<String, String>,
    /// Number of registered tools.
    #[serde(rename = "toolCount")]
    pub tool_count: usize,
}

impl ServerInfo {
    /// Builds the info view from an identity and the current tool count.
    #[must_use]
    pub fn new(identity: &ServerIdentity, tool_count: usize) -> Self {
        Self {
            name: identity.name().to_owned(),
            protocol: identity.protocol().as_str().to_owned(),
            namespace: identity.namespace().to_owned(),
            group: identity.group().to_owned(),
            metadata: identity.metadata().clone(),
            tool_count,
        }
    }
}

/// Error payload returned for failed requests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

impl ErrorBody {
    /// Creates an error body from a message and code.
    #[must_use]
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

impl From<&InvokeError> for ErrorBody {
    fn from(err: &InvokeError) -> Self {
        Self::new(err.to_string(), err.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_results_pass_through_verbatim() {
        let response = InvokeToolResponse::from_result(&json!("Echo: hi"));
        assert_eq!(response.content.len(), 1);
        assert_eq!(response.content[0].kind, "text");
        assert_eq!(response.content[0].text, "Echo: hi");
    }

    #[test]
    fn structured_results_render_as_json() {
        let response = InvokeToolResponse::from_result(&json!([1, 2, 3]));
        assert_eq!(response.content[0].text, "[1,2,3]");

        let response = InvokeToolResponse::from_result(&Value::Null);
        assert_eq!(response.content[0].text, "null");
    }

    #[test]
    fn invoke_request_tolerates_missing_arguments() {
        let request: InvokeToolRequest = serde_json::from_str("{}").unwrap();
        assert!(request.arguments.is_empty());

        let request: InvokeToolRequest =
            serde_json::from_value(json!({"arguments": {"message": "hi"}})).unwrap();
        assert_eq!(request.arguments.get("message").unwrap(), "hi");
    }

    #[test]
    fn error_body_carries_code() {
        let err = InvokeError::ToolNotFound {
            name: "missing".to_owned(),
        };
        let body = ErrorBody::from(&err);
        assert_eq!(body.code, "TOOL_NOT_FOUND");
        assert!(body.error.contains("missing"));
    }

    #[test]
    fn tool_summary_serializes_camel_case_schema_key() {
        let summary = ToolSummary {
            name: "echo".to_owned(),
            description: "Echo a message".to_owned(),
            input_schema: SchemaNode::object(Vec::new()),
        };
        let rendered = serde_json::to_string(&summary).unwrap();
        assert!(rendered.contains(r#""inputSchema""#));
    }
}
