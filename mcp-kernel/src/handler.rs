//! Typed request dispatch for the tool-serving surface.

use std::sync::Arc;

use mcp_primitives::{InvocationId, ServerIdentity};
use mcp_registry::ToolRegistry;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::engine::InvocationEngine;
use crate::error::InvokeError;
use crate::wire::{
    InvokeToolResponse, ListToolsResponse, ServerInfo, ToolSummary,
};

/// A transport-agnostic request against the serving surface.
#[derive(Clone, Debug)]
pub enum ToolRequest {
    /// List every registered tool.
    ListTools,
    /// Return server information.
    ServerInfo,
    /// Invoke one tool with an untyped argument bag.
    InvokeTool {
        /// The tool name to resolve.
        name: String,
        /// The raw arguments.
        arguments: Map<String, Value>,
    },
}

/// Response to a [`ToolRequest`].
#[derive(Clone, Debug)]
pub enum ToolResponse {
    /// The tool listing.
    Tools(ListToolsResponse),
    /// The server information.
    Info(ServerInfo),
    /// The invocation result.
    Invoked(InvokeToolResponse),
}

/// Dispatches typed requests to the registry and invocation engine.
///
/// Transports decode their own payloads into [`ToolRequest`]s and render
/// [`ToolResponse`]s back out; everything in between is shared.
#[derive(Clone, Debug)]
pub struct ToolHandler {
    engine: InvocationEngine,
    identity: ServerIdentity,
}

impl ToolHandler {
    /// Creates a handler over the supplied registry and identity.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, identity: ServerIdentity) -> Self {
        Self {
            engine: InvocationEngine::new(registry),
            identity,
        }
    }

    /// Returns the identity this handler reports.
    #[must_use]
    pub const fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Dispatches one request.
    ///
    /// # Errors
    ///
    /// Propagates [`InvokeError`] from tool invocations; listing and info
    /// requests cannot fail.
    pub fn handle(&self, request: ToolRequest) -> Result<ToolResponse, InvokeError> {
        match request {
            ToolRequest::ListTools => Ok(ToolResponse::Tools(self.list_tools())),
            ToolRequest::ServerInfo => Ok(ToolResponse::Info(self.server_info())),
            ToolRequest::InvokeTool { name, arguments } => self
                .invoke_tool(&name, &arguments)
                .map(ToolResponse::Invoked),
        }
    }

    /// Lists every registered tool in registration order.
    #[must_use]
    pub fn list_tools(&self) -> ListToolsResponse {
        let tools = self
            .engine
            .registry()
            .list()
            .iter()
            .map(|descriptor| ToolSummary {
                name: descriptor.name().to_owned(),
                description: descriptor.description().to_owned(),
                input_schema: descriptor.input_schema().clone(),
            })
            .collect();

        ListToolsResponse { tools }
    }

    /// Returns the server information view.
    #[must_use]
    pub fn server_info(&self) -> ServerInfo {
        ServerInfo::new(&self.identity, self.engine.registry().len())
    }

    /// Invokes one tool and wraps the extracted result as textual content.
    ///
    /// # Errors
    ///
    /// Propagates [`InvokeError`] from the engine.
    pub fn invoke_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<InvokeToolResponse, InvokeError> {
        let invocation = InvocationId::random();
        debug!(%invocation, tool = %name, "invocation received");

        match self.engine.invoke(name, arguments) {
            Ok(result) => {
                info!(%invocation, tool = %name, "invocation completed");
                Ok(InvokeToolResponse::from_result(&result))
            }
            Err(err) => {
                warn!(%invocation, tool = %name, %err, "invocation failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo(message: String) -> String {
        format!("Echo: {message}")
    }

    fn handler() -> ToolHandler {
        let registry = Arc::new(ToolRegistry::new());
        registry.register_callable(echo).unwrap();
        registry.register_callable(|| "12:00".to_owned()).unwrap();

        let identity = ServerIdentity::builder("test-service")
            .metadata("version", "1.0.0")
            .build()
            .unwrap();
        ToolHandler::new(registry, identity)
    }

    #[test]
    fn listing_reflects_registration_order() {
        let handler = handler();
        let listing = handler.list_tools();

        assert_eq!(listing.tools.len(), 2);
        assert_eq!(listing.tools[0].name, "echo");
        assert_eq!(
            listing.tools[0].description,
            "Auto-generated tool for echo"
        );
    }

    #[test]
    fn server_info_counts_tools() {
        let handler = handler();
        let info = handler.server_info();

        assert_eq!(info.name, "test-service");
        assert_eq!(info.protocol, "sse");
        assert_eq!(info.tool_count, 2);
        assert_eq!(info.metadata.get("version").unwrap(), "1.0.0");
    }

    #[test]
    fn invoke_wraps_text_content() {
        let handler = handler();
        let arguments = match json!({"param1": "hi"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let response = handler.invoke_tool("echo", &arguments).unwrap();
        assert_eq!(response.content[0].kind, "text");
        assert_eq!(response.content[0].text, "Echo: hi");
    }

    #[test]
    fn dispatch_routes_by_request_kind() {
        let handler = handler();

        let response = handler.handle(ToolRequest::ListTools).unwrap();
        assert!(matches!(response, ToolResponse::Tools(listing) if listing.tools.len() == 2));

        let response = handler.handle(ToolRequest::ServerInfo).unwrap();
        assert!(matches!(response, ToolResponse::Info(info) if info.tool_count == 2));

        let err = handler
            .handle(ToolRequest::InvokeTool {
                name: "missing".to_owned(),
                arguments: Map::new(),
            })
            .unwrap_err();
        assert_eq!(err.code(), "TOOL_NOT_FOUND");
    }
}
