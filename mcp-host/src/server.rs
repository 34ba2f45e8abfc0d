//! The hosted-server facade.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use mcp_discovery::{ServerSnapshot, ToolDigest};
use mcp_kernel::ToolHandler;
use mcp_primitives::{Protocol, ServerIdentity};
use mcp_registry::{RegistryError, ToolRegistry};
use mcp_scanner::{IntoCallable, Scanner, ToolService};
use thiserror::Error;
use tracing::info;

use crate::http::{self, HttpServerHandle};
use crate::lifecycle::{LifecycleError, ServerEvent, ServerLifecycle, ServerState};

/// Errors surfaced by the server facade.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A lifecycle transition was not permitted.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The configured identity failed validation.
    #[error(transparent)]
    Identity(#[from] mcp_primitives::Error),

    /// Tool registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Tools can only be registered before the server starts.
    #[error("registration phase is closed in state {state:?}")]
    RegistrationClosed {
        /// The state the server was in.
        state: ServerState,
    },

    /// The HTTP listener could not be bound.
    #[error("failed to bind http listener: {reason}")]
    Bind {
        /// Human-readable bind failure.
        reason: String,
    },
}

/// A hosted MCP server: identity, tool registry, lifecycle, and — for
/// networked protocols — the bundled HTTP transport.
#[derive(Debug)]
pub struct McpServer {
    identity: ServerIdentity,
    registry: Arc<ToolRegistry>,
    lifecycle: ServerLifecycle,
    http: Option<HttpServerHandle>,
}

impl McpServer {
    /// Starts building a server for the given service name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> McpServerBuilder {
        McpServerBuilder {
            name: name.into(),
            namespace: String::new(),
            group: None,
            host: None,
            port: None,
            protocol: Protocol::default(),
            metadata: BTreeMap::new(),
            scanner: None,
        }
    }

    /// Returns the server identity.
    #[must_use]
    pub const fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Returns the tool registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.lifecycle.state()
    }

    /// Returns the bound listener address once the server is serving a
    /// networked protocol. Useful when port 0 was configured.
    #[must_use]
    pub fn bound_addr(&self) -> Option<SocketAddr> {
        self.http.as_ref().map(HttpServerHandle::addr)
    }

    /// Registers a single bare callable as a tool.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::RegistrationClosed`] after `start`, or a
    /// registry error when extraction fails or the name collides.
    pub fn register_tool<F, Args>(&self, callable: F) -> Result<(), ServerError>
    where
        F: IntoCallable<Args>,
    {
        self.ensure_registration_open()?;
        self.registry.register_callable(callable)?;
        Ok(())
    }

    /// Registers every exposed tool of a tagged service, returning how many
    /// descriptors were added.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::RegistrationClosed`] after `start`.
    pub fn register_service<S>(&self, service: &S) -> Result<usize, ServerError>
    where
        S: ToolService + ?Sized,
    {
        self.ensure_registration_open()?;
        Ok(self.registry.register_service(service))
    }

    fn ensure_registration_open(&self) -> Result<(), ServerError> {
        let state = self.lifecycle.state();
        if state.accepts_registrations() {
            Ok(())
        } else {
            Err(ServerError::RegistrationClosed { state })
        }
    }

    /// Closes the registration phase and begins serving.
    ///
    /// For networked protocols this binds the HTTP listener; for stdio no
    /// listener is started.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Lifecycle`] when called twice, or
    /// [`ServerError::Bind`] when the listener cannot be bound.
    pub fn start(&mut self) -> Result<(), ServerError> {
        self.lifecycle.transition(ServerEvent::Start)?;

        if self.identity.protocol().is_networked() {
            let addr: SocketAddr = format!("{}:{}", self.identity.host(), self.identity.port())
                .parse()
                .map_err(|err| ServerError::Bind {
                    reason: format!("invalid bind address: {err}"),
                })?;

            let handler = ToolHandler::new(Arc::clone(&self.registry), self.identity.clone());
            self.http = Some(http::serve(addr, handler)?);
        }

        info!(
            service = %self.identity.name(),
            protocol = %self.identity.protocol(),
            tools = self.registry.len(),
            "server started"
        );
        Ok(())
    }

    /// Stops serving. Stopping a server that never started is permitted.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; kept fallible for symmetry with
    /// `start` and future transports.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        self.lifecycle.transition(ServerEvent::Shutdown)?;

        if let Some(http) = self.http.take() {
            http.shutdown().await;
        }

        info!(service = %self.identity.name(), "server stopped");
        Ok(())
    }

    /// Produces the snapshot published to the service catalog: the identity
    /// plus a digest of every registered tool.
    #[must_use]
    pub fn snapshot(&self) -> ServerSnapshot {
        let tools = self
            .registry
            .list()
            .iter()
            .map(|descriptor| ToolDigest {
                name: descriptor.name().to_owned(),
                description: descriptor.description().to_owned(),
                input_schema: descriptor.input_schema().clone(),
            })
            .collect();

        ServerSnapshot::new(self.identity.clone(), tools)
    }
}

/// Builder for [`McpServer`].
#[derive(Debug)]
pub struct McpServerBuilder {
    name: String,
    namespace: String,
    group: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    protocol: Protocol,
    metadata: BTreeMap<String, String>,
    scanner: Option<Scanner>,
}

impl McpServerBuilder {
    /// Sets the namespace the server registers under.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the service group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the bind address.
    #[must_use]
    pub fn address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = Some(host.into());
        self.port = Some(port);
        self
    }

    /// Sets the transport protocol.
    #[must_use]
    pub const fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Adds a metadata key/value pair.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Uses a custom scanner, letting callers override the schema
    /// vocabulary flowing into generated descriptors.
    #[must_use]
    pub fn scanner(mut self, scanner: Scanner) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Finalizes the server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Identity`] when the identity does not
    /// validate.
    pub fn build(self) -> Result<McpServer, ServerError> {
        let mut identity = ServerIdentity::builder(&self.name)
            .namespace(self.namespace)
            .protocol(self.protocol);
        if let Some(group) = self.group {
            identity = identity.group(group);
        }
        if let (Some(host), Some(port)) = (self.host, self.port) {
            identity = identity.address(host, port);
        }
        for (key, value) in self.metadata {
            identity = identity.metadata(key, value);
        }
        let identity = identity.build()?;

        let registry = match self.scanner {
            Some(scanner) => ToolRegistry::with_scanner(scanner),
            None => ToolRegistry::new(),
        };

        let lifecycle = ServerLifecycle::new(identity.name());
        Ok(McpServer {
            identity,
            registry: Arc::new(registry),
            lifecycle,
            http: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(message: String) -> String {
        format!("Echo: {message}")
    }

    #[test]
    fn builder_produces_configured_identity() {
        let server = McpServer::builder("advanced-mcp-service")
            .namespace("prod")
            .group("tools")
            .address("127.0.0.1", 8082)
            .protocol(Protocol::Sse)
            .metadata("version", "2.0.0")
            .build()
            .unwrap();

        assert_eq!(server.identity().name(), "advanced-mcp-service");
        assert_eq!(server.identity().group(), "tools");
        assert_eq!(server.identity().port(), 8082);
        assert_eq!(server.state(), ServerState::Init);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = McpServer::builder("").build().expect_err("empty name");
        assert!(matches!(err, ServerError::Identity(_)));
    }

    #[tokio::test]
    async fn registration_closes_after_start() {
        let mut server = McpServer::builder("svc")
            .address("127.0.0.1", 0)
            .build()
            .unwrap();
        server.register_tool(echo).unwrap();

        server.start().unwrap();
        assert!(server.bound_addr().is_some());

        let err = server.register_tool(|| 0_i64).expect_err("closed");
        assert!(matches!(err, ServerError::RegistrationClosed { .. }));

        server.stop().await.unwrap();
        assert_eq!(server.state(), ServerState::Stopped);
    }

    #[tokio::test]
    async fn double_start_errors() {
        let mut server = McpServer::builder("svc")
            .address("127.0.0.1", 0)
            .build()
            .unwrap();
        server.start().unwrap();
        assert!(matches!(server.start(), Err(ServerError::Lifecycle(_))));
        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stdio_server_starts_without_listener() {
        let mut server = McpServer::builder("svc")
            .protocol(Protocol::Stdio)
            .build()
            .unwrap();
        server.start().unwrap();
        assert!(server.bound_addr().is_none());
        server.stop().await.unwrap();
    }

    #[test]
    fn snapshot_reflects_registered_tools() {
        let server = McpServer::builder("svc")
            .metadata("version", "2.0.0")
            .build()
            .unwrap();
        server.register_tool(echo).unwrap();

        let snapshot = server.snapshot();
        assert_eq!(snapshot.identity().name(), "svc");
        assert_eq!(snapshot.tools().len(), 1);
        assert_eq!(snapshot.tools()[0].name, "echo");
    }
}
