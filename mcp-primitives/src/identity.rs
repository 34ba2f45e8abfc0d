//! Server identity advertised to transports and the service catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Protocol};

/// Default service group used when none is configured.
pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

/// Identity of a hosted MCP server: how it names itself, where it listens,
/// and which protocol it speaks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerIdentity {
    name: String,
    namespace: String,
    group: String,
    host: String,
    port: u16,
    protocol: Protocol,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl ServerIdentity {
    /// Starts building a [`ServerIdentity`] for the given service name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ServerIdentityBuilder {
        ServerIdentityBuilder {
            name: name.into(),
            namespace: String::new(),
            group: DEFAULT_GROUP.to_owned(),
            host: "127.0.0.1".to_owned(),
            port: 8080,
            protocol: Protocol::default(),
            metadata: BTreeMap::new(),
        }
    }

    /// Returns the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace, empty when unset.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the service group.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the host address the server binds to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the configured port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the transport protocol.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Returns the metadata key/value pairs.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

/// Builder for [`ServerIdentity`].
#[derive(Debug)]
pub struct ServerIdentityBuilder {
    name: String,
    namespace: String,
    group: String,
    host: String,
    port: u16,
    protocol: Protocol,
    metadata: BTreeMap<String, String>,
}

impl ServerIdentityBuilder {
    /// Sets the namespace the server registers under.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the service group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Sets the bind address.
    #[must_use]
    pub fn address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
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

    /// Finalizes the identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] when the service name or host is
    /// empty.
    pub fn build(self) -> crate::Result<ServerIdentity> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidIdentity {
                reason: "service name cannot be empty".into(),
            });
        }
        if self.host.trim().is_empty() {
            return Err(Error::InvalidIdentity {
                reason: "host cannot be empty".into(),
            });
        }

        Ok(ServerIdentity {
            name: self.name,
            namespace: self.namespace,
            group: self.group,
            host: self.host,
            port: self.port,
            protocol: self.protocol,
            metadata: self.metadata,
        })
    }
}
