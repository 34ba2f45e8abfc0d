//! The catalog backend seam.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::snapshot::ServerSnapshot;

/// Result alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors surfaced by catalog interactions.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Client or registration configuration was invalid.
    #[error("invalid discovery configuration: {0}")]
    InvalidConfig(&'static str),

    /// The HTTP request could not be performed.
    #[error("catalog request failed: {reason}")]
    Http {
        /// Human-readable transport failure.
        reason: String,
    },

    /// The console answered with a non-success HTTP status.
    #[error("catalog returned status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The console envelope reported a failure code.
    #[error("catalog rejected the request (code {code}): {message}")]
    Console {
        /// Envelope code.
        code: i64,
        /// Envelope message.
        message: String,
    },

    /// A response payload could not be decoded.
    #[error("failed to decode catalog response: {reason}")]
    Decode {
        /// Human-readable decode failure.
        reason: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("catalog request timed out")]
    Timeout,
}

impl DiscoveryError {
    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn http(reason: impl Into<String>) -> Self {
        Self::Http {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for decode failures.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}

/// Trait implemented by catalog backends.
///
/// The bundled [`CatalogClient`](crate::CatalogClient) speaks the console's
/// HTTP admin API; tests and alternative consoles provide their own
/// implementations.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Publishes the server snapshot, returning the catalog's server id.
    async fn register(&self, snapshot: &ServerSnapshot) -> DiscoveryResult<String>;

    /// Withdraws a previously registered server.
    async fn deregister(&self, server_id: &str) -> DiscoveryResult<()>;

    /// Lists registered servers, optionally filtered by a blur search.
    async fn list(
        &self,
        search: Option<&str>,
        page_no: u32,
        page_size: u32,
    ) -> DiscoveryResult<Value>;
}
