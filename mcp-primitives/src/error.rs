//! Shared error definitions for runtime primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the MCP host runtime.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided invocation identifier could not be parsed.
    #[error("invalid invocation id: {source}")]
    InvalidInvocationId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// Server identity failed validation.
    #[error("invalid server identity: {reason}")]
    InvalidIdentity {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The supplied protocol string is not recognized.
    #[error("unknown protocol `{value}`")]
    UnknownProtocol {
        /// The offending protocol string.
        value: String,
    },
}
