//! Invocation error taxonomy.

use thiserror::Error;

use crate::coerce::CoerceError;

/// Errors surfaced by a single invocation.
///
/// All variants are returned as values to the caller; none of them abort
/// the serving process.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The requested tool name is not registered.
    #[error("tool `{name}` not found")]
    ToolNotFound {
        /// The name that failed to resolve.
        name: String,
    },

    /// A supplied argument is structurally incompatible with the declared
    /// parameter shape. The invocation is aborted atomically; no partial
    /// call happens.
    #[error("argument conversion failed: {source}")]
    ArgumentConversion {
        /// The coercion failure, identifying the offending parameter.
        #[from]
        source: CoerceError,
    },

    /// The tool handler itself reported a failure.
    #[error("handler failed: {reason}")]
    Handler {
        /// Human-readable reason returned by the handler.
        reason: String,
    },
}

impl InvokeError {
    /// Returns the machine-readable error code used on the wire.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ToolNotFound { .. } => "TOOL_NOT_FOUND",
            Self::ArgumentConversion { .. } => "ARGUMENT_CONVERSION",
            Self::Handler { .. } => "HANDLER_FAILED",
        }
    }
}
