//! Invocation engine for the MCP host runtime.
//!
//! Each inbound invocation runs the same synchronous pipeline on its own
//! task: look the tool up in the registry, bind raw JSON arguments to the
//! callable's declared parameters, coerce them to the declared shapes (the
//! inverse of schema mapping), call the thunk, and surface the single
//! extracted result. Coercion failures abort the whole invocation before
//! anything is called; nothing in this crate can take the serving process
//! down.
//!
//! The [`wire`] module carries the transport-facing request and response
//! shapes; [`ToolHandler`] dispatches typed requests so any transport — the
//! bundled HTTP host or an embedding — can drive the engine the same way.

#![warn(missing_docs, clippy::pedantic)]

mod coerce;
mod engine;
mod error;
mod handler;
pub mod wire;

pub use coerce::CoerceError;
pub use engine::InvocationEngine;
pub use error::InvokeError;
pub use handler::{ToolHandler, ToolRequest, ToolResponse};
