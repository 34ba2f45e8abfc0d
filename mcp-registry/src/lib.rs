//! In-memory tool registry.
//!
//! Descriptors are appended during the single-threaded registration phase
//! and read concurrently — under a shared lock — by the serving path for the
//! rest of the process lifetime. There is no eviction and no mutation after
//! registration.

#![warn(missing_docs, clippy::pedantic)]

mod registry;

pub use registry::{RegistryError, RegistryResult, ToolRegistry};
