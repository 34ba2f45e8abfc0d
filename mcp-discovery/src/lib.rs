//! Service-catalog registration for hosted MCP servers.
//!
//! A hosted server publishes its identity and tool catalog to a remote
//! catalog console so other systems can discover and route to it. This crate
//! provides the [`RegistryBackend`] seam, an HTTP [`CatalogClient`]
//! implementation speaking the console's admin API, and a
//! [`RegistrationController`] that registers with retry/backoff at startup
//! and withdraws the registration on shutdown.

#![warn(missing_docs, clippy::pedantic)]

mod backend;
mod client;
mod controller;
mod snapshot;
pub mod spec;

pub use backend::{DiscoveryError, DiscoveryResult, RegistryBackend};
pub use client::{CatalogClient, CatalogConfig};
pub use controller::{RegistrationConfig, RegistrationController};
pub use snapshot::{ServerSnapshot, ToolDigest};
