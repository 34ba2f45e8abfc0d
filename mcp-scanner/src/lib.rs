//! Callable introspection for the MCP host runtime.
//!
//! This crate turns native Rust callables into self-describing tool
//! descriptors. A callable is converted exactly once, at registration time,
//! into a [`Callable`]: an explicit record of its calling convention, its
//! ordered parameter shapes, and a thunk that performs typed extraction and
//! the actual call. No runtime type inspection happens on the invocation
//! path.
//!
//! Two extraction modes exist, mirroring the declarative tag syntax:
//!
//! - **bare callable** — [`Scanner::scan_callable`] derives the tool name
//!   from the callable's type name and synthesizes `param1..paramN` names;
//! - **tagged service** — [`Scanner::scan_service`] walks a
//!   [`ToolService`]'s members, reading `tool;name=..;description=..;
//!   paramNames=..` tags, and falls back to the service's plain method set
//!   when nothing is tagged.

#![warn(missing_docs, clippy::pedantic)]

mod arg;
mod callable;
mod descriptor;
mod output;
mod scan;
mod service;
mod tag;

/// Per-parameter typed extraction.
pub use arg::{ArgError, ToolArg, ToolParams};
/// The callable model produced at registration time.
pub use callable::{CallError, Callable, CallingConvention, CompositeArgs, IntoCallable};
/// Immutable tool descriptors.
pub use descriptor::ToolDescriptor;
/// Result extraction from handler return values.
pub use output::ToolOutput;
/// Extraction entry points.
pub use scan::{ExtractError, Scanner};
/// Declaratively tagged services.
pub use service::{ServiceMember, ServiceMethod, ToolService};
/// Tool tag grammar.
pub use tag::ToolTag;
