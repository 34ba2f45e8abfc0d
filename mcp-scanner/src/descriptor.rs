//! Immutable tool descriptors.

use std::fmt;

use mcp_schema::SchemaNode;

use crate::callable::Callable;

/// The record of a registered tool: name, description, generated input
/// schema, resolved parameter property names, and the callable itself.
///
/// Descriptors are created once at registration and never mutated; the
/// registry owns them and hands out shared references to the serving path.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    input_schema: SchemaNode,
    param_names: Vec<String>,
    callable: Callable,
}

impl ToolDescriptor {
    pub(crate) fn new(
        name: String,
        description: String,
        input_schema: SchemaNode,
        param_names: Vec<String>,
        callable: Callable,
    ) -> Self {
        Self {
            name,
            description,
            input_schema,
            param_names,
            callable,
        }
    }

    /// Returns the tool name, unique within a registry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the generated input schema (always an object node).
    #[must_use]
    pub const fn input_schema(&self) -> &SchemaNode {
        &self.input_schema
    }

    /// Returns the resolved property name for each positional parameter, in
    /// order. These drive argument binding at invoke time.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns the underlying callable.
    #[must_use]
    pub const fn callable(&self) -> &Callable {
        &self.callable
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("param_names", &self.param_names)
            .field("callable", &self.callable)
            .finish_non_exhaustive()
    }
}
