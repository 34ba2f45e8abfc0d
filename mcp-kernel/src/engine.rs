//! The invocation pipeline: lookup, bind, coerce, call, extract.

use std::sync::Arc;

use mcp_registry::ToolRegistry;
use mcp_scanner::{CallError, CallingConvention, ToolDescriptor};
use serde_json::{Map, Value};
use tracing::debug;

use crate::coerce::coerce;
use crate::error::InvokeError;

/// Executes invocations against a shared [`ToolRegistry`].
///
/// The engine is cheap to clone and fully synchronous: a slow tool handler
/// blocks only the task that called [`InvocationEngine::invoke`].
#[derive(Clone, Debug)]
pub struct InvocationEngine {
    registry: Arc<ToolRegistry>,
}

impl InvocationEngine {
    /// Creates an engine reading from the supplied registry.
    #[must_use]
    pub const fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this engine reads from.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Runs the full pipeline for one invocation.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::ToolNotFound`] when the name does not resolve,
    /// [`InvokeError::ArgumentConversion`] when any argument is incompatible
    /// with its declared shape (the invocation aborts before the call), and
    /// [`InvokeError::Handler`] when the tool itself fails.
    pub fn invoke(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, InvokeError> {
        let descriptor = self
            .registry
            .find(name)
            .ok_or_else(|| InvokeError::ToolNotFound {
                name: name.to_owned(),
            })?;

        self.invoke_descriptor(&descriptor, arguments)
    }

    fn invoke_descriptor(
        &self,
        descriptor: &ToolDescriptor,
        arguments: &Map<String, Value>,
    ) -> Result<Value, InvokeError> {
        let callable = descriptor.callable();

        let coerced = match callable.convention() {
            CallingConvention::SingleComposite => {
                // The entire argument map binds to the one composite
                // parameter; its fields resolve individually during coercion.
                let label = parameter_label(descriptor, 0);
                let whole = Value::Object(arguments.clone());
                vec![coerce(Some(&whole), &callable.params()[0], label)?]
            }
            CallingConvention::PositionalScalars => {
                let mut values = Vec::with_capacity(callable.params().len());
                for (index, shape) in callable.params().iter().enumerate() {
                    let label = parameter_label(descriptor, index);
                    let raw = bind_argument(arguments, label, index);
                    values.push(coerce(raw, shape, label)?);
                }
                values
            }
        };

        debug!(tool = %descriptor.name(), args = coerced.len(), "invoking tool");

        callable
            .invoke(coerced)
            .map_err(|err| map_call_error(descriptor, &err))
    }
}

fn parameter_label(descriptor: &ToolDescriptor, index: usize) -> &str {
    descriptor
        .param_names()
        .get(index)
        .map_or("argument", String::as_str)
}

/// Resolves the raw value for one parameter: the explicit property name
/// first, then the synthesized positional literal, then a case-insensitive
/// match of either against the map keys.
fn bind_argument<'a>(
    arguments: &'a Map<String, Value>,
    explicit: &str,
    index: usize,
) -> Option<&'a Value> {
    if let Some(value) = arguments.get(explicit) {
        return Some(value);
    }

    let positional = format!("param{}", index + 1);
    if positional != explicit {
        if let Some(value) = arguments.get(&positional) {
            return Some(value);
        }
    }

    arguments
        .iter()
        .find(|(key, _)| {
            key.eq_ignore_ascii_case(explicit) || key.eq_ignore_ascii_case(&positional)
        })
        .map(|(_, value)| value)
}

fn map_call_error(descriptor: &ToolDescriptor, err: &CallError) -> InvokeError {
    match err {
        CallError::Handler { reason } => InvokeError::Handler {
            reason: reason.clone(),
        },
        // Extraction and arity failures mean a shape declaration disagrees
        // with its thunk; report them against the handler channel with the
        // tool named.
        CallError::Argument { .. } | CallError::Arity { .. } => InvokeError::Handler {
            reason: format!("tool `{}`: {err}", descriptor.name()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mcp_schema::{CompositeShape, FieldShape, TypeShape};
    use mcp_scanner::{ServiceMember, ToolParams, ToolService};
    use serde::Deserialize;
    use serde_json::json;

    fn engine_with<F: FnOnce(&ToolRegistry)>(setup: F) -> InvocationEngine {
        let registry = Arc::new(ToolRegistry::new());
        setup(&registry);
        InvocationEngine::new(registry)
    }

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn echo(message: String) -> String {
        format!("Echo: {message}")
    }

    struct Tagged;

    impl ToolService for Tagged {
        fn members(&self) -> Vec<ServiceMember> {
            vec![
                ServiceMember::new("Echo", echo)
                    .tag("tool;name=echo_message;description=Echo a message;paramNames=message"),
                ServiceMember::new("Join", |keyword: String, limit: i64| {
                    format!("{keyword}/{limit}")
                })
                .tag("tool;name=join;paramNames=keyword,limit"),
            ]
        }
    }

    #[test]
    fn unknown_tool_yields_not_found() {
        let engine = engine_with(|_| {});
        let err = engine.invoke("missing", &Map::new()).unwrap_err();
        assert!(matches!(err, InvokeError::ToolNotFound { name } if name == "missing"));
    }

    #[test]
    fn binds_by_explicit_name() {
        let engine = engine_with(|registry| {
            registry.register_service(&Tagged);
        });

        let result = engine
            .invoke("echo_message", &args(json!({"message": "hi"})))
            .unwrap();
        assert_eq!(result, json!("Echo: hi"));
    }

    #[test]
    fn binds_by_positional_literal() {
        let engine = engine_with(|registry| {
            registry.register_callable(echo).unwrap();
        });

        let result = engine
            .invoke("echo", &args(json!({"param1": "hi"})))
            .unwrap();
        assert_eq!(result, json!("Echo: hi"));
    }

    #[test]
    fn binds_case_insensitively_as_last_resort() {
        let engine = engine_with(|registry| {
            registry.register_service(&Tagged);
        });

        let result = engine
            .invoke("join", &args(json!({"Keyword": "ann", "LIMIT": 3})))
            .unwrap();
        assert_eq!(result, json!("ann/3"));
    }

    #[test]
    fn absent_arguments_bind_zero_values() {
        let engine = engine_with(|registry| {
            registry.register_service(&Tagged);
        });

        let result = engine.invoke("join", &args(json!({"keyword": "ann"}))).unwrap();
        assert_eq!(result, json!("ann/0"));
    }

    #[derive(Debug, Deserialize)]
    struct SearchRequest {
        keyword: String,
        limit: i64,
    }

    impl ToolParams for SearchRequest {
        fn composite_shape() -> CompositeShape {
            CompositeShape::new("SearchRequest")
                .field(FieldShape::new("keyword", TypeShape::String).tag("desc=Search keyword,required"))
                .field(FieldShape::new("limit", TypeShape::Integer))
        }
    }

    #[test]
    fn single_composite_binds_whole_argument_map() {
        let engine = engine_with(|registry| {
            registry
                .register_callable(|request: SearchRequest| {
                    format!("{}#{}", request.keyword, request.limit)
                })
                .unwrap();
        });

        let descriptor = &engine.registry().list()[0];
        let name = descriptor.name().to_owned();

        // `limit` is absent: the zero value flows in, not an error.
        let result = engine.invoke(&name, &args(json!({"keyword": "ann"}))).unwrap();
        assert_eq!(result, json!("ann#0"));
    }

    #[test]
    fn integral_number_binds_to_integer_parameter() {
        let engine = engine_with(|registry| {
            registry.register_service(&Tagged);
        });

        let result = engine
            .invoke("join", &args(json!({"keyword": "k", "limit": 5})))
            .unwrap();
        assert_eq!(result, json!("k/5"));
    }

    #[test]
    fn fractional_number_aborts_before_the_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let engine = engine_with(|registry| {
            registry
                .register_callable(move |limit: i64| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    limit
                })
                .unwrap();
        });

        let name = engine.registry().list()[0].name().to_owned();
        let err = engine
            .invoke(&name, &args(json!({"param1": 5.5})))
            .unwrap_err();

        assert!(matches!(err, InvokeError::ArgumentConversion { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0, "handler must not run");
    }

    #[test]
    fn zero_argument_tool_accepts_empty_map() {
        let engine = engine_with(|registry| {
            registry.register_callable(|| "12:00".to_owned()).unwrap();
        });

        let name = engine.registry().list()[0].name().to_owned();
        let result = engine.invoke(&name, &Map::new()).unwrap();
        assert_eq!(result, json!("12:00"));
    }

    #[test]
    fn handler_failure_is_reported() {
        let engine = engine_with(|registry| {
            registry
                .register_callable(|| -> Result<String, std::io::Error> {
                    Err(std::io::Error::other("backend unavailable"))
                })
                .unwrap();
        });

        let name = engine.registry().list()[0].name().to_owned();
        let err = engine.invoke(&name, &Map::new()).unwrap_err();
        assert!(matches!(err, InvokeError::Handler { reason } if reason.contains("backend")));
    }

    #[test]
    fn sequence_arguments_convert_recursively() {
        let engine = engine_with(|registry| {
            registry
                .register_callable(|values: Vec<i64>| values.iter().sum::<i64>())
                .unwrap();
        });

        let name = engine.registry().list()[0].name().to_owned();
        let result = engine
            .invoke(&name, &args(json!({"param1": [1, "2", 3.0]})))
            .unwrap();
        assert_eq!(result, json!(6));
    }
}
