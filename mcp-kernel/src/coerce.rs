//! Value coercion: the inverse of schema mapping.
//!
//! Each [`TypeShape`] kind has a matching rule for parsing a raw JSON value
//! into a value the callable's thunk can extract natively. Absent values are
//! tolerated — they yield the shape's zero value — while present but
//! structurally incompatible values are hard errors carrying the offending
//! parameter path.

use mcp_schema::{CompositeShape, TypeShape};
use serde_json::{Map, Value};
use thiserror::Error;

/// A coercion failure, pointing at the parameter (or nested property) that
/// could not be converted.
#[derive(Debug, Error)]
#[error("parameter `{path}`: expected {expected}, got {found}")]
pub struct CoerceError {
    path: String,
    expected: &'static str,
    found: String,
}

impl CoerceError {
    fn new(path: &str, expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            path: path.to_owned(),
            expected,
            found: found.into(),
        }
    }

    /// Returns the path of the offending parameter.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => format!("boolean `{b}`"),
        Value::Number(n) => format!("number `{n}`"),
        Value::String(s) => format!("string `{s}`"),
        Value::Array(_) => "an array".to_owned(),
        Value::Object(_) => "an object".to_owned(),
    }
}

/// Coerces a raw argument into the declared shape.
///
/// `raw` of `None` (argument absent) and JSON `null` both produce the
/// shape's zero value rather than an error.
///
/// # Errors
///
/// Returns [`CoerceError`] when the value is present but structurally
/// incompatible with the shape.
pub(crate) fn coerce(
    raw: Option<&Value>,
    shape: &TypeShape,
    path: &str,
) -> Result<Value, CoerceError> {
    let value = match raw {
        None | Some(Value::Null) => return Ok(shape.zero_value()),
        Some(value) => value,
    };

    match shape {
        TypeShape::String => coerce_string(value, path),
        TypeShape::Integer => coerce_integer(value, path),
        TypeShape::Float => coerce_float(value, path),
        TypeShape::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(CoerceError::new(path, "a boolean", describe(other))),
        },
        TypeShape::Sequence(element) => coerce_sequence(value, element, path),
        TypeShape::Optional(inner) => coerce(Some(value), inner, path),
        TypeShape::Composite(composite) => coerce_composite(value, composite, path),
        TypeShape::Opaque => Ok(value.clone()),
    }
}

fn coerce_string(value: &Value, path: &str) -> Result<Value, CoerceError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        // Scalars stringify; structured values do not.
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(CoerceError::new(path, "a string", describe(other))),
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn coerce_integer(value: &Value, path: &str) -> Result<Value, CoerceError> {
    match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Ok(value.clone());
            }
            // Fractional numbers are rejected rather than truncated.
            let float = n.as_f64().unwrap_or(f64::NAN);
            if float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                Ok(Value::from(float as i64))
            } else {
                Err(CoerceError::new(path, "an integer", describe(value)))
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| CoerceError::new(path, "an integer", describe(value))),
        other => Err(CoerceError::new(path, "an integer", describe(other))),
    }
}

fn coerce_float(value: &Value, path: &str) -> Result<Value, CoerceError> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| CoerceError::new(path, "a number", describe(value))),
        other => Err(CoerceError::new(path, "a number", describe(other))),
    }
}

fn coerce_sequence(
    value: &Value,
    element: &TypeShape,
    path: &str,
) -> Result<Value, CoerceError> {
    match value {
        Value::Array(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{index}]");
                converted.push(coerce(Some(item), element, &item_path)?);
            }
            Ok(Value::Array(converted))
        }
        other => Err(CoerceError::new(path, "an array", describe(other))),
    }
}

fn coerce_composite(
    value: &Value,
    composite: &CompositeShape,
    path: &str,
) -> Result<Value, CoerceError> {
    match value {
        Value::Object(supplied) => {
            let mut converted = Map::new();
            for field in composite.fields() {
                let Some(property) = field.property_name() else {
                    continue;
                };
                let field_path = format!("{path}.{property}");
                let raw = supplied.get(property);
                converted.insert(
                    property.to_owned(),
                    coerce(raw, field.shape(), &field_path)?,
                );
            }
            // Keys the shape does not declare are dropped silently.
            Ok(Value::Object(converted))
        }
        other => Err(CoerceError::new(path, "an object", describe(other))),
    }
}
