//! Typed extraction of coerced JSON values into native parameter types.

use mcp_schema::{CompositeShape, TypeShape};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Error raised when a coerced value does not match the declared shape.
///
/// The coercion layer normalizes raw arguments before the thunk runs, so in
/// practice this only fires when a shape declaration and its extraction
/// disagree.
#[derive(Debug, Error)]
#[error("expected {expected}, found {found}")]
pub struct ArgError {
    expected: &'static str,
    found: String,
}

impl ArgError {
    /// Creates an error describing the mismatch.
    #[must_use]
    pub fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: value_kind(found).to_owned(),
        }
    }

    /// Creates an error with a custom detail for the found side.
    #[must_use]
    pub fn detail(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A native type usable as a tool parameter.
///
/// `shape()` declares the structural type the mapper publishes; `from_json`
/// extracts the native value from the coerced argument.
pub trait ToolArg: Sized {
    /// Returns the declared shape of this parameter type.
    fn shape() -> TypeShape;

    /// Extracts the native value from a coerced JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] when the value does not match the declared shape.
    fn from_json(value: Value) -> Result<Self, ArgError>;
}

/// A composite (record) parameter type.
///
/// Implementors describe their fields once — identifier, serialization
/// alias, field tag, shape — and a callable taking exactly one such
/// parameter resolves to the single-composite calling convention.
/// Construction goes through `serde::Deserialize`, so aliases declared here
/// must agree with the type's serde names.
pub trait ToolParams: DeserializeOwned {
    /// Returns the composite shape describing this type's fields.
    fn composite_shape() -> CompositeShape;
}

/// Extracts a composite parameter from a coerced JSON object.
///
/// # Errors
///
/// Returns [`ArgError`] when deserialization fails.
pub(crate) fn params_from_json<P: ToolParams>(value: Value) -> Result<P, ArgError> {
    serde_json::from_value(value).map_err(|err| ArgError::detail("object", err.to_string()))
}

impl ToolArg for String {
    fn shape() -> TypeShape {
        TypeShape::String
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ArgError::mismatch("string", &other)),
        }
    }
}

impl ToolArg for bool {
    fn shape() -> TypeShape {
        TypeShape::Boolean
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        value
            .as_bool()
            .ok_or_else(|| ArgError::mismatch("boolean", &value))
    }
}

impl ToolArg for i64 {
    fn shape() -> TypeShape {
        TypeShape::Integer
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        value
            .as_i64()
            .ok_or_else(|| ArgError::mismatch("integer", &value))
    }
}

impl ToolArg for i32 {
    fn shape() -> TypeShape {
        TypeShape::Integer
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        let wide = i64::from_json(value)?;
        i32::try_from(wide).map_err(|_| ArgError::detail("integer", format!("{wide} out of range")))
    }
}

impl ToolArg for u32 {
    fn shape() -> TypeShape {
        TypeShape::Integer
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        let wide = i64::from_json(value)?;
        u32::try_from(wide).map_err(|_| ArgError::detail("integer", format!("{wide} out of range")))
    }
}

impl ToolArg for u64 {
    fn shape() -> TypeShape {
        TypeShape::Integer
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        value
            .as_u64()
            .ok_or_else(|| ArgError::mismatch("integer", &value))
    }
}

impl ToolArg for f64 {
    fn shape() -> TypeShape {
        TypeShape::Float
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        value
            .as_f64()
            .ok_or_else(|| ArgError::mismatch("number", &value))
    }
}

impl ToolArg for f32 {
    fn shape() -> TypeShape {
        TypeShape::Float
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_json(value: Value) -> Result<Self, ArgError> {
        Ok(f64::from_json(value)? as f32)
    }
}

impl<T: ToolArg> ToolArg for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::Sequence(Box::new(T::shape()))
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Array(elements) => elements.into_iter().map(T::from_json).collect(),
            other => Err(ArgError::mismatch("array", &other)),
        }
    }
}

impl<T: ToolArg> ToolArg for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Optional(Box::new(T::shape()))
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_json(other).map(Some),
        }
    }
}

// Boxed parameters are transparent: one level of indirection, same shape.
impl<T: ToolArg> ToolArg for Box<T> {
    fn shape() -> TypeShape {
        T::shape()
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        T::from_json(value).map(Box::new)
    }
}

impl ToolArg for Value {
    fn shape() -> TypeShape {
        TypeShape::Opaque
    }

    fn from_json(value: Value) -> Result<Self, ArgError> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_schema::FieldShape;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn scalar_extraction() {
        assert_eq!(String::from_json(json!("hi")).unwrap(), "hi");
        assert_eq!(i64::from_json(json!(5)).unwrap(), 5);
        assert_eq!(i32::from_json(json!(-7)).unwrap(), -7);
        assert!((f64::from_json(json!(1.5)).unwrap() - 1.5).abs() < f64::EPSILON);
        assert!(bool::from_json(json!(true)).unwrap());
    }

    #[test]
    fn mismatches_error() {
        let err = i64::from_json(json!("five")).unwrap_err();
        assert!(err.to_string().contains("integer"));

        let err = String::from_json(json!(1)).unwrap_err();
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn sequence_and_optional_shapes() {
        assert_eq!(
            Vec::<i64>::shape(),
            TypeShape::Sequence(Box::new(TypeShape::Integer))
        );
        assert_eq!(
            Option::<String>::shape(),
            TypeShape::Optional(Box::new(TypeShape::String))
        );

        let values = Vec::<i64>::from_json(json!([1, 2, 3])).unwrap();
        assert_eq!(values, [1, 2, 3]);

        assert_eq!(Option::<i64>::from_json(Value::Null).unwrap(), None);
        assert_eq!(Option::<i64>::from_json(json!(9)).unwrap(), Some(9));

        // Boxes unwrap to the inner shape.
        assert_eq!(Box::<i64>::shape(), TypeShape::Integer);
        assert_eq!(*Box::<i64>::from_json(json!(9)).unwrap(), 9);
    }

    #[derive(Debug, Deserialize, PartialEq)]
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
    fn composite_params_extract_via_serde() {
        let value = json!({"keyword": "ann", "limit": 0});
        let request: SearchRequest = params_from_json(value).unwrap();
        assert_eq!(
            request,
            SearchRequest {
                keyword: "ann".to_owned(),
                limit: 0
            }
        );
        assert!(SearchRequest::composite_shape().fields().len() == 2);
    }

    #[test]
    fn composite_extraction_failure_is_reported() {
        let err = params_from_json::<SearchRequest>(json!("not an object")).unwrap_err();
        assert!(err.to_string().contains("object"));
    }
}
