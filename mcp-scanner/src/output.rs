//! Result extraction from handler return values.

use std::fmt::Display;

use serde_json::Value;

use crate::callable::CallError;

/// A value a tool handler may return.
///
/// Exactly one value is surfaced to the caller. A handler returning
/// `Result<T, E>` surfaces its error as an invocation failure rather than
/// silently discarding it; plain values convert infallibly.
pub trait ToolOutput {
    /// Converts the handler's return value into the surfaced JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Handler`] when the handler reported a failure.
    fn into_value(self) -> Result<Value, CallError>;
}

impl ToolOutput for () {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::Null)
    }
}

impl ToolOutput for Value {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(self)
    }
}

impl ToolOutput for String {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::String(self))
    }
}

impl ToolOutput for &str {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::String(self.to_owned()))
    }
}

impl ToolOutput for bool {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::Bool(self))
    }
}

impl ToolOutput for i32 {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::from(self))
    }
}

impl ToolOutput for i64 {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::from(self))
    }
}

impl ToolOutput for u32 {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::from(self))
    }
}

impl ToolOutput for u64 {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::from(self))
    }
}

impl ToolOutput for f32 {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::from(f64::from(self)))
    }
}

impl ToolOutput for f64 {
    fn into_value(self) -> Result<Value, CallError> {
        Ok(Value::from(self))
    }
}

impl<T: ToolOutput> ToolOutput for Vec<T> {
    fn into_value(self) -> Result<Value, CallError> {
        let elements = self
            .into_iter()
            .map(ToolOutput::into_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(elements))
    }
}

impl<T: ToolOutput> ToolOutput for Option<T> {
    fn into_value(self) -> Result<Value, CallError> {
        match self {
            Some(value) => value.into_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: ToolOutput, E: Display> ToolOutput for Result<T, E> {
    fn into_value(self) -> Result<Value, CallError> {
        match self {
            Ok(value) => value.into_value(),
            Err(err) => Err(CallError::handler(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_convert_directly() {
        assert_eq!("hi".into_value().unwrap(), json!("hi"));
        assert_eq!(5_i64.into_value().unwrap(), json!(5));
        assert_eq!(true.into_value().unwrap(), json!(true));
        assert_eq!(().into_value().unwrap(), Value::Null);
    }

    #[test]
    fn collections_convert_elementwise() {
        let values = vec!["a".to_owned(), "b".to_owned()];
        assert_eq!(values.into_value().unwrap(), json!(["a", "b"]));

        let nested: Vec<Vec<i64>> = vec![vec![1, 2], vec![3]];
        assert_eq!(nested.into_value().unwrap(), json!([[1, 2], [3]]));
    }

    #[test]
    fn result_error_becomes_handler_failure() {
        let outcome: Result<String, String> = Err("database offline".to_owned());
        let err = outcome.into_value().unwrap_err();
        assert!(matches!(err, CallError::Handler { reason } if reason == "database offline"));
    }

    #[test]
    fn result_ok_unwraps() {
        let outcome: Result<i64, String> = Ok(7);
        assert_eq!(outcome.into_value().unwrap(), json!(7));
    }
}
