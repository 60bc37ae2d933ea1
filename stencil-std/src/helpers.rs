//! Helper functions for filter arguments

use stencil_core::{StencilError, Value};

/// Fail unless `args` has between `min` and `max` entries
pub fn expect_args(filter: &str, args: &[Value], min: usize, max: usize) -> Result<(), StencilError> {
    if args.len() < min || args.len() > max {
        let expected = if args.len() < min { min } else { max };
        return Err(StencilError::arg_count(filter, expected, args.len()));
    }
    Ok(())
}

/// Argument rendered as text, if present
pub fn arg_text(args: &[Value], index: usize) -> Option<String> {
    args.get(index).map(|v| v.to_string())
}

/// Text argument; lists and objects are rejected
pub fn require_text_arg(args: &[Value], index: usize, filter: &str, arg: &str) -> Result<String, StencilError> {
    match args.get(index) {
        Some(v @ (Value::Text(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_))) => Ok(v.to_string()),
        Some(other) => Err(StencilError::arg_type(filter, arg, "Text", other.type_name())),
        None => Err(StencilError::arg_count(filter, index + 1, args.len())),
    }
}

/// Empty means nil, empty text, or an empty list or object
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Nil => true,
        Value::Text(s) => s.is_empty(),
        Value::List(l) => l.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
