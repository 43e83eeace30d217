//! Zero-value coercions for the convenience getters.
//!
//! A missing value (`None`) or `null` always yields the type's zero value.
//! Scalars are coerced loosely: numbers render as text, `"true"`/`"1"` read
//! as booleans, numeric strings read as integers.

use serde_json::Value;

pub fn to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn to_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.as_str(),
            "1" | "t" | "T" | "true" | "TRUE" | "True"
        ),
        _ => false,
    }
}

pub fn to_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or_default()
        }
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}

/// Like [`to_i64`], saturated to the `i32` range.
pub fn to_int(value: Option<&Value>) -> i32 {
    to_i64(value).clamp(i32::MIN.into(), i32::MAX.into()) as i32
}

/// Arrays map element-wise through [`to_string`]; a lone scalar becomes a one-element slice.
pub fn to_string_slice(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(|v| to_string(Some(v))).collect(),
        Some(other) => vec![to_string(Some(other))],
    }
}
