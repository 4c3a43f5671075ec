use std::fmt;

use crate::style::descriptor::Descriptor;
use crate::style::units::Dim;

/// A value in a style descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A valueless entry, e.g. the body of `@charset "utf-8"`.
    Null,
    /// Only reachable from dynamic input; never a property value.
    Bool(bool),
    Number(f64),
    Str(String),
    /// The canonical string of a dimension-like value (`4px`).
    Unit(String),
    List(Vec<Value>),
    Block(Descriptor),
}

impl Value {
    /// Wraps anything with a CSS string form, such as [`Dim`].
    pub fn unit(value: impl fmt::Display) -> Self {
        Value::Unit(value.to_string())
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Unit(_) => "unit",
            Value::List(_) => "list",
            Value::Block(_) => "descriptor",
        }
    }

    pub fn as_block(&self) -> Option<&Descriptor> {
        match self {
            Value::Block(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Serializes a property value to CSS text.
    ///
    /// Returns `None` when the value is not a property value at all, which
    /// is how callers tell declarations apart from nested blocks. Infinite
    /// and NaN numbers have no CSS form and count as invalid.
    pub fn to_value(&self) -> Option<String> {
        match self {
            Value::Str(s) if s.trim().is_empty() => Some(format!("\"{}\"", s)),
            Value::Str(s) => Some(s.clone()),
            Value::Number(n) if !n.is_finite() => None,
            Value::Number(n) => Some(format_number(*n)),
            Value::Unit(u) => Some(u.clone()),
            Value::List(items) => join_list(items),
            Value::Null | Value::Bool(_) | Value::Block(_) => None,
        }
    }
}

// A list holding other lists is a comma-separated multi-value
// (`transition: opacity 1s, transform 2s`), otherwise space-separated.
fn join_list(items: &[Value]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let separator = if items.iter().any(|item| matches!(item, Value::List(_))) {
        ", "
    } else {
        " "
    };
    let parts = items
        .iter()
        .map(Value::to_value)
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(separator))
}

fn format_number(n: f64) -> String {
    if n == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    n.to_string()
}

/// Converts a camelCase property key to kebab-case.
///
/// A run of capitals starts a single segment, so `WebkitTransform` becomes
/// `-webkit-transform`. Custom properties (`--name`) are left alone.
pub fn kebab_case(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    let mut in_capitals = false;
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if !in_capitals {
                out.push('-');
                in_capitals = true;
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            in_capitals = false;
            out.push(ch);
        }
    }
    out
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<Dim> for Value {
    fn from(dim: Dim) -> Self {
        Value::unit(dim)
    }
}

impl From<Descriptor> for Value {
    fn from(descriptor: Descriptor) -> Self {
        Value::Block(descriptor)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Str(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Block(map.into_iter().collect()),
        }
    }
}
