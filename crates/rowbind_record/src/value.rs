//! Dynamic record value type.

use crate::error::ValueTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamic storage cell value.
///
/// This type represents any value rowbind can move between a storage row
/// and an entity field. Floats are included because relational columns
/// carry them; as a consequence `Value` is `PartialEq` but not `Eq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (supports full i64 range).
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text string (UTF-8).
    Text(String),
}

impl Value {
    /// Check if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is "empty" in the storage-shim sense.
    ///
    /// True for null, `false`, `0`, `0.0` and the empty string. The
    /// persistence layer uses this to decide whether a primary-key cell
    /// carries no usable value and must be dropped before an insert.
    #[must_use]
    pub fn is_empty_like(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Integer(n) => *n == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
        }
    }

    /// Get this value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is one.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The kind of this value, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = ValueTypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(n) => Ok(n),
            other => Err(ValueTypeError::new("integer", other.kind())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueTypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(f) => Ok(f),
            // Integer cells widen to float.
            Value::Integer(n) => Ok(n as f64),
            other => Err(ValueTypeError::new("float", other.kind())),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ValueTypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ValueTypeError::new("bool", other.kind())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ValueTypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ValueTypeError::new("text", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(true).is_null());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_bool(), None);

        assert_eq!(Value::Integer(42).as_integer(), Some(42));
        assert_eq!(Value::Text("42".to_string()).as_integer(), None);

        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Text("hello".to_string()).as_text(), Some("hello"));
    }

    #[test]
    fn emptiness() {
        assert!(Value::Null.is_empty_like());
        assert!(Value::Bool(false).is_empty_like());
        assert!(Value::Integer(0).is_empty_like());
        assert!(Value::Float(0.0).is_empty_like());
        assert!(Value::Text(String::new()).is_empty_like());

        assert!(!Value::Bool(true).is_empty_like());
        assert!(!Value::Integer(33).is_empty_like());
        assert!(!Value::Text("x".to_string()).is_empty_like());
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Integer(42));
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(42u32), Value::Integer(42));
        assert_eq!(Value::from(1.25), Value::Float(1.25));
        assert_eq!(Value::from("hello"), Value::Text("hello".to_string()));
        assert_eq!(Value::from(Some(3i64)), Value::Integer(3));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn try_from_success() {
        assert_eq!(i64::try_from(Value::Integer(7)), Ok(7));
        assert_eq!(bool::try_from(Value::Bool(true)), Ok(true));
        assert_eq!(String::try_from(Value::Text("a".into())), Ok("a".into()));
        assert_eq!(f64::try_from(Value::Float(2.5)), Ok(2.5));
        assert_eq!(f64::try_from(Value::Integer(2)), Ok(2.0));
    }

    #[test]
    fn try_from_mismatch_names_kinds() {
        let err = i64::try_from(Value::Text("seven".into())).unwrap_err();
        assert_eq!(err.expected, "integer");
        assert_eq!(err.actual, "text");
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(5).to_string(), "5");
        assert_eq!(Value::Text("hi".into()).to_string(), "hi");
    }
}
