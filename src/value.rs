//! Dynamic argument values bound into parametrized cases.
//!
//! Case tables hold heterogeneous values (numbers, strings, booleans, lists),
//! so the crate carries them as a small dynamic `Value` type. Two textual
//! forms exist: `Display` is the plain form used when deriving identifier
//! fragments, and [`Value::repr`] is the representation form (strings quoted)
//! used when rendering bound parameters into failure context.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single argument value inside a parametrized case.
///
/// # Examples
///
/// ```rust
/// use parametrize::Value;
/// let v = Value::from("hello");
/// assert_eq!(v.to_string(), "hello");
/// assert_eq!(v.repr(), "\"hello\"");
/// assert_eq!(v.type_name(), "Str");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    /// Returns true if the value is Nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Representation form: like `Display`, but strings are quoted and
    /// escaped. This is the form used in `key=value` parameter context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parametrize::Value;
    /// assert_eq!(Value::Int(3).repr(), "3");
    /// assert_eq!(Value::from("a b").repr(), "\"a b\"");
    /// ```
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("{s:?}"),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::repr).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v.repr()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Map(entries) => {
                let parts: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Case tables may be written as JSON literals; the mapping is total.
/// JSON numbers become `Int` when they fit, `Float` otherwise.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_plain_form() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );
    }

    #[test]
    fn repr_quotes_strings() {
        assert_eq!(Value::from("a").repr(), "\"a\"");
        assert_eq!(Value::Int(7).repr(), "7");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::Int(1)]).repr(),
            "[\"a\", 1]"
        );
    }

    #[test]
    fn type_names_are_stable() {
        assert_eq!(Value::Nil.type_name(), "Nil");
        assert_eq!(Value::Float(0.0).type_name(), "Float");
        assert!(Value::Nil.is_nil());
        assert!(!Value::Int(0).is_nil());
    }

    #[test]
    fn json_values_convert() {
        let json = serde_json::json!([1, "two", 3.5, true, null, {"k": 9}]);
        let value = Value::from(json);
        let Value::List(items) = value else {
            panic!("expected list");
        };
        assert_eq!(items[0], Value::Int(1));
        assert_eq!(items[1], Value::from("two"));
        assert_eq!(items[2], Value::Float(3.5));
        assert_eq!(items[3], Value::Bool(true));
        assert_eq!(items[4], Value::Nil);
        assert_eq!(items[5].repr(), "{k=9}");
    }

    #[test]
    fn serde_round_trip() {
        let v = Value::List(vec![Value::Int(1), Value::from("x")]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
