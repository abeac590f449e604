use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Polymorphic value used for evaluation context fields and for structured flag values.
///
/// Conveniently implements `From` conversions for primitives, `&str`, lists, structures and
/// [`serde_json::Value`].
///
/// ```
/// # use kameleoon_openfeature::Value;
/// let string_value: Value = "example".into();
/// let int_value: Value = 42.into();
/// let missing: Value = None::<bool>.into();
/// assert!(missing.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum Value {
    /// Absence of value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A string value.
    String(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A nested structure.
    Structure(Structure),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean, if this is [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is [`Value::Int`]. Floats are not truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the string slice, if this is [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list elements, if this is [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the structure, if this is [`Value::Structure`].
    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            Value::Structure(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(value: HashMap<String, Value>) -> Self {
        Self::Structure(Structure::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(f)) => Value::Float(f),
                // Only reachable if the engine hands out numbers outside of what serde_json can
                // represent, which means the engine protocol changed under us.
                (None, None) => unreachable!("unsupported JSON number: {}", n),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(array) => array.into_iter().collect(),
            serde_json::Value::Object(object) => Value::Structure(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// String-keyed map of [`Value`]s.
///
/// Lookups are case-sensitive. A missing field reads as [`Value::Null`] rather than an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Structure {
    fields: HashMap<String, Value>,
}

impl Structure {
    /// Create an empty structure.
    pub fn new() -> Self {
        Structure::default()
    }

    /// Get the field value, or [`Value::Null`] if it is absent.
    pub fn get(&self, key: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.fields.get(key).unwrap_or(NULL)
    }

    /// Returns `true` if the field is present, even when it holds [`Value::Null`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the structure has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl From<HashMap<String, Value>> for Structure {
    fn from(fields: HashMap<String, Value>) -> Self {
        Structure { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Structure {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Structure {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
