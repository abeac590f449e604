use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Value;

/// Per-evaluation context supplied by the caller.
///
/// Holds the targeting key (the Kameleoon visitor code) and arbitrary fields. Fields under the
/// reserved keys `"conversion"`, `"customData"` and `"variableKey"` are interpreted by the
/// provider; the rest are ignored.
///
/// ```
/// # use kameleoon_openfeature::{EvaluationContext, Structure};
/// let context = EvaluationContext::default()
///     .with_targeting_key("visitor-code")
///     .with_field("customData", Structure::new().with("index", 1).with("values", "premium"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    /// Visitor code the flag is evaluated for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting_key: Option<String>,
    /// Custom fields, serialized next to the targeting key.
    #[serde(default, flatten)]
    pub fields: HashMap<String, Value>,
}

impl EvaluationContext {
    /// Set the targeting key, returning `self` for chaining.
    pub fn with_targeting_key(mut self, targeting_key: impl Into<String>) -> Self {
        self.targeting_key = Some(targeting_key.into());
        self
    }

    /// Set a field, returning `self` for chaining.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Targeting key, treating an empty string as absent.
    pub fn targeting_key(&self) -> Option<&str> {
        self.targeting_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Get a custom field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns `true` if there are no custom fields. The targeting key is not considered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over custom fields in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}
