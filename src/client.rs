use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::{Data, KameleoonError, Value};

/// Variables of a feature variation, keyed by variable name.
pub type Variables = HashMap<String, VariableValue>;

/// Raw value of a feature variable as returned by the Kameleoon engine.
///
/// The kind is only checked against the requested type during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableValue {
    /// A boolean variable.
    Boolean(bool),
    /// An integer variable.
    Integer(i64),
    /// A floating-point variable.
    Double(f64),
    /// A string variable.
    String(String),
    /// A JSON variable, either an object or an array.
    Json(serde_json::Value),
}

impl VariableValue {
    /// Returns `true` for a JSON `null`, which the engine uses for unset variables.
    pub fn is_null(&self) -> bool {
        matches!(self, VariableValue::Json(serde_json::Value::Null))
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<VariableValue> for Value {
    fn from(value: VariableValue) -> Self {
        match value {
            VariableValue::Boolean(b) => Value::Bool(b),
            VariableValue::Integer(i) => Value::Int(i),
            VariableValue::Double(d) => Value::Float(d),
            VariableValue::String(s) => Value::String(s),
            VariableValue::Json(json) => json.into(),
        }
    }
}

/// Initialization state of a Kameleoon client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// The client is still fetching its configuration.
    Pending,
    /// The client is ready to evaluate features.
    Ready,
    /// The client failed to initialize.
    Failed,
}

/// Capability of the Kameleoon engine consumed by the provider.
///
/// The provider never owns the engine's lifecycle beyond waiting for it to initialize; any
/// implementation must be safe to call from multiple threads.
pub trait KameleoonClient: Send + Sync {
    /// Associate data with the visitor.
    fn add_data(&self, visitor_code: &str, data: Vec<Data>) -> Result<(), KameleoonError>;

    /// Get the key of the variation assigned to the visitor for the feature.
    fn get_feature_variation_key(
        &self,
        visitor_code: &str,
        feature_key: &str,
    ) -> Result<String, KameleoonError>;

    /// Get all variables of the feature variation.
    fn get_feature_variation_variables(
        &self,
        feature_key: &str,
        variation_key: &str,
    ) -> Result<Variables, KameleoonError>;

    /// Block until the client is initialized.
    fn wait_init(&self) -> Result<(), KameleoonError>;

    /// Current initialization state. Must not block.
    fn init_state(&self) -> InitState;
}
