use std::sync::Arc;

use crate::{
    converter, data::VARIABLE_KEY, ErrorCode, EvaluationContext, KameleoonClient, KameleoonError,
    ResolutionDetails, Value, VariableValue, Variables,
};

/// Evaluates flags based on the provided context.
pub trait Resolver: Send + Sync {
    /// Resolve `flag_key` for the visitor identified by the context targeting key.
    ///
    /// Never fails: on any error `default_value` is returned, annotated with an [`ErrorCode`].
    fn resolve<T: FlagValue>(
        &self,
        flag_key: &str,
        default_value: T,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<T>;
}

/// Types a flag can be resolved to.
///
/// Each type accepts exactly one [`VariableValue`] kind. Integer and floating-point values are
/// distinct: an `Integer` variable does not satisfy an `f64` default and a `Double` variable does
/// not satisfy an `i64` default.
pub trait FlagValue: Sized {
    /// Convert the raw variable value, or return `None` if its kind does not match `Self`.
    fn from_variable(value: &VariableValue) -> Option<Self>;
}

impl FlagValue for bool {
    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl FlagValue for String {
    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FlagValue for i64 {
    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// 32-bit integers belong to the same family as 64-bit ones; values outside of `i32` range are a
/// type mismatch.
impl FlagValue for i32 {
    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Integer(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FlagValue for f64 {
    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl FlagValue for Value {
    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Json(json) => Some(converter::to_open_feature(json.clone())),
            _ => None,
        }
    }
}

/// [`Resolver`] backed by a [`KameleoonClient`].
#[derive(Clone)]
pub struct KameleoonResolver {
    client: Arc<dyn KameleoonClient>,
}

impl KameleoonResolver {
    /// Create a resolver evaluating flags with `client`.
    pub fn new(client: Arc<dyn KameleoonClient>) -> Self {
        KameleoonResolver { client }
    }

    /// Run the engine calls. The returned details hold `None` whenever the default value must be
    /// used instead.
    fn evaluate<T: FlagValue>(
        &self,
        flag_key: &str,
        visitor_code: &str,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<Option<T>>, KameleoonError> {
        self.client
            .add_data(visitor_code, converter::to_kameleoon(context))?;

        let variant = self
            .client
            .get_feature_variation_key(visitor_code, flag_key)?;

        let variables = self
            .client
            .get_feature_variation_variables(flag_key, &variant)?;

        // It's up to the caller to configure a single variable per variation when no variable
        // key is given in the context.
        let variable_key = variable_key(context, &variables);

        let Some(value) = variable_key
            .and_then(|key| variables.get(key))
            .filter(|value| !value.is_null())
        else {
            let message = match variable_key {
                Some(key) if !key.is_empty() => format!(
                    "The value for provided variable key '{}' isn't found in variation '{}'",
                    key, variant
                ),
                _ => format!("The variation '{}' has no variables", variant),
            };
            log::warn!(target: "kameleoon",
                       flag_key,
                       visitor_code,
                       variant:display = variant;
                       "{}", message);
            return Ok(ResolutionDetails::error(
                None,
                Some(variant),
                ErrorCode::FlagNotFound,
                message,
            ));
        };

        let Some(typed_value) = T::from_variable(value) else {
            log::warn!(target: "kameleoon",
                       flag_key,
                       visitor_code,
                       variant:display = variant,
                       value:serde = value;
                       "variable type differs from the requested type");
            return Ok(ResolutionDetails::error(
                None,
                Some(variant),
                ErrorCode::TypeMismatch,
                "The type of value received is different from the requested value.",
            ));
        };

        log::trace!(target: "kameleoon",
                    flag_key,
                    visitor_code,
                    variant:display = variant,
                    value:serde = value;
                    "evaluated a flag");

        Ok(ResolutionDetails::success(Some(typed_value), variant))
    }
}

impl Resolver for KameleoonResolver {
    fn resolve<T: FlagValue>(
        &self,
        flag_key: &str,
        default_value: T,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<T> {
        let Some(visitor_code) = context.and_then(EvaluationContext::targeting_key) else {
            return ResolutionDetails::error(
                default_value,
                None,
                ErrorCode::TargetingKeyMissing,
                "The TargetingKey is required in context and cannot be omitted.",
            );
        };

        match self.evaluate(flag_key, visitor_code, context) {
            Ok(details) => details.map(|value| value.unwrap_or(default_value)),
            Err(err) => {
                log::warn!(target: "kameleoon",
                           flag_key,
                           visitor_code,
                           error:display = err;
                           "error occurred while evaluating a flag");
                let error_code = if err.is_feature_error() {
                    ErrorCode::FlagNotFound
                } else if matches!(err, KameleoonError::VisitorCodeInvalid(_)) {
                    ErrorCode::InvalidContext
                } else {
                    ErrorCode::General
                };
                ResolutionDetails::error(default_value, None, error_code, err.to_string())
            }
        }
    }
}

/// Get the variable key from the context, or the first key of the variation.
fn variable_key<'a>(
    context: Option<&'a EvaluationContext>,
    variables: &'a Variables,
) -> Option<&'a str> {
    context
        .and_then(|context| context.get(VARIABLE_KEY))
        .and_then(Value::as_str)
        .or_else(|| variables.keys().next().map(String::as_str))
}
