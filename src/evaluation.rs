use serde::{Deserialize, Serialize};

/// Classification of a failed evaluation. Carried on [`ResolutionDetails`]; evaluation itself never
/// returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The context has no usable targeting key (visitor code).
    TargetingKeyMissing,
    /// The feature, its variation or the requested variable is unknown.
    FlagNotFound,
    /// The variable value has a different type than the requested one.
    TypeMismatch,
    /// The engine rejected the context, e.g. the visitor code is malformed.
    InvalidContext,
    /// Any other failure.
    General,
}

/// Why the value was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// The value was looked up for this very evaluation; nothing is cached at the provider level.
    Static,
}

/// Outcome of a single flag evaluation.
///
/// On failure `value` holds the caller's default and `error_code`/`error_message` describe what
/// went wrong. `variant` is set whenever the engine managed to pick a variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDetails<T> {
    /// Resolved value, or the default on failure.
    pub value: T,
    /// Key of the variation assigned to the visitor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Set when the evaluation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    /// Human-readable description of the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Why this value was returned.
    pub reason: Reason,
}

impl<T> ResolutionDetails<T> {
    pub(crate) fn success(value: T, variant: String) -> Self {
        ResolutionDetails {
            value,
            variant: Some(variant),
            error_code: None,
            error_message: None,
            reason: Reason::Static,
        }
    }

    pub(crate) fn error(
        value: T,
        variant: Option<String>,
        error_code: ErrorCode,
        error_message: impl Into<String>,
    ) -> Self {
        ResolutionDetails {
            value,
            variant,
            error_code: Some(error_code),
            error_message: Some(error_message.into()),
            reason: Reason::Static,
        }
    }

    /// Returns `true` if the evaluation produced no error.
    pub fn is_success(&self) -> bool {
        self.error_code.is_none()
    }

    /// Maps the value, keeping variant, error and reason.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResolutionDetails<U> {
        ResolutionDetails {
            value: f(self.value),
            variant: self.variant,
            error_code: self.error_code,
            error_message: self.error_message,
            reason: self.reason,
        }
    }
}
