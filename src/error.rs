/// Represents a result type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the Kameleoon engine.
///
/// The display text is the engine's own message and is surfaced as-is in
/// [`ResolutionDetails::error_message`](crate::ResolutionDetails::error_message).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KameleoonError {
    /// The feature does not exist in the engine configuration.
    #[error("{0}")]
    FeatureNotFound(String),

    /// The feature exists but has no such variation.
    #[error("{0}")]
    FeatureVariationNotFound(String),

    /// The feature is disabled for the current environment.
    #[error("{0}")]
    FeatureEnvironmentDisabled(String),

    /// The visitor code is empty or too long.
    #[error("{0}")]
    VisitorCodeInvalid(String),

    /// The engine has not fetched its configuration yet.
    #[error("{0}")]
    SdkNotReady(String),

    /// Site code was not provided.
    #[error("{0}")]
    SiteCodeIsEmpty(String),

    /// Client id or client secret is missing.
    #[error("{0}")]
    ConfigCredentialsInvalid(String),

    /// Any other engine failure.
    #[error("{0}")]
    Other(String),
}

impl KameleoonError {
    /// Returns `true` for errors about the feature itself (missing, disabled, unknown variation).
    pub fn is_feature_error(&self) -> bool {
        matches!(
            self,
            KameleoonError::FeatureNotFound(_)
                | KameleoonError::FeatureVariationNotFound(_)
                | KameleoonError::FeatureEnvironmentDisabled(_)
        )
    }
}

/// Enum representing possible errors of the provider lifecycle.
///
/// Flag evaluation never fails with these; see [`ErrorCode`](crate::ErrorCode) instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The Kameleoon client could not be created or failed to initialize.
    #[error("provider is not ready: {0}")]
    ProviderNotReady(#[source] KameleoonError),

    /// Error returned by the Kameleoon engine.
    #[error(transparent)]
    Kameleoon(#[from] KameleoonError),
}
