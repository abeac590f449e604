use std::time::Duration;

use crate::KameleoonError;

/// Configuration of a Kameleoon client, passed to the [`ClientBuilder`](crate::ClientBuilder)
/// that constructs it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) top_level_domain: Option<String>,
    pub(crate) environment: Option<String>,
    pub(crate) refresh_interval: Duration,
    pub(crate) default_timeout: Duration,
}

impl ClientConfig {
    /// Default interval between configuration refreshes.
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

    /// Default timeout for network requests.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a configuration using the API credentials from the Kameleoon back-office.
    ///
    /// ```
    /// # use kameleoon_openfeature::ClientConfig;
    /// let config = ClientConfig::new("client-id", "client-secret").unwrap();
    /// assert!(ClientConfig::new("", "client-secret").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`KameleoonError::ConfigCredentialsInvalid`] if either credential is empty.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, KameleoonError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() {
            return Err(KameleoonError::ConfigCredentialsInvalid(
                "Client ID is not specified".to_owned(),
            ));
        }
        if client_secret.is_empty() {
            return Err(KameleoonError::ConfigCredentialsInvalid(
                "Client secret is not specified".to_owned(),
            ));
        }

        Ok(ClientConfig {
            client_id,
            client_secret,
            top_level_domain: None,
            environment: None,
            refresh_interval: Self::DEFAULT_REFRESH_INTERVAL,
            default_timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Set the top-level domain used for the visitor code cookie.
    pub fn top_level_domain(&mut self, top_level_domain: impl Into<String>) -> &mut Self {
        self.top_level_domain = Some(top_level_domain.into());
        self
    }

    /// Set the environment (e.g., "production" or "staging") features are evaluated for.
    pub fn environment(&mut self, environment: impl Into<String>) -> &mut Self {
        self.environment = Some(environment.into());
        self
    }

    /// Override the configuration refresh interval. Zero falls back to the default.
    pub fn refresh_interval(&mut self, refresh_interval: Duration) -> &mut Self {
        self.refresh_interval = if refresh_interval.is_zero() {
            Self::DEFAULT_REFRESH_INTERVAL
        } else {
            refresh_interval
        };
        self
    }

    /// Override the network timeout. Zero falls back to the default.
    pub fn default_timeout(&mut self, default_timeout: Duration) -> &mut Self {
        self.default_timeout = if default_timeout.is_zero() {
            Self::DEFAULT_TIMEOUT
        } else {
            default_timeout
        };
        self
    }

    /// Client ID of the API credentials.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client secret of the API credentials.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Top-level domain for the visitor code cookie, if set.
    pub fn get_top_level_domain(&self) -> Option<&str> {
        self.top_level_domain.as_deref()
    }

    /// Environment features are evaluated for, if set.
    pub fn get_environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Interval between configuration refreshes.
    pub fn get_refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Timeout for network requests.
    pub fn get_default_timeout(&self) -> Duration {
        self.default_timeout
    }
}
