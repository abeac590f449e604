use std::sync::Arc;

use crate::{
    client::InitState, ClientConfig, Error, EvaluationContext, KameleoonClient,
    KameleoonClientFactory, KameleoonError, KameleoonResolver, ResolutionDetails, Resolver, Result,
    Value,
};

/// Name reported in [`ProviderMetadata`].
const META_NAME: &str = "Kameleoon Provider";

/// Provider metadata exposed to the OpenFeature client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Provider name.
    pub name: String,
}

/// Readiness of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// Flags can be evaluated.
    Ready,
    /// The client is still initializing or failed to initialize.
    NotReady,
}

/// OpenFeature provider interface.
pub trait FeatureProvider {
    /// Metadata identifying the provider.
    fn metadata(&self) -> ProviderMetadata;

    /// Block until the provider is able to evaluate flags.
    fn initialize(&self, context: Option<&EvaluationContext>) -> Result<()>;

    /// Release resources held by the provider.
    fn shutdown(&self);

    /// Current readiness. Never blocks.
    fn state(&self) -> ProviderState;

    /// Resolve a boolean flag.
    fn resolve_bool_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<bool>;

    /// Resolve a string flag.
    fn resolve_string_value(
        &self,
        flag_key: &str,
        default_value: String,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<String>;

    /// Resolve an integer flag. Only integer variables match.
    fn resolve_int_value(
        &self,
        flag_key: &str,
        default_value: i64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<i64>;

    /// Resolve a floating-point flag. Only double variables match.
    fn resolve_float_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<f64>;

    /// Resolve a JSON flag into a [`Value`].
    fn resolve_struct_value(
        &self,
        flag_key: &str,
        default_value: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value>;
}

/// [`FeatureProvider`] implementation for the Kameleoon SDK.
///
/// The visitor code is taken from the context targeting key. Context fields under `"customData"`
/// and `"conversion"` are sent to Kameleoon before every evaluation, and `"variableKey"` selects
/// the variable of the variation to return.
///
/// # Examples
/// ```no_run
/// # use std::sync::Arc;
/// # use kameleoon_openfeature::*;
/// # fn connect(site_code: &str, config: &ClientConfig) -> Arc<dyn KameleoonClient> { unimplemented!() }
/// let factory = Arc::new(KameleoonClientFactory::new(|site_code: &str, config: &ClientConfig| {
///     Ok::<_, KameleoonError>(connect(site_code, config))
/// }));
/// let config = ClientConfig::new("clientId", "clientSecret").unwrap();
/// let provider = KameleoonProvider::new("siteCode", &config, factory).unwrap();
/// provider.initialize(None).unwrap();
///
/// let context = EvaluationContext::default().with_targeting_key("visitorCode");
/// let details = provider.resolve_bool_value("feature_key", false, Some(&context));
/// ```
pub struct KameleoonProvider<R = KameleoonResolver> {
    site_code: String,
    client: Arc<dyn KameleoonClient>,
    resolver: R,
    factory: Arc<KameleoonClientFactory>,
}

impl KameleoonProvider {
    /// Create a provider for `site_code`, reusing the factory's client for that site code if it
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProviderNotReady`] if the site code is empty, or [`Error::Kameleoon`] if
    /// the client could not be built.
    pub fn new(
        site_code: impl Into<String>,
        config: &ClientConfig,
        factory: Arc<KameleoonClientFactory>,
    ) -> Result<Self> {
        let site_code = site_code.into();
        let client = factory
            .create(&site_code, config)
            .map_err(|err| match err {
                KameleoonError::SiteCodeIsEmpty(_) => Error::ProviderNotReady(err),
                err => Error::Kameleoon(err),
            })?;
        let resolver = KameleoonResolver::new(client.clone());
        Ok(Self::with_resolver(site_code, client, resolver, factory))
    }
}

impl<R: Resolver> KameleoonProvider<R> {
    pub(crate) fn with_resolver(
        site_code: String,
        client: Arc<dyn KameleoonClient>,
        resolver: R,
        factory: Arc<KameleoonClientFactory>,
    ) -> Self {
        KameleoonProvider {
            site_code,
            client,
            resolver,
            factory,
        }
    }

    /// The underlying Kameleoon client, for functionality beyond OpenFeature.
    pub fn client(&self) -> &Arc<dyn KameleoonClient> {
        &self.client
    }

    /// Site code the provider was created for.
    pub fn site_code(&self) -> &str {
        &self.site_code
    }
}

impl<R: Resolver> FeatureProvider for KameleoonProvider<R> {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: META_NAME.to_owned(),
        }
    }

    fn initialize(&self, _context: Option<&EvaluationContext>) -> Result<()> {
        self.client.wait_init().map_err(|err| {
            log::warn!(target: "kameleoon",
                       site_code:display = self.site_code,
                       error:display = err;
                       "Kameleoon client failed to initialize");
            Error::ProviderNotReady(err)
        })
    }

    fn shutdown(&self) {
        self.factory.forget(&self.site_code);
    }

    fn state(&self) -> ProviderState {
        match self.client.init_state() {
            InitState::Ready => ProviderState::Ready,
            InitState::Pending | InitState::Failed => ProviderState::NotReady,
        }
    }

    fn resolve_bool_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<bool> {
        self.resolver.resolve(flag_key, default_value, context)
    }

    fn resolve_string_value(
        &self,
        flag_key: &str,
        default_value: String,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<String> {
        self.resolver.resolve(flag_key, default_value, context)
    }

    fn resolve_int_value(
        &self,
        flag_key: &str,
        default_value: i64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<i64> {
        self.resolver.resolve(flag_key, default_value, context)
    }

    fn resolve_float_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<f64> {
        self.resolver.resolve(flag_key, default_value, context)
    }

    fn resolve_struct_value(
        &self,
        flag_key: &str,
        default_value: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value> {
        self.resolver.resolve(flag_key, default_value, context)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::{FeatureProvider, KameleoonProvider, ProviderState};
    use crate::{
        resolver::FlagValue, test_utils::FakeClient, ClientConfig, Error, ErrorCode,
        EvaluationContext, KameleoonClient, KameleoonClientFactory, KameleoonError,
        ResolutionDetails, Resolver, Structure, Value, VariableValue,
    };

    const SITE_CODE: &str = "siteCode";
    const FLAG_KEY: &str = "flagKey";

    /// Resolver answering every flag with the same raw value.
    struct StaticResolver {
        value: VariableValue,
        flag_keys: Mutex<Vec<String>>,
    }

    impl StaticResolver {
        fn new(value: impl Into<VariableValue>) -> Self {
            StaticResolver {
                value: value.into(),
                flag_keys: Mutex::new(Vec::new()),
            }
        }
    }

    impl Resolver for StaticResolver {
        fn resolve<T: FlagValue>(
            &self,
            flag_key: &str,
            default_value: T,
            _context: Option<&EvaluationContext>,
        ) -> ResolutionDetails<T> {
            self.flag_keys.lock().unwrap().push(flag_key.to_owned());
            match T::from_variable(&self.value) {
                Some(value) => ResolutionDetails::success(value, "on".to_owned()),
                None => ResolutionDetails::error(
                    default_value,
                    Some("on".to_owned()),
                    ErrorCode::TypeMismatch,
                    "mismatch",
                ),
            }
        }
    }

    fn empty_client() -> Arc<FakeClient> {
        Arc::new(FakeClient::new::<String, VariableValue>("on", []))
    }

    fn factory_for(client: Arc<FakeClient>) -> Arc<KameleoonClientFactory> {
        Arc::new(KameleoonClientFactory::new(
            move |_: &str, _: &ClientConfig| {
                Ok::<Arc<dyn KameleoonClient>, KameleoonError>(client.clone())
            },
        ))
    }

    fn provider_with(
        client: Arc<FakeClient>,
        resolver: StaticResolver,
    ) -> KameleoonProvider<StaticResolver> {
        KameleoonProvider::with_resolver(
            SITE_CODE.to_owned(),
            client.clone(),
            resolver,
            factory_for(client),
        )
    }

    fn config() -> ClientConfig {
        ClientConfig::new("clientId", "clientSecret").unwrap()
    }

    #[test]
    fn empty_site_code_is_provider_not_ready() {
        let result = KameleoonProvider::new("", &config(), factory_for(empty_client()));

        assert!(matches!(
            result,
            Err(Error::ProviderNotReady(KameleoonError::SiteCodeIsEmpty(_)))
        ));
    }

    #[test]
    fn metadata_has_provider_name() {
        let provider = provider_with(empty_client(), StaticResolver::new(true));

        assert_eq!(provider.metadata().name, "Kameleoon Provider");
    }

    #[test]
    fn resolves_bool() {
        let provider = provider_with(empty_client(), StaticResolver::new(true));

        let result = provider.resolve_bool_value(FLAG_KEY, false, None);

        assert!(result.value);
        assert_eq!(result.error_code, None);
        assert_eq!(result.error_message, None);
        assert_eq!(*provider.resolver.flag_keys.lock().unwrap(), vec![FLAG_KEY]);
    }

    #[test]
    fn resolves_float() {
        let provider = provider_with(empty_client(), StaticResolver::new(2.5));

        let result = provider.resolve_float_value(FLAG_KEY, 0.5, None);

        assert_eq!(result.value, 2.5);
        assert!(result.is_success());
    }

    #[test]
    fn resolves_int() {
        let provider = provider_with(empty_client(), StaticResolver::new(2i64));

        let result = provider.resolve_int_value(FLAG_KEY, 1, None);

        assert_eq!(result.value, 2);
        assert!(result.is_success());
    }

    #[test]
    fn resolves_string() {
        let provider = provider_with(empty_client(), StaticResolver::new("2"));

        let result = provider.resolve_string_value(FLAG_KEY, "1".to_owned(), None);

        assert_eq!(result.value, "2");
        assert!(result.is_success());
    }

    #[test]
    fn resolves_structure() {
        let provider = provider_with(
            empty_client(),
            StaticResolver::new(json!({"expected": [1, 2.5]})),
        );

        let result = provider.resolve_struct_value(FLAG_KEY, Value::from("default"), None);

        assert_eq!(
            result.value,
            Value::Structure(
                Structure::new().with("expected", vec![Value::Int(1), Value::Float(2.5)])
            )
        );
        assert!(result.is_success());
    }

    #[test]
    fn structure_keeps_default_on_mismatch() {
        let provider = provider_with(empty_client(), StaticResolver::new("expected"));

        let result = provider.resolve_struct_value(FLAG_KEY, Value::from("default"), None);

        assert_eq!(result.value, Value::from("default"));
        assert_eq!(result.error_code, Some(ErrorCode::TypeMismatch));
    }

    #[test]
    fn state_follows_client_initialization() {
        let client = empty_client();
        let provider = provider_with(client.clone(), StaticResolver::new(true));
        assert_eq!(provider.state(), ProviderState::NotReady);

        client.readiness.complete(Ok(()));
        assert_eq!(provider.state(), ProviderState::Ready);
        assert_eq!(provider.initialize(None), Ok(()));
    }

    #[test]
    fn failed_initialization_is_not_ready() {
        let client = empty_client();
        let provider = provider_with(client.clone(), StaticResolver::new(true));

        client
            .readiness
            .complete(Err(KameleoonError::SdkNotReady("timeout".to_owned())));

        assert_eq!(provider.state(), ProviderState::NotReady);
        assert_eq!(
            provider.initialize(None),
            Err(Error::ProviderNotReady(KameleoonError::SdkNotReady(
                "timeout".to_owned()
            )))
        );
    }

    #[test]
    fn shutdown_forgets_site_code() {
        let factory = Arc::new(KameleoonClientFactory::new(|_: &str, _: &ClientConfig| {
            Ok::<Arc<dyn KameleoonClient>, KameleoonError>(empty_client())
        }));

        let provider = KameleoonProvider::new(SITE_CODE, &config(), factory.clone()).unwrap();
        let client_to_check = factory.create(SITE_CODE, &config()).unwrap();
        assert!(Arc::ptr_eq(provider.client(), &client_to_check));

        provider.shutdown();
        let second = KameleoonProvider::new(SITE_CODE, &config(), factory).unwrap();

        assert!(!Arc::ptr_eq(provider.client(), second.client()));
    }

    #[test]
    fn default_resolver_evaluates_through_client() {
        let client = Arc::new(FakeClient::new("variant", [("k", 10i64)]));
        let factory = factory_for(client);
        let provider = KameleoonProvider::new(SITE_CODE, &config(), factory).unwrap();
        let context = EvaluationContext::default().with_targeting_key("testVisitor");

        let result = provider.resolve_int_value("testFlag", 42, Some(&context));

        assert_eq!(result.value, 10);
        assert_eq!(result.variant.as_deref(), Some("variant"));
        assert_eq!(result.error_code, None);
    }
}
