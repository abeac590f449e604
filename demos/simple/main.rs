use std::{
    collections::HashMap,
    sync::Arc,
    thread,
    time::Duration,
};

use kameleoon_openfeature::{
    ClientConfig, Data, EvaluationContext, FeatureProvider, InitState, KameleoonClient,
    KameleoonClientFactory, KameleoonError, KameleoonProvider, Readiness, Structure,
    VariableValue, Variables,
};

/// Stand-in for the Kameleoon SDK client: serves one feature from memory after a simulated
/// configuration fetch.
struct LocalClient {
    readiness: Arc<Readiness>,
}

impl LocalClient {
    fn start() -> Self {
        let readiness = Arc::new(Readiness::new());
        let signal = readiness.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            signal.complete(Ok(()));
        });
        LocalClient { readiness }
    }
}

impl KameleoonClient for LocalClient {
    fn add_data(&self, visitor_code: &str, data: Vec<Data>) -> Result<(), KameleoonError> {
        println!("Data for {}: {:?}", visitor_code, data);
        Ok(())
    }

    fn get_feature_variation_key(
        &self,
        _visitor_code: &str,
        feature_key: &str,
    ) -> Result<String, KameleoonError> {
        match feature_key {
            "a-boolean-flag" => Ok("on".to_owned()),
            _ => Err(KameleoonError::FeatureNotFound(format!(
                "Feature key '{}' not found",
                feature_key
            ))),
        }
    }

    fn get_feature_variation_variables(
        &self,
        _feature_key: &str,
        _variation_key: &str,
    ) -> Result<Variables, KameleoonError> {
        Ok(HashMap::from([(
            "enabled".to_owned(),
            VariableValue::Boolean(true),
        )]))
    }

    fn wait_init(&self) -> Result<(), KameleoonError> {
        self.readiness.wait()
    }

    fn init_state(&self) -> InitState {
        self.readiness.state()
    }
}

pub fn main() -> kameleoon_openfeature::Result<()> {
    // Configure env_logger to see provider logs.
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("kameleoon")).init();

    let site_code =
        std::env::var("KAMELEOON_SITE_CODE").unwrap_or_else(|_| "demo-site-code".to_owned());
    let config = ClientConfig::new("client-id", "client-secret")?;

    let factory = Arc::new(KameleoonClientFactory::new(
        |_: &str, _: &ClientConfig| {
            Ok::<Arc<dyn KameleoonClient>, KameleoonError>(Arc::new(LocalClient::start()))
        },
    ));
    let provider = KameleoonProvider::new(site_code, &config, factory)?;

    // Block waiting for the client to fetch its configuration.
    if let Err(err) = provider.initialize(None) {
        println!("error initializing provider: {:?}", err);
    }

    let context = EvaluationContext::default()
        .with_targeting_key("test-visitor")
        .with_field("conversion", Structure::new().with("goalId", 1));

    let details = provider.resolve_bool_value("a-boolean-flag", false, Some(&context));
    println!("Resolution: {:?}", details);

    provider.shutdown();

    Ok(())
}
