use std::sync::Mutex;

use crate::{
    client::InitState, Data, KameleoonClient, KameleoonError, Readiness, VariableValue, Variables,
};

/// In-memory [`KameleoonClient`] returning a fixed variation and recording every call.
pub(crate) struct FakeClient {
    variation: Result<String, KameleoonError>,
    variables: Variables,
    add_data_error: Option<KameleoonError>,
    pub added_data: Mutex<Vec<(String, Vec<Data>)>>,
    pub variation_requests: Mutex<Vec<(String, String)>>,
    pub readiness: Readiness,
}

impl FakeClient {
    pub fn new<K, V>(variation: &str, variables: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<VariableValue>,
    {
        FakeClient {
            variation: Ok(variation.to_owned()),
            variables: variables
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            add_data_error: None,
            added_data: Mutex::new(Vec::new()),
            variation_requests: Mutex::new(Vec::new()),
            readiness: Readiness::new(),
        }
    }

    /// Client whose variation lookup fails with `error`.
    pub fn failing(error: KameleoonError) -> Self {
        FakeClient {
            variation: Err(error),
            ..FakeClient::new::<String, VariableValue>("", [])
        }
    }

    /// Client whose `add_data` fails with `error`.
    pub fn failing_add_data(error: KameleoonError) -> Self {
        FakeClient {
            add_data_error: Some(error),
            ..FakeClient::new::<String, VariableValue>("", [])
        }
    }

    pub fn engine_calls(&self) -> usize {
        self.added_data.lock().unwrap().len() + self.variation_requests.lock().unwrap().len()
    }
}

impl KameleoonClient for FakeClient {
    fn add_data(&self, visitor_code: &str, data: Vec<Data>) -> Result<(), KameleoonError> {
        self.added_data
            .lock()
            .unwrap()
            .push((visitor_code.to_owned(), data));
        match &self.add_data_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn get_feature_variation_key(
        &self,
        visitor_code: &str,
        feature_key: &str,
    ) -> Result<String, KameleoonError> {
        self.variation_requests
            .lock()
            .unwrap()
            .push((visitor_code.to_owned(), feature_key.to_owned()));
        self.variation.clone()
    }

    fn get_feature_variation_variables(
        &self,
        _feature_key: &str,
        _variation_key: &str,
    ) -> Result<Variables, KameleoonError> {
        Ok(self.variables.clone())
    }

    fn wait_init(&self) -> Result<(), KameleoonError> {
        self.readiness.wait()
    }

    fn init_state(&self) -> InitState {
        self.readiness.state()
    }
}

/// Route `log` output to the test harness. Safe to call from every test.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
