use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::{ClientConfig, KameleoonClient, KameleoonError};

/// Constructs Kameleoon clients for [`KameleoonClientFactory`].
///
/// Implemented for closures:
/// ```
/// # use std::sync::Arc;
/// # use kameleoon_openfeature::{ClientConfig, KameleoonClient, KameleoonClientFactory, KameleoonError};
/// # fn connect(site_code: &str, config: &ClientConfig) -> Arc<dyn KameleoonClient> { unimplemented!() }
/// let factory = KameleoonClientFactory::new(|site_code: &str, config: &ClientConfig| {
///     Ok::<_, KameleoonError>(connect(site_code, config))
/// });
/// ```
pub trait ClientBuilder {
    /// Construct a client for `site_code`.
    fn build(
        &self,
        site_code: &str,
        config: &ClientConfig,
    ) -> Result<Arc<dyn KameleoonClient>, KameleoonError>;
}

impl<T> ClientBuilder for T
where
    T: Fn(&str, &ClientConfig) -> Result<Arc<dyn KameleoonClient>, KameleoonError>,
{
    fn build(
        &self,
        site_code: &str,
        config: &ClientConfig,
    ) -> Result<Arc<dyn KameleoonClient>, KameleoonError> {
        self(site_code, config)
    }
}

/// Keeps one Kameleoon client per site code.
///
/// Clients are shared between all providers created for the same site code until
/// [`forget`](KameleoonClientFactory::forget) is called.
pub struct KameleoonClientFactory {
    builder: Box<dyn ClientBuilder + Send + Sync>,
    clients: RwLock<HashMap<String, Arc<dyn KameleoonClient>>>,
}

impl KameleoonClientFactory {
    /// Create an empty factory building clients with `builder`.
    pub fn new(builder: impl ClientBuilder + Send + Sync + 'static) -> Self {
        KameleoonClientFactory {
            builder: Box::new(builder),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Get the client for `site_code`, building it on first use.
    ///
    /// The builder runs outside of the cache lock, so a slow build does not block other site
    /// codes. Concurrent first calls for the same site code may build more than once; only the
    /// first stored client is kept and returned to all callers.
    ///
    /// # Errors
    ///
    /// Returns [`KameleoonError::SiteCodeIsEmpty`] for an empty site code, or any error of the
    /// underlying [`ClientBuilder`].
    pub fn create(
        &self,
        site_code: &str,
        config: &ClientConfig,
    ) -> Result<Arc<dyn KameleoonClient>, KameleoonError> {
        if site_code.is_empty() {
            return Err(KameleoonError::SiteCodeIsEmpty(
                "Provided siteCode is empty".to_owned(),
            ));
        }

        if let Some(client) = self.read_clients()?.get(site_code) {
            return Ok(client.clone());
        }

        // Builders may do network I/O; the lock is not held while building.
        log::debug!(target: "kameleoon", site_code; "creating Kameleoon client");
        let client = self.builder.build(site_code, config)?;

        let mut clients = self.clients.write().map_err(|_| lock_poisoned())?;
        // Another thread might have stored a client for this site code in the meantime. The
        // first one stored wins so that all providers share it.
        Ok(clients
            .entry(site_code.to_owned())
            .or_insert(client)
            .clone())
    }

    /// Drop the cached client for `site_code`, so the next [`create`](Self::create) builds a new
    /// one.
    pub fn forget(&self, site_code: &str) {
        match self.clients.write() {
            Ok(mut clients) => {
                if clients.remove(site_code).is_some() {
                    log::debug!(target: "kameleoon", site_code; "forgot Kameleoon client");
                }
            }
            Err(_) => {
                log::warn!(target: "kameleoon", site_code; "unable to forget client: lock poisoned");
            }
        }
    }

    fn read_clients(
        &self,
    ) -> Result<
        std::sync::RwLockReadGuard<'_, HashMap<String, Arc<dyn KameleoonClient>>>,
        KameleoonError,
    > {
        self.clients.read().map_err(|_| lock_poisoned())
    }
}

fn lock_poisoned() -> KameleoonError {
    KameleoonError::Other("client factory lock poisoned".to_owned())
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            mpsc, Arc, Mutex,
        },
        thread,
    };

    use super::KameleoonClientFactory;
    use crate::{
        test_utils::FakeClient, ClientConfig, KameleoonClient, KameleoonError, VariableValue,
    };

    fn counting_factory(built: Arc<AtomicUsize>) -> KameleoonClientFactory {
        KameleoonClientFactory::new(move |_: &str, _: &ClientConfig| {
            built.fetch_add(1, Ordering::SeqCst);
            let client: Arc<dyn KameleoonClient> =
                Arc::new(FakeClient::new::<String, VariableValue>("on", []));
            Ok::<_, KameleoonError>(client)
        })
    }

    fn config() -> ClientConfig {
        ClientConfig::new("clientId", "clientSecret").unwrap()
    }

    #[test]
    fn empty_site_code_is_rejected() {
        let built = Arc::new(AtomicUsize::new(0));
        let factory = counting_factory(built.clone());

        assert!(matches!(
            factory.create("", &config()),
            Err(KameleoonError::SiteCodeIsEmpty(_))
        ));
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clients_are_cached_per_site_code() {
        let built = Arc::new(AtomicUsize::new(0));
        let factory = counting_factory(built.clone());

        let first = factory.create("siteCode", &config()).unwrap();
        let second = factory.create("siteCode", &config()).unwrap();
        let other = factory.create("otherSiteCode", &config()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn forget_drops_cached_client() {
        let built = Arc::new(AtomicUsize::new(0));
        let factory = counting_factory(built.clone());

        let first = factory.create("siteCode", &config()).unwrap();
        factory.forget("siteCode");
        let second = factory.create("siteCode", &config()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn slow_build_does_not_block_other_site_codes() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let started_tx = Mutex::new(started_tx);
        let release_rx = Mutex::new(release_rx);
        let factory = Arc::new(KameleoonClientFactory::new(
            move |site_code: &str, _: &ClientConfig| {
                if site_code == "slowSiteCode" {
                    started_tx.lock().unwrap().send(()).unwrap();
                    release_rx.lock().unwrap().recv().unwrap();
                }
                let client: Arc<dyn KameleoonClient> =
                    Arc::new(FakeClient::new::<String, VariableValue>("on", []));
                Ok::<_, KameleoonError>(client)
            },
        ));

        let slow = {
            let factory = factory.clone();
            thread::spawn(move || factory.create("slowSiteCode", &config()).map(|_| ()))
        };
        started_rx.recv().unwrap();

        assert!(factory.create("fastSiteCode", &config()).is_ok());

        release_tx.send(()).unwrap();
        assert_eq!(slow.join().unwrap(), Ok(()));
        let first = factory.create("slowSiteCode", &config()).unwrap();
        let second = factory.create("slowSiteCode", &config()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn builder_errors_are_returned() {
        let factory = KameleoonClientFactory::new(|_: &str, _: &ClientConfig| {
            Err::<Arc<dyn KameleoonClient>, _>(KameleoonError::Other(
                "connection refused".to_owned(),
            ))
        });

        assert_eq!(
            factory.create("siteCode", &config()).err(),
            Some(KameleoonError::Other("connection refused".to_owned()))
        );
    }
}
