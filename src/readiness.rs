use std::sync::{Condvar, Mutex};

use crate::{client::InitState, KameleoonError};

/// One-shot initialization signal for [`KameleoonClient`](crate::KameleoonClient)
/// implementations.
///
/// Holds `None` until the client finished initializing, `Some(Ok(()))` once it is ready and
/// `Some(Err(...))` if initialization failed. Only the first completion is kept.
#[derive(Debug, Default)]
pub struct Readiness {
    result: Mutex<Option<Result<(), KameleoonError>>>,
    condvar: Condvar,
}

impl Readiness {
    /// Create a signal in the [`InitState::Pending`] state.
    pub fn new() -> Self {
        Readiness::default()
    }

    /// Record the initialization result and wake up all waiters.
    pub fn complete(&self, result: Result<(), KameleoonError>) {
        let Ok(mut slot) = self.result.lock() else {
            return;
        };
        if slot.is_none() {
            *slot = Some(result);
            self.condvar.notify_all();
        }
    }

    /// Block waiting for the initialization result.
    pub fn wait(&self) -> Result<(), KameleoonError> {
        let mut lock = self.result.lock().map_err(|_| poisoned())?;
        loop {
            match &*lock {
                Some(result) => return result.clone(),
                None => {
                    lock = self.condvar.wait(lock).map_err(|_| poisoned())?;
                }
            }
        }
    }

    /// Current state without blocking. A poisoned lock reads as [`InitState::Failed`].
    pub fn state(&self) -> InitState {
        match self.result.lock().as_deref() {
            Ok(Some(Ok(()))) => InitState::Ready,
            Ok(None) => InitState::Pending,
            Ok(Some(Err(_))) | Err(_) => InitState::Failed,
        }
    }
}

fn poisoned() -> KameleoonError {
    KameleoonError::SdkNotReady("initialization thread panicked".to_owned())
}
