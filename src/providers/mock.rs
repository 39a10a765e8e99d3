//! Scripted provider for testing the resolution loop.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::credentials::Credential;
use crate::providers::{ProviderAdapter, Rejection};
use crate::resolver::Mergeable;

/// A mock provider that plays back scripted outcomes in order.
///
/// Outcomes are consumed front-to-back, one per [`attempt`] call; with the
/// script exhausted the provider reports an empty payload. The mock also
/// records how often it was invoked and the last credential it saw, which
/// is how the credential-override tests observe pool bypassing.
///
/// [`attempt`]: ProviderAdapter::attempt
#[derive(Debug, Default)]
pub struct MockProvider<R> {
    name: &'static str,
    outcomes: Mutex<VecDeque<Result<R, Rejection>>>,
    calls: AtomicUsize,
    last_credential: Mutex<Option<Credential>>,
}

impl<R> MockProvider<R> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            outcomes: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            last_credential: Mutex::new(None),
        }
    }

    /// Queue the next outcome to play back.
    pub fn script(&self, outcome: Result<R, Rejection>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    /// How many times [`ProviderAdapter::attempt`] has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The credential passed to the most recent attempt.
    pub fn last_credential(&self) -> Option<Credential> {
        self.last_credential.lock().unwrap().clone()
    }
}

#[async_trait]
impl<R: Mergeable> ProviderAdapter<R> for MockProvider<R> {
    fn name(&self) -> &str {
        self.name
    }

    async fn attempt(&self, _input: &str, credential: &Credential) -> Result<R, Rejection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_credential.lock().unwrap() = Some(credential.clone());

        match self.outcomes.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Err(Rejection::Empty),
        }
    }
}
