//! Scriptable backend and image probe for tests and offline demos.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::backend::{Backend, Greeting, PredictRequest, Prediction, SavedSymbol};
use super::error::ServiceError;
use super::images::ImageProbe;
use super::reward::RewardContext;

/// How the mock notifier behaves.
#[derive(Debug, Clone)]
pub enum NotifyBehavior {
    /// Resolves successfully
    Succeed,
    /// Resolves with this error
    Fail(ServiceError),
    /// Resolves after a delay
    Delay(Duration),
    /// Never resolves
    Hang,
}

/// Mock backend.
///
/// Every call is recorded so tests can assert on what the board sent.
pub struct MockBackend {
    greeting: Mutex<Result<Greeting, ServiceError>>,
    notify: Mutex<NotifyBehavior>,
    predictions: Mutex<Result<Vec<Prediction>, ServiceError>>,
    reward: Mutex<Result<String, ServiceError>>,
    save: Mutex<Result<SavedSymbol, ServiceError>>,
    notified: Mutex<Vec<(String, String)>>,
    predict_requests: Mutex<Vec<PredictRequest>>,
    reward_contexts: Mutex<Vec<RewardContext>>,
    saved: Mutex<Vec<(String, String)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBackend {
    /// A backend where every call succeeds with canned data.
    pub fn new() -> Self {
        Self {
            greeting: Mutex::new(Ok(Greeting {
                text: "Hello!".to_string(),
                rationale: None,
            })),
            notify: Mutex::new(NotifyBehavior::Succeed),
            predictions: Mutex::new(Ok(Vec::new())),
            reward: Mutex::new(Ok("https://rewards.example.com/star.png".to_string())),
            save: Mutex::new(Ok(SavedSymbol {
                path: "public/symbols/symbol.png".to_string(),
                html_url: None,
            })),
            notified: Mutex::new(Vec::new()),
            predict_requests: Mutex::new(Vec::new()),
            reward_contexts: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Sets the greeting result.
    pub fn with_greeting(self, result: Result<Greeting, ServiceError>) -> Self {
        *lock(&self.greeting) = result;
        self
    }

    /// Sets the notifier behaviour.
    pub fn with_notify(self, behavior: NotifyBehavior) -> Self {
        *lock(&self.notify) = behavior;
        self
    }

    /// Sets the prediction result (shared by quick choices and categories).
    pub fn with_predictions(self, result: Result<Vec<Prediction>, ServiceError>) -> Self {
        *lock(&self.predictions) = result;
        self
    }

    /// Predicts these labels.
    pub fn with_predicted_labels(self, labels: &[&str]) -> Self {
        let predictions = labels.iter().map(|label| Prediction::new(*label)).collect();
        self.with_predictions(Ok(predictions))
    }

    /// Sets the reward result.
    pub fn with_reward(self, result: Result<String, ServiceError>) -> Self {
        *lock(&self.reward) = result;
        self
    }

    /// Sets the save-symbol result.
    pub fn with_save(self, result: Result<SavedSymbol, ServiceError>) -> Self {
        *lock(&self.save) = result;
        self
    }

    /// Changes the notifier behaviour after construction.
    pub fn set_notify(&self, behavior: NotifyBehavior) {
        *lock(&self.notify) = behavior;
    }

    /// `(child_name, selection)` for each notification, in call order.
    pub fn notified(&self) -> Vec<(String, String)> {
        lock(&self.notified).clone()
    }

    /// Every prediction request, in call order.
    pub fn predict_requests(&self) -> Vec<PredictRequest> {
        lock(&self.predict_requests).clone()
    }

    /// Every reward context, in call order.
    pub fn reward_contexts(&self) -> Vec<RewardContext> {
        lock(&self.reward_contexts).clone()
    }

    /// `(image_url, sign_name)` for each save request.
    pub fn saved(&self) -> Vec<(String, String)> {
        lock(&self.saved).clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn greeting(&self, _child_name: &str, _category: &str) -> Result<Greeting, ServiceError> {
        lock(&self.greeting).clone()
    }

    async fn notify(&self, child_name: &str, selection: &str) -> Result<(), ServiceError> {
        lock(&self.notified).push((child_name.to_string(), selection.to_string()));
        let behavior = lock(&self.notify).clone();
        match behavior {
            NotifyBehavior::Succeed => Ok(()),
            NotifyBehavior::Fail(e) => Err(e),
            NotifyBehavior::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            NotifyBehavior::Hang => std::future::pending().await,
        }
    }

    async fn predict(
        &self,
        request: &PredictRequest,
        limit: usize,
    ) -> Result<Vec<Prediction>, ServiceError> {
        lock(&self.predict_requests).push(request.clone());
        lock(&self.predictions)
            .clone()
            .map(|predictions| predictions.into_iter().take(limit).collect())
    }

    async fn reward(&self, context: &RewardContext) -> Result<String, ServiceError> {
        lock(&self.reward_contexts).push(context.clone());
        lock(&self.reward).clone()
    }

    async fn save_symbol(
        &self,
        image_url: &str,
        sign_name: &str,
    ) -> Result<SavedSymbol, ServiceError> {
        lock(&self.saved).push((image_url.to_string(), sign_name.to_string()));
        lock(&self.save).clone()
    }
}

/// Mock image probe.
pub struct MockProbe {
    existing: HashSet<String>,
    all: bool,
}

impl MockProbe {
    /// Every image exists.
    pub fn all() -> Self {
        Self {
            existing: HashSet::new(),
            all: true,
        }
    }

    /// No image exists.
    pub fn none() -> Self {
        Self {
            existing: HashSet::new(),
            all: false,
        }
    }

    /// Only these URLs exist.
    pub fn only<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            existing: urls.into_iter().map(Into::into).collect(),
            all: false,
        }
    }
}

#[async_trait]
impl ImageProbe for MockProbe {
    async fn exists(&self, url: &str) -> bool {
        self.all || self.existing.contains(url)
    }
}
