//! [`Backend`] over HTTP, talking to the relay functions.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::backend::{Backend, Greeting, PredictRequest, Prediction, SavedSymbol};
use super::error::ServiceError;
use super::response;
use super::reward::RewardContext;
use crate::config::ServiceConfig;

/// Relay function names, appended to the relay base URL.
pub mod functions {
    /// Contextual greeting
    pub const GREETING: &str = "makaton-greeting";
    /// Teaching-assistant notification
    pub const NOTIFIER: &str = "makaton-notifier";
    /// Sign prediction
    pub const PREDICT: &str = "makaton-predict";
    /// Reward image generation
    pub const REWARD: &str = "makaton-reward";
    /// Symbol persistence
    pub const SAVE_SYMBOL: &str = "makaton-save-symbol";
}

/// Relay client.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    anon_key: Option<String>,
}

impl HttpBackend {
    /// Creates a client for the relay at `base_url`.
    pub fn new(base_url: impl Into<String>, anon_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, anon_key)
    }

    /// Creates a client from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("choiceboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self::with_client(client, config.relay_url.clone(), config.anon_key.clone())
    }

    /// Creates a backend around an existing client.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        anon_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Full URL for a relay function.
    #[must_use]
    pub fn function_url(&self, function: &str) -> String {
        format!("{}/{function}", self.base_url)
    }

    /// POSTs `body` to a function and returns the raw response text on success.
    async fn post(&self, function: &str, body: &impl Serialize) -> Result<String, ServiceError> {
        let url = self.function_url(function);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.anon_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            debug!(function, status = status.as_u16(), "Relay call succeeded");
            return Ok(text);
        }

        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|value| response::error_message_from(&value))
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.to_string()
                } else {
                    text.trim().to_string()
                }
            });

        warn!(function, status = status.as_u16(), %message, "Relay call failed");
        Err(ServiceError::from_status(status.as_u16(), message))
    }

    /// POSTs `body` and parses the response as JSON.
    async fn post_json(&self, function: &str, body: &impl Serialize) -> Result<Value, ServiceError> {
        let text = self.post(function, body).await?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn greeting(&self, child_name: &str, category: &str) -> Result<Greeting, ServiceError> {
        let body = json!({ "child_name": child_name, "category": category });
        let value = self.post_json(functions::GREETING, &body).await?;
        response::greeting_from(&value)
            .ok_or_else(|| ServiceError::Malformed("greeting response has no text".to_string()))
    }

    async fn notify(&self, child_name: &str, selection: &str) -> Result<(), ServiceError> {
        let body = json!({ "child_name": child_name, "selection": selection });
        self.post(functions::NOTIFIER, &body).await.map(|_| ())
    }

    async fn predict(
        &self,
        request: &PredictRequest,
        limit: usize,
    ) -> Result<Vec<Prediction>, ServiceError> {
        let value = self.post_json(functions::PREDICT, request).await?;
        Ok(response::predictions_from(&value, limit))
    }

    async fn reward(&self, context: &RewardContext) -> Result<String, ServiceError> {
        let value = self.post_json(functions::REWARD, context).await?;
        response::reward_image_from(&value)
            .ok_or_else(|| ServiceError::Malformed("reward response has no image".to_string()))
    }

    async fn save_symbol(
        &self,
        image_url: &str,
        sign_name: &str,
    ) -> Result<SavedSymbol, ServiceError> {
        let body = json!({ "image_url": image_url, "sign_name": sign_name });
        let value = self.post_json(functions::SAVE_SYMBOL, &body).await?;
        response::saved_symbol_from(&value)
            .ok_or_else(|| ServiceError::Malformed("save-symbol did not report success".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_url_trims_slash() {
        let backend = HttpBackend::new("https://relay.example.com/functions/v1/", None);
        assert_eq!(
            backend.function_url(functions::NOTIFIER),
            "https://relay.example.com/functions/v1/makaton-notifier"
        );
    }

    #[test]
    fn test_blank_anon_key_ignored() {
        let backend = HttpBackend::new("http://localhost", Some("  ".to_string()));
        assert!(backend.anon_key.is_none());
    }
}
