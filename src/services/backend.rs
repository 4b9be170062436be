//! The request/response contract with the relay functions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ServiceError;
use super::reward::RewardContext;

/// Body of a prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Student the prediction is for
    pub child_name: String,
    /// Active category label, or "general" on the home screen
    pub category: String,
    /// Recent selections, oldest first
    pub history_log: Vec<String>,
    /// True before the student has made any selection
    pub is_first_session: bool,
}

/// One suggested sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Sign label
    pub label: String,
    /// Image supplied by the predictor, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
}

impl Prediction {
    /// A prediction without an image.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            image_source: None,
        }
    }
}

/// Contextual greeting shown when a category opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    /// Greeting text
    pub text: String,
    /// Why the generator chose it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Where a saved symbol ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSymbol {
    /// Repository path of the committed file
    pub path: String,
    /// Browser link to the file
    #[serde(default)]
    pub html_url: Option<String>,
}

/// The five relay functions used by the board.
///
/// Implementations never panic on odd response shapes; see
/// [`super::response`] for the accepted aliases.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Contextual greeting for a category.
    async fn greeting(&self, child_name: &str, category: &str) -> Result<Greeting, ServiceError>;

    /// Tells the teaching assistant what the student chose.
    async fn notify(&self, child_name: &str, selection: &str) -> Result<(), ServiceError>;

    /// Suggested signs, at most `limit`.
    async fn predict(
        &self,
        request: &PredictRequest,
        limit: usize,
    ) -> Result<Vec<Prediction>, ServiceError>;

    /// Generates a celebratory image and returns its URI.
    async fn reward(&self, context: &RewardContext) -> Result<String, ServiceError>;

    /// Persists a remotely generated symbol image into the shared mirror.
    async fn save_symbol(
        &self,
        image_url: &str,
        sign_name: &str,
    ) -> Result<SavedSymbol, ServiceError>;
}
