//! Relay server for the board's external functions.
//!
//! Each function adds the upstream credential, fills request defaults,
//! forwards the call and passes the upstream status and JSON body back with
//! permissive CORS headers.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /functions/v1/makaton-greeting` - Contextual greeting for a category
//! - `POST /functions/v1/makaton-notifier` - Notify the teaching assistant
//! - `POST /functions/v1/makaton-predict` - Predicted signs
//! - `POST /functions/v1/makaton-reward` - Reward image
//! - `POST /functions/v1/makaton-save-symbol` - Commit a symbol image

pub mod config;
pub mod github;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::HeaderName, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use config::RelayConfig;
use github::SaveSymbolError;

/// Child name used when a request does not name one.
pub const DEFAULT_CHILD_NAME: &str = "Sam";

/// Request headers browsers may send to the relay.
pub const ALLOWED_HEADERS: [&str; 8] = [
    "authorization",
    "x-client-info",
    "apikey",
    "content-type",
    "x-supabase-client-platform",
    "x-supabase-client-platform-version",
    "x-supabase-client-runtime",
    "x-supabase-client-runtime-version",
];

// ============================================================================
// Application State
// ============================================================================

/// Shared state for the relay handlers.
#[derive(Clone)]
pub struct RelayState {
    /// Upstream endpoints and credentials
    config: Arc<RelayConfig>,
    /// Outbound HTTP client
    client: reqwest::Client,
}

impl RelayState {
    /// Creates relay state with a fresh HTTP client.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    /// Returns the relay configuration.
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    fn upstream_token(&self) -> Result<&str, (StatusCode, Json<ApiError>)> {
        self.config.upstream_token.as_deref().ok_or_else(|| {
            error!("CODEWORDS_API_TOKEN is not set");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Server config error")),
            )
        })
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Successful save-symbol response.
#[derive(Debug, Serialize)]
pub struct SaveSymbolResponse {
    /// Always true
    pub success: bool,
    /// Repository path of the committed file
    pub path: Option<String>,
    /// Browser link to the file
    pub html_url: Option<String>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn internal_error(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new(message)),
    )
}

// ============================================================================
// Request Body Helpers
// ============================================================================

/// Parses a JSON object body; anything else is a 500 like any other failure.
fn parse_body(body: &Bytes) -> ApiResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(internal_error("Request body must be a JSON object")),
        Err(e) => Err(internal_error(e.to_string())),
    }
}

/// Non-empty string field.
fn text_field(body: &Map<String, Value>, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn child_name(body: &Map<String, Value>) -> String {
    text_field(body, "child_name").unwrap_or_else(|| DEFAULT_CHILD_NAME.to_string())
}

/// Upstream body for a greeting.
#[must_use]
pub fn greeting_upstream_body(body: &Map<String, Value>) -> Value {
    json!({
        "child_name": child_name(body),
        "selection": body.get("category").cloned().unwrap_or(Value::Null),
    })
}

/// Upstream body for a notification.
#[must_use]
pub fn notifier_upstream_body(body: &Map<String, Value>) -> Value {
    json!({
        "child_name": child_name(body),
        "selection": body.get("selection").cloned().unwrap_or(Value::Null),
    })
}

/// Upstream body for a prediction: category defaults to "general" and an
/// empty history becomes `[category]`.
#[must_use]
pub fn predict_upstream_body(body: &Map<String, Value>) -> Value {
    let category = text_field(body, "category").unwrap_or_else(|| "general".to_string());
    let history_log = match body.get("history_log") {
        Some(Value::Array(items)) if !items.is_empty() => Value::Array(items.clone()),
        _ => json!([category]),
    };

    json!({
        "child_name": child_name(body),
        "category": category,
        "history_log": history_log,
    })
}

/// Upstream body for a reward. Item-shaped requests are turned into a
/// single selection and keep their metadata.
#[must_use]
pub fn reward_upstream_body(body: &Map<String, Value>) -> Value {
    let selections = match body.get("selections") {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        _ => match text_field(body, "label") {
            Some(label) => json!([label]),
            None => json!([]),
        },
    };

    let mut upstream = Map::new();
    upstream.insert("child_name".to_string(), Value::String(child_name(body)));
    upstream.insert("selections".to_string(), selections);
    for key in ["label", "makatonId", "assetUrl", "color"] {
        if let Some(value) = body.get(key).filter(|v| !v.is_null()) {
            upstream.insert(key.to_string(), value.clone());
        }
    }
    Value::Object(upstream)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// OPTIONS on any function - empty preflight answer.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// POSTs `body` upstream and relays the status and JSON answer.
async fn forward(
    state: &RelayState,
    url: &str,
    token: &str,
    body: Value,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let response = state
        .client
        .post(url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            error!(%url, error = %e, "Upstream request failed");
            internal_error(e.to_string())
        })?;

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let data: Value = response.json().await.map_err(|e| {
        error!(%url, error = %e, "Upstream returned non-JSON body");
        internal_error(e.to_string())
    })?;

    info!(%url, status = status.as_u16(), "Forwarded");
    Ok((status, Json(data)))
}

/// POST /functions/v1/makaton-greeting
async fn greeting(
    State(state): State<RelayState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let token = state.upstream_token()?;
    let body = parse_body(&body)?;
    forward(&state, &state.config.greeting_url, token, greeting_upstream_body(&body)).await
}

/// POST /functions/v1/makaton-notifier
async fn notifier(
    State(state): State<RelayState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let token = state.upstream_token()?;
    let body = parse_body(&body)?;
    forward(&state, &state.config.notifier_url, token, notifier_upstream_body(&body)).await
}

/// POST /functions/v1/makaton-predict
async fn predict(
    State(state): State<RelayState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let token = state.upstream_token()?;
    let body = parse_body(&body)?;
    forward(&state, &state.config.predict_url, token, predict_upstream_body(&body)).await
}

/// POST /functions/v1/makaton-reward
async fn reward(
    State(state): State<RelayState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let token = state.upstream_token()?;
    let body = parse_body(&body)?;
    forward(&state, &state.config.reward_url, token, reward_upstream_body(&body)).await
}

/// POST /functions/v1/makaton-save-symbol
async fn save_symbol(
    State(state): State<RelayState>,
    body: Bytes,
) -> ApiResult<Json<SaveSymbolResponse>> {
    let body = parse_body(&body)?;

    let (Some(image_url), Some(sign_name)) =
        (text_field(&body, "image_url"), text_field(&body, "sign_name"))
    else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("Missing image_url or sign_name")),
        ));
    };

    let committed = github::commit_symbol(&state.client, &state.config, &image_url, &sign_name)
        .await
        .map_err(|e| {
            error!(%sign_name, error = ?e, "Save symbol failed");
            match e {
                SaveSymbolError::FetchFailed(_) => {
                    (StatusCode::BAD_GATEWAY, Json(ApiError::new(e.to_string())))
                }
                SaveSymbolError::MissingToken => internal_error(e.to_string()),
                SaveSymbolError::CommitFailed(ref details) => (
                    StatusCode::BAD_GATEWAY,
                    Json(ApiError::with_details(e.to_string(), details.clone())),
                ),
                SaveSymbolError::Other(message) => internal_error(message),
            }
        })?;

    Ok(Json(SaveSymbolResponse {
        success: true,
        path: committed.path,
        html_url: committed.html_url,
    }))
}

// ============================================================================
// Router
// ============================================================================

/// Creates the relay router.
pub fn create_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Functions
        .route(
            "/functions/v1/makaton-greeting",
            post(greeting).options(preflight),
        )
        .route(
            "/functions/v1/makaton-notifier",
            post(notifier).options(preflight),
        )
        .route(
            "/functions/v1/makaton-predict",
            post(predict).options(preflight),
        )
        .route(
            "/functions/v1/makaton-reward",
            post(reward).options(preflight),
        )
        .route(
            "/functions/v1/makaton-save-symbol",
            post(save_symbol).options(preflight),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the relay server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: RelayConfig, addr: SocketAddr) -> anyhow::Result<()> {
    if config.upstream_token.is_none() {
        tracing::warn!("CODEWORDS_API_TOKEN is not set; generator functions will answer 500");
    }
    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set; save-symbol will answer 500");
    }

    let app = create_router(RelayState::new(config));

    info!("Starting relay on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
