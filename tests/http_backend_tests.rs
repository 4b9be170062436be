//! Tests for the relay client against a stub relay.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use choiceboard::services::http::functions;
use choiceboard::services::{
    Backend, HttpBackend, PredictRequest, Prediction, RewardContext, ServiceError,
};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Some("anon-key".to_string()))
}

fn function_path(function: &str) -> String {
    format!("/{function}")
}

#[tokio::test]
async fn test_notify_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::NOTIFIER)))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("apikey", "anon-key"))
        .and(body_json(json!({"child_name": "Sam", "selection": "Apple"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server).notify("Sam", "Apple").await.unwrap();
}

#[tokio::test]
async fn test_notify_without_key_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::NOTIFIER)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    HttpBackend::new(server.uri(), None)
        .notify("Sam", "Apple")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_status_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::NOTIFIER)))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"error": "Slow down"})))
        .mount(&server)
        .await;

    let err = backend(&server).notify("Sam", "Apple").await.unwrap_err();
    assert_eq!(err, ServiceError::RateLimited("Slow down".to_string()));
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_rate_limit_message_in_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::NOTIFIER)))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let err = backend(&server).notify("Sam", "Apple").await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_upstream_error_carries_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::SAVE_SYMBOL)))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "error": "GitHub commit failed",
            "details": "Bad credentials",
        })))
        .mount(&server)
        .await;

    let err = backend(&server)
        .save_symbol("https://images.example.com/a.png", "Apple")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Upstream {
            status: 502,
            message: "GitHub commit failed: Bad credentials".to_string(),
        }
    );
}

#[tokio::test]
async fn test_predict_reads_object_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::PREDICT)))
        .and(body_json(json!({
            "child_name": "Sam",
            "category": "Food",
            "history_log": ["Apple"],
            "is_first_session": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predicted_signs": [
                {"sign_name": "Banana", "image_url": "https://images.example.com/banana.png"},
                "Bread",
                {"label": "Milk"},
                "Juice",
            ]
        })))
        .mount(&server)
        .await;

    let request = PredictRequest {
        child_name: "Sam".to_string(),
        category: "Food".to_string(),
        history_log: vec!["Apple".to_string()],
        is_first_session: false,
    };
    let predictions = backend(&server).predict(&request, 3).await.unwrap();

    assert_eq!(
        predictions,
        vec![
            Prediction {
                label: "Banana".to_string(),
                image_source: Some("https://images.example.com/banana.png".to_string()),
            },
            Prediction::new("Bread"),
            Prediction::new("Milk"),
        ]
    );
}

#[tokio::test]
async fn test_predict_unknown_shape_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::PREDICT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 1})))
        .mount(&server)
        .await;

    let request = PredictRequest {
        child_name: "Sam".to_string(),
        category: "general".to_string(),
        history_log: Vec::new(),
        is_first_session: true,
    };
    let predictions = backend(&server).predict(&request, 3).await.unwrap();
    assert!(predictions.is_empty());
}

#[tokio::test]
async fn test_reward_without_image_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::REWARD)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .mount(&server)
        .await;

    let context = RewardContext::Selections {
        selections: vec!["Apple".to_string()],
    };
    let err = backend(&server).reward(&context).await.unwrap_err();
    assert!(matches!(err, ServiceError::Malformed(_)));
}

#[tokio::test]
async fn test_reward_returns_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::REWARD)))
        .and(body_json(json!({"selections": ["Apple", "Swing", "Juice"]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"image_url": "https://images.example.com/reward.png"})),
        )
        .mount(&server)
        .await;

    let context = RewardContext::Selections {
        selections: vec!["Apple".to_string(), "Swing".to_string(), "Juice".to_string()],
    };
    let image = backend(&server).reward(&context).await.unwrap();
    assert_eq!(image, "https://images.example.com/reward.png");
}

#[tokio::test]
async fn test_greeting_and_saved_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::GREETING)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Time for a snack, Sam!",
            "rationale": "afternoon",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(function_path(functions::SAVE_SYMBOL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "path": "public/symbols/apple.png",
        })))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let greeting = backend.greeting("Sam", "Food").await.unwrap();
    assert_eq!(greeting.text, "Time for a snack, Sam!");
    assert_eq!(greeting.rationale.as_deref(), Some("afternoon"));

    let saved = backend
        .save_symbol("https://images.example.com/apple.png", "Apple")
        .await
        .unwrap();
    assert_eq!(saved.path, "public/symbols/apple.png");
    assert_eq!(saved.html_url, None);
}

#[tokio::test]
async fn test_unreachable_relay_is_network_error() {
    // Port 9 (discard) is not expected to accept HTTP.
    let backend = HttpBackend::new("http://127.0.0.1:9", None);
    let err = backend.notify("Sam", "Apple").await.unwrap_err();
    assert!(matches!(err, ServiceError::Network(_)));
}
