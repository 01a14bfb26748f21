use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use webhook_gateway::models::WebhookPayload;
use webhook_gateway::services::signature::{canonical_payload, generate_hmac};
use webhook_gateway::services::{
    LoggingWebhookStore, SignatureVerifier, WebhookProcessor, WebhookStore,
};
use webhook_gateway::{AppState, Config, app};

const SECRET: &str = "mysecret";
const SIGNATURE_HEADER: &str = "YAYA-SIGNATURE";

struct FailingStore;

#[async_trait]
impl WebhookStore for FailingStore {
    async fn save(&self, _payload: &WebhookPayload) -> anyhow::Result<()> {
        Err(anyhow!("database unavailable"))
    }
}

fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        port: 0,
        secret_key: SECRET.to_string(),
        freshness_tolerance_secs: 300,
        database_url: None,
        store_timeout_secs: 1,
    }
}

fn test_app(store: Arc<dyn WebhookStore>) -> axum::Router {
    let config = test_config();
    let processor = WebhookProcessor::new(
        SignatureVerifier::new(SECRET),
        store,
        config.freshness_tolerance_secs,
        Duration::from_secs(config.store_timeout_secs),
    );
    app(AppState { config, processor })
}

fn sample_payload(timestamp: i64) -> WebhookPayload {
    WebhookPayload {
        id: "12345".to_string(),
        amount: 1000,
        currency: "USD".to_string(),
        created_at: timestamp,
        timestamp,
        cause: "Payment".to_string(),
        full_name: "John Doe".to_string(),
        account_name: "john.doe@example.com".to_string(),
        invoice_url: "http://example.com/invoice/12345".to_string(),
    }
}

fn sign(payload: &WebhookPayload) -> String {
    generate_hmac(&canonical_payload(payload), SECRET)
}

fn webhook_request(payload: &WebhookPayload, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn valid_webhook_is_accepted() {
    let app = test_app(Arc::new(LoggingWebhookStore));
    let payload = sample_payload(chrono::Utc::now().timestamp());
    let signature = sign(&payload);

    let response = app.oneshot(webhook_request(&payload, &signature)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn invalid_signature_is_forbidden() {
    let app = test_app(Arc::new(LoggingWebhookStore));
    let payload = sample_payload(chrono::Utc::now().timestamp());

    let response = app
        .oneshot(webhook_request(&payload, "invalid_signature"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "Invalid signature or request is too old"
    );
}

#[tokio::test]
async fn missing_signature_header_is_forbidden() {
    let app = test_app(Arc::new(LoggingWebhookStore));
    let payload = sample_payload(chrono::Utc::now().timestamp());

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stale_payload_is_forbidden_with_same_message_as_bad_signature() {
    let app = test_app(Arc::new(LoggingWebhookStore));
    let payload = sample_payload(chrono::Utc::now().timestamp() - 301);
    let signature = sign(&payload);

    let response = app.oneshot(webhook_request(&payload, &signature)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    // Same generic message as a signature mismatch, so the response is not
    // an oracle for which check failed.
    assert_eq!(
        body["error"]["message"],
        "Invalid signature or request is too old"
    );
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = test_app(Arc::new(LoggingWebhookStore));

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header(SIGNATURE_HEADER, "whatever")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_failure_is_internal_server_error() {
    let app = test_app(Arc::new(FailingStore));
    let payload = sample_payload(chrono::Utc::now().timestamp());
    let signature = sign(&payload);

    let response = app.oneshot(webhook_request(&payload, &signature)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "An internal server error occurred");
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let app = test_app(Arc::new(LoggingWebhookStore));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
