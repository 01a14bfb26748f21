use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::AppState;
use crate::error::{ApiError, handle_rejection};
use crate::models::WebhookPayload;
use crate::services::WebhookOutcome;

/// Request header carrying the provider's signature, taken verbatim.
pub const SIGNATURE_HEADER: &str = "YAYA-SIGNATURE";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookAck {
    pub status: String,
}

impl WebhookAck {
    fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Receive a payment webhook notification
///
/// Verifies the HMAC signature from the `YAYA-SIGNATURE` header and the
/// payload's freshness window before persisting. Signature and staleness
/// rejections share one 403 response so the caller cannot probe which
/// check failed.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "webhook",
    request_body = WebhookPayload,
    responses(
        (status = 200, description = "Payload authenticated and accepted", body = WebhookAck),
        (status = 400, description = "Malformed request body"),
        (status = 403, description = "Invalid signature or request is too old"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return handle_rejection(rejection),
    };

    // A missing or non-ASCII header degrades to an empty signature, which
    // can never match and is rejected below.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.processor.process(&payload, signature).await {
        Ok(WebhookOutcome::Accepted) => Json(WebhookAck::success()).into_response(),
        Ok(WebhookOutcome::RejectedSignature) | Ok(WebhookOutcome::RejectedStale) => {
            ApiError::webhook_rejected().into_response()
        }
        Err(err) => {
            error!(payload_id = %payload.id, error = %format!("{:#}", err), "Webhook processing failed");
            ApiError::Internal("Failed to process webhook".to_string()).into_response()
        }
    }
}
