use utoipa::OpenApi;

use crate::handlers;
use crate::models::WebhookPayload;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::webhook::handle_webhook,
    ),
    components(schemas(
        WebhookPayload,
        handlers::health::HealthStatus,
        handlers::webhook::WebhookAck,
    )),
    tags(
        (name = "webhook", description = "Payment webhook intake"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Webhook Gateway",
        description = "Authenticates YaYa Wallet payment webhooks before accepting them"
    )
)]
pub struct ApiDoc;
