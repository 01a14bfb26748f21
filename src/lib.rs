pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::ApiError;

use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use services::WebhookProcessor;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub processor: WebhookProcessor,
}

/// Build the application router. Shared between `main` and the
/// integration tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/webhook", post(handlers::webhook::handle_webhook))
        .merge(
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .with_state(state)
}
