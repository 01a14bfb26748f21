use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webhook_gateway::services::{
    LoggingWebhookStore, PostgresWebhookStore, SignatureVerifier, WebhookProcessor, WebhookStore,
};
use webhook_gateway::{AppState, Config, app, database};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webhook_gateway=debug,tower_http=debug".into()),
        )
        .init();

    // Load and validate configuration before anything else
    let config = Config::from_env()?;
    config.validate()?;
    info!(
        "Loaded configuration for environment: {}",
        config.environment
    );

    // Setup the webhook store: PostgreSQL when configured, otherwise a
    // log-only store
    let store: Arc<dyn WebhookStore> = match &config.database_url {
        Some(database_url) => {
            let pool = database::setup_database(database_url).await?;
            database::run_migrations(&pool).await?;
            info!("Database migrations completed successfully");
            Arc::new(PostgresWebhookStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; accepted payloads will be logged, not persisted");
            Arc::new(LoggingWebhookStore)
        }
    };

    // Wire the verification pipeline: the secret is injected here, never
    // read from the environment inside the services
    let verifier = SignatureVerifier::new(config.secret_key.clone());
    let processor = WebhookProcessor::new(
        verifier,
        store,
        config.freshness_tolerance_secs,
        Duration::from_secs(config.store_timeout_secs),
    );
    info!("Webhook processor initialized");

    let state = AppState {
        config: config.clone(),
        processor,
    };

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(CorsLayer::permissive()),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting webhook gateway on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGTERM or SIGINT signal for graceful shutdown
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
