use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::WebhookPayload;

/// Destination for verified payloads.
///
/// The processor only requires that `save` either fully succeeds or returns
/// an error; durability and concurrency guarantees belong to the
/// implementation. No retries are performed by callers.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    async fn save(&self, payload: &WebhookPayload) -> Result<()>;
}

/// Durable store backed by PostgreSQL.
#[derive(Clone)]
pub struct PostgresWebhookStore {
    pool: PgPool,
}

impl PostgresWebhookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebhookStore for PostgresWebhookStore {
    async fn save(&self, payload: &WebhookPayload) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO webhook_events
                (event_id, amount, currency, created_at_time, event_timestamp,
                 cause, full_name, account_name, invoice_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&payload.id)
        .bind(payload.amount)
        .bind(&payload.currency)
        .bind(payload.created_at)
        .bind(payload.timestamp)
        .bind(&payload.cause)
        .bind(&payload.full_name)
        .bind(&payload.account_name)
        .bind(&payload.invoice_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Store that logs accepted payloads instead of persisting them.
///
/// Used when no DATABASE_URL is configured and as the default in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingWebhookStore;

#[async_trait]
impl WebhookStore for LoggingWebhookStore {
    async fn save(&self, payload: &WebhookPayload) -> Result<()> {
        info!(
            payload_id = %payload.id,
            amount = payload.amount,
            currency = %payload.currency,
            cause = %payload.cause,
            "Accepted webhook payload"
        );
        Ok(())
    }
}
