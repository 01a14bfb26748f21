use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::WebhookPayload;
use crate::services::freshness::is_fresh;
use crate::services::signature::SignatureVerifier;
use crate::services::store::WebhookStore;

/// Terminal outcome of one webhook verification pass.
///
/// Signature and staleness rejections stay distinguishable here for
/// logging and tests; the HTTP boundary collapses both to the same 403
/// response so callers cannot tell which check failed. System failures are
/// the `Err` arm of [`WebhookProcessor::process`], not an outcome variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Accepted,
    RejectedSignature,
    RejectedStale,
}

impl WebhookOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, WebhookOutcome::Accepted)
    }
}

/// Orchestrates signature verification, freshness enforcement, and
/// persistence for inbound webhook payloads.
///
/// Each call is a single pass with no retries. Stateless apart from the
/// read-only verifier secret, so unbounded parallel invocations are safe.
#[derive(Clone)]
pub struct WebhookProcessor {
    verifier: SignatureVerifier,
    store: Arc<dyn WebhookStore>,
    tolerance_secs: i64,
    store_timeout: Duration,
}

impl WebhookProcessor {
    pub fn new(
        verifier: SignatureVerifier,
        store: Arc<dyn WebhookStore>,
        tolerance_secs: i64,
        store_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            store,
            tolerance_secs,
            store_timeout,
        }
    }

    /// Process a payload against the wall clock.
    pub async fn process(
        &self,
        payload: &WebhookPayload,
        received_signature: &str,
    ) -> Result<WebhookOutcome> {
        self.process_at(payload, received_signature, chrono::Utc::now().timestamp())
            .await
    }

    /// Process a payload at an injected instant.
    ///
    /// Checks run in order: signature, freshness, persistence. A failed
    /// check short-circuits; a store error or timeout is propagated as a
    /// system failure distinct from rejection. Raw signatures are never
    /// logged.
    pub async fn process_at(
        &self,
        payload: &WebhookPayload,
        received_signature: &str,
        now: i64,
    ) -> Result<WebhookOutcome> {
        if !self.verifier.verify(payload, received_signature) {
            debug!(payload_id = %payload.id, "Webhook signature verification failed");
            return Ok(WebhookOutcome::RejectedSignature);
        }

        if !is_fresh(payload.timestamp, now, self.tolerance_secs) {
            warn!(
                payload_id = %payload.id,
                age_secs = now - payload.timestamp,
                tolerance_secs = self.tolerance_secs,
                "Webhook payload is outside the freshness window"
            );
            return Ok(WebhookOutcome::RejectedStale);
        }

        match tokio::time::timeout(self.store_timeout, self.store.save(payload)).await {
            Ok(result) => {
                result.with_context(|| format!("failed to persist webhook payload {}", payload.id))?
            }
            Err(_) => anyhow::bail!(
                "webhook store timed out after {:?} for payload {}",
                self.store_timeout,
                payload.id
            ),
        }

        Ok(WebhookOutcome::Accepted)
    }
}
