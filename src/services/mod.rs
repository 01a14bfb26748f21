pub mod freshness;
pub mod processor;
pub mod signature;
pub mod store;

pub use processor::{WebhookOutcome, WebhookProcessor};
pub use signature::SignatureVerifier;
pub use store::{LoggingWebhookStore, PostgresWebhookStore, WebhookStore};
