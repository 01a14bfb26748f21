use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payment notification payload as delivered by the provider.
///
/// Field names on the wire follow the provider contract; note that the
/// creation time arrives as `created_at_time`. The payload is immutable for
/// the duration of one verification cycle: decoded at the boundary, checked
/// by the processor, then handed to the store or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookPayload {
    /// Provider-assigned identifier (opaque, not required unique here)
    pub id: String,
    /// Transaction amount in minor currency units
    pub amount: i64,
    /// ISO-like currency code
    pub currency: String,
    /// Provider-side creation time, epoch seconds
    #[serde(rename = "created_at_time")]
    pub created_at: i64,
    /// Time the provider asserts the notification was sent, epoch seconds
    pub timestamp: i64,
    /// Free-text reason or category for the payment
    pub cause: String,
    /// Counterparty full name
    pub full_name: String,
    /// Counterparty account name
    pub account_name: String,
    /// Reference link to the invoice
    pub invoice_url: String,
}
