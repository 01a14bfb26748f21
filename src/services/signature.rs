use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::models::WebhookPayload;

type HmacSha256 = Hmac<Sha256>;

/// Build the canonical string the provider signs.
///
/// Field order and formatting are fixed by the provider contract: id,
/// amount, currency, created_at, timestamp, cause, full_name, account_name,
/// invoice_url, concatenated with no separators. No escaping is applied.
/// Adjacent free-text fields can therefore produce the same canonical
/// string for different payloads; this is accepted provider contract risk
/// and adding delimiters here would break interoperability. Any change to
/// the encoding must be versioned with the provider, never made silently.
pub fn canonical_payload(payload: &WebhookPayload) -> String {
    format!(
        "{}{}{}{}{}{}{}{}{}",
        payload.id,
        payload.amount,
        payload.currency,
        payload.created_at,
        payload.timestamp,
        payload.cause,
        payload.full_name,
        payload.account_name,
        payload.invoice_url,
    )
}

/// Compute the HMAC-SHA256 of `data` keyed by `secret`, as lowercase hex.
pub fn generate_hmac(data: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies provider signatures over canonical payloads.
///
/// Holds the shared secret for the lifetime of the process. The secret is
/// key material: no `Debug` derive, and it never appears in logs.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Expected signature for a payload: HMAC over its canonical string.
    pub fn sign(&self, payload: &WebhookPayload) -> String {
        generate_hmac(&canonical_payload(payload), &self.secret)
    }

    /// Check a received signature against the expected one.
    ///
    /// The comparison is constant-time over the full hex strings so timing
    /// cannot leak the expected digest. Exact, case-sensitive match only;
    /// an empty or wrong-length signature is a non-match, not an error.
    pub fn verify(&self, payload: &WebhookPayload, received_signature: &str) -> bool {
        let expected = self.sign(payload);
        constant_time_compare(expected.as_bytes(), received_signature.as_bytes())
    }
}

/// Constant-time comparison to prevent timing attacks.
///
/// Uses the `subtle` crate, which carries optimization barriers so the
/// compiler cannot turn the comparison back into a short-circuiting one.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
