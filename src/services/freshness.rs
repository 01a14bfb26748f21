/// Default acceptance window for a payload's embedded timestamp, seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Whether a payload timestamp is within the acceptance window.
///
/// Inclusive on the boundary: a payload exactly `tolerance_secs` old is
/// still fresh. `now` is injected by the caller so the check stays
/// deterministic under test. Timestamps in the future always pass; the
/// window only bounds staleness, not clock skew in the provider's favor.
pub fn is_fresh(timestamp: i64, now: i64, tolerance_secs: i64) -> bool {
    now - timestamp <= tolerance_secs
}
