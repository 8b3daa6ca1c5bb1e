use chrono::{DateTime, Utc};

/// Linear freshness: `max(0, 1 − days_elapsed / horizon)`.
///
/// `freshness(h, t, t) == 1.0`, `freshness(h, t, t + h days) == 0.0`,
/// monotonically non-increasing in elapsed time. Timestamps in the future
/// clamp to 1.0.
pub fn freshness(horizon_days: u64, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    if horizon_days == 0 {
        return 0.0;
    }
    let days_elapsed = (now - last_updated).num_seconds().max(0) as f64 / 86400.0;
    (1.0 - days_elapsed / horizon_days as f64).clamp(0.0, 1.0)
}
