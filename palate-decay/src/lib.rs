//! # palate-decay
//!
//! Read-time freshness for profile fields. Decay is metadata only: it tells
//! views which fields to omit, and never deletes stored data.

mod freshness;
mod horizon;

pub use freshness::freshness;
pub use horizon::horizon_days;

use chrono::{DateTime, Utc};
use palate_core::config::DecayConfig;

/// Pure freshness calculator over a horizon table.
pub struct DecayCalculator {
    config: DecayConfig,
}

impl DecayCalculator {
    pub fn new(config: DecayConfig) -> Self {
        Self { config }
    }

    /// Horizon for a key: longest dotted-prefix match, else the default.
    pub fn horizon_days(&self, key: &str) -> u64 {
        horizon::horizon_days(&self.config, key)
    }

    /// Freshness in [0.0, 1.0]: 1.0 just written, 0.0 at/after the horizon.
    pub fn freshness(&self, key: &str, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        freshness::freshness(self.horizon_days(key), last_updated, now)
    }

    /// Whether views should omit this field from generated summaries.
    /// Safety-critical fields are never filtered — callers check that first.
    pub fn is_stale(&self, key: &str, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.freshness(key, last_updated, now) < self.config.stale_threshold
    }

    pub fn stale_threshold(&self) -> f64 {
        self.config.stale_threshold
    }
}

impl Default for DecayCalculator {
    fn default() -> Self {
        Self::new(DecayConfig::default())
    }
}
