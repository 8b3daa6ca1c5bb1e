use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Decay subsystem configuration: horizon table plus the staleness cutoff
/// views apply when omitting fields from summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Days until a field's freshness reaches zero, keyed by dotted prefix.
    /// The longest matching prefix wins.
    pub horizons: BTreeMap<String, u64>,
    /// Horizon for keys with no table entry.
    pub default_horizon_days: u64,
    /// Freshness below which views omit non-safety fields.
    pub stale_threshold: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        let mut horizons = BTreeMap::new();
        horizons.insert("emotion".to_string(), 1);
        horizons.insert("timing".to_string(), 30);
        horizons.insert("financial".to_string(), 60);
        horizons.insert("food.favorites".to_string(), 180);
        horizons.insert("personal".to_string(), 365);
        horizons.insert("health".to_string(), 365);
        Self {
            horizons,
            default_horizon_days: constants::DEFAULT_DECAY_HORIZON_DAYS,
            stale_threshold: constants::STALE_THRESHOLD,
        }
    }
}
