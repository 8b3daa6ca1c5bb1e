//! # palate-views
//!
//! Read-only aggregate views over a profile: a compact topic-grouped
//! summary for prompt assembly, unconditional safety warnings, and order
//! pattern insights. Views never mutate the profile; decay only decides
//! what a summary omits.

mod orders;
mod summary;
mod warnings;

pub use orders::OrderInsights;

use chrono::{DateTime, Utc};
use palate_core::config::PalateConfig;
use palate_core::Profile;
use palate_decay::DecayCalculator;

/// Fields that must never be decay-filtered out of a view.
const SAFETY_KEYS: &[&str] = &[
    "food.allergies",
    "food.intolerances",
    "food.dietary",
    "health.chronic_conditions",
    "health.medications",
];

pub struct ProfileViews {
    decay: DecayCalculator,
}

impl ProfileViews {
    pub fn new(config: &PalateConfig) -> Self {
        Self {
            decay: DecayCalculator::new(config.decay.clone()),
        }
    }

    /// Topic-grouped digest of the profile, one line per topic. Stale
    /// fields are omitted unless safety-critical; an empty result collapses
    /// to a fixed placeholder line.
    pub fn summary(&self, profile: &Profile, now: DateTime<Utc>) -> String {
        summary::render(profile, now, &self.decay)
    }

    /// Allergy, intolerance and chronic-condition warnings. Unconditional:
    /// never decay-filtered, present even when the summary omits everything
    /// else.
    pub fn warnings(&self, profile: &Profile) -> Vec<String> {
        warnings::collect(profile)
    }

    /// Ordering patterns derived from the `orders.history` log. `None` when
    /// the profile has no recorded orders.
    pub fn order_insights(&self, profile: &Profile) -> Option<OrderInsights> {
        orders::analyze(profile)
    }
}

impl Default for ProfileViews {
    fn default() -> Self {
        Self::new(&PalateConfig::default())
    }
}

pub(crate) fn is_safety_key(key: &str) -> bool {
    SAFETY_KEYS.contains(&key)
}
