pub mod confidence;
pub mod value;

pub use confidence::Confidence;
pub use value::FactValue;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Polarity of a fact: affirms or negates a value. Produced by the external
/// extractor; the engine treats it as opaque input and never re-derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Positive,
    Negative,
}

/// Channel the fact was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactSource {
    Chat,
    Image,
    Audio,
    Order,
}

/// An atomic, confidence-scored, polarity-tagged observation about a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Dotted field path, e.g. `food.favorites`.
    pub key: String,
    pub value: FactValue,
    pub confidence: Confidence,
    pub signal: Signal,
    pub source: FactSource,
    /// When the observation was made. Merge uses this, never wall-clock
    /// time, so replaying the same batch is deterministic.
    pub observed_at: DateTime<Utc>,
}

impl Fact {
    /// Build a fact, sanitizing the raw confidence (NaN or out-of-range
    /// input falls back to the conservative default).
    pub fn new(
        key: impl Into<String>,
        value: FactValue,
        confidence: f64,
        signal: Signal,
        source: FactSource,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            confidence: Confidence::sanitize(confidence),
            signal,
            source,
            observed_at,
        }
    }

    /// Whether this fact clears the minimum-confidence gate.
    pub fn meets_threshold(&self, min_confidence: f64) -> bool {
        self.confidence.value() >= min_confidence
    }
}
