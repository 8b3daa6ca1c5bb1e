use serde::{Deserialize, Serialize};

use crate::constants;

/// Promotion subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionConfig {
    /// Distinct-user usage count at which an extension key becomes a
    /// promotion candidate.
    pub min_usage: u64,
    /// Internal bookkeeping keys that must never be promoted.
    pub skip_keys: Vec<String>,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            min_usage: constants::MIN_PROMOTION_USAGE,
            skip_keys: vec![
                "last_update".to_string(),
                "mentioned_dates".to_string(),
                "mentioned_numbers".to_string(),
                "emotion_history".to_string(),
                "voice_emotion_history".to_string(),
            ],
        }
    }
}

impl PromotionConfig {
    pub fn is_skipped(&self, key: &str) -> bool {
        self.skip_keys.iter().any(|k| k == key)
    }
}
