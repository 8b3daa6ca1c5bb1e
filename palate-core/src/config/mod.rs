//! Runtime configuration, TOML-loadable with exhaustive in-code defaults.

mod caps;
mod classification;
mod decay_config;
mod promotion_config;

pub use caps::ListCaps;
pub use classification::{default_entries, ClassificationEntry};
pub use decay_config::DecayConfig;
pub use promotion_config::PromotionConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{PalateError, PalateResult};

/// Top-level configuration for the profile engine.
///
/// Every section has a default, so a partial TOML file (or none at all)
/// yields a fully working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PalateConfig {
    /// Facts below this confidence are silently dropped.
    pub min_confidence: f64,
    pub caps: ListCaps,
    pub decay: DecayConfig,
    pub promotion: PromotionConfig,
    /// The key → category mapping table. Misclassification silently changes
    /// merge semantics, so this is data, not code.
    pub classification: Vec<ClassificationEntry>,
}

impl Default for PalateConfig {
    fn default() -> Self {
        Self {
            min_confidence: constants::MIN_CONFIDENCE,
            caps: ListCaps::default(),
            decay: DecayConfig::default(),
            promotion: PromotionConfig::default(),
            classification: default_entries(),
        }
    }
}

impl PalateConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> PalateResult<Self> {
        toml::from_str(text).map_err(|e| PalateError::Config(e.to_string()))
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> PalateResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PalateError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
