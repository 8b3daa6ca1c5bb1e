use serde::{Deserialize, Serialize};

/// Result of promoting one extension key into the canonical schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionOutcome {
    pub key: String,
    /// Profiles whose extension record was migrated to the canonical slot.
    pub migrated: u64,
    /// Profiles skipped due to per-profile failures. The promotion still
    /// completes; skipped rows stay eligible for a later pass.
    pub failures: u64,
    /// True when the key was already canonical and the call was a no-op.
    pub already_canonical: bool,
}

/// Summary entry returned by a full promotion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotedField {
    pub key: String,
    pub migrated: u64,
}
