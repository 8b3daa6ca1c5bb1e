use serde::{Deserialize, Serialize};

use crate::fact::{Confidence, FactValue};

/// Outcome recorded per field in the merge change log.
///
/// `Replaced`/`Updated`/`Weakened`/`Removed`/`Kept` come from the
/// contradiction resolver; the remaining variants cover the non-resolver
/// paths (first writes, temporary supersession, historical appends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOutcome {
    /// First write to a field.
    Inserted,
    /// Higher-confidence positive fact replaced the value.
    Replaced,
    /// Equal-confidence positive fact updated the value.
    Updated,
    /// Weaker negative fact reduced the stored confidence.
    Weakened,
    /// Stronger negative fact cleared the value (redirected to the paired
    /// negative list where configured).
    Removed,
    /// No change.
    Kept,
    /// Temporary field: prior value archived to history, new value active.
    Superseded,
    /// Historical field: entry appended.
    Archived,
}

/// One audited field mutation: pre/post value plus the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub key: String,
    pub pre: Option<FactValue>,
    pub post: Option<FactValue>,
    pub outcome: ChangeOutcome,
    /// Confidence of the record after the change.
    pub confidence: Confidence,
}

pub type ChangeLog = Vec<FieldChange>;

/// Result of one `submit` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    /// Keys whose stored state actually changed.
    pub updated_fields: Vec<String>,
    pub change_log: ChangeLog,
    /// Facts dropped at the minimum-confidence gate. Not an error.
    pub rejected: usize,
}
