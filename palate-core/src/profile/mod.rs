//! Profile document: canonical typed fields plus the bounded extension map.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fact::{Confidence, FactValue};

/// A superseded value retained in a record's bounded history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub value: FactValue,
    /// When the superseded value was current (its own update time, not the
    /// time it was replaced).
    pub timestamp: DateTime<Utc>,
}

/// Stored state of one profile field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    pub value: FactValue,
    pub confidence: Confidence,
    pub updated_at: DateTime<Utc>,
    /// Superseded values, bounded per category (temporary fields only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEntry>,
}

impl FactRecord {
    pub fn new(value: FactValue, confidence: Confidence, updated_at: DateTime<Utc>) -> Self {
        Self {
            value,
            confidence,
            updated_at,
            history: Vec::new(),
        }
    }
}

/// Profile bookkeeping metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileMeta {
    /// Number of submit calls merged into this profile.
    pub message_count: u64,
    pub last_updated: Option<DateTime<Utc>>,
    /// Canonical schema version this profile was last migrated to.
    pub schema_version: u32,
}

/// The long-lived per-user profile document.
///
/// Canonical fields are keys the classifier knows; everything else lives in
/// the extension map until promotion migrates it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub canonical: BTreeMap<String, FactRecord>,
    #[serde(default)]
    pub extensions: BTreeMap<String, FactRecord>,
    #[serde(default)]
    pub meta: ProfileMeta,
}

impl Profile {
    /// Create an empty profile. Profiles are created on the first fact for a
    /// user and never deleted by this subsystem.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            canonical: BTreeMap::new(),
            extensions: BTreeMap::new(),
            meta: ProfileMeta::default(),
        }
    }

    /// Look up a record by key, canonical first, then the extension map.
    pub fn record(&self, key: &str) -> Option<&FactRecord> {
        self.canonical.get(key).or_else(|| self.extensions.get(key))
    }

    /// Convenience: the elements of a list-valued field, if present.
    pub fn list_values(&self, key: &str) -> Option<&[FactValue]> {
        self.record(key).and_then(|r| r.value.as_list())
    }
}
