use crate::errors::PalateResult;
use crate::profile::Profile;

/// Profile persistence plus the incremental promotion ledger.
///
/// Profiles are versioned for optimistic concurrency: `save` fails with
/// `StoreError::VersionConflict` when the stored version no longer matches
/// `expected_version`, so two concurrent merges cannot silently overwrite
/// each other. `expected_version == 0` creates the row.
pub trait ProfileStore: Send + Sync {
    // --- Profiles ---
    fn load(&self, user_id: &str) -> PalateResult<Option<(Profile, u64)>>;
    fn save(&self, profile: &Profile, expected_version: u64) -> PalateResult<u64>;
    fn user_ids(&self) -> PalateResult<Vec<String>>;
    /// Users whose extension map currently holds `key` (promotion scan).
    fn user_ids_with_extension(&self, key: &str) -> PalateResult<Vec<String>>;

    // --- Promotion ledger (incremental, cross-user, atomic) ---
    /// Count `key` once per distinct user, idempotently.
    fn record_usage(&self, key: &str, user_id: &str) -> PalateResult<()>;
    fn usage_counts(&self) -> PalateResult<Vec<(String, u64)>>;
    fn mark_promoted(&self, key: &str, migrated: u64) -> PalateResult<()>;
    fn promoted_keys(&self) -> PalateResult<Vec<String>>;
}
