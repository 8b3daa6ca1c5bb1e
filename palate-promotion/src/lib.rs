//! # palate-promotion
//!
//! Schema promotion: extension keys used by enough distinct users graduate
//! into the canonical schema. Usage is counted incrementally in the store's
//! promotion ledger (once per distinct user per key), so a pass never
//! rescans every profile to find candidates.
//!
//! A promotion migrates each holding profile's extension record into its
//! canonical slot, registers the key with the classifier as permanent, and
//! bumps the schema version. Per-profile failures are logged and skipped;
//! the skipped rows stay eligible for the next pass.

use std::sync::Arc;

use palate_classify::FieldClassifier;
use palate_core::config::PromotionConfig;
use palate_core::{
    FieldKind, PalateResult, Profile, ProfileStore, PromotedField, PromotionOutcome,
};

pub struct PromotionEngine {
    store: Arc<dyn ProfileStore>,
    classifier: Arc<FieldClassifier>,
    config: PromotionConfig,
}

impl PromotionEngine {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        classifier: Arc<FieldClassifier>,
        config: PromotionConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            config,
        }
    }

    /// Extension keys currently eligible for promotion: used by at least
    /// `min_usage` distinct users, not on the skip list, not already
    /// canonical, not already promoted.
    pub fn candidates(&self) -> PalateResult<Vec<String>> {
        let promoted = self.store.promoted_keys()?;
        let mut keys: Vec<String> = self
            .store
            .usage_counts()?
            .into_iter()
            .filter(|(_, count)| *count >= self.config.min_usage)
            .map(|(key, _)| key)
            .filter(|key| !self.config.is_skipped(key))
            .filter(|key| !self.classifier.is_canonical(key))
            .filter(|key| !promoted.contains(key))
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Promote one key across all profiles that hold it.
    ///
    /// Store errors while loading or saving a single profile do not abort
    /// the promotion: the profile is skipped, counted as a failure, and
    /// picked up again on a later pass. An already-canonical key is a
    /// no-op unless some profiles still hold it in their extension map
    /// (a prior pass skipped them) — those leftovers are migrated.
    pub fn promote(&self, key: &str) -> PalateResult<PromotionOutcome> {
        if self.config.is_skipped(key) {
            tracing::debug!(key, "skip-listed key, not promoting");
            return Ok(PromotionOutcome {
                key: key.to_string(),
                migrated: 0,
                failures: 0,
                already_canonical: false,
            });
        }

        let already_canonical = self.classifier.is_canonical(key);
        let user_ids = self.store.user_ids_with_extension(key)?;
        if already_canonical && user_ids.is_empty() {
            return Ok(PromotionOutcome {
                key: key.to_string(),
                migrated: 0,
                failures: 0,
                already_canonical: true,
            });
        }

        // Leftover sweeps must not reclassify a key that is already
        // canonical (it may carry pairing or cap settings).
        let schema_version = if already_canonical {
            self.classifier.schema_version()
        } else {
            let kind = self.infer_kind(key, &user_ids);
            self.classifier.register_permanent(key, kind)
        };

        let mut migrated = 0u64;
        let mut failures = 0u64;
        for user_id in &user_ids {
            match self.migrate_profile(key, user_id, schema_version) {
                Ok(true) => migrated += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(key, %user_id, %err, "profile migration failed, skipping");
                    failures += 1;
                }
            }
        }

        self.store.mark_promoted(key, migrated)?;
        tracing::info!(key, migrated, failures, schema_version, "promoted extension key");
        Ok(PromotionOutcome {
            key: key.to_string(),
            migrated,
            failures,
            already_canonical,
        })
    }

    /// Promote every current candidate, then finish any earlier promotion
    /// that left profiles behind. Returns one entry per key that migrated
    /// records or was newly promoted.
    pub fn run_pass(&self) -> PalateResult<Vec<PromotedField>> {
        let mut promoted = Vec::new();
        for key in self.candidates()? {
            let outcome = self.promote(&key)?;
            if !outcome.already_canonical {
                promoted.push(PromotedField {
                    key: outcome.key,
                    migrated: outcome.migrated,
                });
            }
        }
        // Keys promoted on an earlier pass whose migration skipped some
        // profiles: those rows stay eligible until they move.
        for key in self.store.promoted_keys()? {
            if self.store.user_ids_with_extension(&key)?.is_empty() {
                continue;
            }
            if promoted.iter().any(|p| p.key == key) {
                continue;
            }
            let outcome = self.promote(&key)?;
            if outcome.migrated > 0 {
                promoted.push(PromotedField {
                    key: outcome.key,
                    migrated: outcome.migrated,
                });
            }
        }
        Ok(promoted)
    }

    /// Canonical shape for the promoted field, inferred from the first
    /// stored value. Defaults to scalar when nothing is loadable.
    fn infer_kind(&self, key: &str, user_ids: &[String]) -> FieldKind {
        for user_id in user_ids {
            match self.store.load(user_id) {
                Ok(Some((profile, _))) => {
                    if let Some(record) = profile.extensions.get(key) {
                        return if record.value.is_list() {
                            FieldKind::List
                        } else {
                            FieldKind::Scalar
                        };
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(key, %user_id, %err, "could not inspect profile for kind");
                }
            }
        }
        FieldKind::Scalar
    }

    /// Move one profile's extension record into its canonical slot and stamp
    /// the new schema version. Returns false when the profile no longer
    /// holds the key.
    fn migrate_profile(
        &self,
        key: &str,
        user_id: &str,
        schema_version: u32,
    ) -> PalateResult<bool> {
        let Some((mut profile, version)) = self.store.load(user_id)? else {
            return Ok(false);
        };
        let Some(record) = profile.extensions.remove(key) else {
            return Ok(false);
        };
        // An earlier merge may already have written the canonical slot; the
        // canonical record wins and the extension duplicate is dropped.
        profile.canonical.entry(key.to_string()).or_insert(record);
        profile.meta.schema_version = schema_version;
        self.store.save(&profile, version)?;
        Ok(true)
    }
}

/// Replay previously promoted keys into a freshly built classifier.
///
/// The classifier's table is in-memory; on startup the store's promotion
/// ledger is the source of truth for keys promoted in earlier runs.
pub fn replay_promotions(
    store: &dyn ProfileStore,
    classifier: &FieldClassifier,
) -> PalateResult<()> {
    for key in store.promoted_keys()? {
        let kind = infer_kind_from_any_profile(store, &key)?;
        classifier.register_permanent(&key, kind);
    }
    Ok(())
}

fn infer_kind_from_any_profile(store: &dyn ProfileStore, key: &str) -> PalateResult<FieldKind> {
    for user_id in store.user_ids()? {
        if let Some((profile, _)) = store.load(&user_id)? {
            if let Some(kind) = kind_of_record(&profile, key) {
                return Ok(kind);
            }
        }
    }
    Ok(FieldKind::Scalar)
}

fn kind_of_record(profile: &Profile, key: &str) -> Option<FieldKind> {
    profile.record(key).map(|record| {
        if record.value.is_list() {
            FieldKind::List
        } else {
            FieldKind::Scalar
        }
    })
}
