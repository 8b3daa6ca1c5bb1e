//! # palate-service
//!
//! The facade the rest of the system talks to. Wires the classifier, merge
//! engine, store, promotion engine and views together, and owns the
//! concurrency contract: same-user submits are serialized by a per-user
//! lock, while the store's version stamp catches writers the lock cannot
//! see (a concurrent promotion pass).

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use dashmap::DashMap;
use palate_classify::FieldClassifier;
use palate_core::{
    Category, Fact, MergeResult, PalateConfig, PalateError, PalateResult, Profile, ProfileStore,
    PromotedField, StoreError,
};
use palate_merge::MergeEngine;
use palate_promotion::{replay_promotions, PromotionEngine};
use palate_storage::SqliteProfileStore;
use palate_views::{OrderInsights, ProfileViews};

/// Save attempts per submit before giving up on version conflicts.
const MAX_SAVE_RETRIES: u32 = 3;

pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    classifier: Arc<FieldClassifier>,
    engine: MergeEngine,
    promotion: PromotionEngine,
    views: ProfileViews,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ProfileService {
    /// Build a service over an existing store. Replays the store's
    /// promotion ledger into the classifier so keys promoted in earlier
    /// runs stay canonical.
    pub fn new(store: Arc<dyn ProfileStore>, config: PalateConfig) -> PalateResult<Self> {
        let classifier = Arc::new(FieldClassifier::from_config(&config));
        replay_promotions(store.as_ref(), &classifier)?;
        let engine = MergeEngine::new(classifier.clone(), &config);
        let promotion =
            PromotionEngine::new(store.clone(), classifier.clone(), config.promotion.clone());
        let views = ProfileViews::new(&config);
        Ok(Self {
            store,
            classifier,
            engine,
            promotion,
            views,
            locks: DashMap::new(),
        })
    }

    /// Open a service over a SQLite store on disk.
    pub fn open(path: &Path, config: PalateConfig) -> PalateResult<Self> {
        let store = Arc::new(SqliteProfileStore::open(path)?);
        Self::new(store, config)
    }

    /// Open a service over an in-memory store (for testing).
    pub fn open_in_memory(config: PalateConfig) -> PalateResult<Self> {
        let store = Arc::new(SqliteProfileStore::open_in_memory()?);
        Self::new(store, config)
    }

    /// Merge a batch of facts into one user's profile and persist it.
    ///
    /// Creates the profile on first contact. Bumps the profile's message
    /// count once per call, and counts every touched extension key in the
    /// promotion ledger. A version conflict (promotion pass racing this
    /// write) re-reads and re-merges; facts carry their own timestamps, so
    /// the retry is deterministic.
    pub fn submit(&self, user_id: &str, facts: &[Fact]) -> PalateResult<MergeResult> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().expect("user lock poisoned");

        let mut attempts = 0;
        loop {
            let (mut profile, version) = match self.store.load(user_id)? {
                Some((profile, version)) => (profile, version),
                None => (Profile::new(user_id), 0),
            };

            let result = self.engine.merge(&mut profile, facts);
            profile.meta.message_count += 1;

            match self.store.save(&profile, version) {
                Ok(_) => {
                    self.record_extension_usage(user_id, &result)?;
                    tracing::info!(
                        user_id,
                        updated = result.updated_fields.len(),
                        rejected = result.rejected,
                        "merged fact batch"
                    );
                    return Ok(result);
                }
                Err(PalateError::Store(StoreError::VersionConflict { .. }))
                    if attempts < MAX_SAVE_RETRIES =>
                {
                    attempts += 1;
                    tracing::debug!(user_id, attempts, "version conflict, re-merging");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Promote every extension key that has crossed the usage threshold.
    pub fn run_promotion_pass(&self) -> PalateResult<Vec<PromotedField>> {
        self.promotion.run_pass()
    }

    pub fn get_profile(&self, user_id: &str) -> PalateResult<Option<Profile>> {
        Ok(self.store.load(user_id)?.map(|(profile, _)| profile))
    }

    /// Topic-grouped summary for prompt assembly. Unknown users get the
    /// empty-profile placeholder.
    pub fn get_summary(&self, user_id: &str) -> PalateResult<String> {
        let profile = self
            .get_profile(user_id)?
            .unwrap_or_else(|| Profile::new(user_id));
        Ok(self.views.summary(&profile, Utc::now()))
    }

    pub fn get_warnings(&self, user_id: &str) -> PalateResult<Vec<String>> {
        Ok(match self.get_profile(user_id)? {
            Some(profile) => self.views.warnings(&profile),
            None => Vec::new(),
        })
    }

    pub fn get_order_insights(&self, user_id: &str) -> PalateResult<Option<OrderInsights>> {
        Ok(self
            .get_profile(user_id)?
            .and_then(|profile| self.views.order_insights(&profile)))
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Count each extension key touched by this batch once for this user.
    fn record_extension_usage(&self, user_id: &str, result: &MergeResult) -> PalateResult<()> {
        let mut seen: Vec<&str> = Vec::new();
        for change in &result.change_log {
            if seen.contains(&change.key.as_str()) {
                continue;
            }
            seen.push(&change.key);
            if self.classifier.category(&change.key) == Category::Unclassified {
                self.store.record_usage(&change.key, user_id)?;
            }
        }
        Ok(())
    }
}
