//! # palate-classify
//!
//! Maps fact keys to merge categories via a configurable prefix table.
//! Dotted keys inherit their closest ancestor's entry unless a more specific
//! entry overrides it; unmapped keys classify as unclassified. The table is
//! mutable at runtime: a successful promotion registers the key as permanent
//! and bumps the schema version.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

use palate_core::config::{ClassificationEntry, PalateConfig};
use palate_core::{Category, FieldKind, FieldSpec};

pub struct FieldClassifier {
    table: RwLock<HashMap<String, ClassificationEntry>>,
    schema_version: AtomicU32,
}

impl FieldClassifier {
    pub fn new(entries: Vec<ClassificationEntry>) -> Self {
        let table = entries
            .into_iter()
            .map(|e| (e.prefix.clone(), e))
            .collect();
        Self {
            table: RwLock::new(table),
            schema_version: AtomicU32::new(1),
        }
    }

    pub fn from_config(config: &PalateConfig) -> Self {
        Self::new(config.classification.clone())
    }

    /// Resolve the full field spec for a key.
    ///
    /// Tries the exact key first, then walks up the dotted path; the longest
    /// matching prefix wins. A lookup miss is not an error — it routes the
    /// key to the extension-map path.
    pub fn classify(&self, key: &str) -> FieldSpec {
        let table = self.table.read().expect("classifier table poisoned");

        let mut candidate = key;
        loop {
            if let Some(entry) = table.get(candidate) {
                return FieldSpec {
                    category: entry.category,
                    kind: entry.kind,
                    negative_pair: entry.negative_pair.clone(),
                    cap: entry.cap,
                };
            }
            match candidate.rfind('.') {
                Some(idx) => candidate = &candidate[..idx],
                None => return FieldSpec::unclassified(),
            }
        }
    }

    /// Convenience: just the category.
    pub fn category(&self, key: &str) -> Category {
        self.classify(key).category
    }

    /// Whether the key resolves to a canonical (classified) slot.
    pub fn is_canonical(&self, key: &str) -> bool {
        self.category(key) != Category::Unclassified
    }

    /// Register a promoted key as a permanent canonical field.
    ///
    /// Inserts an exact-key entry (overriding any inherited ancestor) and
    /// bumps the schema version. Returns the new version. Re-registering an
    /// already-permanent exact entry leaves the version unchanged.
    pub fn register_permanent(&self, key: &str, kind: FieldKind) -> u32 {
        let mut table = self.table.write().expect("classifier table poisoned");
        if let Some(existing) = table.get(key) {
            if existing.category == Category::Permanent {
                return self.schema_version.load(Ordering::SeqCst);
            }
        }
        table.insert(
            key.to_string(),
            ClassificationEntry {
                prefix: key.to_string(),
                category: Category::Permanent,
                kind,
                negative_pair: None,
                cap: None,
            },
        );
        self.schema_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version.load(Ordering::SeqCst)
    }
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new(palate_core::config::default_entries())
    }
}
