use std::sync::Arc;

use palate_classify::FieldClassifier;
use palate_core::config::{ListCaps, PalateConfig};
use palate_core::{
    Category, ChangeOutcome, Fact, FactRecord, FactValue, FieldChange, FieldSpec, MergeResult,
    Profile,
};

use crate::strategies::{self, MergeContext};

/// Applies a batch of facts to a profile, one field at a time.
///
/// The engine owns the batch-level concerns: the minimum-confidence gate,
/// recursive expansion of nested map facts into dotted child keys, routing
/// between the canonical and extension maps, redirects into paired negative
/// lists, and the change log. Per-field semantics live in the category
/// strategies.
pub struct MergeEngine {
    classifier: Arc<FieldClassifier>,
    caps: ListCaps,
    min_confidence: f64,
}

impl MergeEngine {
    pub fn new(classifier: Arc<FieldClassifier>, config: &PalateConfig) -> Self {
        Self {
            classifier,
            caps: config.caps.clone(),
            min_confidence: config.min_confidence,
        }
    }

    /// Merge a batch of facts into the profile in input order.
    ///
    /// Deterministic: uses each fact's `observed_at`, never wall-clock time,
    /// so replaying a batch yields the same profile.
    pub fn merge(&self, profile: &mut Profile, facts: &[Fact]) -> MergeResult {
        let mut result = MergeResult::default();
        for fact in facts {
            self.merge_fact(profile, fact, &mut result);
        }
        result
    }

    fn merge_fact(&self, profile: &mut Profile, fact: &Fact, result: &mut MergeResult) {
        if !fact.meets_threshold(self.min_confidence) {
            tracing::debug!(
                key = %fact.key,
                confidence = %fact.confidence,
                "fact below minimum confidence, dropped"
            );
            result.rejected += 1;
            return;
        }

        let spec = self.classifier.classify(&fact.key);

        // A map value on a scalar resolved/temporary field is a bundle of
        // child facts, not a value: recurse with dotted child keys so each
        // leaf classifies and merges on its own.
        if should_expand(&spec, &fact.value) {
            if let FactValue::Map(children) = &fact.value {
                for (name, value) in children {
                    let mut child = fact.clone();
                    child.key = format!("{}.{name}", fact.key);
                    child.value = value.clone();
                    self.merge_fact(profile, &child, result);
                }
                return;
            }
        }

        let existing = field_map(profile, spec.category).get(&fact.key);
        let pre = existing.map(|r| r.value.clone());
        let ctx = MergeContext {
            spec: &spec,
            caps: &self.caps,
        };
        let applied = strategies::strategy_for(spec.category).apply(existing, fact, &ctx);

        let confidence = applied
            .record
            .as_ref()
            .map(|r| r.confidence)
            .unwrap_or(fact.confidence);
        let post = applied.record.as_ref().map(|r| r.value.clone());

        match applied.record {
            Some(record) => {
                field_map_mut(profile, spec.category).insert(fact.key.clone(), record);
            }
            None if applied.outcome == ChangeOutcome::Removed => {
                field_map_mut(profile, spec.category).remove(&fact.key);
            }
            None => {}
        }

        tracing::debug!(key = %fact.key, outcome = ?applied.outcome, "merged fact");
        result.change_log.push(FieldChange {
            key: fact.key.clone(),
            pre,
            post,
            outcome: applied.outcome,
            confidence,
        });
        if applied.outcome != ChangeOutcome::Kept {
            push_updated(&mut result.updated_fields, &fact.key);
        }

        if !applied.redirects.is_empty() {
            if let Some(pair_key) = spec.negative_pair.clone() {
                self.append_redirects(profile, &pair_key, applied.redirects, fact, result);
            }
        }

        let observed = fact.observed_at;
        profile.meta.last_updated = Some(match profile.meta.last_updated {
            Some(prev) if prev > observed => prev,
            _ => observed,
        });
    }

    /// Append values removed (or negated while absent) from a field into its
    /// paired negative list, with the same dedup and cap rules as a positive
    /// list append.
    fn append_redirects(
        &self,
        profile: &mut Profile,
        pair_key: &str,
        values: Vec<FactValue>,
        fact: &Fact,
        result: &mut MergeResult,
    ) {
        let spec = self.classifier.classify(pair_key);
        let cap = spec
            .cap
            .unwrap_or_else(|| self.caps.list_cap(spec.category));

        let map = field_map_mut(profile, spec.category);
        let was_new = !map.contains_key(pair_key);
        let record = map.entry(pair_key.to_string()).or_insert_with(|| {
            FactRecord::new(FactValue::List(Vec::new()), fact.confidence, fact.observed_at)
        });
        let pre = if was_new {
            None
        } else {
            Some(record.value.clone())
        };

        let mut items = record
            .value
            .as_list()
            .map(<[FactValue]>::to_vec)
            .unwrap_or_else(|| vec![record.value.clone()]);
        let mut changed = was_new;
        for value in values {
            if !items.contains(&value) {
                items.push(value);
                changed = true;
            }
        }
        if !changed {
            return;
        }
        while items.len() > cap {
            items.remove(0);
        }

        record.value = FactValue::List(items);
        if fact.confidence.value() > record.confidence.value() {
            record.confidence = fact.confidence;
        }
        record.updated_at = fact.observed_at;

        tracing::debug!(key = %pair_key, from = %fact.key, "redirected negated value");
        result.change_log.push(FieldChange {
            key: pair_key.to_string(),
            pre,
            post: Some(record.value.clone()),
            outcome: if was_new {
                ChangeOutcome::Inserted
            } else {
                ChangeOutcome::Updated
            },
            confidence: record.confidence,
        });
        push_updated(&mut result.updated_fields, pair_key);
    }
}

fn should_expand(spec: &FieldSpec, value: &FactValue) -> bool {
    value.is_map()
        && spec.kind == palate_core::FieldKind::Scalar
        && matches!(
            spec.category,
            Category::Permanent | Category::SemiPermanent | Category::Temporary
        )
}

fn field_map(profile: &Profile, category: Category) -> &std::collections::BTreeMap<String, FactRecord> {
    match category {
        Category::Unclassified => &profile.extensions,
        _ => &profile.canonical,
    }
}

fn field_map_mut(
    profile: &mut Profile,
    category: Category,
) -> &mut std::collections::BTreeMap<String, FactRecord> {
    match category {
        Category::Unclassified => &mut profile.extensions,
        _ => &mut profile.canonical,
    }
}

fn push_updated(updated: &mut Vec<String>, key: &str) {
    if !updated.iter().any(|k| k == key) {
        updated.push(key.to_string());
    }
}
