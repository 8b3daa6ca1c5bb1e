use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use palate_classify::FieldClassifier;
use palate_core::config::PalateConfig;
use palate_core::{ChangeOutcome, Fact, FactSource, FactValue, Profile, Signal};
use palate_merge::MergeEngine;

fn t(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + Duration::days(days)
}

fn engine() -> MergeEngine {
    let config = PalateConfig::default();
    MergeEngine::new(Arc::new(FieldClassifier::default()), &config)
}

fn fact(key: &str, value: impl Into<FactValue>, confidence: f64, signal: Signal) -> Fact {
    Fact::new(key, value.into(), confidence, signal, FactSource::Chat, t(0))
}

fn positive(key: &str, value: impl Into<FactValue>, confidence: f64) -> Fact {
    fact(key, value, confidence, Signal::Positive)
}

fn negative(key: &str, value: impl Into<FactValue>, confidence: f64) -> Fact {
    fact(key, value, confidence, Signal::Negative)
}

// ── Gate and routing ─────────────────────────────────────────────────────

#[test]
fn below_minimum_confidence_is_rejected_not_merged() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    let result = engine.merge(&mut profile, &[positive("personal.name", "Ada", 0.2)]);

    assert_eq!(result.rejected, 1);
    assert!(result.change_log.is_empty());
    assert!(profile.canonical.is_empty());
}

#[test]
fn classified_keys_land_in_canonical() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    let result = engine.merge(&mut profile, &[positive("personal.name", "Ada", 0.9)]);

    assert_eq!(result.updated_fields, vec!["personal.name"]);
    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Inserted);
    assert!(profile.canonical.contains_key("personal.name"));
    assert!(profile.extensions.is_empty());
}

#[test]
fn unmapped_keys_land_in_extensions() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("quirks.naming", "nicknames", 0.7)]);

    assert!(profile.canonical.is_empty());
    assert_eq!(
        profile.extensions["quirks.naming"].value,
        FactValue::str("nicknames")
    );
}

#[test]
fn nested_map_fact_expands_to_dotted_children() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    let mut bundle = BTreeMap::new();
    bundle.insert("name".to_string(), FactValue::str("Ada"));
    bundle.insert("city".to_string(), FactValue::str("Turin"));
    let result = engine.merge(
        &mut profile,
        &[positive("personal", FactValue::Map(bundle), 0.8)],
    );

    assert_eq!(profile.canonical["personal.name"].value, FactValue::str("Ada"));
    assert_eq!(profile.canonical["personal.city"].value, FactValue::str("Turin"));
    assert!(!profile.canonical.contains_key("personal"));
    assert_eq!(result.change_log.len(), 2);
}

// ── Scalar resolution ────────────────────────────────────────────────────

#[test]
fn higher_confidence_positive_replaces_scalar() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("personal.city", "Rome", 0.6)]);
    let result = engine.merge(&mut profile, &[positive("personal.city", "Milan", 0.9)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Replaced);
    assert_eq!(profile.canonical["personal.city"].value, FactValue::str("Milan"));
    assert_eq!(profile.canonical["personal.city"].confidence.value(), 0.9);
}

#[test]
fn lower_confidence_positive_is_kept() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("personal.city", "Rome", 0.9)]);
    let result = engine.merge(&mut profile, &[positive("personal.city", "Milan", 0.4)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Kept);
    assert!(result.updated_fields.is_empty());
    assert_eq!(profile.canonical["personal.city"].value, FactValue::str("Rome"));
}

#[test]
fn reaffirming_same_value_with_higher_confidence_updates() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("personal.city", "Rome", 0.5)]);
    let result = engine.merge(&mut profile, &[positive("personal.city", "Rome", 0.9)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Updated);
    assert_eq!(profile.canonical["personal.city"].confidence.value(), 0.9);
}

#[test]
fn stronger_negation_clears_scalar_without_pair() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("personal.city", "Rome", 0.6)]);
    let result = engine.merge(&mut profile, &[negative("personal.city", "Rome", 0.9)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Removed);
    assert!(!profile.canonical.contains_key("personal.city"));
}

// ── List fields ──────────────────────────────────────────────────────────

#[test]
fn list_append_deduplicates() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(
        &mut profile,
        &[
            positive("food.favorites", FactValue::list(["pizza", "pasta"]), 0.8),
            positive("food.favorites", "pizza", 0.8),
        ],
    );

    assert_eq!(
        profile.list_values("food.favorites").map(<[FactValue]>::len),
        Some(2)
    );
}

#[test]
fn semi_permanent_list_keeps_newest_at_cap() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    for i in 0..35 {
        engine.merge(
            &mut profile,
            &[positive("food.favorites", format!("dish-{i}"), 0.8)],
        );
    }

    let items = profile.list_values("food.favorites").unwrap();
    assert_eq!(items.len(), 30);
    assert_eq!(items[0], FactValue::str("dish-5"));
    assert_eq!(items[29], FactValue::str("dish-34"));
}

#[test]
fn permanent_list_uses_smaller_cap() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    for i in 0..25 {
        engine.merge(
            &mut profile,
            &[positive("food.allergies", format!("allergen-{i}"), 0.9)],
        );
    }

    assert_eq!(profile.list_values("food.allergies").unwrap().len(), 20);
}

#[test]
fn negating_absent_value_redirects_to_pair() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    let result = engine.merge(&mut profile, &[negative("food.favorites", "olives", 0.8)]);

    // Nothing to remove from favorites, but the dislike is still recorded.
    assert!(!profile.canonical.contains_key("food.favorites"));
    assert_eq!(
        profile.list_values("food.dislikes"),
        Some(&[FactValue::str("olives")][..])
    );
    assert!(result.updated_fields.contains(&"food.dislikes".to_string()));
}

// ── Temporary fields ─────────────────────────────────────────────────────

#[test]
fn temporary_same_value_is_noop() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("emotion.current_mood", "happy", 0.8)]);
    let result = engine.merge(&mut profile, &[positive("emotion.current_mood", "happy", 0.8)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Kept);
    assert!(profile.canonical["emotion.current_mood"].history.is_empty());
}

#[test]
fn temporary_low_confidence_still_supersedes() {
    // Temporary fields bypass the resolver: newest reading wins even when
    // its confidence is lower than the stored one.
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("emotion.current_mood", "happy", 0.9)]);
    let result = engine.merge(&mut profile, &[positive("emotion.current_mood", "sad", 0.4)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Superseded);
    assert_eq!(
        profile.canonical["emotion.current_mood"].value,
        FactValue::str("sad")
    );
}

#[test]
fn temporary_history_is_bounded() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    for i in 0..30 {
        engine.merge(
            &mut profile,
            &[positive("emotion.current_mood", format!("mood-{i}"), 0.8)],
        );
    }

    let record = &profile.canonical["emotion.current_mood"];
    assert_eq!(record.value, FactValue::str("mood-29"));
    assert_eq!(record.history.len(), 20);
    assert_eq!(record.history[0].value, FactValue::str("mood-9"));
}

// ── Historical fields ────────────────────────────────────────────────────

#[test]
fn historical_append_wraps_value_with_time() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    let result = engine.merge(&mut profile, &[positive("notes", "window seat", 0.7)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Inserted);
    let entries = profile.list_values("notes").unwrap();
    let entry = entries[0].as_map().unwrap();
    assert_eq!(entry["value"], FactValue::str("window seat"));
    assert!(entry.contains_key("time"));
}

#[test]
fn historical_deduplicates_by_payload() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("warnings", "rushed order", 0.7)]);
    let result = engine.merge(&mut profile, &[positive("warnings", "rushed order", 0.7)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Kept);
    assert_eq!(profile.list_values("warnings").unwrap().len(), 1);
}

#[test]
fn historical_negation_is_ignored() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    engine.merge(&mut profile, &[positive("notes", "window seat", 0.7)]);
    let result = engine.merge(&mut profile, &[negative("notes", "window seat", 0.99)]);

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Kept);
    assert_eq!(profile.list_values("notes").unwrap().len(), 1);
}

#[test]
fn order_history_uses_per_field_cap() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    for i in 0..25 {
        engine.merge(
            &mut profile,
            &[positive("orders.history", format!("order-{i}"), 0.9)],
        );
    }

    let entries = profile.list_values("orders.history").unwrap();
    assert_eq!(entries.len(), 20);
    let oldest = entries[0].as_map().unwrap();
    assert_eq!(oldest["value"], FactValue::str("order-5"));
}

#[test]
fn historical_default_cap_evicts_oldest_entries() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    for i in 0..55 {
        engine.merge(&mut profile, &[positive("notes", format!("note-{i}"), 0.7)]);
    }

    // No per-field override on "notes", so the category default of 50 holds.
    let entries = profile.list_values("notes").unwrap();
    assert_eq!(entries.len(), 50);
    let oldest = entries[0].as_map().unwrap();
    assert_eq!(oldest["value"], FactValue::str("note-5"));
    let newest = entries[49].as_map().unwrap();
    assert_eq!(newest["value"], FactValue::str("note-54"));
}

// ── Batch behaviour ──────────────────────────────────────────────────────

#[test]
fn replaying_a_merged_batch_is_a_noop() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    let batch = [
        positive("personal.name", "Ada", 0.9),
        positive("food.favorites", FactValue::list(["pizza", "ramen"]), 0.8),
        positive("emotion.current_mood", "happy", 0.7),
        positive("notes", "window seat", 0.7),
        positive("quirks.naming", "nicknames", 0.6),
    ];
    engine.merge(&mut profile, &batch);
    let before = profile.clone();
    let result = engine.merge(&mut profile, &batch);

    assert_eq!(profile, before);
    assert!(result.updated_fields.is_empty());
    assert!(result
        .change_log
        .iter()
        .all(|c| c.outcome == ChangeOutcome::Kept));
}

#[test]
fn last_updated_tracks_newest_observation() {
    let engine = engine();
    let mut profile = Profile::new("u1");
    let newer = Fact::new(
        "personal.name",
        FactValue::str("Ada"),
        0.9,
        Signal::Positive,
        FactSource::Chat,
        t(3),
    );
    let older = Fact::new(
        "personal.city",
        FactValue::str("Rome"),
        0.9,
        Signal::Positive,
        FactSource::Chat,
        t(1),
    );
    engine.merge(&mut profile, &[newer, older]);

    assert_eq!(profile.meta.last_updated, Some(t(3)));
}
