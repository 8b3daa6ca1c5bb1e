//! End-to-end merge walkthroughs covering the documented contradiction and
//! supersession flows.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use palate_classify::FieldClassifier;
use palate_core::config::PalateConfig;
use palate_core::{ChangeOutcome, Fact, FactSource, FactValue, Profile, Signal};
use palate_merge::MergeEngine;

fn t(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap() + Duration::days(days)
}

fn engine() -> MergeEngine {
    let config = PalateConfig::default();
    MergeEngine::new(Arc::new(FieldClassifier::default()), &config)
}

fn fact_at(
    key: &str,
    value: impl Into<FactValue>,
    confidence: f64,
    signal: Signal,
    at: DateTime<Utc>,
) -> Fact {
    Fact::new(key, value.into(), confidence, signal, FactSource::Chat, at)
}

/// "I love pizza" (0.9), later "I don't really like pizza" (0.5), finally
/// "I hate pizza" (0.95). The first denial only dents the confidence; the
/// second clears the favorite and records the dislike.
#[test]
fn gradual_contradiction_weakens_then_removes() {
    let engine = engine();
    let mut profile = Profile::new("u1");

    engine.merge(
        &mut profile,
        &[fact_at("food.favorites", "pizza", 0.9, Signal::Positive, t(0))],
    );
    assert_eq!(
        profile.list_values("food.favorites"),
        Some(&[FactValue::str("pizza")][..])
    );
    assert_eq!(profile.canonical["food.favorites"].confidence.value(), 0.9);

    let weakened = engine.merge(
        &mut profile,
        &[fact_at("food.favorites", "pizza", 0.5, Signal::Negative, t(1))],
    );
    assert_eq!(weakened.change_log[0].outcome, ChangeOutcome::Weakened);
    assert_eq!(
        profile.list_values("food.favorites"),
        Some(&[FactValue::str("pizza")][..])
    );
    let after_weaken = profile.canonical["food.favorites"].confidence.value();
    assert!((after_weaken - 0.63).abs() < 1e-12, "got {after_weaken}");
    // Too weak to remove: nothing redirected yet.
    assert!(!profile.canonical.contains_key("food.dislikes"));

    let removed = engine.merge(
        &mut profile,
        &[fact_at("food.favorites", "pizza", 0.95, Signal::Negative, t(2))],
    );
    assert_eq!(removed.change_log[0].outcome, ChangeOutcome::Removed);
    assert_eq!(
        profile.list_values("food.favorites"),
        Some(&[] as &[FactValue])
    );
    assert_eq!(
        profile.list_values("food.dislikes"),
        Some(&[FactValue::str("pizza")][..])
    );
}

/// Mood swings supersede rather than conflict, and the archived entry keeps
/// the timestamp at which the old mood was current.
#[test]
fn mood_supersedes_and_archives_prior_state() {
    let engine = engine();
    let mut profile = Profile::new("u1");

    engine.merge(
        &mut profile,
        &[fact_at("emotion.current_mood", "happy", 0.8, Signal::Positive, t(0))],
    );
    let result = engine.merge(
        &mut profile,
        &[fact_at("emotion.current_mood", "sad", 0.7, Signal::Positive, t(1))],
    );

    assert_eq!(result.change_log[0].outcome, ChangeOutcome::Superseded);
    let record = &profile.canonical["emotion.current_mood"];
    assert_eq!(record.value, FactValue::str("sad"));
    assert_eq!(record.updated_at, t(1));
    assert_eq!(record.history.len(), 1);
    assert_eq!(record.history[0].value, FactValue::str("happy"));
    assert_eq!(record.history[0].timestamp, t(0));
}

/// A denial about a paired list field the profile has never seen still
/// produces durable signal on the negative side.
#[test]
fn dislike_without_prior_like_is_not_lost() {
    let engine = engine();
    let mut profile = Profile::new("u1");

    engine.merge(
        &mut profile,
        &[fact_at(
            "food.cuisines_liked",
            "fast food",
            0.85,
            Signal::Negative,
            t(0),
        )],
    );

    assert!(!profile.canonical.contains_key("food.cuisines_liked"));
    assert_eq!(
        profile.list_values("food.cuisines_disliked"),
        Some(&[FactValue::str("fast food")][..])
    );
}

/// Replaying the full three-step pizza story from scratch produces the same
/// profile: merging depends only on the facts, never on wall-clock time.
#[test]
fn merge_is_deterministic_across_replays() {
    let story = [
        fact_at("food.favorites", "pizza", 0.9, Signal::Positive, t(0)),
        fact_at("food.favorites", "pizza", 0.5, Signal::Negative, t(1)),
        fact_at("food.favorites", "pizza", 0.95, Signal::Negative, t(2)),
        fact_at("emotion.current_mood", "happy", 0.8, Signal::Positive, t(0)),
        fact_at("emotion.current_mood", "sad", 0.7, Signal::Positive, t(1)),
    ];

    let engine_a = engine();
    let mut profile_a = Profile::new("u1");
    engine_a.merge(&mut profile_a, &story);

    let engine_b = engine();
    let mut profile_b = Profile::new("u1");
    engine_b.merge(&mut profile_b, &story);

    assert_eq!(profile_a, profile_b);
}
