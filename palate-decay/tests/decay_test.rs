use chrono::{Duration, Utc};
use palate_decay::DecayCalculator;

// ── Endpoint identities ──────────────────────────────────────────────────

#[test]
fn freshness_is_one_at_update_time() {
    let calc = DecayCalculator::default();
    let t0 = Utc::now();
    for key in ["emotion.current_mood", "food.favorites", "personal.city", "unknown"] {
        assert_eq!(calc.freshness(key, t0, t0), 1.0, "key {key}");
    }
}

#[test]
fn freshness_is_zero_at_horizon() {
    let calc = DecayCalculator::default();
    let t0 = Utc::now();

    let cases = [
        ("emotion.current_mood", 1i64),
        ("timing.lunch_time", 30),
        ("financial.budget_level", 60),
        ("food.favorites", 180),
        ("personal.city", 365),
        ("health.chronic_conditions", 365),
        ("unmapped.key", 90),
    ];
    for (key, horizon) in cases {
        let f = calc.freshness(key, t0, t0 + Duration::days(horizon));
        assert_eq!(f, 0.0, "key {key} at horizon {horizon}");
    }
}

#[test]
fn freshness_stays_zero_past_horizon() {
    let calc = DecayCalculator::default();
    let t0 = Utc::now();
    let f = calc.freshness("emotion.current_mood", t0, t0 + Duration::days(400));
    assert_eq!(f, 0.0);
}

#[test]
fn future_timestamp_clamps_to_one() {
    let calc = DecayCalculator::default();
    let t0 = Utc::now();
    let f = calc.freshness("personal.city", t0 + Duration::days(5), t0);
    assert_eq!(f, 1.0);
}

// ── Horizon lookup ───────────────────────────────────────────────────────

#[test]
fn horizon_uses_longest_prefix() {
    let calc = DecayCalculator::default();
    assert_eq!(calc.horizon_days("food.favorites"), 180);
    // No `food` entry — falls to the default.
    assert_eq!(calc.horizon_days("food.favorite_drink"), 90);
    assert_eq!(calc.horizon_days("emotion.current_mood"), 1);
    assert_eq!(calc.horizon_days("nonexistent"), 90);
}

#[test]
fn half_horizon_is_half_fresh() {
    let calc = DecayCalculator::default();
    let t0 = Utc::now();
    let f = calc.freshness("financial.budget_level", t0, t0 + Duration::days(30));
    assert!((f - 0.5).abs() < 1e-9, "got {f}");
}

// ── Staleness cutoff ─────────────────────────────────────────────────────

#[test]
fn stale_after_ninety_percent_of_horizon() {
    let calc = DecayCalculator::default();
    let t0 = Utc::now();
    // emotion horizon is 1 day; at 23 hours freshness ≈ 0.042 < 0.1.
    assert!(calc.is_stale("emotion.current_mood", t0, t0 + Duration::hours(23)));
    assert!(!calc.is_stale("emotion.current_mood", t0, t0 + Duration::hours(12)));
}
