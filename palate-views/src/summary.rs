//! Topic-grouped profile digest.

use chrono::{DateTime, Utc};
use palate_core::{FactRecord, FactValue, Profile};
use palate_decay::DecayCalculator;

use crate::is_safety_key;

const EMPTY_SUMMARY: &str = "No profile information recorded yet.";

/// How many list elements a summary line shows before truncating.
const LIST_PREVIEW: usize = 5;

pub(crate) fn render(profile: &Profile, now: DateTime<Utc>, decay: &DecayCalculator) -> String {
    let ctx = Ctx {
        profile,
        now,
        decay,
    };
    let mut lines = Vec::new();

    let identity = ctx.join_fields(&[
        ("personal.name", "name"),
        ("personal.age", "age"),
        ("personal.city", "city"),
        ("personal.job", "job"),
        ("personal.family_size", "family size"),
    ]);
    if let Some(identity) = identity {
        lines.push(format!("identity: {identity}"));
    }

    let food = ctx.join_fields(&[
        ("food.favorites", "likes"),
        ("food.dislikes", "dislikes"),
        ("food.allergies", "allergies"),
        ("food.dietary", "diet"),
        ("food.spice_level", "spice"),
        ("food.portion_size", "portion"),
    ]);
    if let Some(food) = food {
        lines.push(format!("food: {food}"));
    }

    let health = ctx.join_fields(&[
        ("health.chronic_conditions", "conditions"),
        ("health.medications", "medications"),
    ]);
    if let Some(health) = health {
        lines.push(format!("health: {health}"));
    }

    if let Some(budget) = ctx.field("financial.budget_level") {
        lines.push(format!("budget: {budget}"));
    }
    if let Some(personality) = ctx.field("personality.personality_type") {
        lines.push(format!("personality: {personality}"));
    }

    let mut state = Vec::new();
    if let Some(mood) = ctx.field("emotion.current_mood") {
        state.push(format!("last mood {mood}"));
    }
    if profile.meta.message_count > 0 {
        state.push(format!("{} messages", profile.meta.message_count));
    }
    if !state.is_empty() {
        lines.push(format!("state: {}", state.join(", ")));
    }

    // Extension fields not yet promoted still belong to the digest, under a
    // trailing group. Stale entries are filtered like any other field.
    let other: Vec<String> = profile
        .extensions
        .keys()
        .filter_map(|key| ctx.field(key).map(|v| format!("{key} {v}")))
        .collect();
    if !other.is_empty() {
        lines.push(format!("other: {}", other.join(", ")));
    }

    if lines.is_empty() {
        EMPTY_SUMMARY.to_string()
    } else {
        lines.join("\n")
    }
}

struct Ctx<'a> {
    profile: &'a Profile,
    now: DateTime<Utc>,
    decay: &'a DecayCalculator,
}

impl Ctx<'_> {
    /// The record, unless decay says to omit it. Safety keys always show.
    fn visible(&self, key: &str) -> Option<&FactRecord> {
        let record = self.profile.record(key)?;
        if !is_safety_key(key) && self.decay.is_stale(key, record.updated_at, self.now) {
            return None;
        }
        Some(record)
    }

    /// Rendered value of a visible field. Lists preview their first few
    /// elements; empty lists render as absent.
    fn field(&self, key: &str) -> Option<String> {
        let record = self.visible(key)?;
        match &record.value {
            FactValue::List(items) if items.is_empty() => None,
            FactValue::List(items) => {
                let preview: Vec<String> = items
                    .iter()
                    .take(LIST_PREVIEW)
                    .map(|v| v.to_string())
                    .collect();
                Some(preview.join(", "))
            }
            other => Some(other.to_string()),
        }
    }

    fn join_fields(&self, fields: &[(&str, &str)]) -> Option<String> {
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|(key, label)| self.field(key).map(|v| format!("{label} {v}")))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
