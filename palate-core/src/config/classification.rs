use serde::{Deserialize, Serialize};

use crate::category::{Category, FieldKind};

/// One row of the key → category mapping table.
///
/// `prefix` matches the key exactly or as a dotted-path ancestor; the
/// longest matching prefix wins, so `food.allergies` overrides `food`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub prefix: String,
    pub category: Category,
    #[serde(default)]
    pub kind: FieldKind,
    /// Paired negative list for this field (e.g. favorites → dislikes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_pair: Option<String>,
    /// Per-field list cap override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<usize>,
}

fn scalar(prefix: &str, category: Category) -> ClassificationEntry {
    ClassificationEntry {
        prefix: prefix.to_string(),
        category,
        kind: FieldKind::Scalar,
        negative_pair: None,
        cap: None,
    }
}

fn list(prefix: &str, category: Category) -> ClassificationEntry {
    ClassificationEntry {
        prefix: prefix.to_string(),
        category,
        kind: FieldKind::List,
        negative_pair: None,
        cap: None,
    }
}

fn paired(prefix: &str, category: Category, pair: &str) -> ClassificationEntry {
    ClassificationEntry {
        prefix: prefix.to_string(),
        category,
        kind: FieldKind::List,
        negative_pair: Some(pair.to_string()),
        cap: None,
    }
}

/// The exhaustive default mapping table.
///
/// Derived from the upstream extraction schema: identity attributes and
/// safety-relevant food/health rules are permanent, tastes and habits are
/// semi-permanent, live state is temporary, and free-text logs are
/// historical. Anything unmapped classifies as unclassified at lookup time.
pub fn default_entries() -> Vec<ClassificationEntry> {
    let mut entries = vec![
        // Identity
        scalar("personal", Category::Permanent),
        list("personal.languages", Category::Permanent),
        // Food: safety rules are permanent, tastes are semi-permanent.
        scalar("food", Category::SemiPermanent),
        list("food.allergies", Category::Permanent),
        list("food.intolerances", Category::Permanent),
        list("food.dietary", Category::Permanent),
        scalar("food.spice_level", Category::Permanent),
        scalar("food.portion_size", Category::Permanent),
        paired("food.favorites", Category::SemiPermanent, "food.dislikes"),
        list("food.dislikes", Category::SemiPermanent),
        paired("food.super_favorites", Category::SemiPermanent, "food.hates"),
        list("food.hates", Category::SemiPermanent),
        paired(
            "food.cuisines_liked",
            Category::SemiPermanent,
            "food.cuisines_disliked",
        ),
        list("food.cuisines_disliked", Category::SemiPermanent),
        paired(
            "food.favorite_ingredients",
            Category::SemiPermanent,
            "food.disliked_ingredients",
        ),
        list("food.disliked_ingredients", Category::SemiPermanent),
        list("food.want_to_try", Category::SemiPermanent),
        // Health
        scalar("health", Category::Permanent),
        list("health.chronic_conditions", Category::Permanent),
        list("health.medications", Category::Permanent),
        // Live state
        scalar("emotion", Category::Temporary),
        list("emotion.history", Category::Historical),
        // Habits and traits
        scalar("personality", Category::SemiPermanent),
        scalar("financial", Category::SemiPermanent),
        scalar("timing", Category::SemiPermanent),
        scalar("location", Category::SemiPermanent),
        scalar("social", Category::SemiPermanent),
        scalar("delivery", Category::SemiPermanent),
        scalar("tech", Category::SemiPermanent),
        scalar("loyalty", Category::SemiPermanent),
        scalar("occasions", Category::Permanent),
        list("interests.hobbies", Category::SemiPermanent),
        scalar("interests", Category::SemiPermanent),
        // Free-text logs
        list("notes", Category::Historical),
        list("warnings", Category::Historical),
        list("special_requests", Category::Historical),
    ];
    // Order history keeps fewer entries than the default historical cap.
    entries.push(ClassificationEntry {
        prefix: "orders.history".to_string(),
        category: Category::Historical,
        kind: FieldKind::List,
        negative_pair: None,
        cap: Some(20),
    });
    entries
}
