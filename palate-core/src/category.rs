use serde::{Deserialize, Serialize};

/// Merge category of a profile field. Decides which merge strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Stable attributes (identity, allergies, dietary rules). Conflicts go
    /// through the contradiction resolver.
    Permanent,
    /// Slowly drifting preferences (favorite foods, communication style).
    SemiPermanent,
    /// Latest-reading fields (mood, urgency). Newest observation always wins.
    Temporary,
    /// Append-only logs (notes, warnings, special requests).
    Historical,
    /// No mapping entry — routed to the extension map and counted for
    /// promotion.
    Unclassified,
}

/// Shape of a field's canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Exactly one active value.
    #[default]
    Scalar,
    /// Deduplicated, insertion-ordered, bounded list.
    List,
}

/// Full classification of a field key, as resolved by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub category: Category,
    pub kind: FieldKind,
    /// Key of the paired negative list a removed value is redirected into
    /// (e.g. `food.favorites` → `food.dislikes`).
    pub negative_pair: Option<String>,
    /// Per-field list cap override. None means the category default applies.
    pub cap: Option<usize>,
}

impl FieldSpec {
    /// Spec used for keys with no mapping entry.
    pub fn unclassified() -> Self {
        Self {
            category: Category::Unclassified,
            kind: FieldKind::Scalar,
            negative_pair: None,
            cap: None,
        }
    }
}
