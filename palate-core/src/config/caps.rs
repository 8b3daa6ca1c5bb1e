use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::constants;

/// List and history bounds per category. Explicit configuration — no
/// per-field magic literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListCaps {
    /// Semi-permanent list fields (favorites, cuisines, ...).
    pub semi_permanent: usize,
    /// Permanent list fields (allergies, dietary, ...) use a smaller cap.
    pub permanent: usize,
    /// Historical append-only fields, FIFO eviction.
    pub historical: usize,
    /// Superseded values retained per temporary field.
    pub temporary_history: usize,
}

impl Default for ListCaps {
    fn default() -> Self {
        Self {
            semi_permanent: constants::SEMI_PERMANENT_LIST_CAP,
            permanent: constants::PERMANENT_LIST_CAP,
            historical: constants::HISTORICAL_CAP,
            temporary_history: constants::TEMPORARY_HISTORY_CAP,
        }
    }
}

impl ListCaps {
    /// List cap for a category (historical uses its own FIFO cap).
    pub fn list_cap(&self, category: Category) -> usize {
        match category {
            Category::Permanent => self.permanent,
            Category::Historical => self.historical,
            _ => self.semi_permanent,
        }
    }
}
