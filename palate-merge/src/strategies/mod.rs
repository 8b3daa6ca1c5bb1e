//! Per-category merge strategies.
//!
//! A strategy is a pure function over (existing record, incoming fact): it
//! returns the new record state and an outcome, and never touches the rest
//! of the profile. Cross-field effects (redirecting a removed value into the
//! paired negative list) are requested via `redirects` and applied by the
//! engine.

mod extension;
mod historical;
mod resolved;
mod temporary;

use palate_core::config::ListCaps;
use palate_core::{Category, ChangeOutcome, Fact, FactRecord, FactValue, FieldSpec};

pub(crate) use extension::ExtensionStrategy;
pub(crate) use historical::HistoricalStrategy;
pub(crate) use resolved::ResolvedStrategy;
pub(crate) use temporary::TemporaryStrategy;

/// Classification and caps for the field being merged.
pub(crate) struct MergeContext<'a> {
    pub spec: &'a FieldSpec,
    pub caps: &'a ListCaps,
}

impl MergeContext<'_> {
    /// Effective list bound: per-field override, else the category default.
    pub fn list_cap(&self) -> usize {
        self.spec
            .cap
            .unwrap_or_else(|| self.caps.list_cap(self.spec.category))
    }
}

/// What a strategy decided for one field.
pub(crate) struct StrategyResult {
    /// New record state. `None` with outcome `Removed` deletes the record;
    /// `None` with outcome `Kept` means nothing existed and nothing was
    /// written.
    pub record: Option<FactRecord>,
    pub outcome: ChangeOutcome,
    /// Values to append to the field's paired negative list.
    pub redirects: Vec<FactValue>,
}

impl StrategyResult {
    pub fn kept(existing: Option<&FactRecord>) -> Self {
        Self {
            record: existing.cloned(),
            outcome: ChangeOutcome::Kept,
            redirects: Vec::new(),
        }
    }
}

pub(crate) trait MergeStrategy {
    fn apply(
        &self,
        existing: Option<&FactRecord>,
        fact: &Fact,
        ctx: &MergeContext<'_>,
    ) -> StrategyResult;
}

pub(crate) fn strategy_for(category: Category) -> &'static dyn MergeStrategy {
    match category {
        Category::Permanent | Category::SemiPermanent => &ResolvedStrategy,
        Category::Temporary => &TemporaryStrategy,
        Category::Historical => &HistoricalStrategy,
        Category::Unclassified => &ExtensionStrategy,
    }
}

/// A fact's payload as list elements: a list contributes its elements,
/// anything else contributes itself.
pub(crate) fn incoming_values(fact: &Fact) -> Vec<FactValue> {
    match &fact.value {
        FactValue::List(items) => items.clone(),
        other => vec![other.clone()],
    }
}
