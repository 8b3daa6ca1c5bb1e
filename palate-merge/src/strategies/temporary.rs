//! Strategy for temporary fields (mood, urgency): the newest observation
//! always wins, and the superseded value is archived into the record's
//! bounded history with the timestamp at which it was current.

use palate_core::profile::HistoryEntry;
use palate_core::{ChangeOutcome, Fact, FactRecord, Signal};

use super::{MergeContext, MergeStrategy, StrategyResult};

pub(crate) struct TemporaryStrategy;

impl MergeStrategy for TemporaryStrategy {
    fn apply(
        &self,
        existing: Option<&FactRecord>,
        fact: &Fact,
        ctx: &MergeContext<'_>,
    ) -> StrategyResult {
        // Temporary state is overwritten by the next positive reading, so
        // negations carry no extra information here.
        if fact.signal == Signal::Negative {
            return StrategyResult::kept(existing);
        }

        let Some(record) = existing else {
            return StrategyResult {
                record: Some(FactRecord::new(
                    fact.value.clone(),
                    fact.confidence,
                    fact.observed_at,
                )),
                outcome: ChangeOutcome::Inserted,
                redirects: Vec::new(),
            };
        };

        if record.value == fact.value {
            return StrategyResult::kept(existing);
        }

        let mut updated = record.clone();
        updated.history.push(HistoryEntry {
            value: record.value.clone(),
            timestamp: record.updated_at,
        });
        let cap = ctx.caps.temporary_history;
        while updated.history.len() > cap {
            updated.history.remove(0);
        }
        updated.value = fact.value.clone();
        updated.confidence = fact.confidence;
        updated.updated_at = fact.observed_at;
        StrategyResult {
            record: Some(updated),
            outcome: ChangeOutcome::Superseded,
            redirects: Vec::new(),
        }
    }
}
