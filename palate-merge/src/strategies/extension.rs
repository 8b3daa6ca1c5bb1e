//! Strategy for unclassified keys: verbatim upsert into the extension map.
//! No pairing, no history; a stronger negation clears the slot and a weaker
//! one discounts it, same as the resolver's scalar rules.

use palate_core::{ChangeOutcome, Fact, FactRecord, Signal};

use crate::resolver::{self, ResolutionOutcome};

use super::{MergeContext, MergeStrategy, StrategyResult};

pub(crate) struct ExtensionStrategy;

impl MergeStrategy for ExtensionStrategy {
    fn apply(
        &self,
        existing: Option<&FactRecord>,
        fact: &Fact,
        _ctx: &MergeContext<'_>,
    ) -> StrategyResult {
        let Some(record) = existing else {
            return match fact.signal {
                Signal::Positive => StrategyResult {
                    record: Some(FactRecord::new(
                        fact.value.clone(),
                        fact.confidence,
                        fact.observed_at,
                    )),
                    outcome: ChangeOutcome::Inserted,
                    redirects: Vec::new(),
                },
                Signal::Negative => StrategyResult::kept(None),
            };
        };

        if fact.signal == Signal::Positive && record.value == fact.value {
            if fact.confidence.value() > record.confidence.value() {
                let mut updated = record.clone();
                updated.confidence = fact.confidence;
                updated.updated_at = fact.observed_at;
                return StrategyResult {
                    record: Some(updated),
                    outcome: ChangeOutcome::Updated,
                    redirects: Vec::new(),
                };
            }
            return StrategyResult::kept(existing);
        }

        let resolution = resolver::resolve(
            &record.value,
            record.confidence,
            &fact.value,
            fact.confidence,
            fact.signal,
        );
        match resolution.outcome {
            ResolutionOutcome::Removed => StrategyResult {
                record: None,
                outcome: ChangeOutcome::Removed,
                redirects: Vec::new(),
            },
            ResolutionOutcome::Weakened => {
                let mut updated = record.clone();
                updated.confidence = resolution.confidence;
                StrategyResult {
                    record: Some(updated),
                    outcome: ChangeOutcome::Weakened,
                    redirects: Vec::new(),
                }
            }
            ResolutionOutcome::Replaced | ResolutionOutcome::Updated => {
                let mut updated = record.clone();
                updated.value = fact.value.clone();
                updated.confidence = resolution.confidence;
                updated.updated_at = fact.observed_at;
                StrategyResult {
                    record: Some(updated),
                    outcome: resolution.outcome.into(),
                    redirects: Vec::new(),
                }
            }
            ResolutionOutcome::Kept => StrategyResult::kept(existing),
        }
    }
}
