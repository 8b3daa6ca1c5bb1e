//! Strategy for permanent and semi-permanent fields: all conflicts go
//! through the contradiction resolver. Scalar fields hold one active value;
//! list fields are deduplicated, insertion-ordered and bounded.

use palate_core::{ChangeOutcome, Fact, FactRecord, FactValue, FieldKind, Signal};

use crate::resolver::{self, ResolutionOutcome};

use super::{incoming_values, MergeContext, MergeStrategy, StrategyResult};

pub(crate) struct ResolvedStrategy;

impl MergeStrategy for ResolvedStrategy {
    fn apply(
        &self,
        existing: Option<&FactRecord>,
        fact: &Fact,
        ctx: &MergeContext<'_>,
    ) -> StrategyResult {
        match ctx.spec.kind {
            FieldKind::List => merge_list(existing, fact, ctx),
            FieldKind::Scalar => merge_scalar(existing, fact, ctx),
        }
    }
}

fn merge_scalar(
    existing: Option<&FactRecord>,
    fact: &Fact,
    ctx: &MergeContext<'_>,
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
            // Negating an absent value changes nothing here, but the negated
            // value still lands in the paired negative list if one exists.
            Signal::Negative => StrategyResult {
                record: None,
                outcome: ChangeOutcome::Kept,
                redirects: if ctx.spec.negative_pair.is_some() {
                    incoming_values(fact)
                } else {
                    Vec::new()
                },
            },
        };
    };

    // Re-affirming the current value: refresh confidence upward, otherwise a
    // repeat of the same fact is a no-op.
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
            redirects: vec![record.value.clone()],
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

fn merge_list(
    existing: Option<&FactRecord>,
    fact: &Fact,
    ctx: &MergeContext<'_>,
) -> StrategyResult {
    match fact.signal {
        Signal::Positive => append_values(existing, fact, ctx),
        Signal::Negative => negate_values(existing, fact, ctx),
    }
}

fn append_values(
    existing: Option<&FactRecord>,
    fact: &Fact,
    ctx: &MergeContext<'_>,
) -> StrategyResult {
    let was_new = existing.is_none();
    let mut items = existing
        .and_then(|r| r.value.as_list())
        .map(<[FactValue]>::to_vec)
        .unwrap_or_default();

    let mut changed = was_new;
    for value in incoming_values(fact) {
        if !items.contains(&value) {
            items.push(value);
            changed = true;
        }
    }
    if !changed {
        return StrategyResult::kept(existing);
    }

    let cap = ctx.list_cap();
    while items.len() > cap {
        items.remove(0);
    }

    let mut record = existing.cloned().unwrap_or_else(|| {
        FactRecord::new(FactValue::List(Vec::new()), fact.confidence, fact.observed_at)
    });
    record.value = FactValue::List(items);
    if fact.confidence.value() > record.confidence.value() {
        record.confidence = fact.confidence;
    }
    record.updated_at = fact.observed_at;
    StrategyResult {
        record: Some(record),
        outcome: if was_new {
            ChangeOutcome::Inserted
        } else {
            ChangeOutcome::Updated
        },
        redirects: Vec::new(),
    }
}

/// Negation against a list resolves per element: each named value that is
/// present goes through the resolver against the record's confidence, and a
/// removal redirects the value into the paired negative list. Values not in
/// the list redirect straight to the pair (a dislike is information even if
/// the like was never recorded).
fn negate_values(
    existing: Option<&FactRecord>,
    fact: &Fact,
    ctx: &MergeContext<'_>,
) -> StrategyResult {
    let Some(record) = existing else {
        return StrategyResult {
            record: None,
            outcome: ChangeOutcome::Kept,
            redirects: if ctx.spec.negative_pair.is_some() {
                incoming_values(fact)
            } else {
                Vec::new()
            },
        };
    };

    let mut items = record
        .value
        .as_list()
        .map(<[FactValue]>::to_vec)
        .unwrap_or_else(|| vec![record.value.clone()]);
    let mut confidence = record.confidence;
    let mut outcome = ChangeOutcome::Kept;
    let mut redirects = Vec::new();

    for value in incoming_values(fact) {
        match items.iter().position(|item| *item == value) {
            Some(pos) => {
                let resolution =
                    resolver::resolve(&value, confidence, &value, fact.confidence, fact.signal);
                match resolution.outcome {
                    ResolutionOutcome::Removed => {
                        items.remove(pos);
                        redirects.push(value);
                        outcome = ChangeOutcome::Removed;
                    }
                    ResolutionOutcome::Weakened => {
                        confidence = resolution.confidence;
                        if outcome == ChangeOutcome::Kept {
                            outcome = ChangeOutcome::Weakened;
                        }
                    }
                    // Negative resolution only removes or weakens.
                    _ => {}
                }
            }
            None => {
                if ctx.spec.negative_pair.is_some() {
                    redirects.push(value);
                }
            }
        }
    }

    if outcome == ChangeOutcome::Kept {
        return StrategyResult {
            record: Some(record.clone()),
            outcome,
            redirects,
        };
    }

    let mut updated = record.clone();
    updated.value = FactValue::List(items);
    updated.confidence = confidence;
    StrategyResult {
        record: Some(updated),
        outcome,
        redirects,
    }
}
