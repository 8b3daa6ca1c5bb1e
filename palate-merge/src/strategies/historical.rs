//! Strategy for historical fields (notes, warnings, order history):
//! append-only, deduplicated by payload, FIFO-bounded. Entries carry the
//! observation time so downstream views can reconstruct a timeline.

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use palate_core::{ChangeOutcome, Fact, FactRecord, FactValue, Signal};

use super::{incoming_values, MergeContext, MergeStrategy, StrategyResult};

pub(crate) struct HistoricalStrategy;

impl MergeStrategy for HistoricalStrategy {
    fn apply(
        &self,
        existing: Option<&FactRecord>,
        fact: &Fact,
        ctx: &MergeContext<'_>,
    ) -> StrategyResult {
        // The log never un-happens; negations are ignored.
        if fact.signal == Signal::Negative {
            return StrategyResult::kept(existing);
        }

        let was_new = existing.is_none();
        let mut entries = existing
            .and_then(|r| r.value.as_list())
            .map(<[FactValue]>::to_vec)
            .unwrap_or_default();

        let mut appended = false;
        for value in incoming_values(fact) {
            if entries.iter().any(|e| entry_payload(e) == entry_payload(&value)) {
                continue;
            }
            entries.push(wrap_entry(value, fact));
            appended = true;
        }
        if !appended {
            return StrategyResult::kept(existing);
        }

        let cap = ctx.list_cap();
        while entries.len() > cap {
            entries.remove(0);
        }

        let mut record = existing.cloned().unwrap_or_else(|| {
            FactRecord::new(FactValue::List(Vec::new()), fact.confidence, fact.observed_at)
        });
        record.value = FactValue::List(entries);
        if fact.confidence.value() > record.confidence.value() {
            record.confidence = fact.confidence;
        }
        record.updated_at = fact.observed_at;
        StrategyResult {
            record: Some(record),
            outcome: if was_new {
                ChangeOutcome::Inserted
            } else {
                ChangeOutcome::Archived
            },
            redirects: Vec::new(),
        }
    }
}

/// Wrap a raw payload as `{value, time}`. Payloads that already carry both
/// keys (pre-shaped order entries) are stored as-is.
fn wrap_entry(value: FactValue, fact: &Fact) -> FactValue {
    if let FactValue::Map(m) = &value {
        if m.contains_key("value") && m.contains_key("time") {
            return value;
        }
    }
    let mut entry = BTreeMap::new();
    entry.insert("value".to_string(), value);
    entry.insert(
        "time".to_string(),
        FactValue::Str(fact.observed_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    FactValue::Map(entry)
}

/// The deduplication key of a stored entry: its inner payload if wrapped,
/// otherwise the entry itself.
fn entry_payload(entry: &FactValue) -> &FactValue {
    match entry {
        FactValue::Map(m) => m.get("value").unwrap_or(entry),
        other => other,
    }
}
