//! Ordering-pattern analysis over the `orders.history` log.

use chrono::{DateTime, Timelike, Utc};
use palate_core::{FactValue, Profile};
use serde::{Deserialize, Serialize};

/// Aggregated ordering patterns for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInsights {
    pub total_orders: usize,
    /// Most-ordered item names with their counts, descending, top five.
    pub favorite_items: Vec<(String, u64)>,
    /// Mean order total across orders that carry one.
    pub average_spend: f64,
    /// Mean ordering hour (0-23), when any order carries a timestamp.
    pub usual_hour: Option<u32>,
}

pub(crate) fn analyze(profile: &Profile) -> Option<OrderInsights> {
    let entries = profile.list_values("orders.history")?;
    if entries.is_empty() {
        return None;
    }

    let mut item_counts: Vec<(String, u64)> = Vec::new();
    let mut total_spend = 0.0;
    let mut spend_orders = 0usize;
    let mut hours: Vec<u32> = Vec::new();

    for entry in entries {
        let order = payload(entry);

        if let Some(items) = order.as_map().and_then(|m| m.get("items")).and_then(FactValue::as_list) {
            for item in items {
                if let Some(name) = item_name(item) {
                    count_item(&mut item_counts, name);
                }
            }
        }
        if let Some(total) = order.as_map().and_then(|m| m.get("total")).and_then(FactValue::as_num) {
            total_spend += total;
            spend_orders += 1;
        }
        if let Some(hour) = entry_hour(entry, order) {
            hours.push(hour);
        }
    }

    item_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    item_counts.truncate(5);

    Some(OrderInsights {
        total_orders: entries.len(),
        favorite_items: item_counts,
        average_spend: if spend_orders > 0 {
            total_spend / spend_orders as f64
        } else {
            0.0
        },
        usual_hour: if hours.is_empty() {
            None
        } else {
            Some(hours.iter().sum::<u32>() / hours.len() as u32)
        },
    })
}

/// Unwrap the `{value, time}` envelope the historical strategy stores.
fn payload(entry: &FactValue) -> &FactValue {
    match entry {
        FactValue::Map(m) => m.get("value").unwrap_or(entry),
        other => other,
    }
}

fn item_name(item: &FactValue) -> Option<&str> {
    match item {
        FactValue::Str(name) => Some(name),
        FactValue::Map(m) => m.get("name").and_then(FactValue::as_str),
        _ => None,
    }
}

fn count_item(counts: &mut Vec<(String, u64)>, name: &str) {
    if let Some(entry) = counts.iter_mut().find(|(n, _)| n == name) {
        entry.1 += 1;
    } else {
        counts.push((name.to_string(), 1));
    }
}

/// Ordering hour: the order's own `time` field if present, else the
/// envelope timestamp.
fn entry_hour(entry: &FactValue, order: &FactValue) -> Option<u32> {
    let time = order
        .as_map()
        .and_then(|m| m.get("time"))
        .and_then(FactValue::as_str)
        .or_else(|| {
            entry
                .as_map()
                .and_then(|m| m.get("time"))
                .and_then(FactValue::as_str)
        })?;
    let parsed: DateTime<Utc> = time.parse().ok()?;
    Some(parsed.hour())
}
