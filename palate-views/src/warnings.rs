//! Safety warnings surfaced to every caller, regardless of freshness.

use palate_core::{FactValue, Profile};

const WARNING_FIELDS: &[(&str, &str)] = &[
    ("food.allergies", "allergies"),
    ("food.intolerances", "intolerances"),
    ("health.chronic_conditions", "chronic conditions"),
];

pub(crate) fn collect(profile: &Profile) -> Vec<String> {
    WARNING_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            let record = profile.record(key)?;
            let rendered = match &record.value {
                FactValue::List(items) if items.is_empty() => return None,
                other => other.to_string(),
            };
            Some(format!("{label}: {rendered}"))
        })
        .collect()
}
