use palate_core::config::DecayConfig;

/// Resolve the decay horizon for a key by longest dotted-prefix match.
///
/// `food.favorites` has its own 180-day entry; `food.favorite_drink` falls
/// through to the default because no `food` entry exists in the table.
pub fn horizon_days(config: &DecayConfig, key: &str) -> u64 {
    let mut candidate = key;
    loop {
        if let Some(days) = config.horizons.get(candidate) {
            return *days;
        }
        match candidate.rfind('.') {
            Some(idx) => candidate = &candidate[..idx],
            None => return config.default_horizon_days,
        }
    }
}
