/// Palate system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Facts below this confidence are dropped before they reach the merge engine.
pub const MIN_CONFIDENCE: f64 = 0.3;

/// Conservative default applied when an inbound fact carries an invalid
/// (NaN or out-of-range) confidence.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Multiplier applied to a stored confidence when a weaker negative fact
/// contradicts it.
pub const WEAKEN_FACTOR: f64 = 0.7;

/// Cap for semi-permanent list fields (favorites, cuisines, ...).
pub const SEMI_PERMANENT_LIST_CAP: usize = 30;

/// Smaller cap for permanent list fields (allergies, dietary, ...).
pub const PERMANENT_LIST_CAP: usize = 20;

/// Superseded values retained per temporary field.
pub const TEMPORARY_HISTORY_CAP: usize = 20;

/// Entries retained per historical (append-only) field, FIFO eviction.
pub const HISTORICAL_CAP: usize = 50;

/// Decay horizon for fields with no specific horizon entry (days).
pub const DEFAULT_DECAY_HORIZON_DAYS: u64 = 90;

/// Freshness below which views omit a non-safety field from summaries.
pub const STALE_THRESHOLD: f64 = 0.1;

/// Distinct-user usage count at which an extension key becomes a
/// promotion candidate.
pub const MIN_PROMOTION_USAGE: u64 = 5;
