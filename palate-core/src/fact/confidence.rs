use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

use crate::constants::{DEFAULT_CONFIDENCE, MIN_CONFIDENCE};

/// Confidence score clamped to [0.0, 1.0].
/// Attached to every fact by its extractor and to every stored record.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Facts below this are dropped before merging.
    pub const MINIMUM: f64 = MIN_CONFIDENCE;
    /// Applied when an inbound confidence is missing or invalid.
    pub const DEFAULT: f64 = DEFAULT_CONFIDENCE;

    /// Create a new Confidence, clamping to [0.0, 1.0].
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Create from untrusted input: NaN falls back to the conservative
    /// default instead of rejecting the whole batch.
    pub fn sanitize(value: f64) -> Self {
        if value.is_nan() {
            Self(Self::DEFAULT)
        } else {
            Self::new(value)
        }
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Check if this confidence clears the merge threshold.
    pub fn meets_minimum(self) -> bool {
        self.0 >= Self::MINIMUM
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::sanitize(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl Mul<f64> for Confidence {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.0 * rhs)
    }
}
