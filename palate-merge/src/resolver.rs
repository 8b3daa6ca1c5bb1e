//! Contradiction resolver: the single place where an incoming fact is
//! weighed against a stored value by confidence and polarity.

use palate_core::constants::WEAKEN_FACTOR;
use palate_core::{ChangeOutcome, Confidence, FactValue, Signal};

/// What the resolver decided for a conflicting pair of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Positive fact with strictly higher confidence: new value wins.
    Replaced,
    /// Positive fact with equal confidence: newer value wins, confidence
    /// stays.
    Updated,
    /// Negative fact too weak to remove: stored confidence is discounted.
    Weakened,
    /// Negative fact stronger than the stored confidence: value is cleared.
    Removed,
    /// Incoming fact loses; stored state is untouched.
    Kept,
}

impl From<ResolutionOutcome> for ChangeOutcome {
    fn from(outcome: ResolutionOutcome) -> Self {
        match outcome {
            ResolutionOutcome::Replaced => ChangeOutcome::Replaced,
            ResolutionOutcome::Updated => ChangeOutcome::Updated,
            ResolutionOutcome::Weakened => ChangeOutcome::Weakened,
            ResolutionOutcome::Removed => ChangeOutcome::Removed,
            ResolutionOutcome::Kept => ChangeOutcome::Kept,
        }
    }
}

/// Resolved value and confidence. `value: None` means the stored value was
/// removed outright.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: Option<FactValue>,
    pub confidence: Confidence,
    pub outcome: ResolutionOutcome,
}

/// Resolve a conflict between a stored value and an incoming fact.
///
/// Negative facts never install their own value here: a stronger negation
/// clears the slot, a weaker one discounts the stored confidence by
/// [`WEAKEN_FACTOR`]. Positive facts win on strictly higher confidence,
/// refresh the value on a tie, and lose otherwise.
pub fn resolve(
    existing_value: &FactValue,
    existing_confidence: Confidence,
    new_value: &FactValue,
    new_confidence: Confidence,
    new_signal: Signal,
) -> Resolution {
    match new_signal {
        Signal::Negative => {
            if new_confidence.value() > existing_confidence.value() {
                Resolution {
                    value: None,
                    confidence: new_confidence,
                    outcome: ResolutionOutcome::Removed,
                }
            } else {
                Resolution {
                    value: Some(existing_value.clone()),
                    confidence: existing_confidence * WEAKEN_FACTOR,
                    outcome: ResolutionOutcome::Weakened,
                }
            }
        }
        Signal::Positive => {
            if new_confidence.value() > existing_confidence.value() {
                Resolution {
                    value: Some(new_value.clone()),
                    confidence: new_confidence,
                    outcome: ResolutionOutcome::Replaced,
                }
            } else if new_confidence.value() == existing_confidence.value() {
                Resolution {
                    value: Some(new_value.clone()),
                    confidence: existing_confidence,
                    outcome: ResolutionOutcome::Updated,
                }
            } else {
                Resolution {
                    value: Some(existing_value.clone()),
                    confidence: existing_confidence,
                    outcome: ResolutionOutcome::Kept,
                }
            }
        }
    }
}
