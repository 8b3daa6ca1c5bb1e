mod change_log;
mod promotion;

pub use change_log::{ChangeLog, ChangeOutcome, FieldChange, MergeResult};
pub use promotion::{PromotedField, PromotionOutcome};
