//! # palate-core
//!
//! Foundation crate for the Palate profile engine.
//! Defines all types, errors, config, constants, and the store trait.
//! Every other crate in the workspace depends on this.

pub mod category;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fact;
pub mod models;
pub mod profile;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use category::{Category, FieldKind, FieldSpec};
pub use config::PalateConfig;
pub use errors::{PalateError, PalateResult, StoreError};
pub use fact::{Confidence, Fact, FactSource, FactValue, Signal};
pub use models::{ChangeLog, ChangeOutcome, FieldChange, MergeResult, PromotedField, PromotionOutcome};
pub use profile::{FactRecord, HistoryEntry, Profile, ProfileMeta};
pub use traits::ProfileStore;
