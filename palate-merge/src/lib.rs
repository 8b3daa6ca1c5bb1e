//! # palate-merge
//!
//! Merge engine and contradiction resolver. Takes a batch of extracted
//! facts and folds it into a profile: each key classifies to a category,
//! the category picks a strategy (resolve, supersede, append, or verbatim
//! upsert), and every mutation lands in an audited change log.
//!
//! Merging is deterministic in the batch: the same facts applied to the
//! same profile always produce the same profile, and re-applying a batch
//! already merged is a no-op.

mod engine;
pub mod resolver;
mod strategies;

pub use engine::MergeEngine;
pub use resolver::{resolve, Resolution, ResolutionOutcome};
