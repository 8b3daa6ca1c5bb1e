//! Error types for the Palate workspace.

mod store_error;

pub use store_error::StoreError;

/// Result alias used throughout the workspace.
pub type PalateResult<T> = Result<T, PalateError>;

/// Top-level error for all Palate operations.
#[derive(Debug, thiserror::Error)]
pub enum PalateError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl PalateError {
    /// Whether the caller may safely retry the failed operation with the
    /// same inputs. Merge is deterministic and side-effect-free until the
    /// final persistence write, so store failures are retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PalateError::Store(_))
    }
}
