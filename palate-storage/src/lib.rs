//! # palate-storage
//!
//! SQLite-backed implementation of [`ProfileStore`]: versioned profile
//! documents plus the incremental promotion ledger, all in one database
//! file. Profiles are stored as a JSON document per user with an integer
//! version column for optimistic concurrency; the extension-key index and
//! the usage ledger are plain relational tables.

mod engine;
mod migrations;
mod pragmas;
mod queries;

pub use engine::SqliteProfileStore;

use palate_core::{PalateError, StoreError};

/// Wrap a low-level SQLite failure into the storage error domain.
pub(crate) fn to_storage_err(message: impl Into<String>) -> PalateError {
    PalateError::Store(StoreError::Sqlite {
        message: message.into(),
    })
}
