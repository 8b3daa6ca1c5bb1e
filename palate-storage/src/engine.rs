use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use palate_core::{PalateResult, Profile, ProfileStore};

use crate::{migrations, pragmas, queries, to_storage_err};

/// SQLite-backed [`ProfileStore`].
///
/// One connection behind a mutex: profile writes are already serialized
/// per user upstream, and the promotion ledger's statements are short.
pub struct SqliteProfileStore {
    conn: Mutex<Connection>,
}

impl SqliteProfileStore {
    /// Open a store backed by a file on disk, creating it if missing.
    pub fn open(path: &Path) -> PalateResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> PalateResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> PalateResult<Self> {
        pragmas::apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> PalateResult<T>) -> PalateResult<T> {
        let conn = self.conn.lock().expect("storage connection poisoned");
        f(&conn)
    }
}

impl ProfileStore for SqliteProfileStore {
    fn load(&self, user_id: &str) -> PalateResult<Option<(Profile, u64)>> {
        self.with_conn(|conn| queries::load_profile(conn, user_id))
    }

    fn save(&self, profile: &Profile, expected_version: u64) -> PalateResult<u64> {
        self.with_conn(|conn| queries::save_profile(conn, profile, expected_version))
    }

    fn user_ids(&self) -> PalateResult<Vec<String>> {
        self.with_conn(queries::user_ids)
    }

    fn user_ids_with_extension(&self, key: &str) -> PalateResult<Vec<String>> {
        self.with_conn(|conn| queries::user_ids_with_extension(conn, key))
    }

    fn record_usage(&self, key: &str, user_id: &str) -> PalateResult<()> {
        self.with_conn(|conn| queries::record_usage(conn, key, user_id))
    }

    fn usage_counts(&self) -> PalateResult<Vec<(String, u64)>> {
        self.with_conn(queries::usage_counts)
    }

    fn mark_promoted(&self, key: &str, migrated: u64) -> PalateResult<()> {
        self.with_conn(|conn| queries::mark_promoted(conn, key, migrated))
    }

    fn promoted_keys(&self) -> PalateResult<Vec<String>> {
        self.with_conn(queries::promoted_keys)
    }
}
