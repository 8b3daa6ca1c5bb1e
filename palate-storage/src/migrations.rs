//! Schema migrations, tracked via `PRAGMA user_version`.

use rusqlite::Connection;

use palate_core::{PalateError, PalateResult, StoreError};

use crate::to_storage_err;

const MIGRATIONS: &[(u32, &str)] = &[(1, V001_PROFILE_TABLES)];

const V001_PROFILE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS profiles (
        user_id     TEXT PRIMARY KEY,
        doc         TEXT NOT NULL,
        version     INTEGER NOT NULL DEFAULT 1,
        updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE TABLE IF NOT EXISTS ext_keys (
        user_id     TEXT NOT NULL,
        key         TEXT NOT NULL,
        PRIMARY KEY (user_id, key),
        FOREIGN KEY (user_id) REFERENCES profiles(user_id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_ext_keys_key ON ext_keys(key);

    CREATE TABLE IF NOT EXISTS promotion_usage (
        key         TEXT NOT NULL,
        user_id     TEXT NOT NULL,
        PRIMARY KEY (key, user_id)
    );

    CREATE TABLE IF NOT EXISTS promoted_fields (
        key             TEXT PRIMARY KEY,
        migrated_count  INTEGER NOT NULL DEFAULT 0,
        promoted_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );
";

pub fn run_migrations(conn: &Connection) -> PalateResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        conn.execute_batch(sql).map_err(|e| {
            PalateError::Store(StoreError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::info!(version, "applied storage migration");
    }
    Ok(())
}
