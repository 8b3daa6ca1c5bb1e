//! SQL for profile CRUD and the promotion ledger. All functions operate on
//! a borrowed connection so the engine can compose them inside one
//! transaction where needed.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use palate_core::{PalateError, PalateResult, Profile, StoreError};

use crate::to_storage_err;

pub fn load_profile(conn: &Connection, user_id: &str) -> PalateResult<Option<(Profile, u64)>> {
    let row: Option<(String, u64)> = conn
        .query_row(
            "SELECT doc, version FROM profiles WHERE user_id = ?1",
            params![user_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match row {
        Some((doc, version)) => {
            let profile: Profile = serde_json::from_str(&doc)?;
            Ok(Some((profile, version)))
        }
        None => Ok(None),
    }
}

/// Write a profile under optimistic concurrency.
///
/// `expected_version == 0` creates the row; any other value must match the
/// stored version or the save fails with `VersionConflict`. The extension
/// key index is rebuilt in the same transaction.
pub fn save_profile(
    conn: &Connection,
    profile: &Profile,
    expected_version: u64,
) -> PalateResult<u64> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("save begin: {e}")))?;

    let new_version = match save_profile_inner(&tx, profile, expected_version) {
        Ok(v) => v,
        Err(e) => {
            let _ = tx.rollback();
            return Err(e);
        }
    };
    tx.commit()
        .map_err(|e| to_storage_err(format!("save commit: {e}")))?;
    Ok(new_version)
}

fn save_profile_inner(
    conn: &Connection,
    profile: &Profile,
    expected_version: u64,
) -> PalateResult<u64> {
    let doc = serde_json::to_string(profile)?;
    let now = Utc::now().to_rfc3339();

    let found: Option<u64> = conn
        .query_row(
            "SELECT version FROM profiles WHERE user_id = ?1",
            params![profile.user_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let new_version = match (expected_version, found) {
        (0, None) => {
            conn.execute(
                "INSERT INTO profiles (user_id, doc, version, updated_at) VALUES (?1, ?2, 1, ?3)",
                params![profile.user_id, doc, now],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            1
        }
        (expected, Some(found)) if expected == found => {
            conn.execute(
                "UPDATE profiles SET doc = ?2, version = ?3, updated_at = ?4 WHERE user_id = ?1",
                params![profile.user_id, doc, expected + 1, now],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            expected + 1
        }
        (expected, found) => {
            return Err(PalateError::Store(StoreError::VersionConflict {
                user_id: profile.user_id.clone(),
                expected,
                found: found.unwrap_or(0),
            }));
        }
    };

    // Rebuild the extension-key index for this user.
    conn.execute(
        "DELETE FROM ext_keys WHERE user_id = ?1",
        params![profile.user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    for key in profile.extensions.keys() {
        conn.execute(
            "INSERT INTO ext_keys (user_id, key) VALUES (?1, ?2)",
            params![profile.user_id, key],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }

    Ok(new_version)
}

pub fn user_ids(conn: &Connection) -> PalateResult<Vec<String>> {
    collect_strings(conn, "SELECT user_id FROM profiles ORDER BY user_id", &[])
}

pub fn user_ids_with_extension(conn: &Connection, key: &str) -> PalateResult<Vec<String>> {
    collect_strings(
        conn,
        "SELECT user_id FROM ext_keys WHERE key = ?1 ORDER BY user_id",
        &[key],
    )
}

pub fn record_usage(conn: &Connection, key: &str, user_id: &str) -> PalateResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO promotion_usage (key, user_id) VALUES (?1, ?2)",
        params![key, user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn usage_counts(conn: &Connection) -> PalateResult<Vec<(String, u64)>> {
    let mut stmt = conn
        .prepare("SELECT key, COUNT(*) FROM promotion_usage GROUP BY key ORDER BY key")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Upsert a promotion ledger row. Repeat calls accumulate the migrated
/// count: a later sweep that moves leftover profiles adds to the total.
pub fn mark_promoted(conn: &Connection, key: &str, migrated: u64) -> PalateResult<()> {
    conn.execute(
        "INSERT INTO promoted_fields (key, migrated_count) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
             migrated_count = promoted_fields.migrated_count + excluded.migrated_count",
        params![key, migrated],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn promoted_keys(conn: &Connection) -> PalateResult<Vec<String>> {
    collect_strings(conn, "SELECT key FROM promoted_fields ORDER BY key", &[])
}

fn collect_strings(conn: &Connection, sql: &str, args: &[&str]) -> PalateResult<Vec<String>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args), |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
