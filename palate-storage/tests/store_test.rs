use chrono::{TimeZone, Utc};
use palate_core::{Confidence, FactRecord, FactValue, PalateError, Profile, ProfileStore, StoreError};
use palate_storage::SqliteProfileStore;

fn record(value: impl Into<FactValue>) -> FactRecord {
    FactRecord::new(
        value.into(),
        Confidence::new(0.8),
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    )
}

fn make_profile(user_id: &str) -> Profile {
    let mut profile = Profile::new(user_id);
    profile
        .canonical
        .insert("personal.name".to_string(), record("Ada"));
    profile
        .extensions
        .insert("quirks.naming".to_string(), record("nicknames"));
    profile.meta.message_count = 3;
    profile
}

// ── Round trip and versioning ────────────────────────────────────────────

#[test]
fn save_and_load_round_trip() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    let profile = make_profile("u1");

    let v1 = store.save(&profile, 0).unwrap();
    assert_eq!(v1, 1);

    let (loaded, version) = store.load("u1").unwrap().unwrap();
    assert_eq!(loaded, profile);
    assert_eq!(version, 1);
}

#[test]
fn load_missing_user_is_none() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    assert!(store.load("nobody").unwrap().is_none());
}

#[test]
fn save_bumps_version_on_each_write() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    let profile = make_profile("u1");

    let v1 = store.save(&profile, 0).unwrap();
    let v2 = store.save(&profile, v1).unwrap();
    let v3 = store.save(&profile, v2).unwrap();
    assert_eq!((v1, v2, v3), (1, 2, 3));
}

#[test]
fn stale_version_is_rejected() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    let profile = make_profile("u1");
    let v1 = store.save(&profile, 0).unwrap();
    store.save(&profile, v1).unwrap();

    // A writer still holding v1 must not clobber v2.
    let err = store.save(&profile, v1).unwrap_err();
    match err {
        PalateError::Store(StoreError::VersionConflict {
            expected, found, ..
        }) => {
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn creating_an_existing_profile_conflicts() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    let profile = make_profile("u1");
    store.save(&profile, 0).unwrap();

    let err = store.save(&profile, 0).unwrap_err();
    assert!(matches!(
        err,
        PalateError::Store(StoreError::VersionConflict { .. })
    ));
}

// ── Extension key index ──────────────────────────────────────────────────

#[test]
fn extension_index_tracks_current_keys() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    let mut profile = make_profile("u1");
    let v1 = store.save(&profile, 0).unwrap();

    assert_eq!(
        store.user_ids_with_extension("quirks.naming").unwrap(),
        vec!["u1"]
    );

    // Key migrated out of the extension map: the index row disappears.
    profile.extensions.clear();
    store.save(&profile, v1).unwrap();
    assert!(store
        .user_ids_with_extension("quirks.naming")
        .unwrap()
        .is_empty());
}

#[test]
fn user_ids_lists_all_profiles() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    store.save(&make_profile("b"), 0).unwrap();
    store.save(&make_profile("a"), 0).unwrap();
    assert_eq!(store.user_ids().unwrap(), vec!["a", "b"]);
}

// ── Promotion ledger ─────────────────────────────────────────────────────

#[test]
fn usage_counts_distinct_users_once() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    store.record_usage("quirks.naming", "u1").unwrap();
    store.record_usage("quirks.naming", "u1").unwrap();
    store.record_usage("quirks.naming", "u2").unwrap();
    store.record_usage("other.key", "u1").unwrap();

    let counts = store.usage_counts().unwrap();
    assert_eq!(
        counts,
        vec![
            ("other.key".to_string(), 1),
            ("quirks.naming".to_string(), 2),
        ]
    );
}

#[test]
fn promoted_keys_survive_upsert() {
    let store = SqliteProfileStore::open_in_memory().unwrap();
    store.mark_promoted("quirks.naming", 4).unwrap();
    store.mark_promoted("quirks.naming", 5).unwrap();
    assert_eq!(store.promoted_keys().unwrap(), vec!["quirks.naming"]);
}

// ── File persistence ─────────────────────────────────────────────────────

#[test]
fn profiles_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.db");

    let profile = make_profile("u1");
    {
        let store = SqliteProfileStore::open(&path).unwrap();
        store.save(&profile, 0).unwrap();
        store.record_usage("quirks.naming", "u1").unwrap();
    }

    let store = SqliteProfileStore::open(&path).unwrap();
    let (loaded, version) = store.load("u1").unwrap().unwrap();
    assert_eq!(loaded, profile);
    assert_eq!(version, 1);
    assert_eq!(store.usage_counts().unwrap().len(), 1);
}
