//! Tests for the JSON-file user store.

use chrono::DateTime;
use heart_game::{UserProfile, UserStore, unlock_earned};
use tempfile::TempDir;

/// Creates a temporary directory (must stay in scope to keep it alive) and a
/// store rooted in it.
fn setup_store() -> (TempDir, UserStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = UserStore::open(dir.path().join("users.json"));
    (dir, store)
}

#[test]
fn test_missing_file_starts_empty() {
    let (_dir, store) = setup_store();
    assert!(store.is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_register_twice() {
    let (_dir, mut store) = setup_store();
    assert!(store.register("amy"));
    assert!(!store.register("amy"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_register_blank_fails() {
    let (_dir, mut store) = setup_store();
    assert!(!store.register(""));
    assert!(!store.register("   "));
    assert!(store.is_empty());
}

#[test]
fn test_register_trims_name() {
    let (_dir, mut store) = setup_store();
    assert!(store.register("  bob "));
    assert!(store.user_exists("bob"));
    assert!(!store.register("bob"));
}

#[test]
fn test_lookups_trim_like_register() {
    let (_dir, mut store) = setup_store();
    assert!(store.register(" amy "));
    assert!(store.user_exists(" amy "));
    let profile = store.login(" amy ").expect("Registered");
    assert_eq!(profile.username(), "amy");
    assert!(!store.register(" amy "));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_register_creates_zeroed_profile_on_disk() {
    let (_dir, mut store) = setup_store();
    store.register("amy");
    assert!(store.path().exists());

    let reopened = UserStore::open(store.path());
    let profile = reopened.login("amy").expect("Persisted");
    assert_eq!(*profile.total_games_played(), 0);
    assert_eq!(*profile.best_time_seconds(), None);
}

#[test]
fn test_login_unknown_user() {
    let (_dir, store) = setup_store();
    assert!(store.login("nobody").is_none());
    assert!(!store.user_exists("nobody"));
}

#[test]
fn test_save_then_load_round_trip() {
    let (_dir, mut store) = setup_store();
    let mut saved = Vec::new();
    for (name, wins) in [("amy", 6), ("bob", 0), ("cy", 2)] {
        store.register(name);
        let mut profile = store.login(name).expect("Registered");
        for i in 0..wins {
            profile.record_result(true, 200 * (i + 1), 25 + i as u64);
        }
        profile.record_result(false, 0, 12);
        unlock_earned(&mut profile);
        store.save(&profile).expect("Save failed");
        saved.push(profile);
    }

    let reopened = UserStore::open(store.path());
    for profile in &saved {
        let loaded = reopened.login(profile.username()).expect("Persisted");
        assert_eq!(&loaded, profile);
    }
    assert!(!saved[0].unlocked_achievements().is_empty());
}

#[test]
fn test_load_all_rehydrates_from_disk() {
    let (_dir, mut store) = setup_store();
    store.register("amy");

    let mut other = UserStore::open(store.path());
    let mut profile = other.login("amy").expect("Registered");
    profile.record_result(true, 500, 40);
    other.save(&profile).expect("Save failed");

    let users = store.load_all();
    assert_eq!(users.get("amy"), Some(&profile));
}

#[test]
fn test_corrupt_file_starts_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("users.json");
    std::fs::write(&path, "{ not json").expect("Write failed");

    let mut store = UserStore::open(&path);
    assert!(store.is_empty());
    assert!(store.register("amy"));
}

#[test]
fn test_file_format() {
    let (_dir, mut store) = setup_store();
    store.register("amy");
    let mut profile = store.login("amy").expect("Registered");
    profile.record_result(true, 1500, 20);
    unlock_earned(&mut profile);
    store.save(&profile).expect("Save failed");

    let content = std::fs::read_to_string(store.path()).expect("Read failed");
    assert!(content.contains('\n'), "Expected pretty-printed JSON");

    let json: serde_json::Value = serde_json::from_str(&content).expect("Valid JSON");
    let amy = &json["amy"];
    assert_eq!(amy["username"], "amy");
    assert_eq!(amy["best_score"], 1500);
    let registered = amy["registration_date"].as_str().expect("Timestamp string");
    assert!(DateTime::parse_from_rfc3339(registered).is_ok());
    let unlocked = amy["unlocked_achievements"].as_array().expect("Array");
    assert!(unlocked.iter().any(|id| id == "FIRST_WIN"));
}

#[test]
fn test_save_leaves_no_temp_file() {
    let (dir, mut store) = setup_store();
    store.register("amy");
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .expect("Read dir failed")
        .filter_map(Result::ok)
        .map(|e| e.file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("users.json")]);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("deeper").join("users.json");
    let mut store = UserStore::open(&path);
    store
        .save(&UserProfile::new("amy".to_string()))
        .expect("Save failed");
    assert!(path.exists());
}

#[test]
fn test_failed_write_keeps_memory_state() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    // A directory where the file should be makes the rename fail.
    let path = dir.path().join("users.json");
    std::fs::create_dir(&path).expect("Create dir failed");

    let mut store = UserStore::open(&path);
    let profile = UserProfile::new("amy".to_string());
    assert!(store.save(&profile).is_err());
    assert_eq!(store.login("amy"), Some(profile));
    assert!(!dir.path().join("users.json.tmp").exists());
}

#[test]
fn test_all_users_ranked_by_best_score() {
    let (_dir, mut store) = setup_store();
    for (name, score) in [("cy", 300), ("amy", 900), ("bob", 300)] {
        store.register(name);
        let mut profile = store.login(name).expect("Registered");
        profile.record_result(true, score, 40);
        store.save(&profile).expect("Save failed");
    }
    let ranked = store.all_users();
    let names: Vec<&str> = ranked.iter().map(|p| p.username().as_str()).collect();
    assert_eq!(names, vec!["amy", "bob", "cy"]);
}
