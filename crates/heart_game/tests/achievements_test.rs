//! Tests for achievement rules and the evaluator.

use heart_game::{AchievementId, UserProfile, UserStore, catalog, evaluate, unlock_earned};
use tempfile::TempDir;

fn ids(unlocked: &[&heart_game::Achievement]) -> Vec<AchievementId> {
    unlocked.iter().map(|a| a.id).collect()
}

#[test]
fn test_fast_high_scoring_first_win_unlocks_three() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(true, 1500, 20);
    assert_eq!(*profile.current_streak(), 1);

    let unlocked = unlock_earned(&mut profile);
    assert_eq!(
        ids(&unlocked),
        vec![
            AchievementId::FirstWin,
            AchievementId::SpeedDemon,
            AchievementId::PerfectScore
        ]
    );
    assert!(profile.has_achievement(AchievementId::SpeedDemon));
}

#[test]
fn test_slow_win_is_not_speed_demon() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(true, 200, 31);
    assert_eq!(ids(&unlock_earned(&mut profile)), vec![AchievementId::FirstWin]);
}

#[test]
fn test_thirty_seconds_counts_as_speed_demon() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(true, 200, 30);
    assert!(ids(&unlock_earned(&mut profile)).contains(&AchievementId::SpeedDemon));
}

#[test]
fn test_losses_count_towards_games_played() {
    let mut profile = UserProfile::new("amy".to_string());
    for _ in 0..9 {
        profile.record_result(false, 0, 10);
    }
    assert!(unlock_earned(&mut profile).is_empty());

    profile.record_result(false, 0, 10);
    assert_eq!(ids(&unlock_earned(&mut profile)), vec![AchievementId::Dedicated]);

    for _ in 0..40 {
        profile.record_result(false, 0, 10);
    }
    assert_eq!(ids(&unlock_earned(&mut profile)), vec![AchievementId::Veteran]);
}

#[test]
fn test_streak_master_survives_broken_streak() {
    let mut profile = UserProfile::new("amy".to_string());
    for _ in 0..5 {
        profile.record_result(true, 100, 120);
    }
    profile.record_result(false, 0, 10);
    let unlocked = ids(&unlock_earned(&mut profile));
    assert!(unlocked.contains(&AchievementId::StreakMaster));
    assert_eq!(*profile.current_streak(), 0);
}

#[test]
fn test_evaluate_twice_unlocks_nothing_second_time() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut store = UserStore::open(dir.path().join("users.json"));
    store.register("amy");
    let mut profile = store.login("amy").expect("Registered");
    profile.record_result(true, 1500, 20);

    assert_eq!(evaluate(&mut profile, &mut store).len(), 3);
    assert!(evaluate(&mut profile, &mut store).is_empty());
}

#[test]
fn test_evaluate_persists_unlocks() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("users.json");
    let mut store = UserStore::open(&path);
    store.register("amy");
    let mut profile = store.login("amy").expect("Registered");
    profile.record_result(true, 100, 200);

    evaluate(&mut profile, &mut store);

    let reopened = UserStore::open(&path);
    let stored = reopened.login("amy").expect("Persisted");
    assert!(stored.has_achievement(AchievementId::FirstWin));
    assert_eq!(stored, profile);
}

#[test]
fn test_catalog_titles() {
    let titles: Vec<&str> = catalog().iter().map(|a| a.title).collect();
    assert_eq!(
        titles,
        vec![
            "First Victory",
            "Speed Demon",
            "Perfect Score",
            "Dedicated Player",
            "Streak Master",
            "Veteran"
        ]
    );
}
