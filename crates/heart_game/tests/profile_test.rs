//! Tests for lifetime statistics bookkeeping.

use heart_game::UserProfile;

fn assert_invariants(profile: &UserProfile) {
    assert_eq!(
        *profile.total_games_played(),
        profile.games_won() + profile.games_lost()
    );
    assert!(profile.best_streak() >= profile.current_streak());
    assert!((0.0..=100.0).contains(&profile.win_rate()));
}

#[test]
fn test_win_updates_bests_and_streak() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(true, 640, 42);

    assert_eq!(*profile.total_games_played(), 1);
    assert_eq!(*profile.games_won(), 1);
    assert_eq!(*profile.current_streak(), 1);
    assert_eq!(*profile.best_streak(), 1);
    assert_eq!(*profile.best_score(), 640);
    assert_eq!(*profile.best_time_seconds(), Some(42));
}

#[test]
fn test_loss_resets_streak_only() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(true, 640, 42);
    profile.record_result(true, 300, 50);
    profile.record_result(false, 9999, 1);

    assert_eq!(*profile.games_lost(), 1);
    assert_eq!(*profile.current_streak(), 0);
    assert_eq!(*profile.best_streak(), 2);
    assert_eq!(*profile.best_score(), 640);
    assert_eq!(*profile.best_time_seconds(), Some(42));
}

#[test]
fn test_best_time_takes_minimum_over_wins() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(true, 100, 90);
    profile.record_result(true, 100, 25);
    profile.record_result(true, 100, 60);
    assert_eq!(*profile.best_time_seconds(), Some(25));
}

#[test]
fn test_losses_leave_best_time_unset() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(false, 0, 3);
    assert_eq!(*profile.best_time_seconds(), None);
    assert_eq!(*profile.best_score(), 0);
}

#[test]
fn test_win_rate() {
    let mut profile = UserProfile::new("amy".to_string());
    profile.record_result(true, 100, 10);
    profile.record_result(true, 100, 10);
    profile.record_result(false, 0, 10);
    assert!((profile.win_rate() - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_invariants_hold_over_mixed_sequence() {
    let mut profile = UserProfile::new("amy".to_string());
    assert_invariants(&profile);
    let pattern = [true, true, false, true, true, true, false, false, true];
    for (i, won) in pattern.iter().cycle().take(40).enumerate() {
        profile.record_result(*won, (i as i64) * 37 % 1200, (i as u64 * 7) % 90);
        assert_invariants(&profile);
    }
    assert_eq!(*profile.total_games_played(), 40);
    assert_eq!(*profile.best_streak(), 3);
}

#[test]
fn test_record_result_touches_last_activity() {
    let mut profile = UserProfile::new("amy".to_string());
    let registered = *profile.registration_date();
    profile.record_result(false, 0, 5);
    assert!(*profile.last_activity() >= registered);
    assert_eq!(*profile.registration_date(), registered);
}
