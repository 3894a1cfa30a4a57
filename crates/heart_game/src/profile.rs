//! Player profiles and lifetime statistics.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

use crate::AchievementId;

/// A player's lifetime record.
///
/// Statistics change only through [`UserProfile::record_result`], which keeps
/// `total_games_played == games_won + games_lost` and
/// `best_streak >= current_streak`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct UserProfile {
    username: String,
    total_games_played: u32,
    games_won: u32,
    games_lost: u32,
    best_score: i64,
    /// Fastest winning time. `None` until the first win.
    best_time_seconds: Option<u64>,
    current_streak: u32,
    best_streak: u32,
    #[serde(default)]
    unlocked_achievements: BTreeSet<AchievementId>,
    registration_date: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a profile with zeroed statistics, registered now.
    #[instrument]
    pub fn new(username: String) -> Self {
        let now = Utc::now();
        debug!(username = %username, "Creating user profile");
        Self {
            username,
            total_games_played: 0,
            games_won: 0,
            games_lost: 0,
            best_score: 0,
            best_time_seconds: None,
            current_streak: 0,
            best_streak: 0,
            unlocked_achievements: BTreeSet::new(),
            registration_date: now,
            last_activity: now,
        }
    }

    /// Folds one finished game into the statistics.
    ///
    /// Losses reset the streak and never touch the best score or best time.
    #[instrument(skip(self), fields(username = %self.username))]
    pub fn record_result(&mut self, won: bool, score: i64, time_seconds: u64) {
        self.total_games_played += 1;

        if won {
            self.games_won += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
            self.best_score = self.best_score.max(score);
            self.best_time_seconds = Some(match self.best_time_seconds {
                Some(best) => best.min(time_seconds),
                None => time_seconds,
            });
        } else {
            self.games_lost += 1;
            self.current_streak = 0;
        }

        self.last_activity = Utc::now();
        info!(
            total = self.total_games_played,
            won = self.games_won,
            lost = self.games_lost,
            streak = self.current_streak,
            best_score = self.best_score,
            "Game result recorded"
        );
    }

    /// Percentage of games won (0.0–100.0); 0 before any game is played.
    pub fn win_rate(&self) -> f64 {
        if self.total_games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.total_games_played) * 100.0
        }
    }

    /// Whether the achievement is unlocked.
    pub fn has_achievement(&self, id: AchievementId) -> bool {
        self.unlocked_achievements.contains(&id)
    }

    /// Adds an achievement. Returns false if it was already unlocked.
    pub(crate) fn unlock_achievement(&mut self, id: AchievementId) -> bool {
        self.unlocked_achievements.insert(id)
    }
}
