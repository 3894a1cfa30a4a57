//! Achievement catalog and the evaluator that unlocks them.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use crate::{UserProfile, UserStore};

/// Identifier of an unlockable achievement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementId {
    /// Win a game.
    FirstWin,
    /// Win in 30 seconds or less.
    SpeedDemon,
    /// Score 1000 or more.
    PerfectScore,
    /// Play 10 games.
    Dedicated,
    /// Win 5 games in a row.
    StreakMaster,
    /// Play 50 games.
    Veteran,
}

impl AchievementId {
    /// Whether the profile currently meets the unlock condition.
    #[instrument(skip(profile), fields(username = %profile.username()))]
    pub fn is_earned(self, profile: &UserProfile) -> bool {
        match self {
            AchievementId::FirstWin => *profile.games_won() >= 1,
            AchievementId::SpeedDemon => matches!(profile.best_time_seconds(), Some(t) if *t <= 30),
            AchievementId::PerfectScore => *profile.best_score() >= 1000,
            AchievementId::Dedicated => *profile.total_games_played() >= 10,
            AchievementId::StreakMaster => *profile.best_streak() >= 5,
            AchievementId::Veteran => *profile.total_games_played() >= 50,
        }
    }

    /// Catalog entry for this id.
    pub fn definition(self) -> &'static Achievement {
        // CATALOG is declared in variant order.
        &CATALOG[self as usize]
    }
}

/// A catalog entry shown to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    /// Identifier stored in profiles.
    pub id: AchievementId,
    /// Short title.
    pub title: &'static str,
    /// What the player has to do.
    pub description: &'static str,
    /// Display icon.
    pub icon: &'static str,
}

impl Achievement {
    /// Looks up a definition by its stored id string, e.g. `"FIRST_WIN"`.
    pub fn by_id(id: &str) -> Option<&'static Achievement> {
        id.parse::<AchievementId>().ok().map(AchievementId::definition)
    }
}

static CATALOG: [Achievement; 6] = [
    Achievement {
        id: AchievementId::FirstWin,
        title: "First Victory",
        description: "Win your first game",
        icon: "🏆",
    },
    Achievement {
        id: AchievementId::SpeedDemon,
        title: "Speed Demon",
        description: "Win a game in under 30 seconds",
        icon: "⚡",
    },
    Achievement {
        id: AchievementId::PerfectScore,
        title: "Perfect Score",
        description: "Achieve a score of 1000 or more",
        icon: "⭐",
    },
    Achievement {
        id: AchievementId::Dedicated,
        title: "Dedicated Player",
        description: "Play 10 games",
        icon: "🎮",
    },
    Achievement {
        id: AchievementId::StreakMaster,
        title: "Streak Master",
        description: "Win 5 games in a row",
        icon: "🔥",
    },
    Achievement {
        id: AchievementId::Veteran,
        title: "Veteran",
        description: "Play 50 games",
        icon: "🎖️",
    },
];

/// All achievement definitions in catalog order.
pub fn catalog() -> &'static [Achievement] {
    &CATALOG
}

/// Unlocks every earned achievement the profile does not hold yet.
///
/// Returns the newly unlocked definitions in catalog order. Does not persist.
#[instrument(skip(profile), fields(username = %profile.username()))]
pub fn unlock_earned(profile: &mut UserProfile) -> Vec<&'static Achievement> {
    let current: &UserProfile = profile;
    let newly_unlocked: Vec<&'static Achievement> = AchievementId::iter()
        .filter(|id| !current.has_achievement(*id) && id.is_earned(current))
        .map(AchievementId::definition)
        .collect();

    for achievement in &newly_unlocked {
        profile.unlock_achievement(achievement.id);
        info!(achievement = %achievement.id, "Achievement unlocked");
    }
    debug!(count = newly_unlocked.len(), "Achievements evaluated");
    newly_unlocked
}

/// Unlocks earned achievements and saves the profile if anything changed.
///
/// A failed save is logged; the unlocks stay on the in-memory profile and are
/// written with the next successful save.
#[instrument(skip(profile, store), fields(username = %profile.username()))]
pub fn evaluate(profile: &mut UserProfile, store: &mut UserStore) -> Vec<&'static Achievement> {
    let newly_unlocked = unlock_earned(profile);
    if !newly_unlocked.is_empty() {
        if let Err(e) = store.save(profile) {
            warn!(error = %e, "Failed to persist unlocked achievements");
        }
    }
    newly_unlocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_in_id_order() {
        for id in AchievementId::iter() {
            assert_eq!(id.definition().id, id);
        }
        assert_eq!(catalog().len(), 6);
    }

    #[test]
    fn test_by_id() {
        let found = Achievement::by_id("STREAK_MASTER").expect("Known id");
        assert_eq!(found.title, "Streak Master");
        assert!(Achievement::by_id("NOPE").is_none());
    }

    #[test]
    fn test_fresh_profile_earns_nothing() {
        let mut profile = UserProfile::new("amy".to_string());
        assert!(unlock_earned(&mut profile).is_empty());
    }
}
