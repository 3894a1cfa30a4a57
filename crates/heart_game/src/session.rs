//! Game session records.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use heart_cards::Card;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Game mode chosen when a session starts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum GameMode {
    /// Untimed play.
    #[default]
    Standard,
    /// Against the clock.
    Timed,
    /// Consecutive wins.
    Streak,
}

impl GameMode {
    /// Score multiplier for the mode.
    #[instrument]
    pub fn multiplier(self) -> i64 {
        match self {
            GameMode::Standard => 1,
            GameMode::Timed => 2,
            GameMode::Streak => 3,
        }
    }
}

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionOutcome {
    /// When the session ended.
    end_time: DateTime<Utc>,
    /// Whether the player matched the target.
    won: bool,
    /// Final score.
    score: i64,
}

/// One round of the puzzle: a dealt hand and the number to reach.
///
/// The outcome is absent while the session is active and set exactly once by
/// [`GameSession::end`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GameSession {
    session_id: SessionId,
    username: String,
    mode: GameMode,
    target_number: i64,
    hand: Vec<Card>,
    start_time: DateTime<Utc>,
    outcome: Option<SessionOutcome>,
}

impl GameSession {
    /// Creates an active session with a fresh id. Every card starts unselected.
    #[instrument(skip(hand), fields(hand_size = hand.len()))]
    pub fn new(username: String, mode: GameMode, target_number: i64, mut hand: Vec<Card>) -> Self {
        for card in &mut hand {
            card.set_selected(false);
        }
        let session_id = uuid::Uuid::new_v4().to_string();
        info!(
            session_id = %session_id,
            username = %username,
            %mode,
            target_number,
            "Creating game session"
        );
        Self {
            session_id,
            username,
            mode,
            target_number,
            hand,
            start_time: Utc::now(),
            outcome: None,
        }
    }

    /// True until [`GameSession::end`] is called.
    pub fn is_active(&self) -> bool {
        self.outcome.is_none()
    }

    /// Whether the session ended in a win. `None` while active.
    pub fn won(&self) -> Option<bool> {
        self.outcome.map(|o| o.won)
    }

    /// Final score. `None` while active.
    pub fn score(&self) -> Option<i64> {
        self.outcome.map(|o| o.score)
    }

    /// End time. `None` while active.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.outcome.map(|o| o.end_time)
    }

    /// Whole seconds from start to end, or to now while still active.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn elapsed_seconds(&self) -> u64 {
        let until = self.end_time().unwrap_or_else(Utc::now);
        let seconds = (until - self.start_time).num_seconds().max(0) as u64;
        debug!(seconds, "Computed elapsed time");
        seconds
    }

    pub(crate) fn hand_mut(&mut self) -> &mut [Card] {
        &mut self.hand
    }

    /// Records the outcome. Callers guarantee the session is still active.
    pub(crate) fn end(&mut self, won: bool, score: i64) {
        let outcome = SessionOutcome {
            end_time: Utc::now(),
            won,
            score,
        };
        info!(session_id = %self.session_id, won, score, "Session ended");
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heart_cards::{Rank, Suit};

    #[test]
    fn test_mode_multipliers() {
        assert_eq!(GameMode::Standard.multiplier(), 1);
        assert_eq!(GameMode::Timed.multiplier(), 2);
        assert_eq!(GameMode::Streak.multiplier(), 3);
    }

    #[test]
    fn test_mode_parses_case_insensitively() {
        assert_eq!("timed".parse::<GameMode>().ok(), Some(GameMode::Timed));
        assert_eq!("STREAK".parse::<GameMode>().ok(), Some(GameMode::Streak));
    }

    #[test]
    fn test_new_session_clears_selection_flags() {
        let mut card = Card::new(Suit::Hearts, Rank::Two);
        card.set_selected(true);
        let session = GameSession::new("amy".to_string(), GameMode::Standard, 7, vec![card]);
        assert!(!session.hand()[0].is_selected());
        assert!(session.is_active());
        assert_eq!(session.won(), None);
        assert_eq!(session.score(), None);
    }

    #[test]
    fn test_end_records_outcome() {
        let mut session = GameSession::new("amy".to_string(), GameMode::Timed, 7, Vec::new());
        session.end(true, 640);
        assert!(!session.is_active());
        assert_eq!(session.won(), Some(true));
        assert_eq!(session.score(), Some(640));
        assert!(session.end_time().is_some());
    }
}
