//! The session engine: card selection, arithmetic and scoring for one round.

use derive_more::{Display, Error};
use heart_cards::Card;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{GameMode, GameSession};

/// Points every scored win starts from.
const BASE_SCORE: i64 = 100;
/// Largest time bonus, awarded for an instant answer.
const MAX_TIME_BONUS: i64 = 300;
/// Time bonus lost per elapsed second.
const TIME_PENALTY_PER_SECOND: i64 = 5;
/// Bonus per card used in the answer.
const CARD_BONUS: i64 = 20;

/// Arithmetic operator applied between selected cards.
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
pub enum Operation {
    /// Addition.
    #[default]
    #[serde(rename = "+")]
    #[strum(serialize = "+")]
    Add,
    /// Subtraction.
    #[serde(rename = "-")]
    #[strum(serialize = "-")]
    Subtract,
    /// Multiplication.
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Multiply,
    /// Integer division. Dividing by zero leaves the running value unchanged.
    #[serde(rename = "/")]
    #[strum(serialize = "/")]
    Divide,
}

impl Operation {
    /// Combines the running value with the next card value.
    pub fn apply(self, acc: i64, value: i64) -> i64 {
        match self {
            Operation::Add => acc.saturating_add(value),
            Operation::Subtract => acc.saturating_sub(value),
            Operation::Multiply => acc.saturating_mul(value),
            Operation::Divide => acc.checked_div(value).unwrap_or(acc),
        }
    }
}

/// Invalid session state transition.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", message, file, line)]
pub struct SessionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Owns at most one game session and the player's in-progress answer.
///
/// Selection is tracked as hand indices in the order the player picked them,
/// which is the order [`SessionEngine::compute_result`] folds over.
#[derive(Debug, Clone, Default)]
pub struct SessionEngine {
    session: Option<GameSession>,
    selected: Vec<usize>,
    operation: Operation,
}

impl SessionEngine {
    /// Creates an engine with no session.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session engine");
        Self::default()
    }

    /// Starts a new session, replacing any previous one and its selection.
    #[instrument(skip(self, hand), fields(hand_size = hand.len()))]
    pub fn start(
        &mut self,
        username: &str,
        mode: GameMode,
        target_number: i64,
        hand: Vec<Card>,
    ) -> &GameSession {
        if let Some(previous) = &self.session {
            if previous.is_active() {
                warn!(session_id = %previous.session_id(), "Replacing active session");
            }
        }
        self.selected.clear();
        let session = self
            .session
            .insert(GameSession::new(username.to_string(), mode, target_number, hand));
        info!(session_id = %session.session_id(), "Session started");
        session
    }

    /// The current session, active or ended.
    pub fn current_session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// The current operator.
    pub fn current_operation(&self) -> Operation {
        self.operation
    }

    /// Sets the operator used by [`SessionEngine::compute_result`].
    #[instrument(skip(self))]
    pub fn set_operation(&mut self, operation: Operation) {
        debug!(%operation, "Operation set");
        self.operation = operation;
    }

    fn active_session_mut(&mut self) -> Result<&mut GameSession, SessionError> {
        match self.session.as_mut() {
            Some(session) if session.is_active() => Ok(session),
            Some(_) => Err(SessionError::new("Session has already ended")),
            None => Err(SessionError::new("No active session")),
        }
    }

    /// Flips the selection of the card at `index` in the active hand.
    ///
    /// Returns the card's new selection state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if there is no active session or the index is
    /// outside the hand.
    #[instrument(skip(self))]
    pub fn toggle_selection(&mut self, index: usize) -> Result<bool, SessionError> {
        let session = self.active_session_mut()?;
        let card = session.hand_mut().get_mut(index).ok_or_else(|| {
            warn!(index, "Card index outside hand");
            SessionError::new(format!("No card at index {}", index))
        })?;

        let now_selected = !card.is_selected();
        card.set_selected(now_selected);
        if now_selected {
            self.selected.push(index);
        } else {
            self.selected.retain(|&i| i != index);
        }
        debug!(index, now_selected, selected = ?self.selected, "Selection toggled");
        Ok(now_selected)
    }

    /// Deselects every card.
    #[instrument(skip(self))]
    pub fn clear_selection(&mut self) {
        if let Some(session) = self.session.as_mut() {
            for card in session.hand_mut() {
                card.set_selected(false);
            }
        }
        self.selected.clear();
        debug!("Selection cleared");
    }

    /// Selected cards in selection order.
    pub fn selected_cards(&self) -> Vec<Card> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        self.selected
            .iter()
            .filter_map(|&i| session.hand().get(i).copied())
            .collect()
    }

    /// Number of selected cards.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// At least two cards are selected.
    pub fn has_valid_selection(&self) -> bool {
        self.selected.len() >= 2
    }

    /// Folds the selected card values with the current operator.
    ///
    /// Returns 0 with nothing selected and the card's own value with one.
    #[instrument(skip(self), fields(operation = %self.operation))]
    pub fn compute_result(&self) -> i64 {
        let values: Vec<i64> = self.selected_cards().iter().map(Card::value).collect();
        let Some((&first, rest)) = values.split_first() else {
            return 0;
        };
        let result = rest
            .iter()
            .fold(first, |acc, &value| self.operation.apply(acc, value));
        debug!(?values, result, "Computed result");
        result
    }

    /// Whether the selection evaluates to the session target.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if no session was started.
    #[instrument(skip(self))]
    pub fn check_answer(&self) -> Result<bool, SessionError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| SessionError::new("No session to check against"))?;
        let result = self.compute_result();
        let correct = result == *session.target_number();
        info!(result, target = *session.target_number(), correct, "Answer checked");
        Ok(correct)
    }

    /// Scores a win for the current target and selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if no session was started.
    #[instrument(skip(self))]
    pub fn compute_score(&self, elapsed_seconds: u64, mode: GameMode) -> Result<i64, SessionError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| SessionError::new("No session to score"))?;

        let difficulty = (session.target_number() / 10).max(1);
        let elapsed = i64::try_from(elapsed_seconds).unwrap_or(i64::MAX);
        let time_bonus = MAX_TIME_BONUS
            .saturating_sub(elapsed.saturating_mul(TIME_PENALTY_PER_SECOND))
            .max(0);
        let card_bonus = self.selected.len() as i64 * CARD_BONUS;

        let score = BASE_SCORE
            .saturating_add(time_bonus)
            .saturating_add(card_bonus)
            .saturating_mul(difficulty)
            .saturating_mul(mode.multiplier());
        debug!(difficulty, time_bonus, card_bonus, score, "Computed score");
        Ok(score)
    }

    /// Ends the active session with the given outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if there is no active session.
    #[instrument(skip(self))]
    pub fn end(&mut self, won: bool, score: i64) -> Result<&GameSession, SessionError> {
        let session = self.active_session_mut().inspect_err(|e| {
            warn!(error = %e, "Cannot end session");
        })?;
        session.end(won, score);
        Ok(&*session)
    }
}
