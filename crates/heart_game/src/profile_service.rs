//! Profile management business logic layer.

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::{Achievement, SessionEngine, SessionError, UserProfile, UserStore, achievements};

/// Summary of a finished round.
#[derive(Debug, Clone, Getters)]
pub struct GameReport {
    won: bool,
    score: i64,
    result: i64,
    target: i64,
    elapsed_seconds: u64,
    unlocked: Vec<&'static Achievement>,
}

/// Service layer for user profile operations.
///
/// Wraps [`UserStore`] with the end-of-round flow: score the answer, close the
/// session, update statistics, unlock achievements and persist.
#[derive(Debug, Clone)]
pub struct ProfileService {
    store: UserStore,
}

impl ProfileService {
    /// Creates a new profile service backed by the given store.
    #[instrument(skip(store), fields(path = %store.path().display()))]
    pub fn new(store: UserStore) -> Self {
        info!("Creating ProfileService");
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Registers a new player. False for blank or taken names.
    #[instrument(skip(self))]
    pub fn register(&mut self, username: &str) -> bool {
        self.store.register(username)
    }

    /// Looks up a player.
    #[instrument(skip(self))]
    pub fn login(&self, username: &str) -> Option<UserProfile> {
        self.store.login(username)
    }

    /// Returns an existing profile or registers a new one.
    ///
    /// `None` only for a blank username.
    #[instrument(skip(self))]
    pub fn get_or_register(&mut self, username: &str) -> Option<UserProfile> {
        let username = username.trim();
        if let Some(profile) = self.store.login(username) {
            debug!("Existing user found");
            return Some(profile);
        }
        if self.store.register(username) {
            return self.store.login(username);
        }
        None
    }

    /// Closes the engine's active session and folds it into the profile.
    ///
    /// A wrong answer scores 0. Save failures are logged and do not undo the
    /// in-memory update.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the engine has no active session.
    #[instrument(skip(self, engine, profile), fields(username = %profile.username()))]
    pub fn finish_game(
        &mut self,
        engine: &mut SessionEngine,
        profile: &mut UserProfile,
        elapsed_seconds: u64,
    ) -> Result<GameReport, SessionError> {
        let (mode, target) = match engine.current_session() {
            Some(session) if session.is_active() => (*session.mode(), *session.target_number()),
            _ => return Err(SessionError::new("No active session to finish")),
        };

        let result = engine.compute_result();
        let won = engine.check_answer()?;
        let score = if won {
            engine.compute_score(elapsed_seconds, mode)?
        } else {
            0
        };
        engine.end(won, score)?;

        profile.record_result(won, score, elapsed_seconds);
        if let Err(e) = self.store.save(profile) {
            warn!(error = %e, "Failed to save game result");
        }
        let unlocked = achievements::evaluate(profile, &mut self.store);

        info!(won, score, unlocked = unlocked.len(), "Game finished");
        Ok(GameReport {
            won,
            score,
            result,
            target,
            elapsed_seconds,
            unlocked,
        })
    }

    /// Profiles ranked by best score.
    #[instrument(skip(self))]
    pub fn leaderboard(&self) -> Vec<&UserProfile> {
        self.store.all_users()
    }
}
