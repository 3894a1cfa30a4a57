//! Heart Game library - arithmetic card puzzle core
//!
//! Players combine dealt cards with an arithmetic operator to hit a target
//! number. This crate holds the parts with real state: the round engine, the
//! scoring formula, lifetime statistics, achievements and profile storage.
//!
//! # Architecture
//!
//! - **Card source**: deals a hand (remote service, local fallback)
//! - **Engine**: one active round, selection order, result and score
//! - **Profile**: lifetime statistics updated once per finished round
//! - **Achievements**: static catalog and the unlock evaluator
//! - **Store**: JSON file of profiles keyed by username
//!
//! # Example
//!
//! ```
//! use heart_game::{GameMode, Operation, SessionEngine};
//! use heart_cards::{Card, Rank, Suit};
//!
//! let mut engine = SessionEngine::new();
//! engine.start(
//!     "amy",
//!     GameMode::Standard,
//!     9,
//!     vec![Card::new(Suit::Hearts, Rank::Ace), Card::new(Suit::Diamonds, Rank::Ten)],
//! );
//! engine.set_operation(Operation::Subtract);
//! engine.toggle_selection(1).unwrap();
//! engine.toggle_selection(0).unwrap();
//! assert_eq!(engine.compute_result(), 9);
//! assert!(engine.check_answer().unwrap());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod achievements;
mod card_source;
mod config;
mod engine;
mod profile;
mod profile_service;
mod session;
mod store;

// Crate-level exports - Achievements
pub use achievements::{Achievement, AchievementId, catalog, evaluate, unlock_earned};

// Crate-level exports - Card source
pub use card_source::{
    CardSource, CardSourceError, Deal, DealOrigin, Dealer, HttpCardSource, LocalCardSource,
    generate_target, parse_cards, random_hand,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Session engine
pub use engine::{Operation, SessionEngine, SessionError};
pub use session::{GameMode, GameSession, SessionId, SessionOutcome};

// Crate-level exports - Profiles
pub use profile::UserProfile;
pub use profile_service::{GameReport, ProfileService};
pub use store::{StoreError, UserStore};
