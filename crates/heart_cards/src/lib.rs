//! Playing-card model for the heart_game arithmetic puzzle.
//!
//! Cards are plain values: a [`Suit`], a [`Rank`] and a selection flag that
//! the session engine flips as the player picks cards. Rank values follow the
//! puzzle convention (A=1, numerals at face value, J=11, Q=12, K=13).
//!
//! # Example
//!
//! ```
//! use heart_cards::{Card, Rank, Suit};
//!
//! let card = Card::new(Suit::Hearts, Rank::Queen);
//! assert_eq!(card.value(), 12);
//! assert_eq!(card.display_name(), "Q of hearts");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod card;
mod rank;
mod suit;

pub use card::{Card, full_deck};
pub use rank::{Rank, rank_value};
pub use suit::Suit;
