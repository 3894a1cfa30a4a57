//! The card value object.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

use crate::{Rank, Suit};

/// A playing card in a dealt hand.
///
/// Suit and rank never change. The `selected` flag mirrors whether the player
/// currently has the card picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{} of {}", rank, suit)]
pub struct Card {
    suit: Suit,
    rank: Rank,
    #[serde(default)]
    selected: bool,
}

impl Card {
    /// Creates an unselected card.
    #[instrument]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            selected: false,
        }
    }

    /// Returns the suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Returns the rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Numeric value used by the puzzle arithmetic.
    #[instrument(skip(self), fields(card = %self))]
    pub fn value(&self) -> i64 {
        self.rank.value()
    }

    /// Whether the player has this card selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Sets the selection flag.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Human-readable name, e.g. `"10 of diamonds"`.
    pub fn display_name(&self) -> String {
        self.to_string()
    }

    /// Compact label with the suit symbol, e.g. `"10♦"`.
    pub fn short_label(&self) -> String {
        format!("{}{}", self.rank, self.suit.symbol())
    }
}

/// Every card of a standard 52-card deck, suit by suit, ace to king.
#[instrument]
pub fn full_deck() -> Vec<Card> {
    Suit::iter()
        .flat_map(|suit| Rank::iter().map(move |rank| Card::new(suit, rank)))
        .collect()
}
