//! Card ranks and the rank-to-value table.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Rank of a card, ace low.
///
/// Parses from the short wire form (`"A"`, `"7"`, `"10"`, `"K"`) as well as
/// spelled-out face names (`"ACE"`, `"king"`).
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
#[strum(ascii_case_insensitive)]
pub enum Rank {
    /// Ace, worth 1.
    #[serde(rename = "A")]
    #[strum(to_string = "A", serialize = "ACE")]
    Ace,
    /// Two.
    #[serde(rename = "2")]
    #[strum(to_string = "2")]
    Two,
    /// Three.
    #[serde(rename = "3")]
    #[strum(to_string = "3")]
    Three,
    /// Four.
    #[serde(rename = "4")]
    #[strum(to_string = "4")]
    Four,
    /// Five.
    #[serde(rename = "5")]
    #[strum(to_string = "5")]
    Five,
    /// Six.
    #[serde(rename = "6")]
    #[strum(to_string = "6")]
    Six,
    /// Seven.
    #[serde(rename = "7")]
    #[strum(to_string = "7")]
    Seven,
    /// Eight.
    #[serde(rename = "8")]
    #[strum(to_string = "8")]
    Eight,
    /// Nine.
    #[serde(rename = "9")]
    #[strum(to_string = "9")]
    Nine,
    /// Ten.
    #[serde(rename = "10")]
    #[strum(to_string = "10")]
    Ten,
    /// Jack, worth 11.
    #[serde(rename = "J")]
    #[strum(to_string = "J", serialize = "JACK")]
    Jack,
    /// Queen, worth 12.
    #[serde(rename = "Q")]
    #[strum(to_string = "Q", serialize = "QUEEN")]
    Queen,
    /// King, worth 13.
    #[serde(rename = "K")]
    #[strum(to_string = "K", serialize = "KING")]
    King,
}

impl Rank {
    /// Numeric value of the rank in the puzzle.
    #[instrument]
    pub fn value(self) -> i64 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
        }
    }

    /// Parses a raw rank string, trimming surrounding whitespace.
    #[instrument]
    pub fn parse(raw: &str) -> Option<Self> {
        Rank::from_str(raw.trim()).ok()
    }
}

/// Value of a raw rank string. Unrecognized ranks are worth 0.
#[instrument]
pub fn rank_value(raw: &str) -> i64 {
    match Rank::parse(raw) {
        Some(rank) => rank.value(),
        None => {
            debug!(raw, "Unrecognized rank, using value 0");
            0
        }
    }
}
