//! Card sources: the remote deal service and the local fallback.
//!
//! [`Dealer::deal`] never fails. When the configured [`CardSource`] errors,
//! the dealer generates the hand locally and says so in [`DealOrigin`].

use async_trait::async_trait;
use derive_getters::Getters;
use derive_new::new;
use derive_more::{Display, Error};
use heart_cards::{Card, Rank, Suit};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use crate::GameConfig;

/// Target used when there are no cards to derive one from.
const EMPTY_HAND_TARGET: i64 = 10;

/// Transport or parse failure inside a card source.
#[derive(Debug, Clone, Display, Error)]
#[display("Card source error: {} at {}:{}", message, file, line)]
pub struct CardSourceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl CardSourceError {
    /// Creates a new card source error with caller location tracking.
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

impl From<reqwest::Error> for CardSourceError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

/// Supplies hands of cards.
#[async_trait]
pub trait CardSource: Send + Sync + std::fmt::Debug {
    /// Fetches exactly `count` cards.
    async fn fetch(&self, count: usize) -> Result<Vec<Card>, CardSourceError>;
}

#[derive(Debug, Deserialize)]
struct WireDeal {
    cards: Vec<WireCard>,
}

#[derive(Debug, Deserialize)]
struct WireCard {
    suit: String,
    rank: String,
}

/// Parses a `{"cards": [{"suit": "...", "rank": "..."}]}` response body.
///
/// # Errors
///
/// Returns [`CardSourceError`] on malformed JSON, an unknown suit or rank, or a
/// card count different from `expected`.
#[instrument(skip(body), fields(body_len = body.len()))]
pub fn parse_cards(body: &str, expected: usize) -> Result<Vec<Card>, CardSourceError> {
    let deal: WireDeal = serde_json::from_str(body)
        .map_err(|e| CardSourceError::new(format!("Malformed deal JSON: {}", e)))?;

    let cards = deal
        .cards
        .iter()
        .map(|wire| -> Result<Card, CardSourceError> {
            let suit = wire
                .suit
                .trim()
                .parse::<Suit>()
                .map_err(|_| CardSourceError::new(format!("Unknown suit '{}'", wire.suit)))?;
            let rank = Rank::parse(&wire.rank)
                .ok_or_else(|| CardSourceError::new(format!("Unknown rank '{}'", wire.rank)))?;
            Ok(Card::new(suit, rank))
        })
        .collect::<Result<Vec<_>, CardSourceError>>()?;

    if cards.len() != expected {
        return Err(CardSourceError::new(format!(
            "Expected {} cards, got {}",
            expected,
            cards.len()
        )));
    }
    debug!(count = cards.len(), "Parsed deal");
    Ok(cards)
}

/// Deals from the remote playing-card service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCardSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCardSource {
    /// Creates a source for `base_url` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CardSourceError`] if the HTTP client cannot be built.
    #[instrument]
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, CardSourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        info!(base_url = %base_url, "Created HTTP card source");
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CardSource for HttpCardSource {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self, count: usize) -> Result<Vec<Card>, CardSourceError> {
        debug!("Requesting cards");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("number", count.to_string()), ("format", "json".to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CardSourceError::new(format!(
                "Card service responded with {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_cards(&body, count)
    }
}

/// Deals uniformly random cards locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCardSource;

#[async_trait]
impl CardSource for LocalCardSource {
    #[instrument(skip(self))]
    async fn fetch(&self, count: usize) -> Result<Vec<Card>, CardSourceError> {
        Ok(random_hand(&mut rand::thread_rng(), count))
    }
}

/// Draws `count` cards with independently random suit and rank.
///
/// Draws are with replacement, so a hand may repeat a card.
#[instrument(skip(rng))]
pub fn random_hand<R: Rng>(rng: &mut R, count: usize) -> Vec<Card> {
    let suits: Vec<Suit> = Suit::iter().collect();
    let ranks: Vec<Rank> = Rank::iter().collect();
    (0..count)
        .filter_map(|_| {
            let suit = suits.choose(rng)?;
            let rank = ranks.choose(rng)?;
            Some(Card::new(*suit, *rank))
        })
        .collect()
}

/// Picks a target in `[min, min + max(1, sum - min))` over the hand's values.
///
/// An empty hand gets a target of 10.
#[instrument(skip(hand, rng), fields(hand_size = hand.len()))]
pub fn generate_target<R: Rng>(hand: &[Card], rng: &mut R) -> i64 {
    let Some(min) = hand.iter().map(Card::value).min() else {
        return EMPTY_HAND_TARGET;
    };
    let sum: i64 = hand.iter().map(Card::value).sum();
    let width = (sum - min).max(1);
    let target = min + rng.gen_range(0..width);
    debug!(min, sum, target, "Generated target");
    target
}

/// Where a dealt hand came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealOrigin {
    /// The configured source delivered the hand.
    Remote,
    /// The source failed and the hand was generated locally.
    Fallback {
        /// Why the source failed.
        reason: String,
    },
}

/// A dealt hand.
#[derive(Debug, Clone, Getters, new)]
pub struct Deal {
    cards: Vec<Card>,
    origin: DealOrigin,
}

impl Deal {
    /// True when the hand came from the local fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, DealOrigin::Fallback { .. })
    }

    /// Consumes the deal, returning the cards.
    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

/// Deals hands and targets, falling back to local generation on failure.
#[derive(Debug)]
pub struct Dealer {
    source: Box<dyn CardSource>,
    rng: StdRng,
}

impl Dealer {
    /// Creates a dealer with an entropy-seeded generator.
    #[instrument]
    pub fn new(source: Box<dyn CardSource>) -> Self {
        Self::with_rng(source, StdRng::from_entropy())
    }

    /// Creates a dealer with the given generator.
    pub fn with_rng(source: Box<dyn CardSource>, rng: StdRng) -> Self {
        Self { source, rng }
    }

    /// Builds the dealer the configuration asks for.
    ///
    /// Offline mode, or an HTTP client that cannot be built, deals locally.
    #[instrument(skip(config))]
    pub fn from_config(config: &GameConfig) -> Self {
        if *config.offline() {
            info!("Offline mode, dealing locally");
            return Self::new(Box::new(LocalCardSource));
        }
        match HttpCardSource::new(config.card_api_url().clone(), config.fetch_timeout()) {
            Ok(source) => Self::new(Box::new(source)),
            Err(e) => {
                warn!(error = %e, "HTTP card source unavailable, dealing locally");
                Self::new(Box::new(LocalCardSource))
            }
        }
    }

    /// Deals `count` cards. Never fails.
    #[instrument(skip(self))]
    pub async fn deal(&mut self, count: usize) -> Deal {
        match self.source.fetch(count).await {
            Ok(cards) => {
                info!(count = cards.len(), "Dealt from card source");
                Deal::new(cards, DealOrigin::Remote)
            }
            Err(e) => {
                warn!(error = %e, "Card source failed, dealing locally");
                Deal::new(
                    random_hand(&mut self.rng, count),
                    DealOrigin::Fallback { reason: e.message },
                )
            }
        }
    }

    /// Picks a target for the hand.
    pub fn generate_target(&mut self, hand: &[Card]) -> i64 {
        generate_target(hand, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cards() {
        let body = r#"{"cards":[{"suit":"hearts","rank":"A"},{"suit":"Diamonds","rank":"10"}]}"#;
        let cards = parse_cards(body, 2).expect("Parse failed");
        assert_eq!(cards[0], Card::new(Suit::Hearts, Rank::Ace));
        assert_eq!(cards[1], Card::new(Suit::Diamonds, Rank::Ten));
    }

    #[test]
    fn test_parse_cards_rejects_wrong_count() {
        let body = r#"{"cards":[{"suit":"hearts","rank":"A"}]}"#;
        assert!(parse_cards(body, 5).is_err());
    }

    #[test]
    fn test_parse_cards_rejects_garbage() {
        assert!(parse_cards("<html>busy</html>", 1).is_err());
        assert!(parse_cards(r#"{"cards":[{"suit":"stars","rank":"A"}]}"#, 1).is_err());
        assert!(parse_cards(r#"{"cards":[{"suit":"clubs","rank":"Z"}]}"#, 1).is_err());
    }

    #[test]
    fn test_random_hand_length() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_hand(&mut rng, 5).len(), 5);
        assert!(random_hand(&mut rng, 0).is_empty());
    }
}
