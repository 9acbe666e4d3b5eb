//! Ranking for the seven-card flush game.
//!
//! The hand is not a poker category. It is scored by the longest group of
//! one suit (the flush) and, on the side, by the longest run of consecutive
//! ranks inside one suit (the straight flush). Each length has its own pay
//! table entry.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::{all_suits, Card, Suit};
use crate::errors::EngineError;

/// Cards in a flush-game hand.
pub const FLUSH_HAND_SIZE: usize = 7;

/// Flush-game strength: length first, then high card, then every flush card.
/// Two rankings are equal when those agree, whatever the suit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushRanking {
    pub suit: Suit,
    /// Flush cards, high to low.
    pub cards: Vec<Card>,
    /// Longest same-suit consecutive run in the hand, any suit.
    pub straight_flush_len: usize,
}

impl FlushRanking {
    pub fn flush_len(&self) -> usize {
        self.cards.len()
    }

    pub fn high_card(&self) -> u8 {
        self.cards.first().map(Card::value).unwrap_or(0)
    }

    pub fn values(&self) -> Vec<u8> {
        self.cards.iter().map(Card::value).collect()
    }
}

impl PartialEq for FlushRanking {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FlushRanking {}

impl Ord for FlushRanking {
    fn cmp(&self, other: &Self) -> Ordering {
        self.flush_len()
            .cmp(&other.flush_len())
            .then_with(|| self.high_card().cmp(&other.high_card()))
            .then_with(|| self.values().cmp(&other.values()))
    }
}

impl PartialOrd for FlushRanking {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ranks a seven-card flush-game hand.
///
/// When two suits tie on length the stronger group by the flush ordering is
/// taken.
pub fn evaluate_flush_length7(cards: &[Card]) -> Result<FlushRanking, EngineError> {
    if cards.len() != FLUSH_HAND_SIZE {
        return Err(EngineError::InvalidHandSize {
            expected: "7",
            actual: cards.len(),
        });
    }

    let straight_flush_len = longest_straight_flush(cards);
    all_suits()
        .into_iter()
        .map(|suit| {
            let mut flush: Vec<Card> = cards.iter().copied().filter(|c| c.suit == suit).collect();
            flush.sort_unstable_by(|a, b| b.rank.cmp(&a.rank));
            FlushRanking {
                suit,
                cards: flush,
                straight_flush_len,
            }
        })
        .max()
        .ok_or(EngineError::InvalidHandSize {
            expected: "7",
            actual: cards.len(),
        })
}

pub fn compare_flush(a: &FlushRanking, b: &FlushRanking) -> Ordering {
    a.cmp(b)
}

/// Longest run of consecutive ranks within one suit. The Ace counts both
/// high and low, so A-2-3 is a three-card run.
pub fn longest_straight_flush(cards: &[Card]) -> usize {
    all_suits()
        .into_iter()
        .map(|suit| {
            // Bit v set when value v is present; bit 1 mirrors the Ace.
            let mut mask = 0u16;
            for c in cards.iter().filter(|c| c.suit == suit) {
                mask |= 1 << c.value();
                if c.value() == 14 {
                    mask |= 1 << 1;
                }
            }
            let mut best = 0;
            let mut run = 0;
            for v in 1..=14 {
                if mask & (1 << v) != 0 {
                    run += 1;
                    best = usize::max(best, run);
                } else {
                    run = 0;
                }
            }
            best
        })
        .max()
        .unwrap_or(0)
}

/// Odds paid per length (`n` to 1), keyed by number of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTable {
    odds: BTreeMap<usize, u32>,
}

impl PayTable {
    pub fn new(entries: impl IntoIterator<Item = (usize, u32)>) -> Self {
        Self {
            odds: entries.into_iter().collect(),
        }
    }

    /// Flush bonus schedule: 4 cards 1:1 up to 7 cards 300:1.
    pub fn flush_bonus() -> Self {
        Self::new([(4, 1), (5, 10), (6, 100), (7, 300)])
    }

    /// Straight-flush bonus schedule: 3 cards 7:1 up to 7 cards 8000:1.
    pub fn straight_flush_bonus() -> Self {
        Self::new([(3, 7), (4, 60), (5, 100), (6, 1000), (7, 8000)])
    }

    /// Odds for `len` cards, `None` when that length does not pay.
    pub fn odds(&self, len: usize) -> Option<u32> {
        self.odds.get(&len).copied()
    }

    pub fn min_paying_len(&self) -> Option<usize> {
        self.odds.keys().next().copied()
    }
}
