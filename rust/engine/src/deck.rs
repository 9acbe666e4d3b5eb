use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cards::{Card, DECK_SIZE};
use crate::errors::EngineError;
use crate::fairness::{SeededShuffle, ShuffleOrigin, ShuffleProof, Shuffler};

/// A shuffled shoe with a recorded cut position.
///
/// Dealing starts at `cut_position` and wraps around the end of the shoe.
/// Dealing only moves `pointer`; the permutation itself never changes, so
/// the whole sequence can be shown to the player once the round is over.
#[derive(Debug, Clone)]
pub struct ShuffledDeck {
    cards: Vec<Card>,
    cut_position: usize,
    pointer: usize,
    decks: usize,
    origin: ShuffleOrigin,
}

/// What a player is shown to audit a shoe: every card in dealing order and
/// where the shoe was cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealingOrder {
    pub cards: Vec<Card>,
    pub indexes: Vec<usize>,
    pub cut_position: usize,
}

impl ShuffledDeck {
    /// A single deck from the in-process shuffle.
    pub fn create() -> Self {
        Self::from_shuffler(&Shuffler::default())
    }

    /// A shoe from `shuffler`; never fails, see [`Shuffler::shuffle`].
    pub fn from_shuffler(shuffler: &Shuffler) -> Self {
        let (proof, origin) = shuffler.shuffle();
        debug!(origin = %origin, cut = proof.cut_position, cards = proof.deck.len(), "new shoe");
        Self {
            cards: proof.deck,
            cut_position: proof.cut_position,
            pointer: 0,
            decks: shuffler.decks(),
            origin,
        }
    }

    /// A deterministic single deck; same seed, same order.
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_shuffler(&Shuffler::new(1).with_source(Arc::new(SeededShuffle::new(seed))))
    }

    /// Rebuilds a shoe from a published proof, checking its integrity.
    pub fn from_proof(proof: ShuffleProof, origin: ShuffleOrigin) -> Result<Self, EngineError> {
        let decks = proof.deck.len() / DECK_SIZE;
        proof.verify(decks)?;
        Ok(Self {
            cards: proof.deck,
            cut_position: proof.cut_position,
            pointer: 0,
            decks,
            origin,
        })
    }

    /// The shuffled permutation, before the cut is applied.
    pub fn full_deck(&self) -> &[Card] {
        &self.cards
    }

    pub fn cut_position(&self) -> usize {
        self.cut_position
    }

    pub fn origin(&self) -> &ShuffleOrigin {
        &self.origin
    }

    pub fn deck_count(&self) -> usize {
        self.decks
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Positions in `full_deck` in the order they are dealt.
    pub fn indexes(&self) -> impl Iterator<Item = usize> + '_ {
        let n = self.cards.len();
        (0..n).map(move |i| (self.cut_position + i) % n)
    }

    /// Cards in the order they are dealt.
    pub fn card_sequence(&self) -> impl Iterator<Item = Card> + '_ {
        self.indexes().map(|i| self.cards[i])
    }

    pub fn dealing_order(&self) -> DealingOrder {
        DealingOrder {
            cards: self.card_sequence().collect(),
            indexes: self.indexes().collect(),
            cut_position: self.cut_position,
        }
    }

    /// Same data as [`dealing_order`](Self::dealing_order); what the table
    /// shows once the round is over.
    pub fn dealing_order_for_display(&self) -> DealingOrder {
        self.dealing_order()
    }

    /// Deals the next `n` cards.
    ///
    /// Fails with [`EngineError::InsufficientCards`] without dealing anything
    /// when fewer than `n` remain; callers reshuffle before that happens.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if n > self.remaining() {
            return Err(EngineError::InsufficientCards {
                requested: n,
                remaining: self.remaining(),
            });
        }
        let dealt = (0..n).map(|i| self.card_at(self.pointer + i)).collect();
        self.pointer += n;
        Ok(dealt)
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        if self.pointer >= self.cards.len() {
            None
        } else {
            let c = self.card_at(self.pointer);
            self.pointer += 1;
            Some(c)
        }
    }

    pub fn burn_card(&mut self) {
        let _ = self.deal_card();
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.pointer)
    }

    /// Number of cards dealt (or burnt) so far.
    pub fn dealt(&self) -> usize {
        self.pointer
    }

    pub fn needs_reshuffle(&self, threshold: usize) -> bool {
        self.remaining() < threshold
    }

    pub fn proof(&self) -> ShuffleProof {
        ShuffleProof {
            deck: self.cards.clone(),
            cut_position: self.cut_position,
        }
    }

    fn card_at(&self, dealt: usize) -> Card {
        self.cards[(self.cut_position + dealt) % self.cards.len()]
    }
}
