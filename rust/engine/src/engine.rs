use serde::Serialize;
use tracing::{debug, info};

use crate::cards::Card;
use crate::deck::ShuffledDeck;
use crate::display::display_order;
use crate::errors::EngineError;
use crate::fairness::{ShuffleOrigin, Shuffler};
use crate::flush::evaluate_flush_length7;
use crate::hand::{best_five, evaluate5};
use crate::rules::{showdown, GameKind, SeatStrength, Showdown};

/// When the table replaces its shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReshufflePolicy {
    /// Fresh shoe before every round.
    #[default]
    EveryRound,
    /// Keep dealing until fewer than this many cards remain.
    Below(usize),
}

/// One seat's cards after the deal.
#[derive(Debug, Clone, Serialize)]
pub struct Seat {
    /// Cards dealt to the seat, in dealing order
    pub hole: Vec<Card>,
    /// Cards that make the hand, in table display order
    pub shown: Vec<Card>,
    pub strength: SeatStrength,
}

/// A finished heads-up round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundResult {
    pub game: GameKind,
    /// Sequence number of the round at this table, starting at 1
    pub round: u64,
    pub player: Seat,
    pub dealer: Seat,
    /// Shared cards; empty for games without a board
    pub board: Vec<Card>,
    pub showdown: Showdown,
    /// Source of the shoe the round was dealt from
    pub origin: ShuffleOrigin,
}

/// A heads-up table: one player against the dealer, dealing rounds of one
/// game from a shoe it replaces according to its [`ReshufflePolicy`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fairdeal_engine::engine::Table;
/// use fairdeal_engine::fairness::{SeededShuffle, Shuffler};
/// use fairdeal_engine::rules::GameKind;
///
/// let shuffler = Shuffler::new(1).with_source(Arc::new(SeededShuffle::new(42)));
/// let mut table = Table::new(GameKind::UltimateHoldem, shuffler);
///
/// let round = table.play_round().unwrap();
/// assert_eq!(round.player.hole.len(), 2);
/// assert_eq!(round.board.len(), 5);
/// assert_eq!(table.shoe().unwrap().dealt(), 9);
/// ```
#[derive(Debug)]
pub struct Table {
    game: GameKind,
    shuffler: Shuffler,
    policy: ReshufflePolicy,
    /// Current shoe; `None` until the first round
    shoe: Option<ShuffledDeck>,
    rounds: u64,
    shoes: u64,
}

impl Table {
    pub fn new(game: GameKind, shuffler: Shuffler) -> Self {
        Self {
            game,
            shuffler,
            policy: ReshufflePolicy::default(),
            shoe: None,
            rounds: 0,
            shoes: 0,
        }
    }

    pub fn with_policy(mut self, policy: ReshufflePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn policy(&self) -> ReshufflePolicy {
        self.policy
    }

    /// The shoe the last round came from, for post-round audit.
    pub fn shoe(&self) -> Option<&ShuffledDeck> {
        self.shoe.as_ref()
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds
    }

    /// Number of shoes this table has shuffled.
    pub fn shoes_used(&self) -> u64 {
        self.shoes
    }

    /// Whether the next round starts from a fresh shoe.
    pub fn needs_reshuffle(&self) -> bool {
        match (&self.shoe, self.policy) {
            (None, _) | (Some(_), ReshufflePolicy::EveryRound) => true,
            (Some(shoe), ReshufflePolicy::Below(threshold)) => {
                shoe.needs_reshuffle(threshold.max(self.game.cards_per_round()))
            }
        }
    }

    /// Replaces the shoe now, whatever the policy says.
    pub fn reshuffle(&mut self) -> &ShuffledDeck {
        let shoe = ShuffledDeck::from_shuffler(&self.shuffler);
        self.shoes += 1;
        info!(
            game = %self.game,
            shoe = self.shoes,
            origin = %shoe.origin(),
            cut = shoe.cut_position(),
            "reshuffled"
        );
        self.shoe.insert(shoe)
    }

    /// Deals and settles one round: player cards, dealer cards, then the board.
    pub fn play_round(&mut self) -> Result<RoundResult, EngineError> {
        if self.needs_reshuffle() {
            self.reshuffle();
        }
        let game = self.game;
        let Some(shoe) = self.shoe.as_mut() else {
            return Err(EngineError::InsufficientCards {
                requested: game.cards_per_round(),
                remaining: 0,
            });
        };

        // Check the whole round fits before touching the shoe.
        if shoe.remaining() < game.cards_per_round() {
            return Err(EngineError::InsufficientCards {
                requested: game.cards_per_round(),
                remaining: shoe.remaining(),
            });
        }
        let player_hole = shoe.deal(game.hole_cards())?;
        let dealer_hole = shoe.deal(game.hole_cards())?;
        let board = shoe.deal(game.board_cards())?;
        let origin = shoe.origin().clone();

        let player = evaluate_seat(game, player_hole, &board)?;
        let dealer = evaluate_seat(game, dealer_hole, &board)?;
        let showdown = showdown(game, &player.strength, &dealer.strength)?;

        self.rounds += 1;
        debug!(
            game = %game,
            round = self.rounds,
            outcome = %showdown.outcome,
            dealer_qualifies = showdown.dealer_qualifies,
            "round settled"
        );
        Ok(RoundResult {
            game,
            round: self.rounds,
            player,
            dealer,
            board,
            showdown,
            origin,
        })
    }
}

/// Ranks one seat the way `game` ranks hands.
pub fn evaluate_seat(game: GameKind, hole: Vec<Card>, board: &[Card]) -> Result<Seat, EngineError> {
    match game {
        GameKind::CaribbeanStud => {
            let ranking = evaluate5(&hole)?;
            let shown = display_order(&hole, &ranking);
            Ok(Seat {
                hole,
                shown,
                strength: SeatStrength::Poker(ranking),
            })
        }
        GameKind::UltimateHoldem => {
            let pool: Vec<Card> = hole.iter().chain(board).copied().collect();
            let best = best_five(&pool)?;
            let shown = display_order(&best.cards, &best.ranking);
            Ok(Seat {
                hole,
                shown,
                strength: SeatStrength::Poker(best.ranking),
            })
        }
        GameKind::HighCardFlush => {
            let ranking = evaluate_flush_length7(&hole)?;
            Ok(Seat {
                shown: ranking.cards.clone(),
                hole,
                strength: SeatStrength::Flush(ranking),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::SeededShuffle;
    use std::sync::Arc;

    fn seeded(game: GameKind, seed: u64) -> Table {
        Table::new(game, Shuffler::new(1).with_source(Arc::new(SeededShuffle::new(seed))))
    }

    #[test]
    fn every_round_policy_uses_a_new_shoe() {
        let mut table = seeded(GameKind::CaribbeanStud, 5);
        table.play_round().unwrap();
        table.play_round().unwrap();
        assert_eq!(table.shoes_used(), 2);
        assert_eq!(table.shoe().unwrap().dealt(), 10);
    }

    #[test]
    fn threshold_policy_keeps_the_shoe() {
        let mut table = seeded(GameKind::CaribbeanStud, 5).with_policy(ReshufflePolicy::Below(20));
        for _ in 0..4 {
            table.play_round().unwrap();
        }
        // 52 - 30 = 22 left after three rounds, 12 after four.
        assert_eq!(table.shoes_used(), 1);
        assert!(table.needs_reshuffle());
        table.play_round().unwrap();
        assert_eq!(table.shoes_used(), 2);
    }

    #[test]
    fn flush_seats_show_their_flush() {
        let mut table = seeded(GameKind::HighCardFlush, 9);
        let round = table.play_round().unwrap();
        assert_eq!(round.player.hole.len(), 7);
        let SeatStrength::Flush(r) = &round.player.strength else {
            panic!("flush game ranks by flush length");
        };
        assert_eq!(round.player.shown.len(), r.flush_len());
        assert!(round.board.is_empty());
    }
}
