use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::flush::FlushRanking;
use crate::hand::{Category, HandRanking};

/// The table games built on the shared evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// Five cards each, no board.
    CaribbeanStud,
    /// Two hole cards each plus a five-card board.
    UltimateHoldem,
    /// Seven cards each, ranked by flush length.
    HighCardFlush,
}

impl GameKind {
    pub fn name(self) -> &'static str {
        match self {
            GameKind::CaribbeanStud => "Caribbean Stud",
            GameKind::UltimateHoldem => "Ultimate Texas Hold'em",
            GameKind::HighCardFlush => "High Card Flush",
        }
    }

    pub fn hole_cards(self) -> usize {
        match self {
            GameKind::CaribbeanStud => 5,
            GameKind::UltimateHoldem => 2,
            GameKind::HighCardFlush => 7,
        }
    }

    pub fn board_cards(self) -> usize {
        match self {
            GameKind::UltimateHoldem => 5,
            GameKind::CaribbeanStud | GameKind::HighCardFlush => 0,
        }
    }

    /// Cards a heads-up round (player and dealer) takes from the shoe.
    pub fn cards_per_round(self) -> usize {
        2 * self.hole_cards() + self.board_cards()
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How strong one seat's hand is, in the ranking its game uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeatStrength {
    Poker(HandRanking),
    Flush(FlushRanking),
}

impl SeatStrength {
    /// Orders two seats ranked the same way.
    pub fn compare(&self, other: &Self) -> Result<Ordering, EngineError> {
        match (self, other) {
            (SeatStrength::Poker(a), SeatStrength::Poker(b)) => Ok(a.cmp(b)),
            (SeatStrength::Flush(a), SeatStrength::Flush(b)) => Ok(a.cmp(b)),
            _ => Err(EngineError::MixedRankings),
        }
    }
}

impl fmt::Display for SeatStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatStrength::Poker(r) => write!(f, "{}", r),
            SeatStrength::Flush(r) => write!(
                f,
                "{}-card flush, {} high (straight flush run {})",
                r.flush_len(),
                r.high_card(),
                r.straight_flush_len
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PlayerWins,
    DealerWins,
    Push,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::PlayerWins => "player wins",
            Outcome::DealerWins => "dealer wins",
            Outcome::Push => "push",
        })
    }
}

/// Head-to-head result. What a non-qualifying dealer means for the wagers
/// is up to each game's settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showdown {
    pub outcome: Outcome,
    pub dealer_qualifies: bool,
}

/// Whether the dealer's hand opens the game.
///
/// - Caribbean Stud: Ace-King high or better.
/// - Ultimate Texas Hold'em: a pair or better.
/// - High Card Flush: a three-card flush nine high, or any longer flush.
pub fn dealer_qualifies(kind: GameKind, dealer: &SeatStrength) -> bool {
    match (kind, dealer) {
        (GameKind::CaribbeanStud, SeatStrength::Poker(r)) => {
            r.category > Category::HighCard || (r.tiebreak.first() == Some(&14) && r.tiebreak.get(1) == Some(&13))
        }
        (GameKind::UltimateHoldem, SeatStrength::Poker(r)) => r.category >= Category::OnePair,
        (GameKind::HighCardFlush, SeatStrength::Flush(r)) => {
            r.flush_len() > 3 || (r.flush_len() == 3 && r.high_card() >= 9)
        }
        _ => false,
    }
}

/// Compares the seats and checks the dealer's qualification.
///
/// # Errors
///
/// [`EngineError::MixedRankings`] when the seats were not ranked the same way.
///
/// # Examples
///
/// ```
/// use fairdeal_engine::cards::parse_cards;
/// use fairdeal_engine::hand::evaluate5;
/// use fairdeal_engine::rules::{showdown, GameKind, Outcome, SeatStrength};
///
/// let player = SeatStrength::Poker(evaluate5(&parse_cards("Ah Ad 7c 5s 2h").unwrap()).unwrap());
/// let dealer = SeatStrength::Poker(evaluate5(&parse_cards("Kh Qd 9c 6s 3h").unwrap()).unwrap());
/// let result = showdown(GameKind::CaribbeanStud, &player, &dealer).unwrap();
/// assert_eq!(result.outcome, Outcome::PlayerWins);
/// assert!(!result.dealer_qualifies);
/// ```
pub fn showdown(
    kind: GameKind,
    player: &SeatStrength,
    dealer: &SeatStrength,
) -> Result<Showdown, EngineError> {
    let outcome = match player.compare(dealer)? {
        Ordering::Greater => Outcome::PlayerWins,
        Ordering::Less => Outcome::DealerWins,
        Ordering::Equal => Outcome::Push,
    };
    Ok(Showdown {
        outcome,
        dealer_qualifies: dealer_qualifies(kind, dealer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::flush::evaluate_flush_length7;
    use crate::hand::{evaluate5, evaluate_best5_of7};

    fn poker5(s: &str) -> SeatStrength {
        SeatStrength::Poker(evaluate5(&parse_cards(s).unwrap()).unwrap())
    }

    fn flush7(s: &str) -> SeatStrength {
        SeatStrength::Flush(evaluate_flush_length7(&parse_cards(s).unwrap()).unwrap())
    }

    #[test]
    fn stud_dealer_needs_ace_king() {
        assert!(dealer_qualifies(GameKind::CaribbeanStud, &poker5("As Kd 7c 4h 2s")));
        assert!(!dealer_qualifies(GameKind::CaribbeanStud, &poker5("As Qd 7c 4h 2s")));
        assert!(dealer_qualifies(GameKind::CaribbeanStud, &poker5("2s 2d 7c 4h 3s")));
    }

    #[test]
    fn holdem_dealer_needs_a_pair() {
        let pair = evaluate_best5_of7(&parse_cards("9s 9d Ac Kh 4s 3c 2d").unwrap()).unwrap();
        let high = evaluate_best5_of7(&parse_cards("9s 8d Ac Kh 4s 3c Jd").unwrap()).unwrap();
        assert!(dealer_qualifies(GameKind::UltimateHoldem, &SeatStrength::Poker(pair)));
        assert!(!dealer_qualifies(GameKind::UltimateHoldem, &SeatStrength::Poker(high)));
    }

    #[test]
    fn flush_dealer_needs_nine_high_three_flush() {
        assert!(dealer_qualifies(GameKind::HighCardFlush, &flush7("9s 5s 2s Kd Qh 3c 4d")));
        assert!(!dealer_qualifies(GameKind::HighCardFlush, &flush7("8s 5s 2s Kd Qh 3c 4d")));
        assert!(dealer_qualifies(GameKind::HighCardFlush, &flush7("8s 5s 2s 3s Qh 3c 4d")));
    }

    #[test]
    fn mixed_rankings_are_rejected() {
        let err = showdown(
            GameKind::CaribbeanStud,
            &poker5("As Kd 7c 4h 2s"),
            &flush7("9s 5s 2s Kd Qh 3c 4d"),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::MixedRankings);
    }
}
