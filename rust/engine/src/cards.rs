use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Number of cards in one standard deck.
pub const DECK_SIZE: usize = 52;

/// Represents one of the four suits in a standard 52-card deck.
/// Used as a component of [`Card`] to fully define a playing card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    /// The symbol shown to players.
    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Suit {
    type Err = EngineError;

    /// Accepts symbols (`♠`), letters (`s`, `S`) and names (`spades`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "♣" | "c" | "club" | "clubs" => Ok(Suit::Clubs),
            "♦" | "d" | "diamond" | "diamonds" => Ok(Suit::Diamonds),
            "♥" | "h" | "heart" | "hearts" => Ok(Suit::Hearts),
            "♠" | "s" | "spade" | "spades" => Ok(Suit::Spades),
            _ => Err(EngineError::InvalidCard(s.to_string())),
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
/// Numeric values are assigned for comparison and hand evaluation purposes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
    /// Ace (14)
    Ace,
}

impl Rank {
    /// Numeric value, 2 through 14 with the Ace high.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Label printed on the card face.
    pub fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rank {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "2" => Ok(Rank::Two),
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" | "T" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            _ => Err(EngineError::InvalidCard(s.to_string())),
        }
    }
}

/// Represents a single playing card with a suit and rank.
/// Cards are plain values: freely copied between decks, hands and displays.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Numeric rank value with the Ace high (2..=14).
    pub fn value(&self) -> u8 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = EngineError;

    /// Parses `As`, `10h`, `Td` or `Q♠`: the rank followed by one suit char.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((split, _)) = s.char_indices().last() else {
            return Err(EngineError::InvalidCard(s.to_string()));
        };
        if split == 0 {
            return Err(EngineError::InvalidCard(s.to_string()));
        }
        let rank = s[..split]
            .parse::<Rank>()
            .map_err(|_| EngineError::InvalidCard(s.to_string()))?;
        let suit = s[split..]
            .parse::<Suit>()
            .map_err(|_| EngineError::InvalidCard(s.to_string()))?;
        Ok(Card { suit, rank })
    }
}

/// Parses a whitespace or comma separated list of cards.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, EngineError> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

/// The canonical unshuffled deck: suits in [`all_suits`] order, ranks ascending.
pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(DECK_SIZE);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}

/// The canonical shoe for `decks` decks, one [`full_deck`] after another.
pub fn full_shoe(decks: usize) -> Vec<Card> {
    let mut v = Vec::with_capacity(shoe_len(decks).unwrap_or(0));
    for _ in 0..decks {
        v.extend(full_deck());
    }
    v
}

/// Number of cards in a shoe of `decks` decks, `None` on overflow.
pub fn shoe_len(decks: usize) -> Option<usize> {
    DECK_SIZE.checked_mul(decks)
}

/// Checks that `cards` holds exactly `decks` copies of every card.
pub fn is_complete_shoe(cards: &[Card], decks: usize) -> bool {
    if decks == 0 || shoe_len(decks) != Some(cards.len()) {
        return false;
    }
    let mut counts = [0usize; DECK_SIZE];
    for c in cards {
        let slot = c.suit.index() * 13 + (c.value() as usize - 2);
        counts[slot] += 1;
    }
    counts.iter().all(|&n| n == decks)
}

/// Card as exchanged with external fairness sources and audit logs:
/// `{"suit": "♠", "rank": "10"}`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct WireCard {
    pub suit: String,
    pub rank: String,
}

impl From<Card> for WireCard {
    fn from(c: Card) -> Self {
        Self {
            suit: c.suit.symbol().to_string(),
            rank: c.rank.label().to_string(),
        }
    }
}

impl TryFrom<&WireCard> for Card {
    type Error = EngineError;

    fn try_from(w: &WireCard) -> Result<Self, Self::Error> {
        Ok(Card {
            suit: w.suit.parse()?,
            rank: w.rank.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("As".parse::<Card>().unwrap(), Card::new(Rank::Ace, Suit::Spades));
        assert_eq!("10h".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert_eq!("Td".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!("q♣".parse::<Card>().unwrap(), Card::new(Rank::Queen, Suit::Clubs));
        assert!("1s".parse::<Card>().is_err());
        assert!("A".parse::<Card>().is_err());
        assert!("Ax".parse::<Card>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for c in full_deck() {
            assert_eq!(c.to_string().parse::<Card>().unwrap(), c);
        }
    }

    #[test]
    fn complete_shoe_detects_duplicates() {
        let mut shoe = full_shoe(2);
        assert!(is_complete_shoe(&shoe, 2));
        shoe[0] = shoe[1];
        assert!(!is_complete_shoe(&shoe, 2));
        assert!(!is_complete_shoe(&full_deck(), 2));
    }

    #[test]
    fn wire_card_accepts_names_and_letters() {
        let w = WireCard {
            suit: "Hearts".into(),
            rank: "k".into(),
        };
        assert_eq!(Card::try_from(&w).unwrap(), Card::new(Rank::King, Suit::Hearts));
        let back = WireCard::from(Card::new(Rank::Ten, Suit::Spades));
        assert_eq!(back.suit, "♠");
        assert_eq!(back.rank, "10");
    }
}
