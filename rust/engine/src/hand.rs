use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::EngineError;

const WHEEL: [u8; 5] = [14, 5, 4, 3, 2];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    /// Ten to Ace straight flush.
    RoyalFlush = 9,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }

    pub fn is_straight(self) -> bool {
        matches!(
            self,
            Category::Straight | Category::StraightFlush | Category::RoyalFlush
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparable strength of a five-card hand.
///
/// Orders by category, then `tiebreak` lexicographically, then the raw card
/// values sorted high to low.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandRanking {
    pub category: Category,
    /// Values that settle hands of the same category, most significant first:
    /// pair -> [pair, k1, k2, k3], two pair -> [high, low, kicker],
    /// quads -> [quad, kicker], straight -> [high card] (5 for the wheel),
    /// flush -> all five values.
    pub tiebreak: Vec<u8>,
    /// All five values, high to low, Ace as 14.
    pub values: Vec<u8>,
}

impl HandRanking {
    pub fn is_wheel(&self) -> bool {
        self.category.is_straight() && self.tiebreak.first() == Some(&5)
    }
}

impl Ord for HandRanking {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
            .then_with(|| self.values.cmp(&other.values))
    }
}

impl PartialOrd for HandRanking {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.category, self.tiebreak)
    }
}

/// The best five cards of a larger pool and their ranking.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BestHand {
    pub ranking: HandRanking,
    pub cards: [Card; 5],
}

/// Ranks exactly five cards.
pub fn evaluate5(cards: &[Card]) -> Result<HandRanking, EngineError> {
    if cards.len() != 5 {
        return Err(EngineError::InvalidHandSize {
            expected: "5",
            actual: cards.len(),
        });
    }
    Ok(rank_five(cards))
}

/// Ranks the best five-card hand out of 5 to 7 cards.
pub fn evaluate_best5_of7(cards: &[Card]) -> Result<HandRanking, EngineError> {
    best_five(cards).map(|best| best.ranking)
}

/// Tries every five-card subset (21 for seven cards) and keeps the highest
/// ranking. The first subset wins between equal rankings.
pub fn best_five(cards: &[Card]) -> Result<BestHand, EngineError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EngineError::InvalidHandSize {
            expected: "5 to 7",
            actual: cards.len(),
        });
    }

    let mut best: Option<BestHand> = None;
    for idx in five_card_subsets(cards.len()) {
        let five = idx.map(|i| cards[i]);
        let ranking = rank_five(&five);
        if best.as_ref().map_or(true, |b| ranking > b.ranking) {
            best = Some(BestHand {
                ranking,
                cards: five,
            });
        }
    }
    best.ok_or(EngineError::InvalidHandSize {
        expected: "5 to 7",
        actual: cards.len(),
    })
}

pub fn compare_hands(a: &HandRanking, b: &HandRanking) -> Ordering {
    a.cmp(b)
}

/// `1` when `a` wins, `-1` when `b` wins, `0` on a tie.
pub fn compare(a: &HandRanking, b: &HandRanking) -> i8 {
    match compare_hands(a, b) {
        Ordering::Greater => 1,
        Ordering::Equal => 0,
        Ordering::Less => -1,
    }
}

fn rank_five(cards: &[Card]) -> HandRanking {
    let mut values: Vec<u8> = cards.iter().map(Card::value).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = straight_high(&values);

    if let (true, Some(high)) = (is_flush, straight) {
        let category = if high == 14 {
            Category::RoyalFlush
        } else {
            Category::StraightFlush
        };
        return HandRanking {
            category,
            tiebreak: vec![high],
            values,
        };
    }

    let groups = rank_groups(&values);
    let counts: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();
    let (category, tiebreak) = match counts.as_slice() {
        // Five of a rank needs a multi-deck shoe; it plays as quads with
        // the fifth card as its own kicker.
        [5] => (Category::FourOfAKind, vec![groups[0].1; 2]),
        [4, ..] => (Category::FourOfAKind, group_values(&groups)),
        [3, 2] => (Category::FullHouse, group_values(&groups)),
        _ if is_flush => (Category::Flush, values.clone()),
        _ if straight.is_some() => (Category::Straight, straight.into_iter().collect()),
        [3, ..] => (Category::ThreeOfAKind, group_values(&groups)),
        [2, 2, ..] => (Category::TwoPair, group_values(&groups)),
        [2, ..] => (Category::OnePair, group_values(&groups)),
        _ => (Category::HighCard, values.clone()),
    };

    HandRanking {
        category,
        tiebreak,
        values,
    }
}

/// High card of a straight, given five values sorted high to low.
/// The wheel (A-2-3-4-5) is the one case where the Ace plays low.
fn straight_high(desc: &[u8]) -> Option<u8> {
    if desc.windows(2).all(|w| w[0] == w[1] + 1) {
        Some(desc[0])
    } else if desc == WHEEL {
        Some(5)
    } else {
        None
    }
}

/// `(count, value)` per distinct value, by count then value, both descending.
pub(crate) fn rank_groups(values: &[u8]) -> Vec<(u8, u8)> {
    let mut counts = [0u8; 15];
    for &v in values {
        counts[v as usize] += 1;
    }
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    groups
}

fn group_values(groups: &[(u8, u8)]) -> Vec<u8> {
    groups.iter().map(|&(_, v)| v).collect()
}

fn five_card_subsets(n: usize) -> impl Iterator<Item = [usize; 5]> {
    (0..n).flat_map(move |a| {
        (a + 1..n).flat_map(move |b| {
            (b + 1..n).flat_map(move |c| {
                (c + 1..n).flat_map(move |d| (d + 1..n).map(move |e| [a, b, c, d, e]))
            })
        })
    })
}
