//! Cosmetic ordering of a ranked hand for the table view.
//!
//! Nothing here feeds back into ranking or comparison.

use crate::cards::Card;
use crate::hand::{rank_groups, HandRanking};

/// Orders cards the way the table shows them.
///
/// Straights run low to high, with the Ace in front for the wheel. Anything
/// else shows the biggest group first (quads, trips, pairs), then the
/// kickers high to low.
pub fn display_order(cards: &[Card], ranking: &HandRanking) -> Vec<Card> {
    let mut shown = cards.to_vec();

    if ranking.category.is_straight() {
        let wheel = ranking.is_wheel();
        shown.sort_by_key(|c| (low_value(c, wheel), c.suit));
        return shown;
    }

    let values: Vec<u8> = cards.iter().map(Card::value).collect();
    let groups = rank_groups(&values);
    let count_of = |v: u8| groups.iter().find(|g| g.1 == v).map_or(0, |g| g.0);
    shown.sort_by(|a, b| {
        count_of(b.value())
            .cmp(&count_of(a.value()))
            .then(b.value().cmp(&a.value()))
            .then(a.suit.cmp(&b.suit))
    });
    shown
}

fn low_value(card: &Card, wheel: bool) -> u8 {
    if wheel && card.value() == 14 {
        1
    } else {
        card.value()
    }
}
