//! Card, ranking and shoe formatters for terminal display.
//!
//! Suits print as ♥ ♦ ♣ ♠ where the terminal can show them and fall back to
//! h d c s letters elsewhere.
//!
//! ## Example
//!
//! ```rust
//! use fairdeal_engine::cards::{Card, Rank, Suit};
//! use fairdeal_cli::formatters::{format_card, format_cards};
//!
//! let ace_spades = Card { rank: Rank::Ace, suit: Suit::Spades };
//! assert!(format_card(&ace_spades) == "A♠" || format_card(&ace_spades) == "As");
//! assert!(format_cards(&[ace_spades]).starts_with("A"));
//! ```

use fairdeal_engine::cards::{Card, Suit};
use fairdeal_engine::hand::HandRanking;

/// Cards per row when printing a whole shoe.
const SHOE_ROW: usize = 13;

/// Check if the terminal supports Unicode card symbols by detecting modern terminal environments.
///
/// On Windows, checks for Windows Terminal (WT_SESSION), modern terminals (TERM_PROGRAM),
/// or VS Code (VSCODE_INJECTION). On Unix-like systems, assumes Unicode support.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: &Suit) -> String {
    if supports_unicode() {
        suit.symbol().to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

/// String like "10♠" (Unicode) or "10s" (ASCII)
pub fn format_card(card: &Card) -> String {
    format!("{}{}", card.rank.label(), format_suit(&card.suit))
}

/// Space separated cards, or "-" when there are none.
pub fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        "-".to_string()
    } else {
        cards.iter().map(format_card).collect::<Vec<_>>().join(" ")
    }
}

/// Category name and tiebreak values, e.g. "Pair (9 A K 5)".
pub fn format_ranking(ranking: &HandRanking) -> String {
    let values: Vec<&str> = ranking.tiebreak.iter().map(|&v| value_label(v)).collect();
    format!("{} ({})", ranking.category, values.join(" "))
}

/// The shoe in dealing order, one row per `SHOE_ROW` cards, each row
/// prefixed with the position of its first card.
pub fn format_shoe(cards: &[Card]) -> Vec<String> {
    cards
        .chunks(SHOE_ROW)
        .enumerate()
        .map(|(i, row)| format!("{:>4}: {}", i * SHOE_ROW, format_cards(row)))
        .collect()
}

fn value_label(v: u8) -> &'static str {
    match v {
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        14 => "A",
        _ => "?",
    }
}
