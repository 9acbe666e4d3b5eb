//! Eval command handler: ranks one hand given on the command line.
//!
//! Five cards are ranked as they are; six or seven cards are ranked by their
//! best five. With `--flush`, seven cards are ranked by flush length.

use std::io::Write;

use fairdeal_engine::cards::{Card, parse_cards};
use fairdeal_engine::display::display_order;
use fairdeal_engine::flush::{PayTable, evaluate_flush_length7};
use fairdeal_engine::hand::{best_five, evaluate5};

use crate::error::CliError;
use crate::formatters::{format_cards, format_suit};

/// Parses card arguments; each argument may hold several cards.
pub(crate) fn parse_card_args(args: &[String]) -> Result<Vec<Card>, CliError> {
    let cards = parse_cards(&args.join(" "))?;
    if let Some(dup) = first_duplicate(&cards) {
        return Err(CliError::InvalidInput(format!("card {} given twice", dup)));
    }
    Ok(cards)
}

fn first_duplicate(cards: &[Card]) -> Option<Card> {
    cards
        .iter()
        .enumerate()
        .find(|(i, c)| cards[..*i].contains(c))
        .map(|(_, c)| *c)
}

pub fn handle_eval_command(cards: &[String], flush: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let cards = parse_card_args(cards)?;

    if flush {
        let r = evaluate_flush_length7(&cards)?;
        writeln!(
            out,
            "Flush: {} card(s) in {}: {}",
            r.flush_len(),
            format_suit(&r.suit),
            format_cards(&r.cards)
        )?;
        writeln!(out, "Straight flush run: {}", r.straight_flush_len)?;
        match PayTable::flush_bonus().odds(r.flush_len()) {
            Some(odds) => writeln!(out, "Flush bonus: {}:1", odds)?,
            None => writeln!(out, "Flush bonus: none")?,
        }
        match PayTable::straight_flush_bonus().odds(r.straight_flush_len) {
            Some(odds) => writeln!(out, "Straight flush bonus: {}:1", odds)?,
            None => writeln!(out, "Straight flush bonus: none")?,
        }
        return Ok(());
    }

    let (ranking, shown) = if cards.len() == 5 {
        let ranking = evaluate5(&cards)?;
        let shown = display_order(&cards, &ranking);
        (ranking, shown)
    } else {
        let best = best_five(&cards)?;
        let shown = display_order(&best.cards, &best.ranking);
        (best.ranking, shown)
    };
    writeln!(out, "Category: {}", ranking.category)?;
    writeln!(out, "Tiebreak: {:?}", ranking.tiebreak)?;
    writeln!(out, "Hand: {}", format_cards(&shown))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn eval(s: &str, flush: bool) -> Result<String, CliError> {
        let mut out = Vec::new();
        handle_eval_command(&args(s), flush, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_eval_five_cards() {
        let output = eval("3c Kd 9h 9s 5c", false).unwrap();
        assert!(output.contains("Category: Pair"));
        assert!(output.contains("Tiebreak: [9, 13, 5, 3]"));
    }

    #[test]
    fn test_eval_seven_cards_uses_best_five() {
        let output = eval("Ah Kh Qh Jh 10h 2c 3d", false).unwrap();
        assert!(output.contains("Category: Royal Flush"));
        assert!(output.contains("Tiebreak: [14]"));
    }

    #[test]
    fn test_eval_flush_length() {
        let output = eval("2h 9h Kh 5h Ac Qc 3d", true).unwrap();
        assert!(output.contains("Flush: 4 card(s)"));
        assert!(output.contains("Flush bonus: 1:1"));
        assert!(output.contains("Straight flush bonus: none"));
    }

    #[test]
    fn test_eval_rejects_bad_input() {
        assert!(matches!(eval("As Kd", false), Err(CliError::Engine(_))));
        assert!(matches!(eval("As Kd Zz Qh Jc", false), Err(CliError::Engine(_))));
        assert!(matches!(
            eval("As As Kd Qh Jc", false),
            Err(CliError::InvalidInput(_))
        ));
    }
}
