//! Shuffle command handler.
//!
//! Produces one shoe, prints where it came from, its cut position and the
//! full dealing order, and optionally appends it to a JSONL audit log that
//! `verify` can re-check later.

use std::io::Write;

use fairdeal_engine::deck::ShuffledDeck;
use fairdeal_engine::logger::ShoeLogger;

use super::build_shuffler;
use crate::cli::SourceArgs;
use crate::config;
use crate::error::CliError;
use crate::formatters::format_shoe;
use crate::ui;

pub fn handle_shuffle_command(
    source: &SourceArgs,
    output: Option<&str>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let shuffler = build_shuffler(source, &cfg);
    let deck = ShuffledDeck::from_shuffler(&shuffler);

    ui::warn_if_fallback(err, deck.origin())?;

    writeln!(out, "Source: {}", deck.origin())?;
    writeln!(out, "Decks: {} ({} cards)", deck.deck_count(), deck.len())?;
    writeln!(out, "Cut position: {}", deck.cut_position())?;
    writeln!(out, "Dealing order:")?;
    for row in format_shoe(&deck.dealing_order_for_display().cards) {
        writeln!(out, "{}", row)?;
    }

    if let Some(path) = output {
        let mut logger = ShoeLogger::create(path)?;
        let record = logger.log_shoe(&deck)?;
        writeln!(out, "Recorded shoe {} in {}", record.shoe_id, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SourceArgs {
        SourceArgs {
            seed: Some(seed),
            ..SourceArgs::default()
        }
    }

    #[test]
    fn test_shuffle_prints_cut_and_order() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_shuffle_command(&seeded(7), None, &mut out, &mut err).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Source: seeded"));
        assert!(output.contains("Cut position: "));
        // Header lines plus four rows of thirteen.
        assert_eq!(output.lines().count(), 4 + 4);
        assert!(err.is_empty());
    }

    #[test]
    fn test_shuffle_is_repeatable_with_seed() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        handle_shuffle_command(&seeded(99), None, &mut a, &mut Vec::new()).unwrap();
        handle_shuffle_command(&seeded(99), None, &mut b, &mut Vec::new()).unwrap();
        assert_eq!(a, b);
    }
}
