//! Random number generator inspection command.
//!
//! Prints a ChaCha20 sample for a seed and the shoe the same seed produces,
//! so a seeded shuffle can be reproduced outside this tool.

use crate::error::CliError;
use crate::formatters::format_cards;
use fairdeal_engine::deck::ShuffledDeck;
use rand::{RngCore, SeedableRng};
use std::io::Write;

/// Cards of the seeded shoe shown after the sample.
const PREVIEW: usize = 5;

/// Handle the rng command.
///
/// Uses the given seed, or draws a random one and prints it so the run can
/// be repeated.
pub fn handle_rng_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let s = seed.unwrap_or_else(rand::random);
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(s);
    let mut vals = vec![];
    for _ in 0..5 {
        vals.push(rng.next_u64());
    }
    writeln!(out, "Seed: {}", s)?;
    writeln!(out, "RNG sample: {:?}", vals)?;

    let deck = ShuffledDeck::new_with_seed(s);
    let order = deck.dealing_order();
    writeln!(out, "Cut position: {}", order.cut_position)?;
    writeln!(out, "First cards: {}", format_cards(&order.cards[..PREVIEW]))?;
    Ok(())
}
