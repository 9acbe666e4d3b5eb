//! Compare command handler: which of two hands is stronger.

use std::io::Write;

use fairdeal_engine::flush::{compare_flush, evaluate_flush_length7};
use fairdeal_engine::hand::{compare, evaluate_best5_of7};

use super::eval::parse_card_args;
use crate::error::CliError;

/// Prints `1` when `a` is stronger, `-1` when `b` is, `0` on a tie.
pub fn handle_compare_command(a: &str, b: &str, flush: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let a = parse_card_args(&[a.to_string()])?;
    let b = parse_card_args(&[b.to_string()])?;

    let result = if flush {
        let ra = evaluate_flush_length7(&a)?;
        let rb = evaluate_flush_length7(&b)?;
        compare_flush(&ra, &rb) as i8
    } else {
        compare(&evaluate_best5_of7(&a)?, &evaluate_best5_of7(&b)?)
    };
    writeln!(out, "{}", result)?;
    Ok(())
}
