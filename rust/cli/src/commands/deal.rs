//! Deal command handler: heads-up rounds of one table game.
//!
//! Each round prints both seats, the board, the rankings and the showdown.
//! After the last round the whole shoe is printed in dealing order so the
//! player can check every card that came out of it.

use std::io::Write;

use fairdeal_engine::engine::{ReshufflePolicy, RoundResult, Seat, Table};
use fairdeal_engine::flush::PayTable;
use fairdeal_engine::logger::ShoeLogger;
use fairdeal_engine::rules::{GameKind, SeatStrength};

use super::build_shuffler;
use crate::cli::{GameArg, SourceArgs};
use crate::config;
use crate::error::CliError;
use crate::formatters::{format_cards, format_ranking, format_shoe};
use crate::ui;

pub struct DealOptions<'a> {
    pub game: GameArg,
    pub rounds: u32,
    pub reshuffle_at: Option<usize>,
    pub source: &'a SourceArgs,
    pub output: Option<&'a str>,
}

pub fn handle_deal_command(
    opts: &DealOptions<'_>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let game = GameKind::from(opts.game);
    let policy = match opts.reshuffle_at.or(cfg.reshuffle_at) {
        Some(n) => ReshufflePolicy::Below(n),
        None => ReshufflePolicy::EveryRound,
    };
    let mut table = Table::new(game, build_shuffler(opts.source, &cfg)).with_policy(policy);
    let mut logger = opts.output.map(ShoeLogger::create).transpose()?;

    for _ in 0..opts.rounds {
        if table.needs_reshuffle()
            && let (Some(logger), Some(shoe)) = (logger.as_mut(), table.shoe())
        {
            logger.log_shoe(shoe)?;
        }
        let shoes_before = table.shoes_used();
        let round = table.play_round()?;
        if table.shoes_used() != shoes_before {
            ui::warn_if_fallback(err, &round.origin)?;
        }
        write_round(out, &round)?;
    }

    if let Some(shoe) = table.shoe() {
        writeln!(
            out,
            "Shoe ({} decks, cut {}, {} dealt, source {}):",
            shoe.deck_count(),
            shoe.cut_position(),
            shoe.dealt(),
            shoe.origin()
        )?;
        for row in format_shoe(&shoe.dealing_order_for_display().cards) {
            writeln!(out, "{}", row)?;
        }
        if let Some(logger) = logger.as_mut() {
            let record = logger.log_shoe(shoe)?;
            writeln!(out, "Recorded {} shoe(s), last {}", table.shoes_used(), record.shoe_id)?;
        }
    }
    Ok(())
}

fn write_round(out: &mut dyn Write, round: &RoundResult) -> Result<(), CliError> {
    writeln!(out, "Round {} ({})", round.round, round.game)?;
    write_seat(out, "Player", &round.player)?;
    write_seat(out, "Dealer", &round.dealer)?;
    if !round.board.is_empty() {
        writeln!(out, "  Board:  {}", format_cards(&round.board))?;
    }
    writeln!(
        out,
        "  Result: {} (dealer {})",
        round.showdown.outcome,
        if round.showdown.dealer_qualifies {
            "qualifies"
        } else {
            "does not qualify"
        }
    )?;
    if let SeatStrength::Flush(r) = &round.player.strength {
        let flush = PayTable::flush_bonus().odds(r.flush_len());
        let straight = PayTable::straight_flush_bonus().odds(r.straight_flush_len);
        if let Some(odds) = flush {
            writeln!(out, "  Flush bonus: {}-card flush pays {}:1", r.flush_len(), odds)?;
        }
        if let Some(odds) = straight {
            writeln!(
                out,
                "  Straight flush bonus: {}-card run pays {}:1",
                r.straight_flush_len, odds
            )?;
        }
    }
    Ok(())
}

fn write_seat(out: &mut dyn Write, label: &str, seat: &Seat) -> Result<(), CliError> {
    let rank = match &seat.strength {
        SeatStrength::Poker(r) => format_ranking(r),
        SeatStrength::Flush(r) => format!(
            "{}-card flush, {} high",
            r.flush_len(),
            r.cards.first().map(|c| c.rank.label()).unwrap_or("-")
        ),
    };
    writeln!(
        out,
        "  {}: {} -> {} [{}]",
        label,
        format_cards(&seat.hole),
        rank,
        format_cards(&seat.shown)
    )?;
    Ok(())
}
