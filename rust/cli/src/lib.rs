//! # fairdeal CLI Library
//!
//! Command-line surface for the fairdeal engine: shuffle auditable shoes,
//! play heads-up rounds of the table games, rank and compare hands, and
//! re-check shoe audit logs.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ## Available Subcommands
//!
//! - `shuffle`: Shuffle a shoe and print its cut position and dealing order
//! - `deal`: Play heads-up rounds of Caribbean Stud, Ultimate Texas Hold'em or High Card Flush
//! - `eval`: Rank 5 to 7 cards (or 7 cards by flush length)
//! - `compare`: Compare two hands, printing `1`, `0` or `-1`
//! - `verify`: Re-check every shoe in a JSONL audit log
//! - `rng`: Print a ChaCha20 sample and the shoe its seed produces
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;
#[macro_use]
mod macros;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod ui;

use cli::{Commands, FairdealCli};
use commands::deal::DealOptions;
use commands::{
    handle_cfg_command, handle_compare_command, handle_deal_command, handle_eval_command,
    handle_rng_command, handle_shuffle_command, handle_verify_command,
};

pub use error::{BatchValidationError, CliError};

/// Main entry point for the CLI application.
///
/// Parses `args` (program name first) and dispatches to the subcommand
/// handler. Normal output goes to `out`, diagnostics to `err`.
///
/// Returns the exit code: `0` for success, `2` for errors.
///
/// # Example
///
/// ```
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = fairdeal_cli::run(["fairdeal", "compare", "--a", "As Ad 7c 5s 2h", "--b", "Kh Qd 9c 6s 3h"], &mut out, &mut err);
/// assert_eq!(code, 0);
/// assert_eq!(String::from_utf8(out).unwrap().trim(), "1");
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["shuffle", "deal", "eval", "compare", "verify", "rng", "cfg"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match FairdealCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Usage: fairdeal <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: fairdeal --help");
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Shuffle { source, output } => {
            handle_shuffle_command(&source, output.as_deref(), out, err)
        }
        Commands::Deal {
            game,
            rounds,
            reshuffle_at,
            source,
            output,
        } => {
            let opts = DealOptions {
                game,
                rounds,
                reshuffle_at,
                source: &source,
                output: output.as_deref(),
            };
            handle_deal_command(&opts, out, err)
        }
        Commands::Eval { cards, flush } => handle_eval_command(&cards, flush, out),
        Commands::Compare { a, b, flush } => handle_compare_command(&a, &b, flush, out),
        Commands::Verify { input } => handle_verify_command(&input, out, err),
        Commands::Rng { seed } => handle_rng_command(seed, out),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        // cfg reports its own error
        Err(CliError::Config(_)) if matches!(argv.get(1).map(String::as_str), Some("cfg")) => {
            exit_code::ERROR
        }
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
