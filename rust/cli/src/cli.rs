//! Command-line definitions for `fairdeal`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fairdeal_engine::rules::GameKind;

#[derive(Parser, Debug)]
#[command(
    name = "fairdeal",
    version,
    about = "Auditable card shuffling and poker hand evaluation"
)]
pub struct FairdealCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Where a shoe comes from. Unset values fall back to the configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Deterministic shuffle from this seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of decks in the shoe (1-8)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub decks: Option<u8>,
    /// External program printing a shuffle as JSON
    #[arg(long = "source-cmd")]
    pub source_cmd: Option<String>,
    /// Argument passed to the external program (repeatable)
    #[arg(long = "source-arg", requires = "source_cmd", allow_hyphen_values = true)]
    pub source_args: Vec<String>,
    /// Seconds to wait for the external program before shuffling in process
    #[arg(long = "timeout-secs", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shuffle a shoe and print its dealing order
    Shuffle {
        #[command(flatten)]
        source: SourceArgs,
        /// Append the shoe to this JSONL audit log
        #[arg(long)]
        output: Option<String>,
    },
    /// Play heads-up rounds of a table game
    Deal {
        #[arg(long, value_enum, default_value_t = GameArg::Holdem)]
        game: GameArg,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        rounds: u32,
        /// Keep the shoe until fewer than N cards remain
        #[arg(long = "reshuffle-at")]
        reshuffle_at: Option<usize>,
        #[command(flatten)]
        source: SourceArgs,
        /// Append each retired shoe to this JSONL audit log
        #[arg(long)]
        output: Option<String>,
    },
    /// Rank 5 to 7 cards, e.g. `eval As Kd 10h Jc Qs`
    Eval {
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
        /// Rank seven cards by flush length instead
        #[arg(long)]
        flush: bool,
    },
    /// Compare two hands; prints 1, 0 or -1
    Compare {
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
        /// Compare seven-card hands by flush length
        #[arg(long)]
        flush: bool,
    },
    /// Re-check every shoe in an audit log (.jsonl or .jsonl.zst)
    Verify {
        #[arg(long)]
        input: String,
    },
    /// Print a ChaCha20 sample and the shuffle it seeds
    Rng {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameArg {
    /// Caribbean Stud
    Stud,
    /// Ultimate Texas Hold'em
    Holdem,
    /// High Card Flush
    Flush,
}

impl From<GameArg> for GameKind {
    fn from(g: GameArg) -> Self {
        match g {
            GameArg::Stud => GameKind::CaribbeanStud,
            GameArg::Holdem => GameKind::UltimateHoldem,
            GameArg::Flush => GameKind::HighCardFlush,
        }
    }
}
