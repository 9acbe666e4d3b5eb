//! Command handler modules for the fairdeal CLI.
//!
//! Each command is implemented in its own module file with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Module-private helpers: Helper functions specific to that command
//! - Dependency injection: Output streams (`&mut dyn Write`) passed as parameters
//! - Error propagation: All errors propagated via `CliError` enum

use std::sync::Arc;
use std::time::Duration;

use fairdeal_engine::fairness::{CommandShuffle, FairnessSource, SeededShuffle, Shuffler};

use crate::cli::SourceArgs;
use crate::config::Config;

pub mod cfg;
pub mod compare;
pub mod deal;
pub mod eval;
pub mod rng;
pub mod shuffle;
pub mod verify;

pub use cfg::handle_cfg_command;
pub use compare::handle_compare_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use rng::handle_rng_command;
pub use shuffle::handle_shuffle_command;
pub use verify::handle_verify_command;

/// Builds the shuffler for a command.
///
/// Flags win over configuration. A seed selects the deterministic source;
/// otherwise an external command is used when one is configured; otherwise
/// the shoe is shuffled in process.
pub(crate) fn build_shuffler(args: &SourceArgs, cfg: &Config) -> Shuffler {
    let decks = args.decks.map(usize::from).unwrap_or(cfg.decks);
    let timeout = Duration::from_secs(args.timeout_secs.unwrap_or(cfg.shuffle_timeout_secs));
    let shuffler = Shuffler::new(decks).with_timeout(timeout);

    let command = match &args.source_cmd {
        Some(program) => Some((program.clone(), args.source_args.clone())),
        None => cfg.shuffle_command(),
    };

    let source: Option<Arc<dyn FairnessSource>> = match (args.seed.or(cfg.seed), command) {
        (Some(seed), _) => Some(Arc::new(SeededShuffle::new(seed))),
        (None, Some((program, argv))) => {
            Some(Arc::new(CommandShuffle::new(program).args(argv).timeout(timeout)))
        }
        (None, None) => None,
    };

    match source {
        Some(source) => shuffler.with_source(source),
        None => shuffler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cfg = Config {
            decks: 6,
            shuffle_timeout_secs: 9,
            ..Config::default()
        };
        let args = SourceArgs {
            decks: Some(2),
            ..SourceArgs::default()
        };
        let shuffler = build_shuffler(&args, &cfg);
        assert_eq!(shuffler.decks(), 2);
        assert_eq!(shuffler.timeout(), Duration::from_secs(9));
    }

    #[test]
    fn seed_from_config_makes_shoes_repeatable() {
        let cfg = Config {
            seed: Some(31),
            ..Config::default()
        };
        let a = build_shuffler(&SourceArgs::default(), &cfg).shuffle().0;
        let b = build_shuffler(&SourceArgs::default(), &cfg).shuffle().0;
        assert_eq!(a, b);
    }
}
