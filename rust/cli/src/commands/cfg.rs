//! Configuration command handler.
//!
//! This module implements the `cfg` command, which displays the resolved
//! configuration with the source of every value (default, configuration
//! file, or environment).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "seed": {
//!     "value": null,
//!     "source": "default"
//!   },
//!   "decks": {
//!     "value": 1,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &e.to_string())?;
            return Err(CliError::Config(e.to_string()));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "decks": {
            "value": config.decks,
            "source": sources.decks,
        },
        "shuffle_cmd": {
            "value": config.shuffle_cmd,
            "source": sources.shuffle_cmd,
        },
        "shuffle_timeout_secs": {
            "value": config.shuffle_timeout_secs,
            "source": sources.shuffle_timeout_secs,
        },
        "reshuffle_at": {
            "value": config.reshuffle_at,
            "source": sources.reshuffle_at,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfg_reports_every_setting_with_source() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_cfg_command(&mut out, &mut err).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        for key in ["seed", "decks", "shuffle_cmd", "shuffle_timeout_secs", "reshuffle_at"] {
            assert!(json[key].get("value").is_some(), "missing {}", key);
            assert!(json[key]["source"].is_string(), "missing source for {}", key);
        }
        assert!(err.is_empty());
    }
}
