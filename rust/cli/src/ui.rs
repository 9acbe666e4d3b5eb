//! Messages written to stderr.

use std::io::Write;

use fairdeal_engine::fairness::ShuffleOrigin;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Warns that a shoe came from the in-process fallback instead of the
/// configured source. Silent for shoes the configured source produced.
pub fn warn_if_fallback(err: &mut dyn Write, origin: &ShuffleOrigin) -> std::io::Result<()> {
    if let ShuffleOrigin::Fallback { source, reason } = origin {
        writeln!(err, "WARNING: {} failed ({}); shoe shuffled in process", source, reason)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warns_only_for_fallback_shoes() {
        let mut err = Vec::new();
        warn_if_fallback(&mut err, &ShuffleOrigin::Source { name: "system".into() }).unwrap();
        assert!(err.is_empty());

        let fallback = ShuffleOrigin::Fallback {
            source: "shuffler".into(),
            reason: "timed out after 1s".into(),
        };
        warn_if_fallback(&mut err, &fallback).unwrap();
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "WARNING: shuffler failed (timed out after 1s); shoe shuffled in process\n"
        );
    }
}
