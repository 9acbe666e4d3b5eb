//! Verify command handler: re-checks a shoe audit log.
//!
//! Every line must be a shoe record whose deck is a full permutation of its
//! deck count, whose cut falls inside the shoe, whose dealt count fits, and
//! whose timestamp (when present) is RFC 3339. Failures are listed per line
//! on stderr; any failure makes the command fail.

use std::io::Write;

use chrono::DateTime;
use fairdeal_engine::logger::ShoeRecord;

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text_auto;
use crate::ui;

pub fn handle_verify_command(input: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let content = read_text_auto(input)?;

    let mut total = 0usize;
    let mut failures: Vec<BatchValidationError<usize>> = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        match check_line(line) {
            Ok(record) => writeln!(
                out,
                "OK {} ({}, {} deck(s), cut {}, {} dealt)",
                record.shoe_id, record.origin, record.deck_count, record.cut_position, record.dealt
            )?,
            Err(message) => failures.push(BatchValidationError {
                item_context: idx + 1,
                message,
            }),
        }
    }

    if total == 0 {
        return Err(CliError::InvalidInput(format!("{}: no shoe records", input)));
    }
    for failure in &failures {
        ui::write_error(err, &format!("line {}", failure))?;
    }
    writeln!(out, "Verified: {}/{} shoes", total - failures.len(), total)?;
    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::Verification(format!(
            "{} of {} shoes failed",
            failures.len(),
            total
        )))
    }
}

fn check_line(line: &str) -> Result<ShoeRecord, String> {
    let record: ShoeRecord = serde_json::from_str(line).map_err(|e| format!("not a shoe record: {}", e))?;
    record.verify().map_err(|e| format!("{}: {}", record.shoe_id, e))?;
    if let Some(ts) = &record.ts {
        DateTime::parse_from_rfc3339(ts).map_err(|e| format!("{}: bad timestamp {:?}: {}", record.shoe_id, ts, e))?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairdeal_engine::deck::ShuffledDeck;

    fn record_line(seed: u64) -> String {
        let mut deck = ShuffledDeck::new_with_seed(seed);
        deck.deal(10).unwrap();
        let mut record = ShoeRecord::from_deck(format!("20260101-{:06}", seed), &deck);
        record.ts = Some("2026-01-01T00:00:00Z".into());
        serde_json::to_string(&record).unwrap()
    }

    #[test]
    fn test_check_line_accepts_valid_record() {
        let record = check_line(&record_line(1)).unwrap();
        assert_eq!(record.dealt, 10);
    }

    #[test]
    fn test_check_line_rejects_bad_timestamp() {
        let line = record_line(2).replace("2026-01-01T00:00:00Z", "yesterday");
        let msg = check_line(&line).unwrap_err();
        assert!(msg.contains("bad timestamp"), "{}", msg);
    }

    #[test]
    fn test_check_line_rejects_garbage() {
        assert!(check_line("{\"shoe_id\": 1}").is_err());
    }
}
