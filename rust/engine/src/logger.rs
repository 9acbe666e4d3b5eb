use std::fs::{create_dir_all, read_to_string, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::{shoe_len, WireCard};
use crate::deck::ShuffledDeck;
use crate::errors::EngineError;
use crate::fairness::{ShuffleOrigin, ShuffleProof, WireProof};

/// Audit record of one shoe, written once the shoe is retired.
/// Serialized one per line (JSONL) so a player can re-check any shoe later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoeRecord {
    /// Unique identifier for this shoe (format: YYYYMMDD-NNNNNN)
    pub shoe_id: String,
    /// Timestamp the record was written (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Source that produced the permutation
    pub origin: ShuffleOrigin,
    pub deck_count: usize,
    pub cut_position: usize,
    /// The full permutation before the cut
    pub deck: Vec<WireCard>,
    /// How many cards were dealt or burnt from it
    pub dealt: usize,
}

impl ShoeRecord {
    pub fn from_deck(shoe_id: impl Into<String>, deck: &ShuffledDeck) -> Self {
        let wire = deck.proof().to_wire();
        Self {
            shoe_id: shoe_id.into(),
            ts: None,
            origin: deck.origin().clone(),
            deck_count: deck.deck_count(),
            cut_position: wire.cut_position,
            deck: wire.deck,
            dealt: deck.dealt(),
        }
    }

    pub fn proof(&self) -> Result<ShuffleProof, EngineError> {
        ShuffleProof::try_from(&WireProof {
            deck: self.deck.clone(),
            cut_position: self.cut_position,
        })
    }

    /// Re-checks the recorded shoe: a full permutation of `deck_count`
    /// decks, a cut inside it, and no more cards dealt than it held.
    pub fn verify(&self) -> Result<ShuffleProof, EngineError> {
        let proof = self.proof()?;
        proof.verify(self.deck_count)?;
        // verify() above already rejected deck counts whose size overflows.
        let size = shoe_len(self.deck_count).unwrap_or(usize::MAX);
        if self.dealt > size {
            return Err(EngineError::InvalidDeck(format!(
                "{} cards dealt from a {}-card shoe",
                self.dealt, size
            )));
        }
        Ok(proof)
    }
}

pub fn format_shoe_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`ShoeRecord`]s to a JSONL file.
pub struct ShoeLogger {
    writer: Option<BufWriter<std::fs::File>>,
    date: String,
    seq: u32,
}

impl ShoeLogger {
    /// Opens `path` for appending, creating it and its parent directory if needed.
    /// Ids continue after the records already in the file.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let existing = match read_to_string(path) {
            Ok(s) => s.lines().filter(|l| !l.trim().is_empty()).count(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: u32::try_from(existing).unwrap_or(u32::MAX),
        })
    }

    /// A logger that hands out ids but writes nowhere.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_shoe_id(&self.date, self.seq)
    }

    /// Records `deck` under a fresh id and returns the record written.
    pub fn log_shoe(&mut self, deck: &ShuffledDeck) -> std::io::Result<ShoeRecord> {
        let record = ShoeRecord::from_deck(self.next_id(), deck);
        self.write(&record)?;
        Ok(record)
    }

    pub fn write(&mut self, record: &ShoeRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

/// Parses JSONL shoe records, skipping blank lines.
pub fn read_shoe_records(jsonl: &str) -> Result<Vec<ShoeRecord>, serde_json::Error> {
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_count_up_per_logger() {
        let mut logger = ShoeLogger::with_seq_for_test("20260101");
        assert_eq!(logger.next_id(), "20260101-000001");
        assert_eq!(logger.next_id(), "20260101-000002");
    }

    #[test]
    fn record_verifies_and_rejects_tampering() {
        let mut deck = ShuffledDeck::new_with_seed(11);
        deck.deal(12).unwrap();
        let record = ShoeRecord::from_deck("20260101-000001", &deck);
        assert_eq!(record.dealt, 12);
        assert_eq!(record.verify().unwrap(), deck.proof());

        let mut tampered = record.clone();
        tampered.deck[0] = tampered.deck[1].clone();
        assert!(tampered.verify().is_err());
    }

    #[test]
    fn absurd_deck_count_is_rejected_not_overflowed() {
        let deck = ShuffledDeck::new_with_seed(3);
        let mut record = ShoeRecord::from_deck("20260101-000001", &deck);
        record.deck_count = usize::MAX / 2;
        assert!(matches!(record.verify(), Err(EngineError::InvalidDeck(_))));
    }
}
