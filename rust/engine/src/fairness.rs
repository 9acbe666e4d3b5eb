//! Fairness sources: where a shoe's permutation and cut position come from.
//!
//! A [`FairnessSource`] produces a [`ShuffleProof`]. The [`Shuffler`] is the
//! single call site: it runs the configured source under a deadline, checks
//! what came back, and on any failure falls back to the in-process
//! [`SystemShuffle`]. Game code never sees a source error.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cards::{full_shoe, is_complete_shoe, shoe_len, Card, WireCard};
use crate::errors::{EngineError, ShuffleSourceError};

/// Upper bound on how long a source may take before the fallback is used.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable telling an external source how many decks to shuffle.
pub const DECK_COUNT_ENV: &str = "FAIRDEAL_DECK_COUNT";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Largest answer read from an external source. An eight-deck shoe is
/// well under this.
pub const MAX_SOURCE_OUTPUT: usize = 1 << 20;

/// A shuffled shoe and the index dealing starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleProof {
    pub deck: Vec<Card>,
    pub cut_position: usize,
}

/// JSON form of a [`ShuffleProof`], as external sources print it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireProof {
    pub deck: Vec<WireCard>,
    pub cut_position: usize,
}

impl ShuffleProof {
    /// Checks the deck is a permutation of `decks` full decks and the cut
    /// falls inside it.
    pub fn verify(&self, decks: usize) -> Result<(), EngineError> {
        if !is_complete_shoe(&self.deck, decks) {
            let Some(expected) = shoe_len(decks) else {
                return Err(EngineError::InvalidDeck(format!("{} decks is not a shoe", decks)));
            };
            return Err(EngineError::InvalidDeck(format!(
                "expected a permutation of {} cards ({} deck(s)), got {} cards",
                expected,
                decks,
                self.deck.len()
            )));
        }
        if self.cut_position >= self.deck.len() {
            return Err(EngineError::InvalidDeck(format!(
                "cut position {} outside 0..{}",
                self.cut_position,
                self.deck.len()
            )));
        }
        Ok(())
    }

    pub fn from_json(s: &str) -> Result<Self, ShuffleSourceError> {
        let wire: WireProof =
            serde_json::from_str(s.trim()).map_err(|e| ShuffleSourceError::Malformed(e.to_string()))?;
        Self::try_from(&wire).map_err(ShuffleSourceError::from)
    }

    pub fn to_wire(&self) -> WireProof {
        WireProof {
            deck: self.deck.iter().copied().map(WireCard::from).collect(),
            cut_position: self.cut_position,
        }
    }
}

impl TryFrom<&WireProof> for ShuffleProof {
    type Error = EngineError;

    fn try_from(w: &WireProof) -> Result<Self, Self::Error> {
        let deck = w.deck.iter().map(Card::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            deck,
            cut_position: w.cut_position,
        })
    }
}

/// Something that can produce a shuffled shoe.
///
/// Implementations may block; the [`Shuffler`] enforces the deadline.
pub trait FairnessSource: Send + Sync {
    fn name(&self) -> &str;

    fn generate(&self, decks: usize) -> Result<ShuffleProof, ShuffleSourceError>;

    /// Called by a [`Shuffler`] that stops waiting after `deadline`. Sources
    /// holding outside resources (a child process) release them by then.
    fn generate_within(&self, decks: usize, deadline: Duration) -> Result<ShuffleProof, ShuffleSourceError> {
        let _ = deadline;
        self.generate(decks)
    }
}

/// Fisher-Yates over the canonical shoe, then a uniform cut.
fn shuffle_with<R: Rng + ?Sized>(rng: &mut R, decks: usize) -> ShuffleProof {
    let mut deck = full_shoe(decks.max(1));
    deck.shuffle(rng);
    let cut_position = rng.random_range(0..deck.len());
    ShuffleProof { deck, cut_position }
}

/// In-process shuffle with a ChaCha20 generator seeded by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShuffle;

impl SystemShuffle {
    pub fn shuffle(&self, decks: usize) -> ShuffleProof {
        let mut rng = ChaCha20Rng::from_os_rng();
        shuffle_with(&mut rng, decks)
    }
}

impl FairnessSource for SystemShuffle {
    fn name(&self) -> &str {
        "system"
    }

    fn generate(&self, decks: usize) -> Result<ShuffleProof, ShuffleSourceError> {
        Ok(self.shuffle(decks))
    }
}

/// Deterministic ChaCha20 shuffles for replays and fixtures.
///
/// Each call uses `seed + n` where `n` counts previous shuffles, so a table
/// reshuffling from the same source still sees a fresh order every time.
#[derive(Debug)]
pub struct SeededShuffle {
    seed: u64,
    shuffles: AtomicU64,
}

impl SeededShuffle {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            shuffles: AtomicU64::new(0),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl FairnessSource for SeededShuffle {
    fn name(&self) -> &str {
        "seeded"
    }

    fn generate(&self, decks: usize) -> Result<ShuffleProof, ShuffleSourceError> {
        let n = self.shuffles.fetch_add(1, Ordering::Relaxed);
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed.wrapping_add(n));
        Ok(shuffle_with(&mut rng, decks))
    }
}

/// Runs an external program that prints a [`WireProof`] as JSON on stdout.
///
/// The program gets the configured arguments and the deck count in
/// [`DECK_COUNT_ENV`]. It is killed when it outlives its own timeout or the
/// shuffler's, whichever is shorter, and at most [`MAX_SOURCE_OUTPUT`] bytes
/// of its answer are read.
#[derive(Debug, Clone)]
pub struct CommandShuffle {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandShuffle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, decks: usize, timeout: Duration) -> Result<String, ShuffleSourceError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(DECK_COUNT_ENV, decks.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ShuffleSourceError::Unavailable(format!("{}: {}", self.program, e)))?;

        // Drain stdout on its own thread so a chatty child cannot block on a full pipe.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShuffleSourceError::Process("stdout not captured".into()))?;
        let reader = thread::spawn(move || {
            let mut buf = String::new();
            (&mut stdout)
                .take(MAX_SOURCE_OUTPUT as u64 + 1)
                .read_to_string(&mut buf)
                .map(|_| buf)
        });

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ShuffleSourceError::Timeout(timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(ShuffleSourceError::Process(e.to_string())),
            }
        };

        let output = reader
            .join()
            .map_err(|_| ShuffleSourceError::Process("stdout reader panicked".into()))?
            .map_err(|e| ShuffleSourceError::Malformed(e.to_string()))?;
        if output.len() > MAX_SOURCE_OUTPUT {
            return Err(ShuffleSourceError::Malformed(format!(
                "output exceeds {} bytes",
                MAX_SOURCE_OUTPUT
            )));
        }
        if !status.success() {
            return Err(ShuffleSourceError::Process(format!("{} exited with {}", self.program, status)));
        }
        Ok(output)
    }

    fn answer(&self, decks: usize, timeout: Duration) -> Result<ShuffleProof, ShuffleSourceError> {
        let output = self.run(decks, timeout)?;
        let proof = ShuffleProof::from_json(&output)?;
        proof.verify(decks)?;
        Ok(proof)
    }
}

impl FairnessSource for CommandShuffle {
    fn name(&self) -> &str {
        &self.program
    }

    fn generate(&self, decks: usize) -> Result<ShuffleProof, ShuffleSourceError> {
        self.answer(decks, self.timeout)
    }

    fn generate_within(&self, decks: usize, deadline: Duration) -> Result<ShuffleProof, ShuffleSourceError> {
        self.answer(decks, self.timeout.min(deadline))
    }
}

/// Which source produced a shoe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShuffleOrigin {
    /// The configured source answered in time with a valid shoe.
    Source { name: String },
    /// The configured source failed; the in-process shuffle was used.
    Fallback { source: String, reason: String },
}

impl ShuffleOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ShuffleOrigin::Fallback { .. })
    }
}

impl std::fmt::Display for ShuffleOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShuffleOrigin::Source { name } => write!(f, "{}", name),
            ShuffleOrigin::Fallback { source, reason } => {
                write!(f, "system (fallback from {}: {})", source, reason)
            }
        }
    }
}

/// Produces shoes from a configured source with a bounded wait and an
/// always-available in-process fallback.
#[derive(Clone)]
pub struct Shuffler {
    source: Option<Arc<dyn FairnessSource>>,
    decks: usize,
    timeout: Duration,
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new(1)
    }
}

impl std::fmt::Debug for Shuffler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shuffler")
            .field("source", &self.source.as_ref().map(|s| s.name().to_string()))
            .field("decks", &self.decks)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Shuffler {
    /// A shuffler for `decks` decks (at least one) using the system shuffle.
    pub fn new(decks: usize) -> Self {
        Self {
            source: None,
            decks: decks.max(1),
            timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn FairnessSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn decks(&self) -> usize {
        self.decks
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Produces a verified shoe. Never fails: source problems are logged and
    /// answered with the in-process shuffle.
    pub fn shuffle(&self) -> (ShuffleProof, ShuffleOrigin) {
        let Some(source) = &self.source else {
            debug!(decks = self.decks, "shuffling in process");
            return (
                SystemShuffle.shuffle(self.decks),
                ShuffleOrigin::Source {
                    name: SystemShuffle.name().to_string(),
                },
            );
        };

        let name = source.name().to_string();
        match self.run_source(source) {
            Ok(proof) => {
                debug!(source = %name, cut = proof.cut_position, "fairness source answered");
                (proof, ShuffleOrigin::Source { name })
            }
            Err(e) => {
                warn!(source = %name, error = %e, "fairness source failed, using in-process shuffle");
                (
                    SystemShuffle.shuffle(self.decks),
                    ShuffleOrigin::Fallback {
                        source: name,
                        reason: e.to_string(),
                    },
                )
            }
        }
    }

    fn run_source(&self, source: &Arc<dyn FairnessSource>) -> Result<ShuffleProof, ShuffleSourceError> {
        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(source);
        let decks = self.decks;
        let timeout = self.timeout;
        thread::Builder::new()
            .name("fairness-source".into())
            .spawn(move || {
                // The receiver is gone when the deadline already passed.
                let _ = tx.send(worker.generate_within(decks, timeout));
            })
            .map_err(|e| ShuffleSourceError::Unavailable(e.to_string()))?;

        let proof = match rx.recv_timeout(self.timeout) {
            Ok(result) => result?,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                return Err(ShuffleSourceError::Timeout(self.timeout));
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(ShuffleSourceError::Unavailable(format!(
                    "{} stopped without answering",
                    source.name()
                )));
            }
        };
        proof.verify(self.decks)?;
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::DECK_SIZE;

    #[test]
    fn seeded_source_advances_between_shuffles() {
        let src = SeededShuffle::new(7);
        let a = src.generate(1).unwrap();
        let b = src.generate(1).unwrap();
        assert_ne!(a.deck, b.deck);

        let again = SeededShuffle::new(7).generate(1).unwrap();
        assert_eq!(a, again);
    }

    #[test]
    fn proof_rejects_out_of_range_cut() {
        let mut proof = SystemShuffle.shuffle(1);
        proof.cut_position = DECK_SIZE;
        assert!(proof.verify(1).is_err());
    }

    #[test]
    fn proof_json_requires_both_keys() {
        let err = ShuffleProof::from_json(r#"{"deck": []}"#).unwrap_err();
        assert!(matches!(err, ShuffleSourceError::Malformed(_)));

        let proof = SystemShuffle.shuffle(1);
        let json = serde_json::to_string(&proof.to_wire()).unwrap();
        assert_eq!(ShuffleProof::from_json(&json).unwrap(), proof);
    }

    #[cfg(unix)]
    mod command {
        use super::*;

        fn sh(script: &str) -> CommandShuffle {
            CommandShuffle::new("sh").args(["-c", script])
        }

        #[test]
        fn reads_proof_from_stdout() {
            let proof = SeededShuffle::new(3).generate(1).unwrap();
            let json = serde_json::to_string(&proof.to_wire()).unwrap();
            let src = sh(&format!("printf '%s' '{}'", json));
            assert_eq!(src.generate(1).unwrap(), proof);
        }

        #[test]
        fn non_zero_exit_is_a_process_error() {
            let err = sh("exit 3").generate(1).unwrap_err();
            assert!(matches!(err, ShuffleSourceError::Process(_)));
        }

        #[test]
        fn garbage_is_malformed() {
            let err = sh("echo not-json").generate(1).unwrap_err();
            assert!(matches!(err, ShuffleSourceError::Malformed(_)));
        }

        #[test]
        fn slow_child_is_killed() {
            let err = sh("sleep 5")
                .timeout(Duration::from_millis(100))
                .generate(1)
                .unwrap_err();
            assert!(matches!(err, ShuffleSourceError::Timeout(_)));
        }

        #[test]
        fn missing_program_is_unavailable() {
            let err = CommandShuffle::new("/nonexistent/fairdeal-shuffle")
                .generate(1)
                .unwrap_err();
            assert!(matches!(err, ShuffleSourceError::Unavailable(_)));
        }
    }
}
