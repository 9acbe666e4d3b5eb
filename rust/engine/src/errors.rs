use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Insufficient cards: requested {requested}, remaining {remaining}")]
    InsufficientCards { requested: usize, remaining: usize },
    #[error("Invalid hand size: expected {expected}, got {actual}")]
    InvalidHandSize { expected: &'static str, actual: usize },
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),
    #[error("Cannot compare a poker ranking with a flush ranking")]
    MixedRankings,
}

/// Failure of a fairness source. Never reaches game code: the shuffler
/// absorbs it and falls back to the in-process shuffle.
#[derive(Debug, Error)]
pub enum ShuffleSourceError {
    #[error("fairness source {0} is unavailable")]
    Unavailable(String),
    #[error("fairness source timed out after {0:?}")]
    Timeout(Duration),
    #[error("fairness source process failed: {0}")]
    Process(String),
    #[error("fairness source returned malformed output: {0}")]
    Malformed(String),
    #[error("fairness source returned an invalid deck: {0}")]
    Integrity(#[from] EngineError),
}
