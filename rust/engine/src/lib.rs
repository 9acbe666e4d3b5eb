//! # fairdeal-engine: Shuffling and Hand Evaluation Core
//!
//! The shared core of a set of heads-up casino card games (Caribbean Stud,
//! Ultimate Texas Hold'em, High Card Flush). It produces shuffled shoes with
//! a recorded cut position that a player can audit after the round, and ranks
//! poker hands the same way for every game.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), parsing and wire form
//! - [`deck`] - Shuffled shoes, the cut, and dealing order
//! - [`fairness`] - Fairness sources and the timeout-then-fallback shuffler
//! - [`hand`] - Five-card ranking and best five of up to seven cards
//! - [`flush`] - Flush-length ranking and pay tables for the flush game
//! - [`display`] - Cosmetic card order for showing a ranked hand
//! - [`rules`] - Game kinds, dealer qualification and showdowns
//! - [`engine`] - Heads-up table that deals and settles rounds
//! - [`logger`] - Shoe audit records (JSONL)
//! - [`errors`] - Error types for engine operations
//!
//! ## Quick Start
//!
//! ```rust
//! use fairdeal_engine::cards::parse_cards;
//! use fairdeal_engine::hand::{evaluate_best5_of7, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh 10h 2c 3d").unwrap();
//! let ranking = evaluate_best5_of7(&cards).unwrap();
//! assert_eq!(ranking.category, Category::RoyalFlush);
//! ```
//!
//! ## Auditable Shuffles
//!
//! Dealing never changes the permutation, so the whole shoe can be shown
//! once the round is over:
//!
//! ```rust
//! use fairdeal_engine::deck::ShuffledDeck;
//!
//! let mut deck = ShuffledDeck::new_with_seed(42);
//! let hole = deck.deal(2).unwrap();
//!
//! let order = deck.dealing_order_for_display();
//! assert_eq!(&order.cards[..2], &hole[..]);
//! assert!(deck.proof().verify(1).is_ok());
//! ```
//!
//! ## Pluggable Fairness Sources
//!
//! A [`fairness::Shuffler`] asks its source for a shoe under a deadline and
//! falls back to the in-process ChaCha20 shuffle on any failure:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fairdeal_engine::deck::ShuffledDeck;
//! use fairdeal_engine::fairness::{CommandShuffle, Shuffler};
//!
//! let source = CommandShuffle::new("/nonexistent/shuffle-service");
//! let shuffler = Shuffler::new(1)
//!     .with_source(Arc::new(source))
//!     .with_timeout(Duration::from_secs(1));
//!
//! let deck = ShuffledDeck::from_shuffler(&shuffler);
//! assert!(deck.origin().is_fallback());
//! assert_eq!(deck.len(), 52);
//! ```

pub mod cards;
pub mod deck;
pub mod display;
pub mod engine;
pub mod errors;
pub mod fairness;
pub mod flush;
pub mod hand;
pub mod logger;
pub mod rules;
