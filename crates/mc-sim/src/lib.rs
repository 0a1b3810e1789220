//! # mc-sim — Weighted dice Monte Carlo engine
//!
//! Rolls groups of weighted dice, keeps the most recent play as a table and
//! derives descriptive statistics from it.
//!
//! ## Features
//!
//! - **Weighted Dice**: Any number of text or numeric faces, per-face weights
//! - **Reproducible Plays**: Seedable RNG per game
//! - **Shared Dice**: Adjust weights between plays through [`SharedDie`] handles
//! - **Statistics**: Jackpots, per-roll face counts, combinations, permutations
//!
//! ## Architecture
//!
//! ```text
//! WeightedDie ──(SharedDie)──▶ PlayRecorder ──(PlayHistory)──▶ OutcomeAnalyzer
//!                                  │                                │
//!                                  v                                v
//!                        PlayTable / NarrowRecord      FaceCountTable / OutcomeCounts
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mc_sim::{OutcomeAnalyzer, PlayRecorder, WeightedDie};
//!
//! let loaded = WeightedDie::standard(6).unwrap().into_shared();
//! loaded.set_weight(6, 5.0).unwrap();
//! let dice = vec![WeightedDie::standard(6).unwrap().into_shared(), loaded];
//!
//! let mut game = PlayRecorder::new(dice).unwrap().with_seed(42);
//! game.play(100).unwrap();
//!
//! let analyzer = OutcomeAnalyzer::new(&game).unwrap();
//! assert_eq!(analyzer.combo_count().total(), 100);
//! ```

pub mod analyzer;
pub mod config;
pub mod die;
pub mod game;
pub mod stats;

pub use analyzer::*;
pub use config::*;
pub use die::*;
pub use game::*;
pub use stats::*;

pub use mc_core::{ErrorKind, FaceLabel, FaceSet, McError, McResult};
