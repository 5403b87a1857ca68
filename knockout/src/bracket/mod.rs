//! Single-elimination bracket engine.
//!
//! This module provides:
//! - First-round construction with byes for odd participant counts
//! - Winner declaration with strict validation
//! - Pairwise-immediate advancement into later rounds
//! - Round labelling and champion lookup
//!
//! ## Example
//!
//! ```
//! use knockout::bracket::{Bracket, MatchId};
//!
//! let players: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
//! let mut bracket = Bracket::new(&players).unwrap();
//!
//! bracket.declare_winner(&MatchId::new(1, 1), "A").unwrap();
//! bracket.declare_winner(&MatchId::new(2, 1), "C").unwrap();
//! assert_eq!(bracket.champion(), Some("C"));
//! ```

pub mod engine;
pub mod errors;
pub mod models;

pub use engine::{Bracket, RoundView, build_initial_round};
pub use errors::{BracketError, BracketResult};
pub use models::{
    BYE, BracketEvent, Match, MatchId, MatchState, Side, Slot, SlotState, round_label, round_size,
    total_rounds,
};
