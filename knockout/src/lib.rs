//! # Knockout
//!
//! A single-elimination tournament bracket library.
//!
//! The library turns free-text rosters into participant lists, builds a
//! bracket from them, and advances winners round by round until a champion
//! is left. Odd participant counts are handled with byes in every round.
//!
//! ## Core Modules
//!
//! - [`roster`]: Roster parsing, team pairing, shuffling and the stateful editor
//! - [`bracket`]: Match model, bracket construction and winner declaration
//! - [`layout`]: Connector geometry and deferred relayout for renderers
//! - [`store`]: Storage adapters for the roster text and team-mode flag
//! - [`config`]: Environment-driven configuration
//!
//! ## Example
//!
//! ```
//! use knockout::{Bracket, MatchId, parse_roster};
//!
//! let players = parse_roster("Ann\nBob\nCid\nDee\nEve");
//! let mut bracket = Bracket::new(&players).unwrap();
//!
//! // Eve has a bye in the first round
//! assert_eq!(bracket.total_rounds(), 3);
//! bracket.declare_winner(&MatchId::new(1, 1), "Ann").unwrap();
//! ```

/// Bracket engine: matches, rounds, advancement.
pub mod bracket;
pub use bracket::{
    BYE, Bracket, BracketError, BracketEvent, BracketResult, Match, MatchId, MatchState, Side,
    Slot, SlotState, build_initial_round,
};

/// Roster normalizer.
pub mod roster;
pub use roster::{
    RosterEditor, Shuffler, TEAM_SEPARATOR, group_into_teams, parse_roster, reshuffle_teams,
    shuffle_sequence, truncate_entry, ungroup_teams,
};

pub mod config;
pub use config::{ConfigError, RosterConfig};

pub mod layout;
pub use layout::{Connector, RelayoutTimer, SlotLocator, connectors};

pub mod store;
pub use store::{FileStore, MemoryStore, RosterStore, StoreError};
