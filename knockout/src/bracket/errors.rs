//! Bracket error types.

use super::models::MatchId;
use thiserror::Error;

/// Rejected bracket operations. None of these mutate the bracket.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BracketError {
    #[error("Match not found: {0}")]
    UnknownMatch(MatchId),

    #[error("Match {id} already decided: {winner} advanced")]
    AlreadyDecided { id: MatchId, winner: String },

    #[error("Match {0} is still waiting for an opponent")]
    AwaitingOpponent(MatchId),

    #[error("{name} is not playing in match {id}")]
    NotAParticipant { id: MatchId, name: String },

    /// "BYE" marks empty slots and can't be entered as a name.
    #[error("Participant {position} uses the reserved name \"BYE\"")]
    ReservedName { position: usize },
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
