//! Bracket data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved label for the empty side of a bye match.
pub const BYE: &str = "BYE";

/// Match identifier derived from round and position: `round-{r}-match-{p}`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(round: u32, position: u32) -> Self {
        Self(format!("round-{round}-match-{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for MatchId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One side of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Slot {
    /// Waiting on the feeder match to be decided.
    Open,
    Player(String),
    Bye,
}

impl Slot {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Player(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Self::Bye)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "TBD"),
            Self::Player(name) => write!(f, "{name}"),
            Self::Bye => write!(f, "{BYE}"),
        }
    }
}

/// Which slot of a match: `One` is `player1`, `Two` is `player2`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Slot a feeder match fills in its parent. Odd positions feed `player1`.
    pub fn for_position(position: u32) -> Self {
        if position % 2 == 1 { Self::One } else { Self::Two }
    }

    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Lifecycle of a single match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MatchState {
    Pending,
    Decided,
}

/// Highlight state of one slot, for renderers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotState {
    Open,
    Pending,
    Winner,
    Loser,
    Bye,
}

/// A single match in the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Round number (1-indexed)
    pub round: u32,
    /// Slot index within the round (1-indexed)
    pub position: u32,
    pub player1: Slot,
    pub player2: Slot,
    /// Set once, never cleared
    pub winner: Option<String>,
}

impl Match {
    /// Create a pending match between two participants.
    pub fn new(round: u32, position: u32, player1: String, player2: String) -> Self {
        Self {
            id: MatchId::new(round, position),
            round,
            position,
            player1: Slot::Player(player1),
            player2: Slot::Player(player2),
            winner: None,
        }
    }

    /// Create a match that is already decided in favour of its only participant.
    pub fn bye(round: u32, position: u32, player: String) -> Self {
        Self {
            id: MatchId::new(round, position),
            round,
            position,
            player1: Slot::Player(player.clone()),
            player2: Slot::Bye,
            winner: Some(player),
        }
    }

    /// Create a later-round match with both slots still open.
    pub fn open(round: u32, position: u32) -> Self {
        Self {
            id: MatchId::new(round, position),
            round,
            position,
            player1: Slot::Open,
            player2: Slot::Open,
            winner: None,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.winner.is_some() {
            MatchState::Decided
        } else {
            MatchState::Pending
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_bye(&self) -> bool {
        self.player2.is_bye()
    }

    /// Both slots hold participants and no winner is set yet.
    pub fn is_playable(&self) -> bool {
        self.winner.is_none() && self.player1.name().is_some() && self.player2.name().is_some()
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::One => &self.player1,
            Side::Two => &self.player2,
        }
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::One => &mut self.player1,
            Side::Two => &mut self.player2,
        }
    }

    pub fn has_participant(&self, name: &str) -> bool {
        self.player1.name() == Some(name) || self.player2.name() == Some(name)
    }

    /// The side that lost, once decided. Byes have no loser.
    pub fn loser(&self) -> Option<&str> {
        let winner = self.winner.as_deref()?;
        match (self.player1.name(), self.player2.name()) {
            (Some(one), Some(two)) if one == winner => Some(two),
            (Some(one), Some(_)) => Some(one),
            _ => None,
        }
    }

    pub fn slot_state(&self, side: Side) -> SlotState {
        let slot = self.slot(side);
        match (slot, &self.winner) {
            (Slot::Open, _) => SlotState::Open,
            (Slot::Bye, _) => SlotState::Bye,
            (Slot::Player(_), None) => SlotState::Pending,
            (Slot::Player(name), Some(winner)) => {
                // Winners are recorded by name, so when both sides share a
                // name the win is credited to player1
                let winning_side = if self.player1.name() == Some(winner) {
                    Side::One
                } else {
                    Side::Two
                };
                if name == winner && side == winning_side {
                    SlotState::Winner
                } else {
                    SlotState::Loser
                }
            }
        }
    }

    /// Position of the match this one feeds in the next round.
    pub fn parent_position(&self) -> u32 {
        self.position.div_ceil(2)
    }

    /// Position of the other match feeding the same parent.
    pub fn sibling_position(&self) -> u32 {
        if self.position % 2 == 1 {
            self.position + 1
        } else {
            self.position - 1
        }
    }
}

/// Things that happen while the bracket advances.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BracketEvent {
    MatchCreated(MatchId),
    SlotFilled { id: MatchId, side: Side, name: String },
    MatchDecided { id: MatchId, winner: String, bye: bool },
    Champion(String),
}

impl fmt::Display for BracketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::MatchCreated(id) => format!("{id} created"),
            Self::SlotFilled { id, name, .. } => format!("{name} advanced to {id}"),
            Self::MatchDecided {
                id,
                winner,
                bye: true,
            } => format!("{winner} receives a bye in {id}"),
            Self::MatchDecided { id, winner, .. } => format!("{winner} won {id}"),
            Self::Champion(name) => format!("{name} is the champion"),
        };
        write!(f, "{repr}")
    }
}

/// Number of rounds needed for `participants` entrants.
///
/// `ceil(log2(n))` for two or more entrants. A lone entrant still gets a
/// single walkover round so the bracket has a final to read the champion from.
pub fn total_rounds(participants: usize) -> u32 {
    match participants {
        0 => 0,
        1 => 1,
        n => usize::BITS - (n - 1).leading_zeros(),
    }
}

/// Number of matches in `round` for a bracket of `participants` entrants.
pub fn round_size(participants: usize, round: u32) -> usize {
    if round == 0 {
        return 0;
    }
    (0..round).fold(participants, |entrants, _| entrants.div_ceil(2))
}

/// Display label for a round, counted back from the final.
pub fn round_label(round: u32, total_rounds: u32) -> String {
    match total_rounds.checked_sub(round) {
        Some(0) => "Final".to_string(),
        Some(1) => "Semi-Finals".to_string(),
        Some(2) => "Quarter-Finals".to_string(),
        _ => format!("Round {round}"),
    }
}
