//! Bracket construction and round advancement.
//!
//! Advancement is pairwise-immediate: as soon as a match is decided its
//! winner is written into the parent match of the next round, creating the
//! parent if the sibling feeder has not finished yet. A feeder with no
//! sibling (last match of a round with an odd match count) produces a bye in
//! the next round, which advances in turn.

use super::errors::{BracketError, BracketResult};
use super::models::{
    BYE, BracketEvent, Match, MatchId, Side, Slot, round_label, round_size, total_rounds,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Build the first round from an ordered participant list.
///
/// Consecutive participants are paired. A trailing unpaired participant gets
/// a decided bye match.
pub fn build_initial_round(participants: &[String]) -> Vec<Match> {
    participants
        .chunks(2)
        .zip(1u32..)
        .map(|(pair, position)| match pair {
            [one, two] => Match::new(1, position, one.clone(), two.clone()),
            [one] => Match::bye(1, position, one.clone()),
            _ => unreachable!("chunks(2) yields one or two items"),
        })
        .collect()
}

/// One round of a bracket snapshot, for rendering.
#[derive(Clone, Debug)]
pub struct RoundView<'a> {
    pub number: u32,
    pub label: String,
    /// Number of matches the round will hold once fully derived
    pub expected_matches: usize,
    /// Matches created so far, ordered by position
    pub matches: Vec<&'a Match>,
}

/// A single-elimination bracket.
///
/// The match collection is shared with readers as an immutable snapshot and
/// replaced wholesale on every change.
#[derive(Clone, Debug)]
pub struct Bracket {
    participants: usize,
    total_rounds: u32,
    matches: Arc<[Match]>,
    events: Vec<BracketEvent>,
}

impl Default for Bracket {
    fn default() -> Self {
        Self {
            participants: 0,
            total_rounds: 0,
            matches: Arc::from(Vec::new()),
            events: Vec::new(),
        }
    }
}

impl Bracket {
    /// Build a fresh bracket. Byes in the first round advance immediately.
    pub fn new(participants: &[String]) -> BracketResult<Self> {
        if let Some(index) = participants.iter().position(|name| name == BYE) {
            warn!("Rejecting roster: entry {} is the reserved bye label", index + 1);
            return Err(BracketError::ReservedName {
                position: index + 1,
            });
        }

        let mut bracket = Self {
            participants: participants.len(),
            total_rounds: total_rounds(participants.len()),
            ..Self::default()
        };

        let mut matches = build_initial_round(participants);
        let mut events: Vec<BracketEvent> = matches
            .iter()
            .map(|m| BracketEvent::MatchCreated(m.id.clone()))
            .collect();

        let byes: Vec<MatchId> = matches
            .iter()
            .filter(|m| m.is_bye())
            .map(|m| m.id.clone())
            .collect();
        for id in byes {
            if let Some(m) = matches.iter().find(|m| m.id == id) {
                events.push(BracketEvent::MatchDecided {
                    id: id.clone(),
                    winner: m.winner.clone().unwrap_or_default(),
                    bye: true,
                });
            }
            bracket.advance(&mut matches, &id, &mut events);
        }

        info!(
            "Built bracket: {} participant(s), {} round(s), {} first-round match(es)",
            bracket.participants,
            bracket.total_rounds,
            round_size(bracket.participants, 1)
        );

        bracket.matches = matches.into();
        bracket.events = events;
        Ok(bracket)
    }

    /// Current snapshot of every match, ordered by round then position.
    pub fn matches(&self) -> Arc<[Match]> {
        Arc::clone(&self.matches)
    }

    pub fn get(&self, id: &MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| &m.id == id)
    }

    pub fn participant_count(&self) -> usize {
        self.participants
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches the given round will hold once derived.
    pub fn round_size(&self, round: u32) -> usize {
        if round > self.total_rounds {
            0
        } else {
            round_size(self.participants, round)
        }
    }

    pub fn round_label(&self, round: u32) -> String {
        round_label(round, self.total_rounds)
    }

    /// Group the current matches by round.
    pub fn rounds(&self) -> Vec<RoundView<'_>> {
        (1..=self.total_rounds)
            .map(|number| RoundView {
                number,
                label: self.round_label(number),
                expected_matches: self.round_size(number),
                matches: self.matches.iter().filter(|m| m.round == number).collect(),
            })
            .collect()
    }

    /// Winner of the final, once it is decided.
    pub fn champion(&self) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.round == self.total_rounds && m.position == 1)
            .and_then(|m| m.winner.as_deref())
    }

    /// Roster position (1-based) of the participant in a first-round slot.
    ///
    /// Later rounds and bye slots have no seed.
    pub fn seed(&self, id: &MatchId, side: Side) -> Option<usize> {
        let m = self.get(id)?;
        if m.round != 1 || m.slot(side).is_bye() {
            return None;
        }
        let offset = match side {
            Side::One => 1,
            Side::Two => 2,
        };
        Some((m.position as usize - 1) * 2 + offset)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// Events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<BracketEvent> {
        std::mem::take(&mut self.events)
    }

    /// Declare the winner of a pending match and advance them.
    ///
    /// # Errors
    ///
    /// Fails without touching the bracket if the match does not exist, is
    /// already decided, still has an open slot, or `winner` is not one of
    /// its two participants.
    pub fn declare_winner(&mut self, id: &MatchId, winner: &str) -> BracketResult<Arc<[Match]>> {
        let current = self
            .get(id)
            .ok_or_else(|| BracketError::UnknownMatch(id.clone()))?;

        if let Some(decided) = &current.winner {
            return Err(BracketError::AlreadyDecided {
                id: id.clone(),
                winner: decided.clone(),
            });
        }

        if current.player1.is_open() || current.player2.is_open() {
            return Err(BracketError::AwaitingOpponent(id.clone()));
        }

        if !current.has_participant(winner) {
            return Err(BracketError::NotAParticipant {
                id: id.clone(),
                name: winner.to_string(),
            });
        }

        let mut matches = self.matches.to_vec();
        let mut events = Vec::new();

        if let Some(m) = matches.iter_mut().find(|m| &m.id == id) {
            m.winner = Some(winner.to_string());
        }
        debug!("{winner} won {id}");
        events.push(BracketEvent::MatchDecided {
            id: id.clone(),
            winner: winner.to_string(),
            bye: false,
        });

        self.advance(&mut matches, id, &mut events);

        self.matches = matches.into();
        self.events.extend(events);
        Ok(self.matches())
    }

    /// Carry the winner of `from` into the next round, following byes.
    fn advance(&self, matches: &mut Vec<Match>, from: &MatchId, events: &mut Vec<BracketEvent>) {
        let mut from = from.clone();

        loop {
            let Some(source) = matches.iter().find(|m| m.id == from) else {
                return;
            };
            let Some(winner) = source.winner.clone() else {
                return;
            };

            if source.round >= self.total_rounds {
                info!("{winner} is the champion");
                events.push(BracketEvent::Champion(winner));
                return;
            }

            let round = source.round + 1;
            let position = source.parent_position();
            let side = Side::for_position(source.position);
            let has_sibling =
                source.sibling_position() as usize <= self.round_size(source.round);

            if !has_sibling {
                // Lone feeder: nobody can ever fill the other slot
                let bye = Match::bye(round, position, winner.clone());
                let id = bye.id.clone();
                insert_ordered(matches, bye);
                events.push(BracketEvent::MatchCreated(id.clone()));
                events.push(BracketEvent::MatchDecided {
                    id: id.clone(),
                    winner,
                    bye: true,
                });
                from = id;
                continue;
            }

            let target_id = MatchId::new(round, position);
            if !matches.iter().any(|m| m.id == target_id) {
                insert_ordered(matches, Match::open(round, position));
                events.push(BracketEvent::MatchCreated(target_id.clone()));
            }

            if let Some(target) = matches.iter_mut().find(|m| m.id == target_id) {
                let slot = target.slot_mut(side);
                if slot.is_open() {
                    *slot = Slot::Player(winner.clone());
                    events.push(BracketEvent::SlotFilled {
                        id: target_id,
                        side,
                        name: winner,
                    });
                } else {
                    warn!("Slot {side:?} of {target_id} already filled, keeping {slot}");
                }
            }
            return;
        }
    }
}

fn insert_ordered(matches: &mut Vec<Match>, m: Match) {
    let at = matches.partition_point(|other| (other.round, other.position) < (m.round, m.position));
    matches.insert(at, m);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::models::{MatchState, SlotState};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_initial_round_pairs_and_byes() {
        let matches = build_initial_round(&names(&["A", "B", "C"]));
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].id.as_str(), "round-1-match-1");
        assert_eq!(matches[0].player1, Slot::Player("A".to_string()));
        assert_eq!(matches[0].player2, Slot::Player("B".to_string()));
        assert_eq!(matches[0].state(), MatchState::Pending);

        assert_eq!(matches[1].id.as_str(), "round-1-match-2");
        assert_eq!(matches[1].player1, Slot::Player("C".to_string()));
        assert_eq!(matches[1].player2, Slot::Bye);
        assert_eq!(matches[1].winner.as_deref(), Some("C"));
        assert_eq!(matches[1].position, 2);
    }

    #[test]
    fn test_build_initial_round_empty() {
        assert!(build_initial_round(&[]).is_empty());
        let bracket = Bracket::new(&[]).unwrap();
        assert!(bracket.is_empty());
        assert_eq!(bracket.total_rounds(), 0);
        assert!(bracket.rounds().is_empty());
        assert_eq!(bracket.champion(), None);
    }

    #[test]
    fn test_three_players_final() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C"])).unwrap();
        assert_eq!(bracket.total_rounds(), 2);

        // C's bye already fills the lower slot of the final
        let final_id = MatchId::new(2, 1);
        let final_match = bracket.get(&final_id).unwrap();
        assert_eq!(final_match.player1, Slot::Open);
        assert_eq!(final_match.player2, Slot::Player("C".to_string()));

        bracket.declare_winner(&MatchId::new(1, 1), "A").unwrap();
        let final_match = bracket.get(&final_id).unwrap();
        assert_eq!(final_match.player1, Slot::Player("A".to_string()));
        assert_eq!(final_match.player2, Slot::Player("C".to_string()));
        assert_eq!(bracket.round_label(2), "Final");
        assert_eq!(bracket.champion(), None);

        bracket.declare_winner(&final_id, "C").unwrap();
        assert_eq!(bracket.champion(), Some("C"));
        assert!(bracket.is_complete());
    }

    #[test]
    fn test_single_participant_is_champion() {
        let bracket = Bracket::new(&names(&["Solo"])).unwrap();
        assert_eq!(bracket.total_rounds(), 1);
        assert_eq!(bracket.matches().len(), 1);
        assert_eq!(bracket.champion(), Some("Solo"));
    }

    #[test]
    fn test_declare_unknown_match() {
        let mut bracket = Bracket::new(&names(&["A", "B"])).unwrap();
        let err = bracket
            .declare_winner(&MatchId::from("round-9-match-9"), "A")
            .unwrap_err();
        assert_eq!(err, BracketError::UnknownMatch(MatchId::new(9, 9)));
    }

    #[test]
    fn test_declare_twice_is_rejected() {
        let mut bracket = Bracket::new(&names(&["A", "B"])).unwrap();
        let id = MatchId::new(1, 1);
        bracket.declare_winner(&id, "A").unwrap();
        let before = bracket.matches();

        let err = bracket.declare_winner(&id, "B").unwrap_err();
        assert!(matches!(err, BracketError::AlreadyDecided { .. }));
        assert_eq!(bracket.matches(), before);
        assert_eq!(bracket.champion(), Some("A"));
    }

    #[test]
    fn test_declare_outsider_is_rejected() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C", "D"])).unwrap();
        let before = bracket.matches();
        let err = bracket.declare_winner(&MatchId::new(1, 1), "C").unwrap_err();
        assert_eq!(
            err,
            BracketError::NotAParticipant {
                id: MatchId::new(1, 1),
                name: "C".to_string()
            }
        );
        assert_eq!(bracket.matches(), before);
    }

    #[test]
    fn test_declare_on_bye_is_rejected() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C"])).unwrap();
        let err = bracket.declare_winner(&MatchId::new(1, 2), "C").unwrap_err();
        assert!(matches!(err, BracketError::AlreadyDecided { .. }));
    }

    #[test]
    fn test_declare_with_open_slot_is_rejected() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C", "D"])).unwrap();
        bracket.declare_winner(&MatchId::new(1, 1), "A").unwrap();
        let err = bracket.declare_winner(&MatchId::new(2, 1), "A").unwrap_err();
        assert_eq!(err, BracketError::AwaitingOpponent(MatchId::new(2, 1)));
    }

    #[test]
    fn test_reserved_name_rejected() {
        let err = Bracket::new(&names(&["A", "BYE", "C"])).unwrap_err();
        assert_eq!(err, BracketError::ReservedName { position: 2 });
    }

    #[test]
    fn test_progressive_fill_before_sibling() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C", "D"])).unwrap();
        assert!(bracket.get(&MatchId::new(2, 1)).is_none());

        bracket.declare_winner(&MatchId::new(1, 2), "D").unwrap();
        let parent = bracket.get(&MatchId::new(2, 1)).unwrap();
        assert_eq!(parent.player1, Slot::Open);
        assert_eq!(parent.player2, Slot::Player("D".to_string()));
        assert_eq!(parent.slot_state(Side::One), SlotState::Open);
    }

    #[test]
    fn test_snapshot_is_copy_on_write() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C", "D"])).unwrap();
        let before = bracket.matches();
        bracket.declare_winner(&MatchId::new(1, 1), "B").unwrap();
        let after = bracket.matches();

        assert!(before.iter().all(|m| m.winner.is_none()));
        assert_eq!(after[0].winner.as_deref(), Some("B"));
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_events_report_champion() {
        let mut bracket = Bracket::new(&names(&["A", "B"])).unwrap();
        let created = bracket.drain_events();
        assert_eq!(created, vec![BracketEvent::MatchCreated(MatchId::new(1, 1))]);

        bracket.declare_winner(&MatchId::new(1, 1), "B").unwrap();
        let events = bracket.drain_events();
        assert_eq!(events.last(), Some(&BracketEvent::Champion("B".to_string())));
        assert!(bracket.drain_events().is_empty());
    }

    #[test]
    fn test_six_players_bye_in_second_round() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C", "D", "E", "F"])).unwrap();
        assert_eq!(bracket.total_rounds(), 3);

        bracket.declare_winner(&MatchId::new(1, 3), "E").unwrap();
        let bye = bracket.get(&MatchId::new(2, 2)).unwrap();
        assert!(bye.is_bye());
        assert_eq!(bye.winner.as_deref(), Some("E"));

        let final_match = bracket.get(&MatchId::new(3, 1)).unwrap();
        assert_eq!(final_match.player2, Slot::Player("E".to_string()));
    }

    #[test]
    fn test_rounds_view() {
        let bracket = Bracket::new(&names(&["A", "B", "C", "D", "E"])).unwrap();
        let rounds = bracket.rounds();
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0].label, "Quarter-Finals");
        assert_eq!(rounds[0].expected_matches, 3);
        assert_eq!(rounds[0].matches.len(), 3);
        assert_eq!(rounds[1].label, "Semi-Finals");
        assert_eq!(rounds[1].expected_matches, 2);
        assert_eq!(rounds[2].label, "Final");
        assert_eq!(rounds[2].expected_matches, 1);
    }

    #[test]
    fn test_rounds_view_labels_early_rounds_by_number() {
        let players: Vec<String> = (1..=9).map(|i| format!("P{i}")).collect();
        let bracket = Bracket::new(&players).unwrap();
        let labels: Vec<String> = bracket.rounds().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Round 1", "Quarter-Finals", "Semi-Finals", "Final"]);
    }

    #[test]
    fn test_seed_follows_roster_order() {
        let mut bracket = Bracket::new(&names(&["A", "B", "C", "D", "E"])).unwrap();
        assert_eq!(bracket.seed(&MatchId::new(1, 1), Side::One), Some(1));
        assert_eq!(bracket.seed(&MatchId::new(1, 1), Side::Two), Some(2));
        assert_eq!(bracket.seed(&MatchId::new(1, 3), Side::One), Some(5));
        assert_eq!(bracket.seed(&MatchId::new(1, 3), Side::Two), None);
        assert_eq!(bracket.seed(&MatchId::new(1, 4), Side::One), None);

        bracket.declare_winner(&MatchId::new(1, 1), "A").unwrap();
        bracket.declare_winner(&MatchId::new(1, 2), "C").unwrap();
        assert_eq!(bracket.seed(&MatchId::new(2, 1), Side::One), None);
    }
}
