//! Roster normalization: free text in, ordered participant names out.
//!
//! This module provides:
//! - Line-based parsing of the raw roster text
//! - Pairing of individuals into `"A / B"` teams and the reverse split
//! - Uniform shuffling of participants and random re-pairing of teams
//! - A per-name length guard applied before text is stored or shown
//!
//! ## Example
//!
//! ```
//! use knockout::roster::{group_into_teams, parse_roster};
//!
//! let individuals = parse_roster("  Ann\n\nBob \nCid\n");
//! assert_eq!(individuals, vec!["Ann", "Bob", "Cid"]);
//! assert_eq!(group_into_teams(&individuals), vec!["Ann / Bob", "Cid"]);
//! ```

pub mod editor;

pub use editor::{PLAYERS_KEY, RosterEditor, TEAM_MODE_KEY};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Joins the two members of a team entry.
pub const TEAM_SEPARATOR: &str = " / ";

/// Appended to names cut by the length guard.
pub const ELLIPSIS: &str = "...";

/// Default maximum characters per name.
pub const DEFAULT_MAX_NAME_LEN: usize = 30;

/// Split raw text into participant names.
///
/// Lines are trimmed, empty lines dropped, order kept. Parsing the joined
/// output again yields the same list.
pub fn parse_roster(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Pair consecutive individuals into teams.
///
/// With an odd count the last individual stays on their own.
pub fn group_into_teams(individuals: &[String]) -> Vec<String> {
    individuals
        .chunks(2)
        .map(|pair| pair.join(TEAM_SEPARATOR))
        .collect()
}

/// Split team entries back into individuals, keeping order.
pub fn ungroup_teams(teams: &[String]) -> Vec<String> {
    teams
        .iter()
        .flat_map(|entry| entry.split(TEAM_SEPARATOR))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Uniformly permute `items`. Team entries also get their two members
/// permuted.
pub fn shuffle_sequence<R: Rng + ?Sized>(items: &[String], rng: &mut R) -> Vec<String> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);

    for entry in &mut shuffled {
        if entry.contains(TEAM_SEPARATOR) {
            let mut members: Vec<String> = entry.split(TEAM_SEPARATOR).map(String::from).collect();
            members.shuffle(rng);
            *entry = members.join(TEAM_SEPARATOR);
        }
    }

    shuffled
}

/// Tear teams down and rebuild them from a fresh random order.
pub fn reshuffle_teams<R: Rng + ?Sized>(individuals: &[String], rng: &mut R) -> Vec<String> {
    let mut shuffled = individuals.to_vec();
    shuffled.shuffle(rng);
    group_into_teams(&shuffled)
}

/// Shorten a single roster line to at most `max_len` characters per name.
///
/// Team entries have each member shortened on its own. Cut names end in
/// [`ELLIPSIS`]. Applying the guard twice changes nothing.
pub fn truncate_entry(line: &str, max_len: usize) -> String {
    if line.contains(TEAM_SEPARATOR) {
        line.split(TEAM_SEPARATOR)
            .map(|member| shorten(member, max_len))
            .collect::<Vec<_>>()
            .join(TEAM_SEPARATOR)
    } else {
        shorten(line, max_len)
    }
}

/// Apply [`truncate_entry`] to every line of raw roster text.
pub fn guard_text(raw: &str, max_len: usize) -> String {
    raw.split('\n')
        .map(|line| truncate_entry(line, max_len))
        .collect::<Vec<_>>()
        .join("\n")
}

fn shorten(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        return name.to_string();
    }
    let kept: String = name.chars().take(max_len).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Random source for roster shuffles.
pub struct Shuffler {
    rng: StdRng,
}

impl Shuffler {
    /// Create a shuffler seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a shuffler that always produces the same sequence
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn shuffle_sequence(&mut self, items: &[String]) -> Vec<String> {
        shuffle_sequence(items, &mut self.rng)
    }

    pub fn reshuffle_teams(&mut self, individuals: &[String]) -> Vec<String> {
        reshuffle_teams(individuals, &mut self.rng)
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new()
    }
}
