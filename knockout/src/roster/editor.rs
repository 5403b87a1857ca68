//! Stateful roster editing backed by a [`RosterStore`].

use super::{Shuffler, group_into_teams, guard_text, parse_roster, ungroup_teams};
use crate::{
    config::RosterConfig,
    store::{RosterStore, StoreResult},
};
use log::{debug, info, warn};

/// Store key for the raw roster text.
pub const PLAYERS_KEY: &str = "tournament-players";

/// Store key for the team-mode flag (`"true"` / `"false"`).
pub const TEAM_MODE_KEY: &str = "tournament-team-mode";

/// Owns the raw roster text and team-mode flag.
///
/// Every edit is length-guarded, written through to the store, and bumps
/// [`revision`](Self::revision) so callers know to rebuild the bracket.
pub struct RosterEditor<S: RosterStore> {
    store: S,
    text: String,
    team_mode: bool,
    max_name_len: usize,
    revision: u64,
    shuffler: Shuffler,
}

impl<S: RosterStore> RosterEditor<S> {
    /// Restore the roster from `store`.
    pub fn load(store: S, config: &RosterConfig) -> StoreResult<Self> {
        let text = store.load(PLAYERS_KEY)?.unwrap_or_default();
        let team_mode = store
            .load(TEAM_MODE_KEY)?
            .is_some_and(|flag| flag.trim() == "true");

        info!(
            "Loaded roster: {} line(s), team mode {}",
            parse_roster(&text).len(),
            if team_mode { "on" } else { "off" }
        );

        Ok(Self {
            store,
            text: guard_text(&text, config.max_name_len),
            team_mode,
            max_name_len: config.max_name_len,
            revision: 0,
            shuffler: Shuffler::new(),
        })
    }

    /// Replace the random source, e.g. for reproducible shuffles
    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = shuffler;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn team_mode(&self) -> bool {
        self.team_mode
    }

    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    /// Increases on every change to the text or team mode.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the raw text.
    pub fn set_text(&mut self, raw: &str) -> StoreResult<()> {
        let guarded = guard_text(raw, self.max_name_len);
        if guarded == self.text {
            return Ok(());
        }
        self.commit(guarded, self.team_mode)
    }

    pub fn set_team_mode(&mut self, team_mode: bool) -> StoreResult<()> {
        if team_mode == self.team_mode {
            return Ok(());
        }
        self.commit(self.text.clone(), team_mode)?;
        info!("Team mode {}", if team_mode { "on" } else { "off" });
        Ok(())
    }

    pub fn toggle_team_mode(&mut self) -> StoreResult<()> {
        self.set_team_mode(!self.team_mode)
    }

    /// Randomize the roster order and rewrite the text to match.
    ///
    /// In team mode the individuals are re-paired from scratch.
    pub fn shuffle(&mut self) -> StoreResult<()> {
        let entries = parse_roster(&self.text);
        let lines = if self.team_mode {
            let teams = self.shuffler.reshuffle_teams(&ungroup_teams(&entries));
            ungroup_teams(&teams)
        } else {
            self.shuffler.shuffle_sequence(&entries)
        };
        debug!("Shuffled {} roster entries", lines.len());
        self.commit(lines.join("\n"), self.team_mode)
    }

    /// Current participant list for the bracket.
    pub fn participants(&self) -> Vec<String> {
        let entries = parse_roster(&self.text);
        if self.team_mode {
            group_into_teams(&ungroup_teams(&entries))
        } else {
            entries
        }
    }

    /// Save both keys, then adopt the new values.
    ///
    /// On a failed save the editor keeps its previous state and the text key
    /// is put back if it was already overwritten.
    fn commit(&mut self, text: String, team_mode: bool) -> StoreResult<()> {
        self.store.save(PLAYERS_KEY, &text)?;
        if let Err(e) = self
            .store
            .save(TEAM_MODE_KEY, if team_mode { "true" } else { "false" })
        {
            if let Err(restore) = self.store.save(PLAYERS_KEY, &self.text) {
                warn!("Could not restore roster text after failed save: {restore}");
            }
            return Err(e);
        }

        self.text = text;
        self.team_mode = team_mode;
        self.revision += 1;
        Ok(())
    }
}
