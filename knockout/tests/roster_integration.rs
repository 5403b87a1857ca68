//! Integration tests for roster editing and persistence
//!
//! These tests verify the path from raw text through the file-backed
//! editor to a built bracket, including reloads between sessions.

use knockout::{
    Bracket, FileStore, MatchId, RosterConfig, RosterEditor, RosterStore, Shuffler,
    roster::{PLAYERS_KEY, TEAM_MODE_KEY},
};
use std::path::PathBuf;

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("knockout-roster-it-{}", std::process::id()))
        .join(name)
}

#[test]
fn test_roster_survives_reload() {
    let path = scratch_file("reload.json");
    let config = RosterConfig::default();

    {
        let store = FileStore::open(&path).unwrap();
        let mut editor = RosterEditor::load(store, &config).unwrap();
        editor.set_text("Ann\nBob\nCid\nDee\n").unwrap();
        editor.set_team_mode(true).unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(
        store.load(TEAM_MODE_KEY).unwrap().as_deref(),
        Some("true")
    );
    let editor = RosterEditor::load(store, &config).unwrap();
    assert_eq!(editor.text(), "Ann\nBob\nCid\nDee\n");
    assert!(editor.team_mode());

    let mut bracket = Bracket::new(&editor.participants()).unwrap();
    assert_eq!(bracket.total_rounds(), 1);
    bracket
        .declare_winner(&MatchId::new(1, 1), "Cid / Dee")
        .unwrap();
    assert_eq!(bracket.champion(), Some("Cid / Dee"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_team_mode_with_odd_roster() {
    let path = scratch_file("odd.json");
    let config = RosterConfig::default();
    let store = FileStore::open(&path).unwrap();
    let mut editor = RosterEditor::load(store, &config)
        .unwrap()
        .with_shuffler(Shuffler::with_seed(5));

    editor.set_text("A\nB\nC\nD\nE").unwrap();
    editor.toggle_team_mode().unwrap();
    let teams = editor.participants();
    assert_eq!(teams, vec!["A / B", "C / D", "E"]);

    // The single-member team gets the bye
    let bracket = Bracket::new(&teams).unwrap();
    let bye = bracket.get(&MatchId::new(1, 2)).unwrap();
    assert!(bye.is_bye());
    assert_eq!(bye.winner.as_deref(), Some("E"));

    editor.shuffle().unwrap();
    let reshuffled = editor.participants();
    assert_eq!(reshuffled.len(), 3);
    assert_eq!(
        editor.store().load(PLAYERS_KEY).unwrap().as_deref(),
        Some(editor.text())
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_length_guard_uses_configured_limit() {
    let path = scratch_file("guard.json");
    let config = RosterConfig {
        max_name_len: 4,
        ..RosterConfig::default()
    };
    let store = FileStore::open(&path).unwrap();
    let mut editor = RosterEditor::load(store, &config).unwrap();

    editor.set_text("Alexander / Bo\nChristina").unwrap();
    assert_eq!(editor.text(), "Alex... / Bo\nChri...");
    assert_eq!(editor.participants(), vec!["Alex... / Bo", "Chri..."]);

    let _ = std::fs::remove_file(&path);
}
