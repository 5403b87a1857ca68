//! Key bindings for the bracket TUI.
//!
//! Keys are translated into [`Command`]s before the app touches any state,
//! so the mapping can be tested without a terminal.

use knockout::Side;
use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use std::fmt;

/// Which panel receives plain key presses.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Focus {
    #[default]
    Roster,
    Bracket,
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Focus::Roster => write!(f, "roster"),
            Focus::Bracket => write!(f, "bracket"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Editing keystrokes for the roster text area.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditKey {
    Char(char),
    Newline,
    Backspace,
    Delete,
    Move(Direction),
    Home,
    End,
}

/// Everything the user can ask the app to do.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Quit,
    SwitchFocus,
    ToggleHelp,
    /// Throw away results and rebuild from the current roster
    Rebuild,
    ToggleTeamMode,
    Shuffle,
    ToggleFullscreen,
    Select(Direction),
    /// Declare the highlighted slot the winner
    DeclareSelected,
    Declare(Side),
    Edit(EditKey),
}

/// Map a key press to a command for the focused panel.
///
/// Control chords work everywhere; plain keys depend on focus.
pub fn map_key(focus: Focus, code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('b') => Some(Command::Rebuild),
            KeyCode::Char('t') => Some(Command::ToggleTeamMode),
            KeyCode::Char('s') => Some(Command::Shuffle),
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Tab => return Some(Command::SwitchFocus),
        KeyCode::F(1) => return Some(Command::ToggleHelp),
        _ => {}
    }

    match focus {
        Focus::Roster => map_roster_key(code).map(Command::Edit),
        Focus::Bracket => map_bracket_key(code),
    }
}

fn map_roster_key(code: KeyCode) -> Option<EditKey> {
    let key = match code {
        KeyCode::Char(c) => EditKey::Char(c),
        KeyCode::Enter => EditKey::Newline,
        KeyCode::Backspace => EditKey::Backspace,
        KeyCode::Delete => EditKey::Delete,
        KeyCode::Up => EditKey::Move(Direction::Up),
        KeyCode::Down => EditKey::Move(Direction::Down),
        KeyCode::Left => EditKey::Move(Direction::Left),
        KeyCode::Right => EditKey::Move(Direction::Right),
        KeyCode::Home => EditKey::Home,
        KeyCode::End => EditKey::End,
        _ => return None,
    };
    Some(key)
}

fn map_bracket_key(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Up | KeyCode::Char('k') => Command::Select(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Command::Select(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Command::Select(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Command::Select(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Command::DeclareSelected,
        KeyCode::Char('1') => Command::Declare(Side::One),
        KeyCode::Char('2') => Command::Declare(Side::Two),
        KeyCode::Char('f') => Command::ToggleFullscreen,
        KeyCode::Char('?') => Command::ToggleHelp,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_chords_work_in_both_panels() {
        for focus in [Focus::Roster, Focus::Bracket] {
            assert_eq!(
                map_key(focus, KeyCode::Char('t'), KeyModifiers::CONTROL),
                Some(Command::ToggleTeamMode)
            );
            assert_eq!(
                map_key(focus, KeyCode::Char('s'), KeyModifiers::CONTROL),
                Some(Command::Shuffle)
            );
            assert_eq!(
                map_key(focus, KeyCode::Char('b'), KeyModifiers::CONTROL),
                Some(Command::Rebuild)
            );
            assert_eq!(
                map_key(focus, KeyCode::Esc, KeyModifiers::NONE),
                Some(Command::Quit)
            );
        }
    }

    #[test]
    fn test_roster_keys_edit_text() {
        assert_eq!(
            map_key(Focus::Roster, KeyCode::Char('f'), KeyModifiers::NONE),
            Some(Command::Edit(EditKey::Char('f')))
        );
        assert_eq!(
            map_key(Focus::Roster, KeyCode::Char('F'), KeyModifiers::SHIFT),
            Some(Command::Edit(EditKey::Char('F')))
        );
        assert_eq!(
            map_key(Focus::Roster, KeyCode::Enter, KeyModifiers::NONE),
            Some(Command::Edit(EditKey::Newline))
        );
        assert_eq!(
            map_key(Focus::Roster, KeyCode::Up, KeyModifiers::NONE),
            Some(Command::Edit(EditKey::Move(Direction::Up)))
        );
    }

    #[test]
    fn test_bracket_keys() {
        assert_eq!(
            map_key(Focus::Bracket, KeyCode::Char('f'), KeyModifiers::NONE),
            Some(Command::ToggleFullscreen)
        );
        assert_eq!(
            map_key(Focus::Bracket, KeyCode::Char('2'), KeyModifiers::NONE),
            Some(Command::Declare(Side::Two))
        );
        assert_eq!(
            map_key(Focus::Bracket, KeyCode::Enter, KeyModifiers::NONE),
            Some(Command::DeclareSelected)
        );
        assert_eq!(
            map_key(Focus::Bracket, KeyCode::Char('x'), KeyModifiers::NONE),
            None
        );
    }

    #[test]
    fn test_tab_switches_focus() {
        assert_eq!(
            map_key(Focus::Roster, KeyCode::Tab, KeyModifiers::NONE),
            Some(Command::SwitchFocus)
        );
    }
}
