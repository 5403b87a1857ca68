//! Terminal UI: roster editor on the left, bracket on the right.
//!
//! The bracket is rebuilt from scratch whenever the roster text or team
//! mode changes. Winner declarations only touch the bracket. Connector
//! lines are recomputed a short delay after each change, outside the key
//! handler and after the next draw.

use anyhow::Result;
use chrono::{DateTime, Local};
use knockout::{
    Bracket, BracketEvent, Connector, MatchId, RelayoutTimer, RosterEditor, RosterStore, Side,
    StoreError, connectors,
};
use log::{debug, info, warn};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyEvent, KeyEventKind},
    layout::{Constraint, Flex, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation},
};
use std::time::{Duration, Instant};

mod widgets;

pub use widgets::{ScrollableList, TextArea};

use crate::{
    bracket_view::{self, BracketCanvas, BracketLayout, Selection},
    commands::{Command, Direction, EditKey, Focus, map_key},
};

const HELP: &str = "\
Tab
        Switch focus between the roster and the bracket.
Ctrl+B
        Rebuild the bracket from the roster, discarding all results.
Ctrl+T
        Toggle team mode. Consecutive lines are paired into \"A / B\" teams.
Ctrl+S
        Shuffle the roster. In team mode the teams are re-paired.
Arrows (bracket)
        Move the highlighted slot. Left and Right follow the tree.
Enter, 1, 2 (bracket)
        Declare the highlighted slot, player one or player two the winner.
f (bracket)
        Toggle the fullscreen bracket.
F1, ? (bracket)
        Show or hide this help.
Esc
        Quit.
";
const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Clone, Copy)]
enum RecordKind {
    Bracket,
    Error,
    Roster,
    Champion,
}

/// A timestamped line in the history panel.
struct Record {
    datetime: DateTime<Local>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Local::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Bracket => "GAME".light_yellow(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Roster => "ROSTER".light_blue(),
            RecordKind::Champion => "WIN".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:6}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

/// TUI App state
pub struct App<S: RosterStore> {
    editor: RosterEditor<S>,
    input: TextArea,
    bracket: Bracket,
    /// Editor revision the bracket was built from
    built_revision: u64,
    /// Why the current roster has no bracket, if it was rejected
    build_error: Option<String>,
    focus: Focus,
    fullscreen: bool,
    show_help_menu: bool,
    help_handle: ScrollableList,
    log_handle: ScrollableList,
    selection: Option<Selection>,
    layout: BracketLayout,
    connectors: Vec<Connector>,
    relayout: RelayoutTimer,
    scroll: (i32, i32),
    should_quit: bool,
}

impl<S: RosterStore> App<S> {
    pub fn new(editor: RosterEditor<S>, relayout_delay: Duration) -> Self {
        let mut help_handle = ScrollableList::new(MAX_LOG_RECORDS);
        for line in HELP.lines() {
            help_handle.push(ListItem::new(line));
        }
        help_handle.jump_to_first();

        let input = TextArea::new(editor.text());
        let mut app = Self {
            editor,
            input,
            bracket: Bracket::default(),
            built_revision: 0,
            build_error: None,
            focus: Focus::default(),
            fullscreen: false,
            show_help_menu: false,
            help_handle,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            selection: None,
            layout: BracketLayout::default(),
            connectors: Vec::new(),
            relayout: RelayoutTimer::new(relayout_delay),
            scroll: (0, 0),
            should_quit: false,
        };
        app.rebuild(Instant::now());
        app
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn editor(&self) -> &RosterEditor<S> {
        &self.editor
    }

    pub fn input(&self) -> &TextArea {
        &self.input
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    pub fn history_len(&self) -> usize {
        self.log_handle.len()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Translate and apply a key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(command) = map_key(self.focus, key.code, key.modifiers) {
            self.apply(command, now);
        }
    }

    /// Apply a command. Rejected declarations and failed roster saves are
    /// recorded in the history and otherwise ignored.
    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::Quit => self.should_quit = true,
            Command::SwitchFocus => {
                self.focus = match self.focus {
                    Focus::Roster => Focus::Bracket,
                    Focus::Bracket => Focus::Roster,
                };
                debug!("Focus on {}", self.focus);
            }
            Command::ToggleHelp => self.show_help_menu = !self.show_help_menu,
            Command::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                self.relayout.schedule(now);
            }
            Command::Rebuild => {
                self.add_log(RecordKind::Roster, "Bracket rebuilt".to_string());
                self.rebuild(now);
            }
            Command::ToggleTeamMode => match self.editor.toggle_team_mode() {
                Ok(()) => {
                    let mode = if self.editor.team_mode() { "on" } else { "off" };
                    self.add_log(RecordKind::Roster, format!("Team mode {mode}"));
                    self.sync_roster(now);
                }
                Err(e) => self.store_failed(&e),
            },
            Command::Shuffle => match self.editor.shuffle() {
                Ok(()) => {
                    self.input.set_text(self.editor.text());
                    self.add_log(RecordKind::Roster, "Roster shuffled".to_string());
                    self.sync_roster(now);
                }
                Err(e) => self.store_failed(&e),
            },
            Command::Select(direction) if !self.show_help_menu => self.move_selection(direction),
            Command::Select(Direction::Up) => self.help_handle.move_up(),
            Command::Select(Direction::Down) => self.help_handle.move_down(),
            Command::Select(_) => {}
            Command::DeclareSelected => {
                if let Some(selection) = self.selection.clone() {
                    self.declare(&selection.id, selection.side, now);
                }
            }
            Command::Declare(side) => {
                if let Some(selection) = self.selection.clone() {
                    self.declare(&selection.id, side, now);
                }
            }
            Command::Edit(key) => {
                self.edit(key);
                if let Err(e) = self.editor.set_text(&self.input.text()) {
                    self.store_failed(&e);
                }
                // The length guard may have cut the line being typed, or the
                // edit was not saved
                if self.editor.text() != self.input.text() {
                    self.input.set_text(self.editor.text());
                }
                self.sync_roster(now);
            }
        }
    }

    /// Run the deferred connector recomputation if it is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.relayout.fire(now) {
            return false;
        }
        self.connectors = connectors(&self.bracket, &self.layout);
        debug!("Recomputed {} connector(s)", self.connectors.len());
        true
    }

    fn edit(&mut self, key: EditKey) {
        match key {
            EditKey::Char(c) => self.input.insert(c),
            EditKey::Newline => self.input.newline(),
            EditKey::Backspace => self.input.backspace(),
            EditKey::Delete => self.input.delete(),
            EditKey::Move(direction) => self.input.move_cursor(direction),
            EditKey::Home => self.input.jump_to_first(),
            EditKey::End => self.input.jump_to_last(),
        }
    }

    /// Rebuild the bracket if the roster changed since the last build.
    fn sync_roster(&mut self, now: Instant) {
        if self.editor.revision() != self.built_revision {
            self.rebuild(now);
        }
    }

    fn rebuild(&mut self, now: Instant) {
        self.built_revision = self.editor.revision();
        let participants = self.editor.participants();

        match Bracket::new(&participants) {
            Ok(mut bracket) => {
                bracket.drain_events();
                self.bracket = bracket;
                self.build_error = None;
            }
            Err(e) => {
                warn!("Roster rejected: {e}");
                self.bracket = Bracket::default();
                self.build_error = Some(e.to_string());
            }
        }

        self.layout = BracketLayout::compute(&self.bracket);
        self.connectors.clear();
        self.selection = self.next_playable().or_else(|| self.first_match());
        self.relayout.schedule(now);
    }

    fn declare(&mut self, id: &MatchId, side: Side, now: Instant) {
        let Some(name) = self
            .bracket
            .get(id)
            .and_then(|m| m.slot(side).name())
            .map(String::from)
        else {
            warn!("Ignoring declaration for empty slot {side:?} of {id}");
            self.add_log(RecordKind::Error, format!("No participant to declare in {id}"));
            return;
        };

        match self.bracket.declare_winner(id, &name) {
            Ok(_) => {
                for event in self.bracket.drain_events() {
                    match event {
                        BracketEvent::MatchDecided { .. } | BracketEvent::SlotFilled { .. } => {
                            self.add_log(RecordKind::Bracket, event.to_string());
                        }
                        BracketEvent::Champion(ref champion) => {
                            info!("{champion} wins the tournament");
                            self.add_log(RecordKind::Champion, event.to_string());
                        }
                        BracketEvent::MatchCreated(_) => {}
                    }
                }
                if let Some(next) = self.next_playable() {
                    self.selection = Some(next);
                }
                self.relayout.schedule(now);
            }
            Err(e) => {
                warn!("Declaration rejected: {e}");
                self.add_log(RecordKind::Error, e.to_string());
            }
        }
    }

    /// Player one of the first match still waiting for a result.
    fn next_playable(&self) -> Option<Selection> {
        let matches = self.bracket.matches();
        matches.iter().find(|m| m.is_playable()).map(|m| Selection {
            id: m.id.clone(),
            side: Side::One,
        })
    }

    fn first_match(&self) -> Option<Selection> {
        let matches = self.bracket.matches();
        matches.first().map(|m| Selection {
            id: m.id.clone(),
            side: Side::One,
        })
    }

    fn move_selection(&mut self, direction: Direction) {
        let Some(current) = self.selection.clone() else {
            self.selection = self.first_match();
            return;
        };
        let Some(m) = self.bracket.get(&current.id) else {
            return;
        };
        let (round, position) = (m.round, m.position);

        let candidate = match (direction, current.side) {
            (Direction::Down, Side::One) => Some((current.id.clone(), Side::Two)),
            (Direction::Up, Side::Two) => Some((current.id.clone(), Side::One)),
            (Direction::Down, Side::Two) => Some((MatchId::new(round, position + 1), Side::One)),
            (Direction::Up, Side::One) if position > 1 => {
                Some((MatchId::new(round, position - 1), Side::Two))
            }
            (Direction::Up, Side::One) => None,
            (Direction::Right, _) => Some((
                MatchId::new(round + 1, m.parent_position()),
                Side::for_position(position),
            )),
            (Direction::Left, side) if round > 1 => {
                let feeder = match side {
                    Side::One => position * 2 - 1,
                    Side::Two => position * 2,
                };
                Some((MatchId::new(round - 1, feeder), side))
            }
            (Direction::Left, _) => None,
        };

        if let Some((id, side)) = candidate
            && self.bracket.get(&id).is_some()
        {
            self.selection = Some(Selection { id, side });
        }
    }

    fn store_failed(&mut self, e: &StoreError) {
        warn!("Roster change not saved: {e}");
        self.add_log(RecordKind::Error, format!("Roster change not saved: {e}"));
    }

    fn add_log(&mut self, kind: RecordKind, content: String) {
        self.log_handle.push(Record::new(kind, content).into());
    }

    /// Render the roster editor
    fn draw_roster(&self, frame: &mut Frame, area: Rect) {
        let mode = if self.editor.team_mode() {
            " teams ".light_magenta()
        } else {
            " individuals ".light_cyan()
        };
        let count = self.editor.participants().len();
        let mut block = Block::bordered()
            .title(" roster  ")
            .title_bottom(Line::from(vec![mode, format!(" {count} entries  ").into()]));
        if self.focus == Focus::Roster {
            block = block.border_style(Style::default().light_green());
        }

        let inner = block.inner(area);
        let (row, col) = self.input.cursor();
        let skip = row.saturating_sub(inner.height.saturating_sub(1) as usize);
        let lines: Vec<Line> = self
            .input
            .lines()
            .iter()
            .skip(skip)
            .map(|line| Line::from(line.as_str()))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if self.focus == Focus::Roster && !self.show_help_menu {
            frame.set_cursor_position(Position::new(
                inner.x + (col as u16).min(inner.width.saturating_sub(1)),
                inner.y + (row - skip) as u16,
            ));
        }
    }

    /// Render the bracket tree with round headers
    fn draw_bracket(&mut self, frame: &mut Frame, area: Rect) {
        let mut block = Block::bordered().title(" bracket  ");
        if let Some(champion) = self.bracket.champion() {
            block = block.title_bottom(format!(" champion: {champion}  ").light_green().bold());
        }
        if self.focus == Focus::Bracket {
            block = block.border_style(Style::default().light_green());
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.bracket.is_empty() {
            let message = match &self.build_error {
                Some(reason) => format!("Cannot build a bracket: {reason}"),
                None => "No bracket yet. Add participants to the roster.".to_string(),
            };
            frame.render_widget(Paragraph::new(message).dark_gray(), inner);
            return;
        }

        let [header_area, canvas_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

        if let Some(target) = self
            .selection
            .as_ref()
            .and_then(|selection| self.layout.get(&selection.id))
        {
            self.scroll = bracket_view::follow(
                self.scroll,
                target,
                (canvas_area.width as i32, canvas_area.height as i32),
            );
        }

        for round in self.bracket.rounds() {
            let x = bracket_view::column_x(round.number) + 1 - self.scroll.0;
            if x < 0 || x >= header_area.width as i32 {
                continue;
            }
            let width = (bracket_view::BOX_WIDTH - 1).min(header_area.width as i32 - x) as u16;
            let header = Rect::new(header_area.x + x as u16, header_area.y, width, 1);
            frame.render_widget(Paragraph::new(round.label.clone()).bold(), header);
        }

        frame.render_widget(
            BracketCanvas {
                bracket: &self.bracket,
                layout: &self.layout,
                connectors: &self.connectors,
                selection: self.selection.as_ref(),
                scroll: self.scroll,
            },
            canvas_area,
        );
    }

    /// Render the history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records).block(Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let help_message = vec![
            format!("[{}] ", self.focus).light_green(),
            "press ".into(),
            "Tab".bold().white(),
            " to switch panels, ".into(),
            "F1".bold().white(),
            " for help, or ".into(),
            "Esc".bold().white(),
            " to exit".into(),
        ];
        frame.render_widget(Paragraph::new(Line::from(help_message)), area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(26)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(84)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items).block(Block::bordered().title(" keys  "));
        frame.render_stateful_widget(
            help_items,
            help_menu_area,
            &mut self.help_handle.list_state,
        );
    }

    /// Main draw function - orchestrates rendering of all UI components
    pub fn draw(&mut self, frame: &mut Frame) {
        let window = Layout::vertical([
            Constraint::Min(6),    // Panels
            Constraint::Length(1), // Help bar
        ]);
        let [top_area, help_area] = window.areas(frame.area());

        if self.fullscreen {
            self.draw_bracket(frame, top_area);
        } else {
            let [main_area, log_area] =
                Layout::vertical([Constraint::Percentage(75), Constraint::Percentage(25)])
                    .areas(top_area);
            let [roster_area, bracket_area] =
                Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .areas(main_area);

            self.draw_roster(frame, roster_area);
            self.draw_bracket(frame, bracket_area);
            self.draw_log(frame, log_area);
        }

        self.draw_help_bar(frame, help_area);

        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Event loop until the user quits.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        info!(
            "Starting with {} participant(s)",
            self.bracket.participant_count()
        );

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            // Layout is read after the draw that placed the boxes
            let now = Instant::now();
            if self.tick(now) {
                continue;
            }

            let timeout = self
                .relayout
                .time_until(now)
                .map_or(POLL_TIMEOUT, |due| due.min(POLL_TIMEOUT));

            if event::poll(timeout)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key, Instant::now());
            }

            if self.should_quit {
                info!("Exiting");
                return Ok(());
            }
        }
    }
}
