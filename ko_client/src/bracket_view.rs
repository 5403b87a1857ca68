//! Terminal drawing of the bracket tree.
//!
//! Rounds are columns, matches are five-row boxes (top border, `player1`,
//! divider, `player2`, bottom border). Each round doubles the vertical
//! spacing of the previous one so a match sits centred between its feeders.
//! Everything is laid out in content coordinates and shifted by a scroll
//! offset when drawn.

use std::collections::HashMap;

use knockout::{
    Bracket, Connector, Match, MatchId, Side, SlotLocator, SlotState,
    layout::{Point, Rect as BoxRect},
};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};

pub const BOX_WIDTH: i32 = 24;
pub const BOX_HEIGHT: i32 = 5;
pub const GUTTER: i32 = 6;
/// Vertical distance between first-round boxes.
const BASE_SPACING: i32 = BOX_HEIGHT + 1;
const TBD: &str = "TBD";

/// The slot the user has highlighted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selection {
    pub id: MatchId,
    pub side: Side,
}

/// Where every match of a bracket is drawn, including matches that do not
/// exist yet.
#[derive(Clone, Debug, Default)]
pub struct BracketLayout {
    boxes: HashMap<MatchId, BoxRect>,
    width: i32,
    height: i32,
}

impl BracketLayout {
    pub fn compute(bracket: &Bracket) -> Self {
        let mut layout = Self::default();

        for round in 1..=bracket.total_rounds() {
            let spacing = BASE_SPACING << (round - 1);
            let x = column_x(round);
            for position in 1..=bracket.round_size(round) as i32 {
                let y = (position - 1) * spacing + (spacing - BASE_SPACING) / 2;
                let rect = BoxRect::new(x, y, BOX_WIDTH, BOX_HEIGHT);
                layout.width = layout.width.max(rect.right());
                layout.height = layout.height.max(rect.y + rect.height);
                layout
                    .boxes
                    .insert(MatchId::new(round, position as u32), rect);
            }
        }

        layout
    }

    pub fn get(&self, id: &MatchId) -> Option<BoxRect> {
        self.boxes.get(id).copied()
    }

    /// Width and height of the whole tree.
    pub fn content_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl SlotLocator for BracketLayout {
    fn bounds(&self, id: &MatchId) -> Option<BoxRect> {
        self.get(id)
    }
}

/// Scroll offset that keeps `target` inside a viewport of the given size,
/// moving as little as possible from `current`.
pub fn follow(current: (i32, i32), target: BoxRect, viewport: (i32, i32)) -> (i32, i32) {
    let axis = |offset: i32, start: i32, len: i32, view: i32| {
        if start < offset {
            start
        } else if start + len > offset + view {
            (start + len - view).max(0)
        } else {
            offset
        }
    };
    (
        axis(current.0, target.x, target.width, viewport.0),
        axis(current.1, target.y, target.height, viewport.1),
    )
}

/// Widget drawing boxes and connector lines.
pub struct BracketCanvas<'a> {
    pub bracket: &'a Bracket,
    pub layout: &'a BracketLayout,
    pub connectors: &'a [Connector],
    pub selection: Option<&'a Selection>,
    pub scroll: (i32, i32),
}

impl Widget for BracketCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut pen = Pen {
            area,
            buf,
            scroll: self.scroll,
        };

        let line_style = Style::default().fg(Color::DarkGray);
        for connector in self.connectors {
            draw_connector(&mut pen, connector, line_style);
        }

        for round in 1..=self.bracket.total_rounds() {
            for position in 1..=self.bracket.round_size(round) as u32 {
                let id = MatchId::new(round, position);
                let Some(rect) = self.layout.get(&id) else {
                    continue;
                };
                match self.bracket.get(&id) {
                    Some(m) => {
                        let seeds = [Side::One, Side::Two].map(|side| self.bracket.seed(&id, side));
                        draw_match(&mut pen, rect, m, seeds, self.selection);
                    }
                    None => draw_placeholder(&mut pen, rect),
                }
            }
        }

        // Mark where each line meets its boxes
        for connector in self.connectors {
            let [start, .., end] = connector.points;
            pen.put(start.x - 1, start.y, "┼", line_style);
            pen.put(end.x, end.y, "┤", line_style);
        }
    }
}

/// Clipped writes into the buffer in content coordinates.
struct Pen<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    scroll: (i32, i32),
}

impl Pen<'_> {
    fn put(&mut self, x: i32, y: i32, symbol: &str, style: Style) {
        let Some(position) = to_screen(self.area, self.scroll, Point::new(x, y)) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut(position) {
            cell.set_symbol(symbol).set_style(style);
        }
    }

    fn text(&mut self, x: i32, y: i32, width: i32, text: &str, style: Style) {
        for (offset, c) in text.chars().take(width.max(0) as usize).enumerate() {
            let mut symbol = [0u8; 4];
            self.put(x + offset as i32, y, c.encode_utf8(&mut symbol), style);
        }
    }

    fn frame(&mut self, rect: BoxRect, style: Style) {
        let right = rect.right() - 1;
        let bottom = rect.y + rect.height - 1;
        let divider = rect.center_y();

        for x in rect.x + 1..right {
            self.put(x, rect.y, "─", style);
            self.put(x, divider, "─", style);
            self.put(x, bottom, "─", style);
        }
        for y in rect.y + 1..bottom {
            let (left, right_edge) = if y == divider { ("├", "┤") } else { ("│", "│") };
            self.put(rect.x, y, left, style);
            self.put(right, y, right_edge, style);
        }
        self.put(rect.x, rect.y, "┌", style);
        self.put(right, rect.y, "┐", style);
        self.put(rect.x, bottom, "└", style);
        self.put(right, bottom, "┘", style);
    }
}

fn draw_connector(pen: &mut Pen<'_>, connector: &Connector, style: Style) {
    for (a, b) in connector.segments() {
        if a.y == b.y {
            for x in a.x.min(b.x)..=a.x.max(b.x) {
                pen.put(x, a.y, "─", style);
            }
        } else {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                pen.put(a.x, y, "│", style);
            }
        }
    }

    let [start, bend_in, bend_out, end] = connector.points;
    if start.y == end.y {
        return;
    }
    let downwards = end.y > start.y;
    pen.put(bend_in.x, bend_in.y, if downwards { "┐" } else { "┘" }, style);
    pen.put(bend_out.x, bend_out.y, if downwards { "└" } else { "┌" }, style);
}

/// `seeds` holds the entry numbers for `player1` and `player2`, shown in
/// front of first-round names.
fn draw_match(
    pen: &mut Pen<'_>,
    rect: BoxRect,
    m: &Match,
    seeds: [Option<usize>; 2],
    selection: Option<&Selection>,
) {
    let border = if m.is_decided() {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White)
    };
    pen.frame(rect, border);

    for (side, seed) in [Side::One, Side::Two].into_iter().zip(seeds) {
        let selected = selection.is_some_and(|s| s.id == m.id && s.side == side);
        let mut style = slot_style(m.slot_state(side));
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let name = match seed {
            Some(seed) => format!("#{seed} {}", m.slot(side)),
            None => m.slot(side).to_string(),
        };
        let label = format!(" {name:<width$}", width = (BOX_WIDTH - 3) as usize);
        pen.text(rect.x + 1, rect.slot_y(side), BOX_WIDTH - 2, &label, style);
    }
}

fn draw_placeholder(pen: &mut Pen<'_>, rect: BoxRect) {
    let style = Style::default().fg(Color::DarkGray);
    pen.frame(rect, style);
    for side in [Side::One, Side::Two] {
        pen.text(rect.x + 2, rect.slot_y(side), BOX_WIDTH - 3, TBD, style);
    }
}

fn slot_style(state: SlotState) -> Style {
    match state {
        SlotState::Winner => Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        SlotState::Loser => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
        SlotState::Bye => Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        SlotState::Open => Style::default().fg(Color::DarkGray),
        SlotState::Pending => Style::default().fg(Color::White),
    }
}

/// Left edge of a round's column, for drawing round headers.
pub fn column_x(round: u32) -> i32 {
    (round as i32 - 1) * (BOX_WIDTH + GUTTER)
}

/// Point in content coordinates under the scroll offset, if it is visible.
pub fn to_screen(area: Rect, scroll: (i32, i32), point: Point) -> Option<Position> {
    let x = point.x - scroll.0;
    let y = point.y - scroll.1;
    (x >= 0 && y >= 0 && x < area.width as i32 && y < area.height as i32)
        .then(|| Position::new(area.x + x as u16, area.y + y as u16))
}
