//! Connector geometry between a match and the match it feeds.
//!
//! Where matches end up on screen is the renderer's business. It answers
//! [`SlotLocator::bounds`] and gets back polylines to draw, so the bracket
//! engine never depends on a rendering system.

use crate::bracket::{Bracket, MatchId, Side};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in renderer coordinates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Vertical anchor for the given slot: upper quarter for `player1`,
    /// lower quarter for `player2`.
    pub fn slot_y(&self, side: Side) -> i32 {
        match side {
            Side::One => self.y + self.height / 4,
            Side::Two => self.y + (self.height * 3) / 4,
        }
    }
}

/// Renderer capability: where is a match drawn?
pub trait SlotLocator {
    fn bounds(&self, id: &MatchId) -> Option<Rect>;
}

impl<F> SlotLocator for F
where
    F: Fn(&MatchId) -> Option<Rect>,
{
    fn bounds(&self, id: &MatchId) -> Option<Rect> {
        self(id)
    }
}

/// Elbow line from a feeder match into one slot of its parent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connector {
    pub from: MatchId,
    pub to: MatchId,
    pub side: Side,
    /// start, first bend, second bend, end
    pub points: [Point; 4],
}

impl Connector {
    /// Consecutive point pairs, each a horizontal or vertical segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Compute every connector the locator can place.
///
/// Covers matches not yet created too, so the skeleton of later rounds is
/// drawn before anyone reaches them. Pairs where either box is unknown are
/// skipped.
pub fn connectors<L: SlotLocator + ?Sized>(bracket: &Bracket, locator: &L) -> Vec<Connector> {
    let mut lines = Vec::new();

    for round in 1..bracket.total_rounds() {
        for position in 1..=bracket.round_size(round) as u32 {
            let from = MatchId::new(round, position);
            let to = MatchId::new(round + 1, position.div_ceil(2));
            let (Some(source), Some(target)) = (locator.bounds(&from), locator.bounds(&to)) else {
                continue;
            };

            let side = Side::for_position(position);
            let start = Point::new(source.right(), source.center_y());
            let end = Point::new(target.x, target.slot_y(side));
            let bend_x = (start.x + end.x) / 2;

            lines.push(Connector {
                from,
                to,
                side,
                points: [
                    start,
                    Point::new(bend_x, start.y),
                    Point::new(bend_x, end.y),
                    end,
                ],
            });
        }
    }

    lines
}

/// Single-shot deferred connector recomputation.
///
/// Layout is read after the next repaint, not during the state change.
/// Scheduling again before the deadline replaces the pending run.
#[derive(Clone, Debug)]
pub struct RelayoutTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl RelayoutTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, replacing any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once when the deadline has passed, then disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the timer fires, for sizing event-loop polls.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Columns 20 wide with a 10-cell gutter, boxes 5 tall.
    fn grid(bracket: &Bracket) -> HashMap<MatchId, Rect> {
        let mut boxes = HashMap::new();
        for round in 1..=bracket.total_rounds() {
            let spacing = 6 * (1 << (round - 1));
            for position in 1..=bracket.round_size(round) as i32 {
                let y = (position - 1) * spacing + (spacing - 6) / 2;
                boxes.insert(
                    MatchId::new(round, position as u32),
                    Rect::new((round as i32 - 1) * 30, y, 20, 5),
                );
            }
        }
        boxes
    }

    #[test]
    fn test_connectors_for_four_players() {
        let bracket = Bracket::new(&names(&["A", "B", "C", "D"])).unwrap();
        let boxes = grid(&bracket);
        let lines = connectors(&bracket, &|id: &MatchId| boxes.get(id).copied());

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].from, MatchId::new(1, 1));
        assert_eq!(lines[0].to, MatchId::new(2, 1));
        assert_eq!(lines[0].side, Side::One);
        assert_eq!(lines[1].side, Side::Two);

        // Leaves the right edge of the feeder, ends on the parent's left edge
        assert_eq!(lines[0].points[0], Point::new(20, 2));
        assert_eq!(lines[0].points[3].x, 30);
        assert_eq!(lines[0].points[3].y, boxes[&MatchId::new(2, 1)].slot_y(Side::One));
        assert_eq!(lines[1].points[3].y, boxes[&MatchId::new(2, 1)].slot_y(Side::Two));
    }

    #[test]
    fn test_segments_are_axis_aligned() {
        let bracket = Bracket::new(&names(&["A", "B", "C", "D", "E", "F", "G", "H"])).unwrap();
        let boxes = grid(&bracket);
        let lines = connectors(&bracket, &|id: &MatchId| boxes.get(id).copied());

        assert_eq!(lines.len(), 6);
        for line in &lines {
            for (a, b) in line.segments() {
                assert!(a.x == b.x || a.y == b.y);
            }
        }
    }

    #[test]
    fn test_unknown_boxes_are_skipped() {
        let bracket = Bracket::new(&names(&["A", "B", "C", "D"])).unwrap();
        let lines = connectors(&bracket, &|_: &MatchId| None);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_odd_bracket_connects_bye_feeder() {
        let bracket = Bracket::new(&names(&["A", "B", "C", "D", "E"])).unwrap();
        let boxes = grid(&bracket);
        let lines = connectors(&bracket, &|id: &MatchId| boxes.get(id).copied());

        // 3 feeders into round 2, 2 into the final
        assert_eq!(lines.len(), 5);
        assert!(
            lines
                .iter()
                .any(|l| l.from == MatchId::new(1, 3) && l.to == MatchId::new(2, 2))
        );
    }

    #[test]
    fn test_timer_fires_once_after_delay() {
        let start = Instant::now();
        let mut timer = RelayoutTimer::new(Duration::from_millis(10));
        assert!(!timer.fire(start));

        timer.schedule(start);
        assert!(timer.is_pending());
        assert!(!timer.fire(start + Duration::from_millis(5)));
        assert!(timer.fire(start + Duration::from_millis(10)));
        assert!(!timer.fire(start + Duration::from_millis(20)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_timer_reschedule_replaces_pending() {
        let start = Instant::now();
        let mut timer = RelayoutTimer::new(Duration::from_millis(10));
        timer.schedule(start);
        timer.schedule(start + Duration::from_millis(8));

        assert!(!timer.fire(start + Duration::from_millis(12)));
        assert_eq!(
            timer.time_until(start + Duration::from_millis(12)),
            Some(Duration::from_millis(6))
        );
        assert!(timer.fire(start + Duration::from_millis(18)));
    }

    #[test]
    fn test_timer_cancel() {
        let start = Instant::now();
        let mut timer = RelayoutTimer::new(Duration::from_millis(10));
        timer.schedule(start);
        timer.cancel();
        assert!(!timer.fire(start + Duration::from_secs(1)));
        assert_eq!(timer.time_until(start), None);
    }
}
