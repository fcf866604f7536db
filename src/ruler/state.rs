use std::collections::HashSet;

use crate::event::{Modifiers, MouseButton};
use crate::geom::{Point, ScreenPoint};
use crate::measure::Measurement;

/// Ruler marker that can be grabbed with the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulerHandle {
    /// Marker at the start of the segment.
    Start,
    /// Marker at the midpoint; dragging it translates the ruler.
    Mid,
    /// Marker at the end of the segment.
    End,
}

/// Segment and midpoint captured when a marker is grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragSnapshot {
    pub(crate) handle: RulerHandle,
    pub(crate) segment: Measurement,
    pub(crate) mid: Point,
}

impl DragSnapshot {
    pub(crate) fn new(handle: RulerHandle, segment: Measurement) -> Self {
        Self {
            handle,
            segment,
            mid: segment.midpoint(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct GestureState {
    pub(crate) modifiers: Modifiers,
    pub(crate) buttons: HashSet<MouseButton>,
    pub(crate) drawing: bool,
    pub(crate) moving: bool,
    pub(crate) drag: Option<DragSnapshot>,
    pub(crate) pending_start: Option<Point>,
    pub(crate) last_position: Option<ScreenPoint>,
}

impl GestureState {
    pub(crate) fn left_pressed(&self) -> bool {
        self.buttons.contains(&MouseButton::Left)
    }

    pub(crate) fn in_gesture(&self) -> bool {
        self.drawing || self.drag.is_some()
    }

    pub(crate) fn end_gesture(&mut self) {
        self.drawing = false;
        self.moving = false;
        self.drag = None;
    }
}

/// Apply the horizontal (shift) or vertical (control) constraint to a point
/// moving away from `origin`. Shift wins when both are held.
pub(crate) fn constrain(origin: Point, target: Point, modifiers: Modifiers) -> Point {
    if modifiers.shift {
        Point::new(target.x, origin.y)
    } else if modifiers.control {
        Point::new(origin.x, target.y)
    } else {
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrain_prefers_shift() {
        let origin = Point::new(1.0, 1.0);
        let target = Point::new(4.0, 5.0);
        assert_eq!(constrain(origin, target, Modifiers::NONE), target);
        assert_eq!(constrain(origin, target, Modifiers::SHIFT), Point::new(4.0, 1.0));
        assert_eq!(constrain(origin, target, Modifiers::CONTROL), Point::new(1.0, 5.0));
        let both = Modifiers::SHIFT.union(Modifiers::CONTROL);
        assert_eq!(constrain(origin, target, both), Point::new(4.0, 1.0));
    }
}
