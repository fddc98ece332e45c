use crate::Action;
use glam::Vec2;

/// Mouse buttons the controls care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Tracks drag state and turns pointer events into [`Action`]s.
///
/// Left drag orbits, right drag pans, middle drag zooms, wheel zooms.
#[derive(Debug, Default)]
pub struct PointerTracker {
    dragging: Option<PointerButton>,
    last_position: Option<Vec2>,
}

/// Logical pixels of vertical middle-drag that equal one wheel step.
const DRAG_PIXELS_PER_ZOOM_STEP: f32 = 20.0;

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<PointerButton> {
        self.dragging
    }

    pub fn press(&mut self, button: PointerButton) {
        if self.dragging.is_none() {
            self.dragging = Some(button);
        }
    }

    pub fn release(&mut self, button: PointerButton) {
        if self.dragging == Some(button) {
            self.dragging = None;
        }
    }

    /// Record a cursor move; returns the drag action, if any.
    pub fn moved(&mut self, position: Vec2) -> Option<Action> {
        let previous = self.last_position.replace(position);
        let delta = position - previous?;
        let action = match self.dragging? {
            PointerButton::Primary => Action::Orbit(delta),
            PointerButton::Secondary => Action::Pan(delta),
            PointerButton::Middle => Action::Zoom(-delta.y / DRAG_PIXELS_PER_ZOOM_STEP),
        };
        (!action.is_noop()).then_some(action)
    }

    /// Cursor left the window; the next move must not produce a jump.
    pub fn left(&mut self) {
        self.last_position = None;
        self.dragging = None;
    }

    /// Wheel scroll in lines (positive is away from the user).
    pub fn wheel(&self, lines: f32) -> Option<Action> {
        let action = Action::Zoom(lines);
        if action.is_noop() {
            return None;
        }
        tracing::trace!(lines, "wheel zoom");
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_without_drag_is_silent() {
        let mut p = PointerTracker::new();
        assert_eq!(p.moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(p.moved(Vec2::new(20.0, 10.0)), None);
    }

    #[test]
    fn left_drag_orbits() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::new(10.0, 10.0));
        p.press(PointerButton::Primary);
        assert_eq!(
            p.moved(Vec2::new(15.0, 8.0)),
            Some(Action::Orbit(Vec2::new(5.0, -2.0)))
        );
    }

    #[test]
    fn right_drag_pans_and_first_button_wins() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.press(PointerButton::Secondary);
        p.press(PointerButton::Primary);
        assert_eq!(p.dragging(), Some(PointerButton::Secondary));
        assert_eq!(
            p.moved(Vec2::new(3.0, 4.0)),
            Some(Action::Pan(Vec2::new(3.0, 4.0)))
        );
        p.release(PointerButton::Primary);
        assert_eq!(p.dragging(), Some(PointerButton::Secondary));
        p.release(PointerButton::Secondary);
        assert_eq!(p.dragging(), None);
    }

    #[test]
    fn middle_drag_up_zooms_in() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::new(0.0, 100.0));
        p.press(PointerButton::Middle);
        assert_eq!(p.moved(Vec2::new(0.0, 80.0)), Some(Action::Zoom(1.0)));
    }

    #[test]
    fn leaving_resets_position() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.press(PointerButton::Primary);
        p.left();
        p.press(PointerButton::Primary);
        assert_eq!(p.moved(Vec2::new(500.0, 500.0)), None);
    }

    #[test]
    fn wheel_zero_is_ignored() {
        let p = PointerTracker::new();
        assert_eq!(p.wheel(0.0), None);
        assert_eq!(p.wheel(-2.0), Some(Action::Zoom(-2.0)));
    }
}
