use glam::Vec2;

/// A camera action produced from pointer input.
///
/// Deltas are in logical pixels; the controls scale them by the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Rotate around the orbit target.
    Orbit(Vec2),
    /// Move the orbit target in the view plane.
    Pan(Vec2),
    /// Wheel steps; positive zooms in.
    Zoom(f32),
}

impl Action {
    /// True when the action carries no movement.
    pub fn is_noop(&self) -> bool {
        match self {
            Action::Orbit(d) | Action::Pan(d) => *d == Vec2::ZERO,
            Action::Zoom(steps) => *steps == 0.0,
        }
    }
}
