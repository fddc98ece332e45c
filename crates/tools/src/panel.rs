use diorama_common::Rgb;
use diorama_kernel::{Diorama, DioramaConfig, FirefliesUniforms};
use std::fmt;
use std::ops::RangeInclusive;

/// Source-of-truth values behind the debug panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugValues {
    pub portal_color_start: Rgb,
    pub portal_color_end: Rgb,
    pub clear_color: Rgb,
    pub point_size: f32,
}

impl DebugValues {
    pub fn from_config(config: &DioramaConfig) -> Self {
        Self {
            portal_color_start: config.portal_color_start,
            portal_color_end: config.portal_color_end,
            clear_color: config.clear_color,
            point_size: FirefliesUniforms::clamp_point_size(config.point_size),
        }
    }
}

impl Default for DebugValues {
    fn default() -> Self {
        Self::from_config(&DioramaConfig::default())
    }
}

/// Options the panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugOption {
    PortalColorStart,
    PortalColorEnd,
    ClearColor,
    PointSize,
}

impl DebugOption {
    pub const ALL: [DebugOption; 4] = [
        DebugOption::PortalColorStart,
        DebugOption::PortalColorEnd,
        DebugOption::ClearColor,
        DebugOption::PointSize,
    ];

    /// Label shown in the panel.
    pub fn label(self) -> &'static str {
        match self {
            DebugOption::PortalColorStart => "portalColorStart",
            DebugOption::PortalColorEnd => "portalColorEnd",
            DebugOption::ClearColor => "clearColor",
            DebugOption::PointSize => "size",
        }
    }

    /// Slider range for numeric options.
    pub fn range(self) -> Option<RangeInclusive<f32>> {
        match self {
            DebugOption::PointSize => {
                Some(FirefliesUniforms::MIN_POINT_SIZE..=FirefliesUniforms::MAX_POINT_SIZE)
            }
            _ => None,
        }
    }
}

/// A single edit made through the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugEdit {
    PortalColorStart(Rgb),
    PortalColorEnd(Rgb),
    ClearColor(Rgb),
    PointSize(f32),
}

impl DebugEdit {
    pub fn option(&self) -> DebugOption {
        match self {
            DebugEdit::PortalColorStart(_) => DebugOption::PortalColorStart,
            DebugEdit::PortalColorEnd(_) => DebugOption::PortalColorEnd,
            DebugEdit::ClearColor(_) => DebugOption::ClearColor,
            DebugEdit::PointSize(_) => DebugOption::PointSize,
        }
    }
}

impl fmt::Display for DebugEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugEdit::PortalColorStart(c) | DebugEdit::PortalColorEnd(c) | DebugEdit::ClearColor(c) => {
                write!(f, "{}={}", self.option().label(), c)
            }
            DebugEdit::PointSize(size) => write!(f, "{}={}", self.option().label(), size),
        }
    }
}

/// Debug control panel model.
///
/// Edits go through [`DebugPanel::apply`], which updates the owned value
/// and pushes a copy into the diorama. Nothing is redrawn here; the change
/// shows up on the next frame.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    values: DebugValues,
    visible: bool,
}

impl DebugPanel {
    /// Panel width in logical pixels.
    pub const WIDTH: f32 = 400.0;

    pub fn new(values: DebugValues) -> Self {
        Self {
            values,
            visible: true,
        }
    }

    pub fn values(&self) -> &DebugValues {
        &self.values
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Push every current value into the diorama.
    pub fn sync(&self, diorama: &mut Diorama) {
        diorama.set_portal_color_start(self.values.portal_color_start);
        diorama.set_portal_color_end(self.values.portal_color_end);
        diorama.set_clear_color(self.values.clear_color);
        diorama.set_point_size(self.values.point_size);
    }

    /// Record an edit and forward it. Returns the value actually stored.
    pub fn apply(&mut self, edit: DebugEdit, diorama: &mut Diorama) -> DebugEdit {
        let stored = match edit {
            DebugEdit::PortalColorStart(color) => {
                self.values.portal_color_start = color;
                diorama.set_portal_color_start(color);
                edit
            }
            DebugEdit::PortalColorEnd(color) => {
                self.values.portal_color_end = color;
                diorama.set_portal_color_end(color);
                edit
            }
            DebugEdit::ClearColor(color) => {
                self.values.clear_color = color;
                diorama.set_clear_color(color);
                edit
            }
            DebugEdit::PointSize(size) => {
                let size = FirefliesUniforms::clamp_point_size(size);
                self.values.point_size = size;
                DebugEdit::PointSize(diorama.set_point_size(size))
            }
        };
        tracing::debug!(edit = %stored, "debug panel edit");
        stored
    }
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new(DebugValues::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_kernel::SurfaceSize;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn diorama() -> Diorama {
        Diorama::new(
            &DioramaConfig::default(),
            SurfaceSize::new(800, 600, 1.0),
            &mut StdRng::seed_from_u64(2),
        )
    }

    #[test]
    fn defaults_match_config() {
        let v = DebugValues::default();
        assert_eq!(v.portal_color_start.to_hex(), "#cd62cd");
        assert_eq!(v.portal_color_end.to_hex(), "#ffffff");
        assert_eq!(v.clear_color.to_hex(), "#b4d0ff");
        assert_eq!(v.point_size, 40.0);
    }

    #[test]
    fn black_portal_start_leaves_end_alone() {
        let mut d = diorama();
        let mut panel = DebugPanel::default();
        panel.apply(
            DebugEdit::PortalColorStart(Rgb::from_hex("#000000").unwrap()),
            &mut d,
        );
        assert_eq!(d.portal_uniforms().color_start.to_array(), [0.0, 0.0, 0.0]);
        assert_eq!(d.portal_uniforms().color_end, Rgb::WHITE);
        assert_eq!(panel.values().portal_color_start, Rgb::BLACK);
    }

    #[test]
    fn point_size_600_becomes_500() {
        let mut d = diorama();
        let mut panel = DebugPanel::default();
        let stored = panel.apply(DebugEdit::PointSize(600.0), &mut d);
        assert_eq!(stored, DebugEdit::PointSize(500.0));
        assert_eq!(panel.values().point_size, 500.0);
        assert_eq!(d.fireflies_uniforms().point_size, 500.0);
    }

    #[test]
    fn clear_color_goes_to_renderer_setting() {
        let mut d = diorama();
        let mut panel = DebugPanel::default();
        panel.apply(DebugEdit::ClearColor(Rgb::BLACK), &mut d);
        assert_eq!(d.clear_color(), Rgb::BLACK);
        assert_eq!(d.portal_uniforms().color_start.to_hex(), "#cd62cd");
    }

    #[test]
    fn uniforms_hold_copies_not_references() {
        let mut d = diorama();
        let mut panel = DebugPanel::default();
        panel.apply(DebugEdit::PortalColorEnd(Rgb::BLACK), &mut d);
        d.set_portal_color_end(Rgb::WHITE);
        assert_eq!(panel.values().portal_color_end, Rgb::BLACK);
    }

    #[test]
    fn sync_pushes_all_values() {
        let mut d = diorama();
        let panel = DebugPanel::new(DebugValues {
            portal_color_start: Rgb::BLACK,
            portal_color_end: Rgb::BLACK,
            clear_color: Rgb::WHITE,
            point_size: 7.0,
        });
        panel.sync(&mut d);
        assert_eq!(d.portal_uniforms().color_end, Rgb::BLACK);
        assert_eq!(d.clear_color(), Rgb::WHITE);
        assert_eq!(d.fireflies_uniforms().point_size, 7.0);
    }

    #[test]
    fn options_and_labels() {
        assert_eq!(DebugOption::ALL.len(), 4);
        assert_eq!(DebugOption::PointSize.range(), Some(1.0..=500.0));
        assert_eq!(DebugOption::ClearColor.range(), None);
        assert_eq!(
            DebugEdit::ClearColor(Rgb::WHITE).to_string(),
            "clearColor=#ffffff"
        );
        let mut panel = DebugPanel::default();
        assert!(panel.is_visible());
        panel.toggle();
        assert!(!panel.is_visible());
    }
}
