use diorama_common::Rgb;

/// Uniform set of the portal surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalUniforms {
    pub time: f32,
    pub color_start: Rgb,
    pub color_end: Rgb,
}

impl PortalUniforms {
    pub fn new(color_start: Rgb, color_end: Rgb) -> Self {
        Self {
            time: 0.0,
            color_start,
            color_end,
        }
    }
}

/// Uniform set of the firefly particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirefliesUniforms {
    pub time: f32,
    pub pixel_ratio: f32,
    pub point_size: f32,
}

impl FirefliesUniforms {
    pub const MIN_POINT_SIZE: f32 = 1.0;
    pub const MAX_POINT_SIZE: f32 = 500.0;

    pub fn new(pixel_ratio: f32, point_size: f32) -> Self {
        Self {
            time: 0.0,
            pixel_ratio,
            point_size: Self::clamp_point_size(point_size),
        }
    }

    /// Clamp a requested point size into the adjustable range.
    pub fn clamp_point_size(size: f32) -> f32 {
        if size.is_nan() {
            return Self::MIN_POINT_SIZE;
        }
        size.clamp(Self::MIN_POINT_SIZE, Self::MAX_POINT_SIZE)
    }
}
