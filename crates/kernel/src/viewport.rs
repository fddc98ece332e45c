/// Upper bound on the device pixel ratio used for rendering.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// `min(device_pixel_ratio, 2)`; non-finite or non-positive ratios count as 1.
pub fn cap_pixel_ratio(device_pixel_ratio: f64) -> f32 {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return 1.0;
    }
    (device_pixel_ratio as f32).min(MAX_PIXEL_RATIO)
}

/// Output surface size as reported by the host, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

/// Current output dimensions and the capped pixel ratio.
///
/// Dimensions are clamped to at least 1 so the aspect ratio is always defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f32,
}

impl Viewport {
    pub fn from_surface(size: SurfaceSize) -> Self {
        Self {
            width: size.width.max(1),
            height: size.height.max(1),
            pixel_ratio: cap_pixel_ratio(size.device_pixel_ratio),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Render target size in physical pixels: logical size times the capped ratio.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).floor() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        assert_eq!(cap_pixel_ratio(3.0), 2.0);
        assert_eq!(cap_pixel_ratio(2.0), 2.0);
        assert_eq!(cap_pixel_ratio(1.5), 1.5);
        assert_eq!(cap_pixel_ratio(1.0), 1.0);
        assert_eq!(cap_pixel_ratio(0.0), 1.0);
        assert_eq!(cap_pixel_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn aspect_from_logical_size() {
        let v = Viewport::from_surface(SurfaceSize::new(800, 600, 1.0));
        assert!((v.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(v.drawing_buffer_size(), (800, 600));
    }

    #[test]
    fn zero_height_is_clamped() {
        let v = Viewport::from_surface(SurfaceSize::new(640, 0, 1.0));
        assert_eq!(v.height(), 1);
        assert_eq!(v.aspect(), 640.0);
        assert!(v.aspect().is_finite());
    }

    #[test]
    fn drawing_buffer_uses_capped_ratio() {
        let v = Viewport::from_surface(SurfaceSize::new(1920, 1080, 3.0));
        assert_eq!(v.pixel_ratio(), 2.0);
        assert_eq!(v.drawing_buffer_size(), (3840, 2160));
    }
}
