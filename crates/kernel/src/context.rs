use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::config::DioramaConfig;
use crate::particles::ParticleField;
use crate::scene::{AttachReport, Scene};
use crate::uniforms::{FirefliesUniforms, PortalUniforms};
use crate::viewport::{SurfaceSize, Viewport};
use diorama_common::{LoadedModel, Rgb};
use diorama_input::Action;
use glam::Vec3;
use rand::Rng;

/// The application context: everything one frame reads.
///
/// Created once at startup and owned by the host loop. Writers are split by
/// field: [`Diorama::advance`] owns the `time` uniforms and camera motion,
/// [`Diorama::resize`] owns viewport-derived values, and the `set_*` methods
/// are called by the debug panel.
pub struct Diorama {
    scene: Scene,
    fireflies: ParticleField,
    portal_uniforms: PortalUniforms,
    fireflies_uniforms: FirefliesUniforms,
    viewport: Viewport,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    clear_color: Rgb,
    elapsed: f32,
    frame: u64,
}

impl Diorama {
    /// Build the startup state: particle field, uniforms, camera, controls.
    pub fn new<R: Rng>(config: &DioramaConfig, surface: SurfaceSize, rng: &mut R) -> Self {
        let viewport = Viewport::from_surface(surface);
        let camera = PerspectiveCamera::new(&config.camera, viewport.aspect());
        let controls = OrbitControls::new(&config.controls, Vec3::from_array(config.camera.target));

        tracing::info!(
            width = viewport.width(),
            height = viewport.height(),
            pixel_ratio = viewport.pixel_ratio(),
            fireflies = config.fireflies_count,
            "diorama created"
        );

        Self {
            scene: Scene::new(),
            fireflies: ParticleField::generate(config.fireflies_count, rng),
            portal_uniforms: PortalUniforms::new(config.portal_color_start, config.portal_color_end),
            fireflies_uniforms: FirefliesUniforms::new(viewport.pixel_ratio(), config.point_size),
            viewport,
            camera,
            controls,
            clear_color: config.clear_color,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Per-frame update: push `elapsed` into both `time` uniforms, then step
    /// the orbit controls.
    pub fn advance(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
        self.fireflies_uniforms.time = elapsed;
        self.portal_uniforms.time = elapsed;
        self.controls.update(&mut self.camera);
        self.frame += 1;
    }

    /// Apply a new output surface size.
    ///
    /// Viewport, camera aspect and pixel ratio uniform change together; the
    /// host resizes its render target from [`Diorama::viewport`] in the same
    /// event.
    pub fn resize(&mut self, surface: SurfaceSize) {
        let viewport = Viewport::from_surface(surface);
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.fireflies_uniforms.pixel_ratio = viewport.pixel_ratio();
        tracing::debug!(
            width = viewport.width(),
            height = viewport.height(),
            pixel_ratio = viewport.pixel_ratio(),
            "viewport resized"
        );
    }

    /// Feed a camera action into the orbit controls; it lands on the next tick.
    pub fn handle_action(&mut self, action: Action) {
        let height = self.viewport.height() as f32;
        match action {
            Action::Orbit(delta) => self.controls.rotate_by_drag(delta, height),
            Action::Pan(delta) => self.controls.pan_by_drag(delta, height, &self.camera),
            Action::Zoom(steps) => self.controls.dolly(steps),
        }
    }

    /// One-shot asset load completion.
    pub fn attach_loaded_nodes(&mut self, model: LoadedModel) -> AttachReport {
        self.scene.attach_loaded_nodes(model)
    }

    pub fn set_portal_color_start(&mut self, color: Rgb) {
        self.portal_uniforms.color_start = color;
    }

    pub fn set_portal_color_end(&mut self, color: Rgb) {
        self.portal_uniforms.color_end = color;
    }

    pub fn set_clear_color(&mut self, color: Rgb) {
        self.clear_color = color;
    }

    /// Returns the stored size after clamping into `[1, 500]`.
    pub fn set_point_size(&mut self, size: f32) -> f32 {
        let size = FirefliesUniforms::clamp_point_size(size);
        self.fireflies_uniforms.point_size = size;
        size
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn fireflies(&self) -> &ParticleField {
        &self.fireflies
    }

    pub fn portal_uniforms(&self) -> &PortalUniforms {
        &self.portal_uniforms
    }

    pub fn fireflies_uniforms(&self) -> &FirefliesUniforms {
        &self.fireflies_uniforms
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn clear_color(&self) -> Rgb {
        self.clear_color
    }

    /// Elapsed seconds sampled by the latest tick.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of ticks advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_common::{LoadedNode, MeshData, TextureData};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn diorama(width: u32, height: u32, dpr: f64) -> Diorama {
        Diorama::new(
            &DioramaConfig::default(),
            SurfaceSize::new(width, height, dpr),
            &mut StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn startup_at_800_by_600() {
        let d = diorama(800, 600, 1.0);
        assert_eq!(d.fireflies().len(), 30);
        assert!((d.camera().aspect() - 1.3333).abs() < 1e-4);
        assert_eq!(d.fireflies_uniforms().pixel_ratio, 1.0);
        assert_eq!(d.fireflies_uniforms().point_size, 40.0);
        assert_eq!(d.portal_uniforms().color_start.to_hex(), "#cd62cd");
        assert_eq!(d.portal_uniforms().color_end.to_hex(), "#ffffff");
        assert!(!d.scene().is_loaded());
    }

    #[test]
    fn resize_to_1080p_on_dense_display() {
        let mut d = diorama(800, 600, 1.0);
        d.resize(SurfaceSize::new(1920, 1080, 3.0));
        assert!((d.camera().aspect() - 1.7778).abs() < 1e-4);
        assert_eq!(d.fireflies_uniforms().pixel_ratio, 2.0);
        assert_eq!(d.viewport().width(), 1920);
        assert_eq!(d.viewport().height(), 1080);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut d = diorama(800, 600, 1.0);
        let size = SurfaceSize::new(1024, 768, 1.5);
        d.resize(size);
        let viewport = *d.viewport();
        let aspect = d.camera().aspect();
        let projection = d.camera().projection_matrix();
        let ratio = d.fireflies_uniforms().pixel_ratio;

        d.resize(size);
        assert_eq!(*d.viewport(), viewport);
        assert_eq!(d.camera().aspect(), aspect);
        assert_eq!(d.camera().projection_matrix(), projection);
        assert_eq!(d.fireflies_uniforms().pixel_ratio, ratio);
    }

    #[test]
    fn pixel_ratio_one_stays_one() {
        let mut d = diorama(800, 600, 3.0);
        assert_eq!(d.fireflies_uniforms().pixel_ratio, 2.0);
        d.resize(SurfaceSize::new(800, 600, 1.0));
        assert_eq!(d.fireflies_uniforms().pixel_ratio, 1.0);
    }

    #[test]
    fn zero_height_resize_keeps_aspect_finite() {
        let mut d = diorama(800, 600, 1.0);
        d.resize(SurfaceSize::new(800, 0, 1.0));
        assert!(d.camera().aspect().is_finite());
        assert_eq!(d.viewport().height(), 1);
    }

    #[test]
    fn advance_writes_both_time_uniforms() {
        let mut d = diorama(800, 600, 1.0);
        d.advance(1.25);
        assert_eq!(
            d.portal_uniforms().time.to_bits(),
            d.fireflies_uniforms().time.to_bits()
        );
        assert_eq!(d.elapsed(), 1.25);
        assert_eq!(d.frame(), 1);
    }

    #[test]
    fn actions_move_camera_on_next_advance() {
        let mut d = diorama(800, 600, 1.0);
        let start = d.camera().position;
        d.handle_action(Action::Orbit(Vec2::new(200.0, 0.0)));
        assert_eq!(d.camera().position, start);
        d.advance(0.016);
        assert_ne!(d.camera().position, start);
    }

    #[test]
    fn color_edits_touch_only_their_uniform() {
        let mut d = diorama(800, 600, 1.0);
        d.set_portal_color_start(Rgb::BLACK);
        assert_eq!(d.portal_uniforms().color_start.to_array(), [0.0, 0.0, 0.0]);
        assert_eq!(d.portal_uniforms().color_end, Rgb::WHITE);
        d.set_clear_color(Rgb::WHITE);
        assert_eq!(d.clear_color(), Rgb::WHITE);
        assert_eq!(d.portal_uniforms().color_start, Rgb::BLACK);
    }

    #[test]
    fn point_size_is_clamped_before_upload() {
        let mut d = diorama(800, 600, 1.0);
        assert_eq!(d.set_point_size(600.0), 500.0);
        assert_eq!(d.fireflies_uniforms().point_size, 500.0);
    }

    #[test]
    fn attach_feeds_the_scene() {
        let mut d = diorama(800, 600, 1.0);
        let report = d.attach_loaded_nodes(LoadedModel {
            nodes: vec![LoadedNode {
                name: "portalLight".into(),
                mesh: MeshData::default(),
            }],
            baked_texture: TextureData::white(),
        });
        assert_eq!(report.attached, 1);
        assert!(d.scene().node("portalLight").is_some());
        assert_eq!(d.fireflies().len(), 30);
    }
}
