use crate::config::{CameraConfig, ControlsConfig};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Perspective camera looking at a point.
///
/// The projection matrix is cached; [`PerspectiveCamera::set_aspect`]
/// rebuilds it so a resize never leaves a stale projection behind.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub look_at: Vec3,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            look_at: Vec3::from_array(config.target),
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Vertical field of view in radians.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}

/// Angle kept between the camera and the poles.
const POLE_EPSILON: f32 = 1e-6;
/// Radius multiplier for one zoom step.
const ZOOM_STEP_SCALE: f32 = 0.95;

/// Orbit controls around a target point.
///
/// User input accumulates pending motion; [`OrbitControls::update`] applies it
/// once per frame. With damping enabled only `damping_factor` of the pending
/// rotation and pan is applied per update and the rest decays geometrically,
/// so the camera eases toward where the user dragged it.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending (azimuth, polar) change in radians.
    pending_rotation: Vec2,
    pending_pan: Vec3,
    pending_scale: f32,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig, target: Vec3) -> Self {
        Self {
            target,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            rotate_speed: config.rotate_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            pending_rotation: Vec2::ZERO,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_rotation.x -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_rotation.y -= angle;
    }

    /// Rotate from a pointer drag of `delta` logical pixels.
    pub fn rotate_by_drag(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.rotate_left(TAU * delta.x / height * self.rotate_speed);
        self.rotate_up(TAU * delta.y / height * self.rotate_speed);
    }

    /// Pan from a pointer drag so the scene follows the cursor at the target depth.
    pub fn pan_by_drag(&mut self, delta: Vec2, viewport_height: f32, camera: &PerspectiveCamera) {
        let height = viewport_height.max(1.0);
        let target_distance = (camera.position - self.target).length() * (camera.fov() / 2.0).tan();
        let left = 2.0 * delta.x * target_distance / height;
        let up = 2.0 * delta.y * target_distance / height;
        self.pending_pan += camera.right() * -left + camera.up() * up;
    }

    /// Positive steps move the camera toward the target.
    pub fn dolly(&mut self, steps: f32) {
        self.pending_scale *= ZOOM_STEP_SCALE.powf(steps);
    }

    /// True while damped motion is still settling.
    pub fn is_settling(&self) -> bool {
        self.pending_rotation.length_squared() > POLE_EPSILON * POLE_EPSILON
            || self.pending_pan.length_squared() > POLE_EPSILON * POLE_EPSILON
    }

    /// Advance one step and move the camera.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        let applied = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.pending_rotation.x * applied;
        phi += self.pending_rotation.y * applied;
        phi = phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pending_pan * applied;

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at = self.target;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.pending_rotation *= decay;
            self.pending_pan *= decay;
        } else {
            self.pending_rotation = Vec2::ZERO;
            self.pending_pan = Vec3::ZERO;
        }
        self.pending_scale = 1.0;
    }
}
