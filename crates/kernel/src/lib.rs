//! Diorama kernel: the application context and everything it owns.
//!
//! # Invariants
//! - Each mutable field has exactly one writer: the frame loop writes `time`,
//!   the resize policy writes viewport-derived values, the debug panel writes
//!   user-edited colors and point size.
//! - Both `time` uniforms hold the same value after every tick.
//! - A resize updates viewport, camera aspect, and pixel ratio together.

pub mod camera;
pub mod clock;
pub mod config;
pub mod context;
pub mod particles;
pub mod scene;
pub mod uniforms;
pub mod viewport;

pub use camera::{OrbitControls, PerspectiveCamera};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CameraConfig, ConfigError, ControlsConfig, DioramaConfig};
pub use context::Diorama;
pub use particles::ParticleField;
pub use scene::{AttachReport, MaterialKind, Scene, SceneNode};
pub use uniforms::{FirefliesUniforms, PortalUniforms};
pub use viewport::{MAX_PIXEL_RATIO, SurfaceSize, Viewport, cap_pixel_ratio};
