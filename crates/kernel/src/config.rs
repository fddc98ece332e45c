use diorama_common::Rgb;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Startup configuration. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DioramaConfig {
    pub fireflies_count: usize,
    pub portal_color_start: Rgb,
    pub portal_color_end: Rgb,
    pub clear_color: Rgb,
    pub point_size: f32,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
}

impl Default for DioramaConfig {
    fn default() -> Self {
        Self {
            fireflies_count: 30,
            portal_color_start: Rgb::from_rgb8([0xcd, 0x62, 0xcd]),
            portal_color_end: Rgb::WHITE,
            clear_color: Rgb::from_rgb8([0xb4, 0xd0, 0xff]),
            point_size: 40.0,
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl DioramaConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path.as_ref())?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        tracing::debug!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Perspective camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            position: [4.0, 2.0, 4.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Orbit control tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            min_distance: 0.0,
            max_distance: 100.0,
        }
    }
}
