//! Composer configuration, loaded from YAML.
//!
//! Every section falls back to its defaults, so an empty document is a valid
//! configuration.

use std::path::Path;

use glam::Vec3;
use lego_common::Color;
use lego_debug::{DEFAULT_MULTIPLE, DebugSettings};
use lego_render::RendererSettings;
use lego_scene::{CameraSettings, ControlsSettings, Light};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ground slab: a `width` x `depth` rectangle extruded downward by
/// `thickness`, top face at y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSettings {
    pub width: f32,
    pub depth: f32,
    pub thickness: f32,
    pub color: Color,
}

impl Default for GroundSettings {
    fn default() -> Self {
        Self {
            width: 40.0,
            depth: 40.0,
            thickness: 0.5,
            color: Color::from_hex(0x3a3a44),
        }
    }
}

/// A light placed in the scene at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    pub light: Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Create the debug binder and panel.
    pub enabled: bool,
    /// Slider range multiple.
    pub multiple: f32,
    /// Keep frame statistics for the overlay.
    pub stats: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            multiple: DEFAULT_MULTIPLE,
            stats: true,
        }
    }
}

impl DebugConfig {
    pub fn settings(&self) -> DebugSettings {
        DebugSettings {
            multiple: self.multiple,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegoConfig {
    pub camera: CameraSettings,
    pub controls: ControlsSettings,
    pub renderer: RendererSettings,
    pub ground: GroundSettings,
    pub lights: Vec<LightConfig>,
    pub debug: DebugConfig,
}

impl Default for LegoConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            controls: ControlsSettings::default(),
            renderer: RendererSettings::default(),
            ground: GroundSettings::default(),
            lights: vec![
                LightConfig {
                    name: "ambient".into(),
                    position: Vec3::ZERO,
                    light: Light::ambient(Color::WHITE, 0.4),
                },
                LightConfig {
                    name: "sun".into(),
                    position: Vec3::new(5.0, 10.0, 7.5),
                    light: Light::directional(Color::WHITE, 1.0),
                },
            ],
            debug: DebugConfig::default(),
        }
    }
}

impl LegoConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), lights = config.lights.len(), "config loaded");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the camera or ground cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.camera;
        if !(c.fov > 0.0 && c.fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera fov must be in (0, 180) degrees, got {}",
                c.fov
            )));
        }
        if !(c.near > 0.0 && c.near < c.far) {
            return Err(ConfigError::Invalid(format!(
                "camera needs 0 < near < far, got near={} far={}",
                c.near, c.far
            )));
        }
        let g = &self.ground;
        if !(g.width > 0.0 && g.depth > 0.0 && g.thickness > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ground dimensions must be positive, got {}x{}x{}",
                g.width, g.depth, g.thickness
            )));
        }
        if !self.debug.multiple.is_finite() {
            return Err(ConfigError::Invalid("debug multiple must be finite".into()));
        }
        Ok(())
    }
}
