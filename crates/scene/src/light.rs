use lego_common::Color;
use serde::{Deserialize, Serialize};

/// A light source. Position and direction come from the owning node.
///
/// A directional light shines from its node's position toward the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
    },
    Point {
        color: Color,
        intensity: f32,
        /// Range of influence; 0 means unlimited.
        #[serde(default)]
        distance: f32,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self::Ambient { color, intensity }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self::Directional { color, intensity }
    }

    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Self::Point {
            color,
            intensity,
            distance,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Ambient { .. } => "ambient",
            Self::Directional { .. } => "directional",
            Self::Point { .. } => "point",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Ambient { color, .. }
            | Self::Directional { color, .. }
            | Self::Point { color, .. } => *color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Self::Ambient { intensity, .. }
            | Self::Directional { intensity, .. }
            | Self::Point { intensity, .. } => *intensity,
        }
    }

    pub fn set_color(&mut self, value: Color) {
        match self {
            Self::Ambient { color, .. }
            | Self::Directional { color, .. }
            | Self::Point { color, .. } => *color = value,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Self::Ambient { intensity, .. }
            | Self::Directional { intensity, .. }
            | Self::Point { intensity, .. } => *intensity = value,
        }
    }
}
