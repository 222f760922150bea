//! Scene composer.
//!
//! [`Lego`] builds a scene, perspective camera, lights, orbit controls and a
//! ground slab from a [`LegoConfig`], owns a [`Renderer`], and renders one
//! frame per [`Lego::render`] call. When debugging is enabled it also owns a
//! [`DebugBinder`] over a shared [`DebugPanel`] and rolling frame stats.
//!
//! # Invariants
//! - Construction fails unless the mount is a container and the graphics
//!   probe reports support.
//! - The ground node is added exactly once, at construction.
//! - Each frame runs the registered callbacks in registration order, then
//!   updates controls, then renders once.
//! - Frames are driven from outside through [`FrameDriver::advance`]; the
//!   composer never schedules itself.

mod composer;
mod config;
mod driver;
mod error;
mod mount;

pub use composer::{FrameCallback, GROUND_NAME, Lego, ensure_graphics};
pub use config::{DebugConfig, GroundSettings, LegoConfig, LightConfig};
pub use driver::{FrameClock, FrameDriver, run_frames};
pub use error::{ComposeError, ConfigError};
pub use mount::{Mount, MountKind};

pub use lego_common::{Color, NodeId, Transform};
pub use lego_debug::{BoundParams, DebugBinder, DebugPanel, Options, Param};
pub use lego_input::Gesture;
pub use lego_render::{AlwaysSupported, GraphicsProbe, Renderer};
pub use lego_scene::{Light, PerspectiveCamera, Scene};
pub use lego_tools::FrameStats;
