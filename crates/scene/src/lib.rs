//! Scene graph: nodes (meshes and lights), a perspective camera, procedural
//! geometry and orbit controls.
//!
//! # Invariants
//! - Nodes iterate in a deterministic order (BTreeMap by id).
//! - The renderer reads the scene; it never mutates it.
//! - Camera motion only happens through [`OrbitControls::update`].

pub mod camera;
pub mod controls;
pub mod geometry;
pub mod light;
pub mod scene;

pub use camera::{CameraSettings, PerspectiveCamera};
pub use controls::{ControlsSettings, OrbitControls};
pub use geometry::{Geometry, Mesh};
pub use light::Light;
pub use scene::{Node, NodeKind, Scene, SceneError};
