//! wgpu render backend.
//!
//! Draws every visible mesh node with flat per-node color, lit by the scene's
//! ambient, directional and point lights, over an optional reference grid.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - GPU buffers for a mesh are uploaded once per node and dropped when the
//!   node leaves the scene.
//! - At most [`MAX_LIGHTS`] non-ambient lights contribute; extras are ignored.

mod gpu;
mod probe;
mod shaders;

pub use gpu::{MAX_LIGHTS, RenderStatus, WgpuRenderer};
pub use probe::WgpuProbe;
