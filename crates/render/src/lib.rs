//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - A renderer reads the scene and camera; it never mutates them.
//! - One call to [`Renderer::render`] produces exactly one frame.
//!
//! The headless [`DebugTextRenderer`] implements the same trait as the GPU
//! backend, so the composer and its tests run without a graphics device.

mod probe;
mod renderer;

pub use probe::{AlwaysSupported, GraphicsProbe, Unsupported};
pub use renderer::{DebugTextRenderer, GridSettings, Renderer, RendererSettings};
