//! Developer tooling: frame statistics and a read-only scene inspector.
//!
//! # Invariants
//! - Tools only read the scene.
//! - Frame statistics keep a bounded history.

mod inspector;
mod stats;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
pub use stats::{FRAME_TIME_HISTORY_SIZE, FrameStats, TARGET_FRAME_TIME_MS};
