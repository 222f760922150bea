//! Shared types used across the lego crates.

mod color;
mod types;

pub use color::Color;
pub use types::{NodeId, Transform};
