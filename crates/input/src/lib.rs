//! Pointer gestures.
//!
//! Hosts translate their native pointer events into [`Gesture`]s, usually
//! through a [`PointerState`]. Camera controls consume gestures, never raw
//! window events.

pub mod gesture;

pub use gesture::{Gesture, PointerButton, PointerState};
