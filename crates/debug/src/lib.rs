//! Debug-parameter binding.
//!
//! A [`DebugBinder`] takes a flat record of tunable values, clones it, and
//! registers one control per field in a shared [`DebugPanel`]. The panel
//! edits the clone only; callers read the returned [`BoundParams`] each frame
//! and apply the values to whatever they represent.
//!
//! # Invariants
//! - The caller's record is never mutated by the panel.
//! - Slider bounds are computed once, at binding time.
//! - Every `add` creates a new folder; folders are never removed.

mod binder;
mod options;
mod panel;

pub use binder::{BoundParams, DebugBinder, DebugSettings, DEFAULT_MULTIPLE};
pub use options::{OptionValue, Options, Param, COLOR_FIELD};
pub use panel::{Control, DebugPanel, Folder, FolderLayout};
