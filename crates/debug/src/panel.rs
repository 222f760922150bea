use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::binder::BoundParams;
use crate::options::Options;

/// A control registered in a panel folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "lowercase")]
pub enum Control {
    /// Numeric slider. `min` may exceed `max` when the bound value was negative.
    Slider { field: String, min: f32, max: f32 },
    /// Color picker.
    Color { field: String },
}

impl Control {
    pub fn field(&self) -> &str {
        match self {
            Self::Slider { field, .. } | Self::Color { field } => field,
        }
    }
}

/// A named group of controls bound to one cloned options record.
#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub controls: Vec<Control>,
    pub values: BoundParams,
}

/// Serializable snapshot of one folder.
#[derive(Debug, Clone, Serialize)]
pub struct FolderLayout {
    pub name: String,
    pub controls: Vec<Control>,
    pub values: Options,
}

#[derive(Debug, Default)]
struct PanelState {
    folders: Vec<Folder>,
    visible: bool,
}

/// Shared debug panel.
///
/// Cloning the handle does not copy the panel: every clone, and every
/// binder holding one, adds folders to the same list. The panel lives on the
/// UI thread only.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    inner: Rc<RefCell<PanelState>>,
}

impl DebugPanel {
    /// Create an empty, visible panel.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(PanelState {
                folders: Vec::new(),
                visible: true,
            })),
        }
    }

    pub(crate) fn push_folder(&self, folder: Folder) -> usize {
        let mut state = self.inner.borrow_mut();
        state.folders.push(folder);
        state.folders.len() - 1
    }

    /// Snapshot of the folder list. Folder values stay live: editing them
    /// edits the panel's clone.
    pub fn folders(&self) -> Vec<Folder> {
        self.inner.borrow().folders.clone()
    }

    pub fn folder(&self, index: usize) -> Option<Folder> {
        self.inner.borrow().folders.get(index).cloned()
    }

    /// Controls registered in one folder; empty for an unknown index.
    pub fn controls(&self, index: usize) -> Vec<Control> {
        self.inner
            .borrow()
            .folders
            .get(index)
            .map(|f| f.controls.clone())
            .unwrap_or_default()
    }

    pub fn folder_count(&self) -> usize {
        self.inner.borrow().folders.len()
    }

    pub fn folder_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .folders
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.borrow().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.inner.borrow_mut().visible = visible;
    }

    pub fn toggle(&self) {
        let mut state = self.inner.borrow_mut();
        state.visible = !state.visible;
    }

    /// True when both handles address the same panel.
    pub fn same_panel(&self, other: &DebugPanel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn layout(&self) -> Vec<FolderLayout> {
        self.inner
            .borrow()
            .folders
            .iter()
            .map(|f| FolderLayout {
                name: f.name.clone(),
                controls: f.controls.clone(),
                values: f.values.snapshot(),
            })
            .collect()
    }

    pub fn layout_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.layout())
    }
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new()
    }
}
