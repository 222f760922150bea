use std::cell::RefCell;
use std::rc::Rc;

use lego_common::Color;
use serde::{Deserialize, Serialize};

use crate::options::{OptionValue, Options, Param};
use crate::panel::{Control, DebugPanel, Folder};

/// Slider range multiple used when none is configured.
pub const DEFAULT_MULTIPLE: f32 = 3.0;

/// Binder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Slider range is `[-value * multiple, value * multiple]`.
    pub multiple: f32,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            multiple: DEFAULT_MULTIPLE,
        }
    }
}

/// The panel-owned clone of an options record.
///
/// Shared between the panel folder and the caller. The panel writes through
/// it when a control is edited; the caller reads it and applies the values
/// to its own object.
#[derive(Debug, Clone)]
pub struct BoundParams(Rc<RefCell<Options>>);

impl BoundParams {
    fn new(options: Options) -> Self {
        Self(Rc::new(RefCell::new(options)))
    }

    pub fn value(&self, field: &str) -> Option<OptionValue> {
        self.0.borrow().get(field).copied()
    }

    pub fn number(&self, field: &str) -> Option<f32> {
        self.value(field).and_then(|v| v.as_number())
    }

    pub fn color(&self, field: &str) -> Option<Color> {
        self.value(field).map(|v| v.as_color())
    }

    /// Write a number. Returns false if the field is missing or holds a color.
    /// The value is not clamped to the slider range.
    pub fn set_number(&self, field: &str, value: f32) -> bool {
        let mut options = self.0.borrow_mut();
        match options.get_mut(field) {
            Some(slot) if matches!(slot, OptionValue::Number(_)) => {
                *slot = OptionValue::Number(value);
                true
            }
            _ => false,
        }
    }

    /// Write a color, keeping the field's shape: a field that held a packed
    /// hex number keeps holding one.
    pub fn set_color(&self, field: &str, color: Color) -> bool {
        let mut options = self.0.borrow_mut();
        let Some(slot) = options.get_mut(field) else {
            return false;
        };
        *slot = match slot {
            OptionValue::Number(_) => OptionValue::Number(color.to_hex() as f32),
            OptionValue::Color(_) => OptionValue::Color(color),
        };
        true
    }

    pub fn snapshot(&self) -> Options {
        self.0.borrow().clone()
    }

    pub fn fields(&self) -> Vec<String> {
        self.0.borrow().keys().map(str::to_owned).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// True when both handles point at the same bound record.
    pub fn same_record(&self, other: &BoundParams) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Registers tunable values as controls in a shared [`DebugPanel`].
#[derive(Debug, Clone)]
pub struct DebugBinder {
    panel: DebugPanel,
    settings: DebugSettings,
}

impl DebugBinder {
    pub fn new(panel: DebugPanel, settings: DebugSettings) -> Self {
        Self { panel, settings }
    }

    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }

    pub fn multiple(&self) -> f32 {
        self.settings.multiple
    }

    /// Clone `options` into a new panel folder named `name`.
    ///
    /// The field named `color` gets a color picker; every numeric field gets
    /// a slider over `[-v * multiple, v * multiple]`. Returns the bound clone;
    /// `options` itself is left untouched.
    pub fn add(&self, name: &str, options: &Options) -> BoundParams {
        let multiple = self.settings.multiple;
        let mut controls = Vec::with_capacity(options.len());

        for (field, value) in options.iter() {
            match Param::infer(field, value, multiple) {
                Some(param) => {
                    if let Param::Range { value, .. } = param {
                        if value < 0.0 {
                            tracing::warn!(
                                folder = name,
                                field,
                                value,
                                "negative initial value gives an inverted slider range"
                            );
                        } else if value == 0.0 {
                            tracing::warn!(
                                folder = name,
                                field,
                                "zero initial value gives an empty slider range"
                            );
                        }
                    }
                    controls.push(control_for(field, &param));
                }
                None => {
                    tracing::warn!(
                        folder = name,
                        field,
                        "no control for a color value outside the color field"
                    );
                }
            }
        }

        self.register(name, options.clone(), controls)
    }

    /// Register explicitly typed params in a new folder named `name`.
    pub fn add_params<I, K>(&self, name: &str, params: I) -> BoundParams
    where
        I: IntoIterator<Item = (K, Param)>,
        K: Into<String>,
    {
        let mut options = Options::new();
        let mut controls = Vec::new();
        for (field, param) in params {
            let field = field.into();
            controls.push(control_for(&field, &param));
            options.insert(field, param.initial_value());
        }
        self.register(name, options, controls)
    }

    fn register(&self, name: &str, options: Options, controls: Vec<Control>) -> BoundParams {
        let values = BoundParams::new(options);
        let index = self.panel.push_folder(Folder {
            name: name.to_owned(),
            controls,
            values: values.clone(),
        });
        tracing::debug!(folder = name, index, fields = values.len(), "debug folder added");
        values
    }
}

fn control_for(field: &str, param: &Param) -> Control {
    match param {
        Param::Range { min, max, .. } => Control::Slider {
            field: field.to_owned(),
            min: *min,
            max: *max,
        },
        Param::Color { .. } => Control::Color {
            field: field.to_owned(),
        },
    }
}
