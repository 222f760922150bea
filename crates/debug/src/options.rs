use lego_common::Color;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// The one field name that is bound to a color control instead of a slider.
pub const COLOR_FIELD: &str = "color";

/// A single value in an options record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f32),
    Color(Color),
}

impl OptionValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Color(_) => None,
        }
    }

    /// Read the value as a color. Numbers are taken as packed `0xRRGGBB`.
    pub fn as_color(&self) -> Color {
        match self {
            Self::Number(v) => Color::from_hex(v.max(0.0) as u32),
            Self::Color(c) => *c,
        }
    }
}

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        Self::Number(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        Self::Number(v as f32)
    }
}

impl From<Color> for OptionValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

/// A flat, ordered record of tunable values keyed by field name.
///
/// Field order is insertion order and is the order controls appear in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    fields: Vec<(String, OptionValue)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Options::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field. Replacing keeps the field's position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<OptionValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&OptionValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut OptionValue> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (field, value) in iter {
            options.insert(field, value);
        }
        options
    }
}

impl Serialize for Options {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An explicitly typed debug parameter.
///
/// Callers that know what they are exposing pass these to
/// [`DebugBinder::add_params`](crate::DebugBinder::add_params) instead of
/// relying on the `color` field-name convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Param {
    Range { value: f32, min: f32, max: f32 },
    Color { value: Color },
}

impl Param {
    /// Infer a param from a field of an options record.
    ///
    /// `color` becomes a color param whatever the value's shape. Any other
    /// field becomes a range spanning `[-value * multiple, value * multiple]`.
    /// The bounds are not reordered, so a negative value yields `min > max`.
    pub fn infer(field: &str, value: &OptionValue, multiple: f32) -> Option<Self> {
        if field == COLOR_FIELD {
            return Some(Self::Color {
                value: value.as_color(),
            });
        }
        let v = value.as_number()?;
        Some(Self::Range {
            value: v,
            min: -v * multiple,
            max: v * multiple,
        })
    }

    /// The initial value this param carries into the bound record.
    pub fn initial_value(&self) -> OptionValue {
        match self {
            Self::Range { value, .. } => OptionValue::Number(*value),
            Self::Color { value } => OptionValue::Color(*value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_replaces_in_place() {
        let mut o = Options::new().with("a", 1.0).with("b", 2.0);
        o.insert("a", 5.0);
        let keys: Vec<&str> = o.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(o.get("a"), Some(&OptionValue::Number(5.0)));
    }

    #[test]
    fn number_in_color_field_reads_as_hex() {
        let v = OptionValue::Number(0xff0000 as f32);
        assert_eq!(v.as_color(), Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn infer_positive_range() {
        let p = Param::infer("intensity", &OptionValue::Number(2.0), 3.0).unwrap();
        assert_eq!(
            p,
            Param::Range {
                value: 2.0,
                min: -6.0,
                max: 6.0
            }
        );
    }

    #[test]
    fn infer_negative_value_inverts_bounds() {
        let p = Param::infer("y", &OptionValue::Number(-1.0), 3.0).unwrap();
        let Param::Range { min, max, .. } = p else {
            panic!("expected range");
        };
        assert_eq!(min, 3.0);
        assert_eq!(max, -3.0);
    }

    #[test]
    fn infer_color_field_ignores_value_shape() {
        let from_number = Param::infer("color", &OptionValue::Number(16777215.0), 3.0);
        assert!(matches!(from_number, Some(Param::Color { .. })));

        let from_color = Param::infer("color", &OptionValue::Color(Color::BLACK), 3.0);
        assert_eq!(
            from_color,
            Some(Param::Color {
                value: Color::BLACK
            })
        );
    }

    #[test]
    fn infer_color_value_outside_color_field_has_no_range() {
        assert!(Param::infer("tint", &OptionValue::Color(Color::WHITE), 3.0).is_none());
    }

    #[test]
    fn param_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Param::Range {
            value: 1.0,
            min: -3.0,
            max: 3.0,
        })
        .unwrap();
        assert!(json.contains(r#""kind":"range""#));

        let back: Param = serde_json::from_str(r#"{"kind":"color","value":{"r":1,"g":0,"b":0}}"#)
            .unwrap();
        assert_eq!(
            back,
            Param::Color {
                value: Color::rgb(1.0, 0.0, 0.0)
            }
        );
    }

    #[test]
    fn options_serialize_as_map() {
        let o = Options::new().with("intensity", 2.0);
        let json = serde_json::to_string(&o).unwrap();
        assert_eq!(json, r#"{"intensity":2.0}"#);
    }
}
