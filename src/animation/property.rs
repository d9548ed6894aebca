use std::{collections::BTreeMap, fmt};

use crate::{
    animation::value::{ClipPolygon, Length, Value},
    foundation::{
        core::Rgba8,
        error::{StageError, StageResult},
    },
};

/// Animatable style properties.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Horizontal translation.
    X,
    /// Vertical translation.
    Y,
    /// Uniform scale factor.
    Scale,
    /// Rotation in degrees.
    Rotation,
    /// Clip-path polygon.
    ClipPath,
    /// Text color.
    Color,
}

/// Property values keyed by property.
pub type PropertyMap = BTreeMap<Property, Value>;

impl Property {
    /// Value an element has before any animation touches it.
    pub fn initial_value(self) -> Value {
        match self {
            Self::Opacity | Self::Scale => Value::Number(1.0),
            Self::Rotation => Value::Number(0.0),
            Self::X | Self::Y => Value::Length(Length::Px(0.0)),
            Self::ClipPath => Value::Polygon(ClipPolygon::full()),
            Self::Color => Value::Color(Rgba8::WHITE),
        }
    }

    /// Normalize a parsed value into this property's canonical kind.
    ///
    /// Bare numbers on `x`/`y` are pixels.
    pub fn coerce(self, value: Value) -> StageResult<Value> {
        let ok = match (self, &value) {
            (Self::Opacity | Self::Scale | Self::Rotation, Value::Number(_)) => true,
            (Self::X | Self::Y, Value::Number(v)) => {
                return Ok(Value::Length(Length::Px(*v)));
            }
            (Self::X | Self::Y, Value::Length(_)) => true,
            (Self::ClipPath, Value::Polygon(_)) => true,
            (Self::Color, Value::Color(_)) => true,
            _ => false,
        };
        if ok {
            Ok(value)
        } else {
            Err(StageError::animation(format!(
                "property '{self}' does not accept a {} value ('{value}')",
                value.kind()
            )))
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Opacity => "opacity",
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::ClipPath => "clipPath",
            Self::Color => "color",
        };
        f.write_str(name)
    }
}

/// Coerce every entry of `map` to its property's canonical kind.
pub fn coerce_map(map: PropertyMap) -> StageResult<PropertyMap> {
    map.into_iter()
        .map(|(prop, value)| Ok((prop, prop.coerce(value)?)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/property.rs"]
mod tests;
