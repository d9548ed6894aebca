use std::{fmt, str::FromStr};

use crate::foundation::{
    core::Rgba8,
    error::{StageError, StageResult},
    math::lerp,
};

/// Interpolation contract for animation value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp(*a, *b, t)
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            lerp(f64::from(a), f64::from(b), t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// A length in pixels or in percent of the element's own size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percent of the element's own box.
    Percent(f64),
}

impl Length {
    /// Numeric magnitude, regardless of unit.
    pub fn magnitude(self) -> f64 {
        match self {
            Self::Px(v) | Self::Percent(v) => v,
        }
    }

    fn with_magnitude(self, v: f64) -> Self {
        match self {
            Self::Px(_) => Self::Px(v),
            Self::Percent(_) => Self::Percent(v),
        }
    }

    fn same_unit(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Px(_), Self::Px(_)) | (Self::Percent(_), Self::Percent(_))
        )
    }

    /// `true` when both lengths can be interpolated. A zero adopts the other side's unit.
    pub fn compatible(self, other: Self) -> bool {
        self.same_unit(other) || self.magnitude() == 0.0 || other.magnitude() == 0.0
    }

    /// Interpolate two compatible lengths.
    pub fn interpolate(self, other: Self, t: f64) -> StageResult<Self> {
        if !self.compatible(other) {
            return Err(StageError::animation(format!(
                "cannot interpolate between '{self}' and '{other}'"
            )));
        }
        let unit = if self.magnitude() == 0.0 { other } else { self };
        Ok(unit.with_magnitude(lerp(self.magnitude(), other.magnitude(), t)))
    }
}

impl FromStr for Length {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let s = s.trim();
        let parse = |n: &str| -> StageResult<f64> {
            n.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| StageError::animation(format!("invalid length '{s}'")))
        };
        if let Some(n) = s.strip_suffix('%') {
            Ok(Self::Percent(parse(n)?))
        } else if let Some(n) = s.strip_suffix("px") {
            Ok(Self::Px(parse(n)?))
        } else {
            Ok(Self::Px(parse(s)?))
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// A `polygon(...)` clip path; points are `(x, y)` lengths relative to the element box.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPolygon {
    /// Polygon vertices in drawing order.
    pub points: Vec<(Length, Length)>,
}

impl ClipPolygon {
    /// The unclipped rectangle `polygon(0% 0%, 100% 0%, 100% 100%, 0% 100%)`.
    pub fn full() -> Self {
        let p = Length::Percent;
        Self {
            points: vec![
                (p(0.0), p(0.0)),
                (p(100.0), p(0.0)),
                (p(100.0), p(100.0)),
                (p(0.0), p(100.0)),
            ],
        }
    }

    /// `true` when both polygons can be interpolated vertex by vertex.
    pub fn compatible(&self, other: &Self) -> bool {
        self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.0.compatible(b.0) && a.1.compatible(b.1))
    }

    /// Interpolate vertex by vertex.
    pub fn interpolate(&self, other: &Self, t: f64) -> StageResult<Self> {
        if self.points.len() != other.points.len() {
            return Err(StageError::animation(format!(
                "clip polygons have {} and {} points",
                self.points.len(),
                other.points.len()
            )));
        }
        let points = self
            .points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| Ok((a.0.interpolate(b.0, t)?, a.1.interpolate(b.1, t)?)))
            .collect::<StageResult<Vec<_>>>()?;
        Ok(Self { points })
    }
}

impl FromStr for ClipPolygon {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let inner = s
            .trim()
            .strip_prefix("polygon(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| StageError::animation(format!("clip path '{s}' is not polygon(...)")))?;
        let points = inner
            .split(',')
            .map(|pair| {
                let mut it = pair.split_whitespace();
                match (it.next(), it.next(), it.next()) {
                    (Some(x), Some(y), None) => Ok((x.parse::<Length>()?, y.parse::<Length>()?)),
                    _ => Err(StageError::animation(format!(
                        "polygon point '{}' must be 'x y'",
                        pair.trim()
                    ))),
                }
            })
            .collect::<StageResult<Vec<(Length, Length)>>>()?;
        if points.len() < 3 {
            return Err(StageError::animation("polygon needs at least 3 points"));
        }
        Ok(Self { points })
    }
}

impl fmt::Display for ClipPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("polygon(")?;
        for (i, (x, y)) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x} {y}")?;
        }
        f.write_str(")")
    }
}

/// An animatable style value.
///
/// Numbers serialize as JSON numbers; everything else uses its CSS-like string form.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum Value {
    /// Plain number (opacity, scale, rotation in degrees).
    Number(f64),
    /// Length with unit.
    Length(Length),
    /// Clip-path polygon.
    Polygon(ClipPolygon),
    /// Color.
    Color(Rgba8),
}

impl Value {
    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Length(_) => "length",
            Self::Polygon(_) => "polygon",
            Self::Color(_) => "color",
        }
    }

    /// Numeric view of number and length values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Length(l) => Some(l.magnitude()),
            _ => None,
        }
    }

    /// `true` when `self` and `other` can be interpolated.
    pub fn compatible(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(_), Self::Number(_)) | (Self::Color(_), Self::Color(_)) => true,
            (Self::Length(a), Self::Length(b)) => a.compatible(*b),
            (Self::Polygon(a), Self::Polygon(b)) => a.compatible(b),
            _ => false,
        }
    }

    /// Interpolate from `self` to `other` with factor `t`.
    pub fn interpolate(&self, other: &Self, t: f64) -> StageResult<Self> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Ok(Self::Number(f64::lerp(a, b, t))),
            (Self::Length(a), Self::Length(b)) => Ok(Self::Length(a.interpolate(*b, t)?)),
            (Self::Polygon(a), Self::Polygon(b)) => Ok(Self::Polygon(a.interpolate(b, t)?)),
            (Self::Color(a), Self::Color(b)) => Ok(Self::Color(Rgba8::lerp(a, b, t))),
            (a, b) => Err(StageError::animation(format!(
                "cannot interpolate {} into {}",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Length(l) => l.fmt(f),
            Self::Polygon(p) => p.fmt(f),
            Self::Color(c) => c.fmt(f),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl TryFrom<RawValue> for Value {
    type Error = StageError;

    fn try_from(raw: RawValue) -> StageResult<Self> {
        match raw {
            RawValue::Number(v) => Ok(Self::Number(v)),
            RawValue::Text(s) => s.parse(),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(v) => Self::Number(v),
            other => Self::Text(other.to_string()),
        }
    }
}

impl FromStr for Value {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let t = s.trim();
        if t.starts_with("polygon(") {
            return Ok(Self::Polygon(t.parse()?));
        }
        if t.starts_with('#') {
            return Ok(Self::Color(t.parse()?));
        }
        if t.ends_with('%') || t.ends_with("px") {
            return Ok(Self::Length(t.parse()?));
        }
        t.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::Number)
            .ok_or_else(|| StageError::animation(format!("unrecognized value '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
