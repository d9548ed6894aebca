use std::{fmt, str::FromStr};

use crate::foundation::error::{StageError, StageResult};

pub use kurbo::Rect;

/// Index of an element inside a [`Document`](crate::document::Document).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Visible window size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport with positive dimensions.
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(StageError::validation(
                "Viewport width and height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

/// Straight-alpha RGBA8 color, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl FromStr for Rgba8 {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| StageError::animation(format!("color '{s}' must start with '#'")))?;
        let channel = |i: usize| -> StageResult<u8> {
            let pair = hex
                .get(i..i + 2)
                .ok_or_else(|| StageError::animation(format!("color '{s}' is truncated")))?;
            u8::from_str_radix(pair, 16)
                .map_err(|_| StageError::animation(format!("color '{s}' has invalid hex digits")))
        };
        match hex.len() {
            3 => {
                let expand = |c: char| -> StageResult<u8> {
                    let v = c.to_digit(16).ok_or_else(|| {
                        StageError::animation(format!("color '{s}' has invalid hex digits"))
                    })? as u8;
                    Ok(v * 17)
                };
                let mut chars = hex.chars();
                let mut next = || chars.next().map_or(Ok(0), expand);
                Ok(Self::rgb(next()?, next()?, next()?))
            }
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => Err(StageError::animation(format!(
                "color '{s}' must be #rgb, #rrggbb or #rrggbbaa"
            ))),
        }
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
