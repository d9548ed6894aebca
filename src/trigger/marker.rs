use std::{fmt, str::FromStr};

use crate::foundation::{
    core::{Rect, Viewport},
    error::{StageError, StageResult},
};

/// A horizontal line within a box: an edge, a percentage, or a pixel offset from the top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    /// Top edge.
    Top,
    /// Vertical center.
    Center,
    /// Bottom edge.
    Bottom,
    /// Percent of the box height from its top.
    Percent(f64),
    /// Pixels from the box top.
    Px(f64),
}

impl Edge {
    /// Offset from the top of a box of height `size`.
    pub fn offset(self, size: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => size / 2.0,
            Self::Bottom => size,
            Self::Percent(p) => size * p / 100.0,
            Self::Px(px) => px,
        }
    }
}

fn parse_number(src: &str, n: &str) -> StageResult<f64> {
    n.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| StageError::trigger(format!("invalid marker '{src}'")))
}

impl Edge {
    fn parse(src: &str, token: &str) -> StageResult<Self> {
        match token {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            t => {
                if let Some(n) = t.strip_suffix('%') {
                    Ok(Self::Percent(parse_number(src, n)?))
                } else {
                    Ok(Self::Px(parse_number(src, t.strip_suffix("px").unwrap_or(t))?))
                }
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// A scroll distance for relative end markers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distance {
    /// Pixels.
    Px(f64),
    /// Percent of the viewport height.
    Vh(f64),
    /// Percent of the region's height.
    Percent(f64),
}

impl Distance {
    fn pixels(self, region: Rect, viewport: Viewport) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Vh(v) => viewport.height * v / 100.0,
            Self::Percent(p) => region.height() * p / 100.0,
        }
    }
}

/// Scroll position marker.
///
/// `"<region edge> <viewport edge>"`: the scroll offset at which the region's edge meets the
/// viewport's edge (`"top top"`, `"bottom 25%"`, `"center 90%"`). `"+=<distance>"`: offset
/// from the resolved start (`"+=1300vh"`, `"+=400px"`, `"+=50%"`), valid only as an end marker.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Marker {
    /// Region edge meets viewport edge.
    Edges {
        /// Line within the region.
        region: Edge,
        /// Line within the viewport.
        viewport: Edge,
    },
    /// Distance past the start marker.
    Relative(Distance),
}

impl Marker {
    /// Region top meets viewport top.
    pub const TOP_TOP: Self = Self::Edges {
        region: Edge::Top,
        viewport: Edge::Top,
    };

    /// Resolve to an absolute scroll offset.
    ///
    /// `start` is the already resolved start offset, required by relative markers.
    pub fn resolve(self, region: Rect, viewport: Viewport, start: Option<f64>) -> StageResult<f64> {
        match self {
            Self::Edges {
                region: r,
                viewport: v,
            } => Ok(region.y0 + r.offset(region.height()) - v.offset(viewport.height)),
            Self::Relative(d) => {
                let start = start.ok_or_else(|| {
                    StageError::trigger("relative marker is only valid as an end marker")
                })?;
                Ok(start + d.pixels(region, viewport))
            }
        }
    }

    /// `true` for `"+=..."` markers.
    pub fn is_relative(self) -> bool {
        matches!(self, Self::Relative(_))
    }
}

impl FromStr for Marker {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let t = s.trim();
        if let Some(rest) = t.strip_prefix("+=") {
            let rest = rest.trim();
            let d = if let Some(n) = rest.strip_suffix("vh") {
                Distance::Vh(parse_number(s, n)?)
            } else if let Some(n) = rest.strip_suffix('%') {
                Distance::Percent(parse_number(s, n)?)
            } else {
                Distance::Px(parse_number(s, rest.strip_suffix("px").unwrap_or(rest))?)
            };
            return Ok(Self::Relative(d));
        }
        let mut tokens = t.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(r), v, None) => Ok(Self::Edges {
                region: Edge::parse(s, r)?,
                viewport: v.map_or(Ok(Edge::Top), |v| Edge::parse(s, v))?,
            }),
            _ => Err(StageError::trigger(format!("invalid marker '{s}'"))),
        }
    }
}

impl TryFrom<String> for Marker {
    type Error = StageError;

    fn try_from(value: String) -> StageResult<Self> {
        value.parse()
    }
}

impl From<Marker> for String {
    fn from(value: Marker) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edges { region, viewport } => write!(f, "{region} {viewport}"),
            Self::Relative(Distance::Px(px)) => write!(f, "+={px}px"),
            Self::Relative(Distance::Vh(v)) => write!(f, "+={v}vh"),
            Self::Relative(Distance::Percent(p)) => write!(f, "+={p}%"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/marker.rs"]
mod tests;
