use std::{fmt, str::FromStr};

use crate::foundation::error::{StageError, StageResult};

/// Where a step is placed on its timeline.
///
/// String forms: `"2"` (absolute seconds), `"+=1"` / `"-=0.7"` (relative to the current end of
/// the timeline), `"<"` / `"<+=0.2"` (relative to the previous step's start) and `">"` /
/// `">+=1"` (relative to the previous step's end).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPosition", into = "String")]
pub enum Position {
    /// Absolute time in seconds.
    Absolute(f64),
    /// Offset from the timeline's current end.
    End(f64),
    /// Offset from the start of the previously added step.
    PrevStart(f64),
    /// Offset from the end of the previously added step.
    PrevEnd(f64),
}

impl Default for Position {
    fn default() -> Self {
        Self::End(0.0)
    }
}

/// Cursor state needed to resolve a [`Position`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cursor {
    /// Current timeline end.
    pub end: f64,
    /// Start of the previously added step.
    pub prev_start: f64,
    /// End of the previously added step.
    pub prev_end: f64,
}

impl Position {
    /// Resolve to an absolute start time. Negative results clamp to zero.
    pub fn resolve(self, cursor: Cursor) -> f64 {
        let t = match self {
            Self::Absolute(t) => t,
            Self::End(off) => cursor.end + off,
            Self::PrevStart(off) => cursor.prev_start + off,
            Self::PrevEnd(off) => cursor.prev_end + off,
        };
        t.max(0.0)
    }
}

fn parse_offset(src: &str, rest: &str) -> StageResult<f64> {
    let rest = rest.trim();
    let bad = || StageError::animation(format!("invalid position '{src}'"));
    let v = if rest.is_empty() {
        0.0
    } else if let Some(n) = rest.strip_prefix("+=") {
        n.trim().parse::<f64>().map_err(|_| bad())?
    } else if let Some(n) = rest.strip_prefix("-=") {
        -n.trim().parse::<f64>().map_err(|_| bad())?
    } else {
        rest.parse::<f64>().map_err(|_| bad())?
    };
    if !v.is_finite() {
        return Err(bad());
    }
    Ok(v)
}

impl FromStr for Position {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let t = s.trim();
        if let Some(rest) = t.strip_prefix('<') {
            return Ok(Self::PrevStart(parse_offset(s, rest)?));
        }
        if let Some(rest) = t.strip_prefix('>') {
            return Ok(Self::PrevEnd(parse_offset(s, rest)?));
        }
        if t.is_empty() || t.starts_with("+=") || t.starts_with("-=") {
            return Ok(Self::End(parse_offset(s, t)?));
        }
        let abs = t
            .parse::<f64>()
            .map_err(|_| StageError::animation(format!("invalid position '{s}'")))?;
        if !abs.is_finite() {
            return Err(StageError::animation(format!("invalid position '{s}'")));
        }
        Ok(Self::Absolute(abs))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn rel(f: &mut fmt::Formatter<'_>, prefix: &str, off: f64) -> fmt::Result {
            if off == 0.0 {
                f.write_str(prefix)
            } else if off > 0.0 {
                write!(f, "{prefix}+={off}")
            } else {
                write!(f, "{prefix}-={}", -off)
            }
        }

        match *self {
            Self::Absolute(t) => write!(f, "{t}"),
            Self::End(off) if off == 0.0 => f.write_str("+=0"),
            Self::End(off) => rel(f, "", off),
            Self::PrevStart(off) => rel(f, "<", off),
            Self::PrevEnd(off) => rel(f, ">", off),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Seconds(f64),
    Text(String),
}

impl TryFrom<RawPosition> for Position {
    type Error = StageError;

    fn try_from(raw: RawPosition) -> StageResult<Self> {
        match raw {
            RawPosition::Seconds(t) => Ok(Self::Absolute(t)),
            RawPosition::Text(s) => s.parse(),
        }
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/position.rs"]
mod tests;
