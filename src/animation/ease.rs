use std::{f64::consts::PI, fmt, str::FromStr};

use crate::foundation::error::{StageError, StageResult};

/// Easing functions used to map normalized animation progress.
///
/// Serialized with their `family.direction` names (`"power2.out"`, `"expo.inOut"`, `"none"`).
/// `power1`..`power4` are quad..quint; a bare family name means `out`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Linear interpolation (`none`).
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    #[default]
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in/out.
    InOutQuart,
    /// Quintic ease-in.
    InQuint,
    /// Quintic ease-out.
    OutQuint,
    /// Quintic ease-in/out.
    InOutQuint,
    /// Sine ease-in.
    InSine,
    /// Sine ease-out.
    OutSine,
    /// Sine ease-in/out.
    InOutSine,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
    /// Exponential ease-in/out.
    InOutExpo,
}

#[derive(Clone, Copy)]
enum Dir {
    In,
    Out,
    InOut,
}

impl Ease {
    /// Every supported ease, in declaration order.
    pub const ALL: [Ease; 19] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InQuart,
        Ease::OutQuart,
        Ease::InOutQuart,
        Ease::InQuint,
        Ease::OutQuint,
        Ease::InOutQuint,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::InExpo,
        Ease::OutExpo,
        Ease::InOutExpo,
    ];

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad | Self::OutQuad | Self::InOutQuad => self.power(t, 2),
            Self::InCubic | Self::OutCubic | Self::InOutCubic => self.power(t, 3),
            Self::InQuart | Self::OutQuart | Self::InOutQuart => self.power(t, 4),
            Self::InQuint | Self::OutQuint | Self::InOutQuint => self.power(t, 5),
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }

    fn power(self, t: f64, n: i32) -> f64 {
        match self.dir() {
            Dir::In => t.powi(n),
            Dir::Out => 1.0 - (1.0 - t).powi(n),
            Dir::InOut => {
                if t < 0.5 {
                    2f64.powi(n - 1) * t.powi(n)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(n) / 2.0)
                }
            }
        }
    }

    fn dir(self) -> Dir {
        match self {
            Self::InQuad | Self::InCubic | Self::InQuart | Self::InQuint => Dir::In,
            Self::InSine | Self::InExpo => Dir::In,
            Self::InOutQuad | Self::InOutCubic | Self::InOutQuart | Self::InOutQuint => Dir::InOut,
            Self::InOutSine | Self::InOutExpo => Dir::InOut,
            _ => Dir::Out,
        }
    }

    fn from_parts(family: &str, dir: Dir) -> Option<Self> {
        use Dir::{In, InOut, Out};
        let ease = match (family, dir) {
            ("power1" | "quad", In) => Self::InQuad,
            ("power1" | "quad", Out) => Self::OutQuad,
            ("power1" | "quad", InOut) => Self::InOutQuad,
            ("power2" | "cubic", In) => Self::InCubic,
            ("power2" | "cubic", Out) => Self::OutCubic,
            ("power2" | "cubic", InOut) => Self::InOutCubic,
            ("power3" | "quart", In) => Self::InQuart,
            ("power3" | "quart", Out) => Self::OutQuart,
            ("power3" | "quart", InOut) => Self::InOutQuart,
            ("power4" | "quint" | "strong", In) => Self::InQuint,
            ("power4" | "quint" | "strong", Out) => Self::OutQuint,
            ("power4" | "quint" | "strong", InOut) => Self::InOutQuint,
            ("sine", In) => Self::InSine,
            ("sine", Out) => Self::OutSine,
            ("sine", InOut) => Self::InOutSine,
            ("expo", In) => Self::InExpo,
            ("expo", Out) => Self::OutExpo,
            ("expo", InOut) => Self::InOutExpo,
            _ => return None,
        };
        Some(ease)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Linear => "none",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::InQuart => "power3.in",
            Self::OutQuart => "power3.out",
            Self::InOutQuart => "power3.inOut",
            Self::InQuint => "power4.in",
            Self::OutQuint => "power4.out",
            Self::InOutQuint => "power4.inOut",
            Self::InSine => "sine.in",
            Self::OutSine => "sine.out",
            Self::InOutSine => "sine.inOut",
            Self::InExpo => "expo.in",
            Self::OutExpo => "expo.out",
            Self::InOutExpo => "expo.inOut",
        }
    }
}

impl FromStr for Ease {
    type Err = StageError;

    fn from_str(s: &str) -> StageResult<Self> {
        let s = s.trim();
        if matches!(s, "none" | "linear" | "power0") {
            return Ok(Self::Linear);
        }
        let (family, dir) = match s.split_once('.') {
            None => (s, Dir::Out),
            Some((family, "in")) => (family, Dir::In),
            Some((family, "out")) => (family, Dir::Out),
            Some((family, "inOut")) => (family, Dir::InOut),
            Some(_) => return Err(StageError::animation(format!("unknown ease '{s}'"))),
        };
        if family == "power0" {
            return Ok(Self::Linear);
        }
        Self::from_parts(family, dir)
            .ok_or_else(|| StageError::animation(format!("unknown ease '{s}'")))
    }
}

impl TryFrom<String> for Ease {
    type Error = StageError;

    fn try_from(value: String) -> StageResult<Self> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.name().to_owned()
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
