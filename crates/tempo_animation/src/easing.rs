//! Easing presets for timing animations

use std::fmt;
use std::str::FromStr;

use crate::bezier::CubicBezier;
use crate::error::{AnimationError, Result};

/// Easing specification: a named preset or raw control points
///
/// Every variant resolves to a cubic bezier. The preset table is the one this
/// library has always shipped, which does not line up with CSS naming:
/// `Linear` is CSS `ease`, and `Ease` is the straight diagonal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Control points as `[x1, y1, x2, y2]`
    pub fn control_points(&self) -> [f64; 4] {
        match *self {
            Easing::Linear => [0.25, 0.1, 0.25, 1.0],
            Easing::Ease => [0.0, 0.0, 1.0, 1.0],
            Easing::EaseIn => [0.42, 0.0, 1.0, 1.0],
            Easing::EaseOut => [0.0, 0.0, 0.58, 1.0],
            Easing::EaseInOut => [0.42, 0.0, 0.58, 1.0],
            Easing::CubicBezier(x1, y1, x2, y2) => [x1, y1, x2, y2],
        }
    }

    /// Build the curve for this easing
    ///
    /// Fails only for `CubicBezier` with x values outside `[0, 1]`.
    pub fn curve(&self) -> Result<CubicBezier> {
        CubicBezier::try_from(self.control_points())
    }
}

impl From<[f64; 4]> for Easing {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Easing::CubicBezier(x1, y1, x2, y2)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Ease => f.write_str("ease"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

/// Parses preset names (`ease-in` or `easeIn`) and `cubic-bezier(x1, y1, x2, y2)`
impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "linear" => Ok(Easing::Linear),
            "ease" => Ok(Easing::Ease),
            "ease-in" | "easeIn" => Ok(Easing::EaseIn),
            "ease-out" | "easeOut" => Ok(Easing::EaseOut),
            "ease-in-out" | "easeInOut" => Ok(Easing::EaseInOut),
            other => {
                parse_cubic_bezier(other).ok_or_else(|| AnimationError::InvalidEasing(s.to_string()))
            }
        }
    }
}

fn parse_cubic_bezier(s: &str) -> Option<Easing> {
    let args = s.strip_prefix("cubic-bezier(")?.strip_suffix(')')?;
    let mut parts = args.split(',');
    let mut points = [0.0; 4];
    for point in points.iter_mut() {
        *point = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Easing::from(points))
}
