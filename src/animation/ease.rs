use crate::foundation::error::{ReelError, ReelResult};
use std::f64::consts::PI;

/// Easing functions used to map normalized transition progress.
///
/// Every variant is monotonic on `[0, 1]` with `apply(0) == 0` and `apply(1) == 1` exactly. The set
/// is closed: ids outside it are rejected by [`Ease::from_id`] instead of falling back to a default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    #[default]
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
    /// Sinusoidal ease-in.
    InSine,
    /// Sinusoidal ease-out.
    OutSine,
    /// Sinusoidal ease-in/out.
    InOutSine,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
    /// Exponential ease-in/out.
    InOutExpo,
    /// Circular ease-in.
    InCirc,
    /// Circular ease-out.
    OutCirc,
    /// Circular ease-in/out.
    InOutCirc,
}

const IDS: &[(Ease, &str)] = &[
    (Ease::Linear, "linear"),
    (Ease::InQuad, "easeInQuad"),
    (Ease::OutQuad, "easeOutQuad"),
    (Ease::InOutQuad, "easeInOutQuad"),
    (Ease::InCubic, "easeInCubic"),
    (Ease::OutCubic, "easeOutCubic"),
    (Ease::InOutCubic, "easeInOutCubic"),
    (Ease::InQuart, "easeInQuart"),
    (Ease::OutQuart, "easeOutQuart"),
    (Ease::InOutQuart, "easeInOutQuart"),
    (Ease::InQuint, "easeInQuint"),
    (Ease::OutQuint, "easeOutQuint"),
    (Ease::InOutQuint, "easeInOutQuint"),
    (Ease::InSine, "easeInSine"),
    (Ease::OutSine, "easeOutSine"),
    (Ease::InOutSine, "easeInOutSine"),
    (Ease::InExpo, "easeInExpo"),
    (Ease::OutExpo, "easeOutExpo"),
    (Ease::InOutExpo, "easeInOutExpo"),
    (Ease::InCirc, "easeInCirc"),
    (Ease::OutCirc, "easeOutCirc"),
    (Ease::InOutCirc, "easeInOutCirc"),
];

impl Ease {
    /// All registered easings, in registry order.
    pub fn all() -> impl Iterator<Item = Ease> {
        IDS.iter().map(|(e, _)| *e)
    }

    /// Look up an easing by its registry id (e.g. `"easeInOutCubic"`).
    pub fn from_id(id: &str) -> ReelResult<Self> {
        let id = id.trim();
        IDS.iter()
            .find(|(_, name)| *name == id)
            .map(|(e, _)| *e)
            .ok_or_else(|| ReelError::UnknownEasing(id.to_owned()))
    }

    /// Registry id of this easing.
    pub fn id(self) -> &'static str {
        IDS.iter()
            .find(|(e, _)| *e == self)
            .map(|(_, name)| *name)
            .unwrap_or("linear")
    }

    /// Apply this easing function to normalized progress `t`.
    ///
    /// Inputs are clamped to `[0, 1]`; the endpoints are returned exactly.
    pub fn apply(self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(5) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InExpo => 2f64.powf(10.0 * t - 10.0),
            Self::OutExpo => 1.0 - 2f64.powf(-10.0 * t),
            Self::InOutExpo => {
                if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = ReelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_id(&value)
    }
}

impl From<Ease> for &'static str {
    fn from(value: Ease) -> Self {
        value.id()
    }
}

impl std::str::FromStr for Ease {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
