use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{StageError, StageResult};

/// Curve mapping linear time progress to interpolation progress.
///
/// Input is clamped to `[0, 1]`; elastic and back curves may overshoot on output.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub enum EasingMode {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    /// `count` equal jumps; `at_start` jumps at the beginning of each interval.
    Steps { count: u32, at_start: bool },
    /// CSS-style cubic Bézier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// CSS `ease`.
    Ease,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
}

const NAMED: &[(EasingMode, &str)] = &[
    (EasingMode::Linear, "linear"),
    (EasingMode::EaseInQuad, "ease-in-quad"),
    (EasingMode::EaseOutQuad, "ease-out-quad"),
    (EasingMode::EaseInOutQuad, "ease-in-out-quad"),
    (EasingMode::EaseInCubic, "ease-in-cubic"),
    (EasingMode::EaseOutCubic, "ease-out-cubic"),
    (EasingMode::EaseInOutCubic, "ease-in-out-cubic"),
    (EasingMode::EaseInQuart, "ease-in-quart"),
    (EasingMode::EaseOutQuart, "ease-out-quart"),
    (EasingMode::EaseInOutQuart, "ease-in-out-quart"),
    (EasingMode::EaseInQuint, "ease-in-quint"),
    (EasingMode::EaseOutQuint, "ease-out-quint"),
    (EasingMode::EaseInOutQuint, "ease-in-out-quint"),
    (EasingMode::EaseInSine, "ease-in-sine"),
    (EasingMode::EaseOutSine, "ease-out-sine"),
    (EasingMode::EaseInOutSine, "ease-in-out-sine"),
    (EasingMode::EaseInExpo, "ease-in-expo"),
    (EasingMode::EaseOutExpo, "ease-out-expo"),
    (EasingMode::EaseInOutExpo, "ease-in-out-expo"),
    (EasingMode::EaseInCirc, "ease-in-circ"),
    (EasingMode::EaseOutCirc, "ease-out-circ"),
    (EasingMode::EaseInOutCirc, "ease-in-out-circ"),
    (EasingMode::EaseInElastic, "ease-in-elastic"),
    (EasingMode::EaseOutElastic, "ease-out-elastic"),
    (EasingMode::EaseInOutElastic, "ease-in-out-elastic"),
    (EasingMode::EaseInBack, "ease-in-back"),
    (EasingMode::EaseOutBack, "ease-out-back"),
    (EasingMode::EaseInOutBack, "ease-in-out-back"),
    (EasingMode::EaseInBounce, "ease-in-bounce"),
    (EasingMode::EaseOutBounce, "ease-out-bounce"),
    (EasingMode::EaseInOutBounce, "ease-in-out-bounce"),
    (EasingMode::Ease, "ease"),
    (EasingMode::EaseIn, "ease-in"),
    (EasingMode::EaseOut, "ease-out"),
    (EasingMode::EaseInOut, "ease-in-out"),
];

impl EasingMode {
    /// Map linear progress `t` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::EaseInQuart => t.powi(4),
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::EaseInQuint => t.powi(5),
            Self::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Self::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(5) / 2.0)
                }
            }
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::EaseInOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Self::EaseInElastic => {
                let c4 = 2.0 * PI / 3.0;
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -(2f64.powf(10.0 * t - 10.0)) * ((10.0 * t - 10.75) * c4).sin()
                }
            }
            Self::EaseOutElastic => {
                let c4 = 2.0 * PI / 3.0;
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * c4).sin() + 1.0
                }
            }
            Self::EaseInOutElastic => {
                let c5 = 2.0 * PI / 4.5;
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                } else {
                    2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin() / 2.0 + 1.0
                }
            }
            Self::EaseInBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                c3 * t * t * t - c1 * t * t
            }
            Self::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
            Self::EaseInOutBack => {
                let c2 = 1.70158 * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            Self::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Self::EaseOutBounce => bounce_out(t),
            Self::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Self::Steps { count, at_start } => {
                let n = f64::from(count.max(1));
                let step = if at_start {
                    ((t * n).floor() + 1.0).min(n)
                } else {
                    (t * n).floor()
                };
                step / n
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
        }
    }

    /// Parse a kebab-case mode name, `steps(n[, start|end])`, `step-start`, `step-end`
    /// or `cubic-bezier(x1, y1, x2, y2)`.
    pub fn parse(s: &str) -> StageResult<Self> {
        let s = s.trim().to_ascii_lowercase();
        if let Some((mode, _)) = NAMED.iter().find(|(_, name)| *name == s) {
            return Ok(*mode);
        }
        match s.as_str() {
            "step-start" => {
                return Ok(Self::Steps {
                    count: 1,
                    at_start: true,
                });
            }
            "step-end" => {
                return Ok(Self::Steps {
                    count: 1,
                    at_start: false,
                });
            }
            _ => {}
        }

        if let Some(args) = call_args(&s, "steps") {
            let (count, at_start) = match args.as_slice() {
                [n] => (*n, false),
                [n, pos] if *pos == "start" => (*n, true),
                [n, pos] if *pos == "end" => (*n, false),
                _ => return Err(StageError::config(format!("invalid steps easing \"{s}\""))),
            };
            let count = count
                .parse::<u32>()
                .ok()
                .filter(|c| *c > 0)
                .ok_or_else(|| StageError::config(format!("invalid step count in \"{s}\"")))?;
            return Ok(Self::Steps { count, at_start });
        }

        if let Some(args) = call_args(&s, "cubic-bezier") {
            let nums = args
                .iter()
                .map(|a| a.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| StageError::config(format!("invalid cubic-bezier \"{s}\"")))?;
            let [x1, y1, x2, y2] = nums.as_slice() else {
                return Err(StageError::config(format!(
                    "cubic-bezier needs 4 numbers, got \"{s}\""
                )));
            };
            if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
                return Err(StageError::config(
                    "cubic-bezier x control points must be within [0, 1]",
                ));
            }
            return Ok(Self::CubicBezier {
                x1: *x1,
                y1: *y1,
                x2: *x2,
                y2: *y2,
            });
        }

        Err(StageError::config(format!("unknown easing mode \"{s}\"")))
    }
}

fn call_args<'a>(s: &'a str, func: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(func)?.trim_start().strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

fn bounce_out(t: f64) -> f64 {
    let n1 = 7.5625;
    let d1 = 2.75;
    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    // One-dimensional Bézier with endpoints 0 and 1.
    fn sample(a: f64, b: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    }
    fn slope(a: f64, b: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
    }

    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    let mut s = t;
    for _ in 0..8 {
        let err = sample(x1, x2, s) - t;
        if err.abs() < 1e-7 {
            return sample(y1, y2, s);
        }
        let d = slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = sample(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    sample(y1, y2, s)
}

impl fmt::Display for EasingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steps { count, at_start } => {
                write!(f, "steps({count}, {})", if *at_start { "start" } else { "end" })
            }
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            other => {
                let name = NAMED
                    .iter()
                    .find(|(mode, _)| mode == other)
                    .map(|(_, name)| *name)
                    .unwrap_or("linear");
                f.write_str(name)
            }
        }
    }
}

impl FromStr for EasingMode {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for EasingMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for EasingMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
