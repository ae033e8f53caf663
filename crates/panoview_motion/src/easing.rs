// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves for tweens.
//!
//! Every curve maps linear progress in `[0, 1]` to eased progress. The
//! formulas are kept exactly as written so that sampled values are stable
//! across releases.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Named easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// No easing
    #[default]
    Linear,
    /// Quadratic ease in
    InQuad,
    /// Quadratic ease out
    OutQuad,
    /// Quadratic ease in-out
    InOutQuad,
    /// Cubic ease in
    InCubic,
    /// Cubic ease out
    OutCubic,
    /// Cubic ease in-out
    InOutCubic,
    /// Quartic ease in
    InQuart,
    /// Quartic ease out
    OutQuart,
    /// Quartic ease in-out
    InOutQuart,
    /// Quintic ease in
    InQuint,
    /// Quintic ease out
    OutQuint,
    /// Quintic ease in-out
    InOutQuint,
    /// Sine ease in
    InSine,
    /// Sine ease out
    OutSine,
    /// Sine ease in-out
    InOutSine,
    /// Exponential ease in
    InExpo,
    /// Exponential ease out
    OutExpo,
    /// Exponential ease in-out
    InOutExpo,
    /// Circular ease in
    InCirc,
    /// Circular ease out
    OutCirc,
    /// Circular ease in-out
    InOutCirc,
}

impl Easing {
    /// Evaluate the curve at `t`
    pub fn ease(self, t: f64) -> f64 {
        match self {
            Self::Linear => linear(t),
            Self::InQuad => in_quad(t),
            Self::OutQuad => out_quad(t),
            Self::InOutQuad => in_out_quad(t),
            Self::InCubic => in_cubic(t),
            Self::OutCubic => out_cubic(t),
            Self::InOutCubic => in_out_cubic(t),
            Self::InQuart => in_quart(t),
            Self::OutQuart => out_quart(t),
            Self::InOutQuart => in_out_quart(t),
            Self::InQuint => in_quint(t),
            Self::OutQuint => out_quint(t),
            Self::InOutQuint => in_out_quint(t),
            Self::InSine => in_sine(t),
            Self::OutSine => out_sine(t),
            Self::InOutSine => in_out_sine(t),
            Self::InExpo => in_expo(t),
            Self::OutExpo => out_expo(t),
            Self::InOutExpo => in_out_expo(t),
            Self::InCirc => in_circ(t),
            Self::OutCirc => out_circ(t),
            Self::InOutCirc => in_out_circ(t),
        }
    }

    /// Get the camelCase name used in settings files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "inQuad",
            Self::OutQuad => "outQuad",
            Self::InOutQuad => "inOutQuad",
            Self::InCubic => "inCubic",
            Self::OutCubic => "outCubic",
            Self::InOutCubic => "inOutCubic",
            Self::InQuart => "inQuart",
            Self::OutQuart => "outQuart",
            Self::InOutQuart => "inOutQuart",
            Self::InQuint => "inQuint",
            Self::OutQuint => "outQuint",
            Self::InOutQuint => "inOutQuint",
            Self::InSine => "inSine",
            Self::OutSine => "outSine",
            Self::InOutSine => "inOutSine",
            Self::InExpo => "inExpo",
            Self::OutExpo => "outExpo",
            Self::InOutExpo => "inOutExpo",
            Self::InCirc => "inCirc",
            Self::OutCirc => "outCirc",
            Self::InOutCirc => "inOutCirc",
        }
    }

    /// Get all available curves
    pub fn all() -> &'static [Easing] {
        &[
            Self::Linear,
            Self::InQuad,
            Self::OutQuad,
            Self::InOutQuad,
            Self::InCubic,
            Self::OutCubic,
            Self::InOutCubic,
            Self::InQuart,
            Self::OutQuart,
            Self::InOutQuart,
            Self::InQuint,
            Self::OutQuint,
            Self::InOutQuint,
            Self::InSine,
            Self::OutSine,
            Self::InOutSine,
            Self::InExpo,
            Self::OutExpo,
            Self::InOutExpo,
            Self::InCirc,
            Self::OutCirc,
            Self::InOutCirc,
        ]
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an easing name is not in the catalogue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown easing: {0}")]
pub struct UnknownEasing(pub String);

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

/// Easing applied by a tween: a catalogue curve or a caller-supplied function
#[derive(Clone)]
pub enum EasingFn {
    /// Curve from the catalogue
    Named(Easing),
    /// Custom shaping function
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl EasingFn {
    /// Wrap a custom shaping function
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// Evaluate at `t`
    pub fn ease(&self, t: f64) -> f64 {
        match self {
            Self::Named(easing) => easing.ease(t),
            Self::Custom(f) => f(t),
        }
    }
}

impl Default for EasingFn {
    fn default() -> Self {
        Self::Named(Easing::Linear)
    }
}

impl From<Easing> for EasingFn {
    fn from(easing: Easing) -> Self {
        Self::Named(easing)
    }
}

impl fmt::Debug for EasingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(easing) => write!(f, "Named({easing})"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// `t`
#[inline]
pub fn linear(t: f64) -> f64 {
    t
}

/// `t²`
#[inline]
pub fn in_quad(t: f64) -> f64 {
    t * t
}

/// `t·(2−t)`
#[inline]
pub fn out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}

/// Quadratic in-out
#[inline]
pub fn in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// `t³`
#[inline]
pub fn in_cubic(t: f64) -> f64 {
    t * t * t
}

/// `(t−1)³+1`
#[inline]
pub fn out_cubic(t: f64) -> f64 {
    let u = t - 1.0;
    u * u * u + 1.0
}

/// Cubic in-out
#[inline]
pub fn in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}

/// `t⁴`
#[inline]
pub fn in_quart(t: f64) -> f64 {
    t * t * t * t
}

/// `1−(t−1)⁴`
#[inline]
pub fn out_quart(t: f64) -> f64 {
    let u = t - 1.0;
    1.0 - u * u * u * u
}

/// Quartic in-out
#[inline]
pub fn in_out_quart(t: f64) -> f64 {
    if t < 0.5 {
        8.0 * t * t * t * t
    } else {
        let u = t - 1.0;
        1.0 - 8.0 * u * u * u * u
    }
}

/// `t⁵`
#[inline]
pub fn in_quint(t: f64) -> f64 {
    t * t * t * t * t
}

/// `1+(t−1)⁵`
#[inline]
pub fn out_quint(t: f64) -> f64 {
    let u = t - 1.0;
    1.0 + u * u * u * u * u
}

/// Quintic in-out
#[inline]
pub fn in_out_quint(t: f64) -> f64 {
    if t < 0.5 {
        16.0 * t * t * t * t * t
    } else {
        let u = t - 1.0;
        1.0 + 16.0 * u * u * u * u * u
    }
}

/// `1−cos(t·π/2)`
#[inline]
pub fn in_sine(t: f64) -> f64 {
    1.0 - (t * (PI / 2.0)).cos()
}

/// `sin(t·π/2)`
#[inline]
pub fn out_sine(t: f64) -> f64 {
    (t * (PI / 2.0)).sin()
}

/// `0.5−0.5·cos(π·t)`
#[inline]
pub fn in_out_sine(t: f64) -> f64 {
    0.5 - 0.5 * (PI * t).cos()
}

/// `2^(10(t−1))`
#[inline]
pub fn in_expo(t: f64) -> f64 {
    2f64.powf(10.0 * (t - 1.0))
}

/// `1−2^(−10t)`
#[inline]
pub fn out_expo(t: f64) -> f64 {
    1.0 - 2f64.powf(-10.0 * t)
}

/// Exponential in-out, symmetric about `t = 0.5`
#[inline]
pub fn in_out_expo(t: f64) -> f64 {
    let u = t * 2.0 - 1.0;
    if u < 0.0 {
        0.5 * 2f64.powf(10.0 * u)
    } else {
        1.0 - 0.5 * 2f64.powf(-10.0 * u)
    }
}

/// `1−√(1−t²)`
#[inline]
pub fn in_circ(t: f64) -> f64 {
    1.0 - (1.0 - t * t).sqrt()
}

/// `√(1−(t−1)²)`
#[inline]
pub fn out_circ(t: f64) -> f64 {
    (1.0 - (t - 1.0) * (t - 1.0)).sqrt()
}

/// Circular in-out, symmetric about `t = 0.5`
#[inline]
pub fn in_out_circ(t: f64) -> f64 {
    let u = t * 2.0;
    if u < 1.0 {
        0.5 - 0.5 * (1.0 - u * u).sqrt()
    } else {
        let v = u - 2.0;
        0.5 + 0.5 * (1.0 - v * v).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_samples() {
        assert_eq!(out_quad(0.5), 0.75);
        assert_eq!(in_quad(0.5), 0.25);
        assert_eq!(linear(0.37), 0.37);
        assert_eq!(in_cubic(0.5), 0.125);
        assert_eq!(out_cubic(0.5), 0.875);
        assert_eq!(in_out_quad(0.25), 0.125);
        assert_eq!(in_out_cubic(0.25), 0.0625);
        assert!((in_out_sine(0.5) - 0.5).abs() < 1e-15);
        assert_eq!(in_out_expo(0.5), 0.5);
        assert_eq!(in_out_circ(0.5), 0.5);
    }

    #[test]
    fn test_endpoints() {
        for easing in Easing::all() {
            let start = easing.ease(0.0);
            let end = easing.ease(1.0);
            // The exponential curves only approach their endpoints
            let tolerance = match easing {
                Easing::InExpo | Easing::OutExpo | Easing::InOutExpo => 1e-3,
                _ => 1e-12,
            };
            assert!(start.abs() < tolerance, "{easing} at t=0: got {start}");
            assert!((end - 1.0).abs() < tolerance, "{easing} at t=1: got {end}");
        }
    }

    #[test]
    fn test_in_out_symmetry() {
        let pairs = [
            Easing::InOutQuad,
            Easing::InOutCubic,
            Easing::InOutQuart,
            Easing::InOutQuint,
            Easing::InOutSine,
            Easing::InOutExpo,
            Easing::InOutCirc,
        ];
        for easing in pairs {
            for t in [0.1, 0.2, 0.3, 0.4] {
                let sum = easing.ease(t) + easing.ease(1.0 - t);
                assert!((sum - 1.0).abs() < 1e-9, "{easing} not symmetric at {t}");
            }
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in Easing::all() {
            let mut prev = easing.ease(0.0);
            for i in 1..=100 {
                let value = easing.ease(i as f64 / 100.0);
                assert!(value >= prev - 1e-12, "{easing} decreases at step {i}");
                prev = value;
            }
        }
    }

    #[test]
    fn test_names_round_trip() {
        for easing in Easing::all() {
            assert_eq!(easing.name().parse::<Easing>(), Ok(*easing));
        }
        assert_eq!(
            "bounce".parse::<Easing>(),
            Err(UnknownEasing("bounce".to_string()))
        );
    }

    #[test]
    fn test_ron_uses_camel_case() {
        let encoded = ron::to_string(&Easing::InOutQuad).unwrap();
        assert_eq!(encoded, "inOutQuad");
        let decoded: Easing = ron::from_str("outCirc").unwrap();
        assert_eq!(decoded, Easing::OutCirc);
    }

    #[test]
    fn test_custom_easing() {
        let step = EasingFn::custom(|t| if t < 0.5 { 0.0 } else { 1.0 });
        assert_eq!(step.ease(0.4), 0.0);
        assert_eq!(step.ease(0.6), 1.0);
        assert_eq!(EasingFn::default().ease(0.3), 0.3);
    }
}
