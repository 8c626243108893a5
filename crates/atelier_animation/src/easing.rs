//! Easing curves for time-based animations

use serde::{Deserialize, Serialize};

/// Easing function applied to normalized progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`, the default for morphs and fades
    EaseInOut,
    EaseOutCubic,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Map progress in `[0, 1]` to eased progress. Input is clamped.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => CubicBezier::new(0.42, 0.0, 1.0, 1.0).solve(t),
            Easing::EaseOut => CubicBezier::new(0.0, 0.0, 0.58, 1.0).solve(t),
            Easing::EaseInOut => CubicBezier::new(0.42, 0.0, 0.58, 1.0).solve(t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::CubicBezier(x1, y1, x2, y2) => CubicBezier::new(x1, y1, x2, y2).solve(t),
        }
    }
}

/// CSS-style cubic bezier timing curve with fixed endpoints (0,0) and (1,1)
#[derive(Clone, Copy, Debug)]
struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        // x control points must stay inside [0, 1] for the curve to be a function
        Self {
            x1: f64::from(x1).clamp(0.0, 1.0),
            y1: f64::from(y1),
            x2: f64::from(x2).clamp(0.0, 1.0),
            y2: f64::from(y2),
        }
    }

    /// B(s) for one axis with control points `p1`, `p2`
    fn sample(s: f64, p1: f64, p2: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }

    /// dB/ds for one axis
    fn slope(s: f64, p1: f64, p2: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    /// Find the curve parameter whose x equals `x`, then return its y.
    ///
    /// Newton iterations first; bisection when the slope flattens out.
    fn solve(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        const EPSILON: f64 = 1e-7;
        let x = f64::from(x);

        let mut s = x;
        for _ in 0..8 {
            let error = Self::sample(s, self.x1, self.x2) - x;
            if error.abs() < EPSILON {
                return Self::sample(s, self.y1, self.y2) as f32;
            }
            let slope = Self::slope(s, self.x1, self.x2);
            if slope.abs() < EPSILON {
                break;
            }
            s = (s - error / slope).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = x;
        for _ in 0..32 {
            let value = Self::sample(s, self.x1, self.x2);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }

        Self::sample(s, self.y1, self.y2) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseOutCubic,
            Easing::CubicBezier(0.2, 0.8, 0.3, 1.0),
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric_and_monotonic() {
        let ease = Easing::EaseInOut;
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-4);
        assert!((ease.apply(0.25) + ease.apply(0.75) - 1.0).abs() < 1e-4);

        let mut previous = 0.0;
        for step in 1..=100 {
            let value = ease.apply(step as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(Easing::EaseInOut.apply(-3.0), 0.0);
        assert_eq!(Easing::EaseOut.apply(7.0), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }
}
