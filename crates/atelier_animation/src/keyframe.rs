//! Time-based animations
//!
//! [`Tween`] eases a single value from wherever it is toward a target over a
//! fixed duration, restarting from the current value when retargeted.
//! [`KeyframeAnimation`] plays a sequence of values with optional looping, for
//! decorative pulses and floats that run forever.

use crate::easing::Easing;
use smallvec::SmallVec;

/// Fixed-duration transition between two values
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
}

impl Tween {
    /// A tween resting at `value`
    pub fn new(value: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            from: value,
            to: value,
            duration_ms: duration_ms as f32,
            elapsed_ms: duration_ms as f32,
            easing,
        }
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let progress = self.elapsed_ms / self.duration_ms;
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Head for a new target, starting from the current value.
    ///
    /// Retargeting to the value already being approached is a no-op, so
    /// calling this every frame does not restart the transition.
    pub fn retarget(&mut self, to: f32) {
        if !to.is_finite() || to == self.to {
            return;
        }
        self.from = self.value();
        self.to = to;
        self.elapsed_ms = 0.0;
    }

    /// Jump straight to a value
    pub fn snap(&mut self, value: f32) {
        if value.is_finite() {
            self.from = value;
            self.to = value;
            self.elapsed_ms = self.duration_ms;
        }
    }

    /// Advance by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        if dt_ms.is_finite() && dt_ms > 0.0 && !self.is_finished() {
            self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        }
    }
}

/// A single keyframe in a single-value animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Time position (0.0 to 1.0)
    pub time: f32,
    /// Value at this keyframe
    pub value: f32,
}

/// A keyframe-based animation (single value), optionally looping
#[derive(Clone, Debug)]
pub struct KeyframeAnimation {
    duration_ms: f32,
    keyframes: SmallVec<[Keyframe; 4]>,
    easing: Easing,
    /// None loops forever
    iterations: Option<u32>,
    completed: u32,
    current_time: f32,
    playing: bool,
}

impl KeyframeAnimation {
    /// Keyframes are spaced evenly across the duration, like `[a, b, a]`
    pub fn evenly_spaced(duration_ms: u32, values: &[f32], easing: Easing) -> Self {
        let last = values.len().saturating_sub(1).max(1) as f32;
        let keyframes = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Keyframe {
                time: i as f32 / last,
                value,
            })
            .collect();
        Self {
            duration_ms: duration_ms as f32,
            keyframes,
            easing,
            iterations: Some(1),
            completed: 0,
            current_time: 0.0,
            playing: false,
        }
    }

    /// Repeat forever
    pub fn looping(mut self) -> Self {
        self.iterations = None;
        self
    }

    pub fn start(&mut self) {
        self.current_time = 0.0;
        self.completed = 0;
        self.playing = self.duration_ms > 0.0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.current_time / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Get the current interpolated value
    pub fn value(&self) -> f32 {
        let Some(first) = self.keyframes.first() else {
            return 0.0;
        };
        let progress = self.progress();

        let next_idx = self
            .keyframes
            .iter()
            .position(|kf| kf.time >= progress)
            .unwrap_or(self.keyframes.len() - 1);
        if next_idx == 0 {
            return first.value;
        }

        let prev = self.keyframes[next_idx - 1];
        let next = self.keyframes[next_idx];
        let span = next.time - prev.time;
        if span <= f32::EPSILON {
            return next.value;
        }

        let local = (progress - prev.time) / span;
        prev.value + (next.value - prev.value) * self.easing.apply(local)
    }

    /// Advance the animation by delta time (in milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }

        self.current_time += dt_ms;
        if self.current_time < self.duration_ms {
            return;
        }

        match self.iterations {
            None => self.current_time %= self.duration_ms,
            Some(total) => {
                self.completed += 1;
                if self.completed < total {
                    self.current_time %= self.duration_ms;
                } else {
                    self.current_time = self.duration_ms;
                    self.playing = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_reaches_target() {
        let mut tween = Tween::new(0.8, 800, Easing::EaseInOut);
        assert!(tween.is_finished());

        tween.retarget(1.0);
        assert_eq!(tween.value(), 0.8);
        tween.tick(400.0);
        assert!((tween.value() - 0.9).abs() < 1e-3);
        tween.tick(400.0);
        assert_eq!(tween.value(), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_tween_retarget_midway_is_continuous() {
        let mut tween = Tween::new(0.3, 800, Easing::EaseInOut);
        tween.retarget(1.0);
        tween.tick(300.0);
        let before = tween.value();

        tween.retarget(0.3);
        assert_eq!(tween.value(), before);

        // Same target again does not restart
        tween.tick(100.0);
        let mid = tween.value();
        tween.retarget(0.3);
        assert_eq!(tween.value(), mid);
    }

    #[test]
    fn test_keyframes_loop_forever() {
        let mut float = KeyframeAnimation::evenly_spaced(2000, &[0.0, 10.0, 0.0], Easing::Linear).looping();
        float.start();

        float.tick(500.0);
        assert!((float.value() - 5.0).abs() < 1e-4);
        float.tick(500.0);
        assert!((float.value() - 10.0).abs() < 1e-4);

        float.tick(1500.0);
        assert!(float.is_playing());
        assert!((float.value() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_single_iteration_stops_on_last_value() {
        let mut pulse = KeyframeAnimation::evenly_spaced(1000, &[1.0, 1.5], Easing::Linear);
        pulse.start();
        pulse.tick(5000.0);
        assert!(!pulse.is_playing());
        assert_eq!(pulse.value(), 1.5);
    }
}
