//! Animation scheduler
//!
//! Owns the springs of a mounted view and steps all of them once per
//! rendering frame. Elapsed time is derived from the host's frame timestamps
//! through a [`FrameClock`], never from raw input events.

use crate::spring::{Spring, SpringConfig, MAX_DT};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct SpringId;
}

/// Delta reported for the first frame, when there is no previous timestamp
pub const NOMINAL_FRAME_SECS: f32 = 1.0 / 60.0;

/// Converts monotonically increasing frame timestamps into clamped deltas
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame timestamp and return the elapsed seconds.
    ///
    /// Returns 0.0 when the clock did not move forward (duplicate or
    /// out-of-order timestamps) and caps long gaps at `MAX_DT`.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }

        let Some(last_ms) = self.last_ms.replace(now_ms) else {
            return NOMINAL_FRAME_SECS;
        };

        let elapsed = ((now_ms - last_ms) / 1000.0) as f32;
        if elapsed <= 0.0 {
            return 0.0;
        }
        if elapsed > MAX_DT {
            tracing::debug!(elapsed, "frame gap clamped");
            return MAX_DT;
        }
        elapsed
    }

    /// Forget the previous timestamp (the next frame is treated as the first)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// The animation scheduler that ticks all springs of a view
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, Spring>,
    clock: FrameClock,
    frames: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spring at rest on `initial`
    pub fn spring(&mut self, config: SpringConfig, initial: f32) -> SpringId {
        self.springs.insert(Spring::new(config, initial))
    }

    pub fn get_spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id)
    }

    pub fn get_spring_mut(&mut self, id: SpringId) -> Option<&mut Spring> {
        self.springs.get_mut(id)
    }

    /// Current value of a spring (0.0 if it was removed)
    pub fn value(&self, id: SpringId) -> f32 {
        self.springs.get(id).map_or(0.0, Spring::value)
    }

    /// Retarget a spring, keeping its velocity
    pub fn set_target(&mut self, id: SpringId, target: f32) {
        if let Some(spring) = self.springs.get_mut(id) {
            spring.set_target(target);
        }
    }

    /// Tick all springs for the frame stamped `now_ms`.
    ///
    /// Returns the delta (seconds) that was integrated.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = self.clock.advance(now_ms);
        self.step(dt);
        dt
    }

    /// Step all springs by an explicit delta (seconds)
    pub fn step(&mut self, dt: f32) {
        self.frames += 1;
        if dt <= 0.0 {
            return;
        }
        for (_, spring) in self.springs.iter_mut() {
            spring.step(dt);
        }
    }

    /// Check if any spring is still moving
    pub fn has_active_animations(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Frames ticked since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Drop every spring and forget the clock (view teardown)
    pub fn clear(&mut self) {
        self.springs.clear();
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_deltas() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), NOMINAL_FRAME_SECS);
        assert!((clock.advance(1016.0) - 0.016).abs() < 1e-6);

        // Duplicate and backwards timestamps integrate nothing
        assert_eq!(clock.advance(1016.0), 0.0);
        assert_eq!(clock.advance(900.0), 0.0);

        // Tab resume after a minute
        assert_eq!(clock.advance(61_000.0), MAX_DT);
        assert_eq!(clock.advance(f64::NAN), 0.0);
    }

    #[test]
    fn test_scheduler_drives_independent_springs() {
        let mut scheduler = AnimationScheduler::new();
        let x = scheduler.spring(SpringConfig::hero(), 0.0);
        let y = scheduler.spring(SpringConfig::hero(), 0.0);
        assert!(!scheduler.has_active_animations());

        scheduler.set_target(x, 100.0);
        scheduler.set_target(y, 50.0);
        assert!(scheduler.has_active_animations());

        let mut now = 0.0;
        for _ in 0..300 {
            now += 16.0;
            scheduler.tick(now);
        }

        assert!((scheduler.value(x) - 100.0).abs() < 1e-3);
        assert!((scheduler.value(y) - 50.0).abs() < 1e-3);
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.frame_count(), 300);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.spring(SpringConfig::cursor(), 1.0);
        scheduler.tick(10.0);
        scheduler.clear();

        assert_eq!(scheduler.spring_count(), 0);
        assert!(scheduler.get_spring(id).is_none());
        assert_eq!(scheduler.value(id), 0.0);
    }
}
