//! Damped spring physics
//!
//! One [`Spring`] simulates one scalar. Each step computes
//! `a = (stiffness * (target - value) - damping * velocity) / mass` and
//! integrates with semi-implicit Euler (velocity first, then value).
//!
//! The elapsed time comes from the rendering clock, so it varies frame to
//! frame. It is clamped to `[MIN_DT, MAX_DT]` and split into substeps no
//! longer than `MAX_SUBSTEP`, which keeps stiff springs stable and stops a
//! long pause (tab resume) from launching values across the screen.

use serde::{Deserialize, Serialize};

/// Smallest delta a single tick integrates (seconds)
pub const MIN_DT: f32 = 1.0 / 1000.0;
/// Largest delta a single tick integrates (seconds); the rest is dropped
pub const MAX_DT: f32 = 1.0 / 15.0;
/// Largest integration substep (seconds)
pub const MAX_SUBSTEP: f32 = 1.0 / 120.0;
/// Upper bound on substeps per tick
pub const MAX_SUBSTEPS: u32 = 64;

const MIN_MASS: f32 = 1e-3;
const DEFAULT_REST_DELTA: f32 = 1e-3;
const DEFAULT_REST_SPEED: f32 = 1e-3;

/// Stiffness, damping and mass of a spring
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from target below which the spring may come to rest
    pub rest_delta: f32,
    /// Speed below which the spring may come to rest
    pub rest_speed: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(100.0, 10.0)
    }
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
            rest_delta: DEFAULT_REST_DELTA,
            rest_speed: DEFAULT_REST_SPEED,
        }
    }

    pub const fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Pointer-following spring for the hero parallax
    pub const fn hero() -> Self {
        Self::new(150.0, 25.0)
    }

    /// Tight spring for the custom cursor
    pub const fn cursor() -> Self {
        Self::new(700.0, 25.0)
    }

    /// Layout and lightbox entrance spring
    pub const fn layout() -> Self {
        Self::new(300.0, 30.0)
    }

    pub const fn wobbly() -> Self {
        Self::new(180.0, 12.0)
    }

    pub const fn stiff() -> Self {
        Self::new(210.0, 20.0)
    }

    /// Replace degenerate parameters with values that cannot produce NaN.
    ///
    /// Negative or non-finite stiffness and damping become zero; mass is
    /// floored at a small positive value.
    pub fn sanitized(self) -> Self {
        fn non_negative(value: f32) -> f32 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                0.0
            }
        }

        Self {
            stiffness: non_negative(self.stiffness),
            damping: non_negative(self.damping),
            mass: if self.mass.is_finite() {
                self.mass.max(MIN_MASS)
            } else {
                1.0
            },
            rest_delta: non_negative(self.rest_delta),
            rest_speed: non_negative(self.rest_speed),
        }
    }

    /// Damping ratio: below 1.0 overshoots, 1.0 is critical, above is sluggish
    pub fn damping_ratio(&self) -> f32 {
        let critical = 2.0 * (self.stiffness * self.mass).sqrt();
        if critical > 0.0 {
            self.damping / critical
        } else {
            f32::INFINITY
        }
    }
}

/// A damped spring animating one scalar toward its target
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Create a spring at rest on `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        let initial = if initial.is_finite() { initial } else { 0.0 };
        Self {
            config: config.sanitized(),
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Change the target mid-flight.
    ///
    /// Value and velocity are untouched, so motion continues smoothly from
    /// the current state. Non-finite targets are ignored.
    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump to a value and stop
    pub fn snap(&mut self, value: f32) {
        if value.is_finite() {
            self.value = value;
            self.target = value;
            self.velocity = 0.0;
        }
    }

    /// Whether the spring sits on its target with no residual motion
    pub fn is_settled(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || self.is_settled() {
            return;
        }

        let dt = dt.clamp(MIN_DT, MAX_DT);
        let substeps = (dt / self.max_substep())
            .ceil()
            .clamp(1.0, MAX_SUBSTEPS as f32);
        let h = dt / substeps;
        for _ in 0..substeps as u32 {
            self.integrate(h);
        }

        self.come_to_rest();
    }

    /// Substep length that keeps semi-implicit Euler stable for this spring
    fn max_substep(&self) -> f32 {
        let omega = (self.config.stiffness / self.config.mass).sqrt();
        if omega > 0.0 {
            MAX_SUBSTEP.min(1.0 / omega)
        } else {
            MAX_SUBSTEP
        }
    }

    fn integrate(&mut self, h: f32) {
        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;

        let displacement = self.target - self.value;
        let acceleration = (stiffness * displacement - damping * self.velocity) / mass;
        self.velocity += acceleration * h;
        self.value += self.velocity * h;

        if !self.value.is_finite() || !self.velocity.is_finite() {
            tracing::debug!(goal = self.target, "spring diverged; snapping to target");
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn come_to_rest(&mut self) {
        let near = (self.target - self.value).abs() < self.config.rest_delta;
        let slow = self.velocity.abs() < self.config.rest_speed;
        if near && slow {
            self.value = self.target;
            self.velocity = 0.0;
        } else if self.config.stiffness == 0.0 && slow {
            // Nothing pulls toward the target; stop coasting where we are
            self.velocity = 0.0;
            self.target = self.value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &mut Spring, frames: usize, dt: f32) {
        for _ in 0..frames {
            spring.step(dt);
        }
    }

    #[test]
    fn test_converges_and_stays_on_target() {
        for config in [
            SpringConfig::hero(),
            SpringConfig::cursor(),
            SpringConfig::layout(),
            SpringConfig::wobbly(),
        ] {
            let mut spring = Spring::new(config, 0.0);
            spring.set_target(100.0);
            run(&mut spring, 600, 1.0 / 60.0);

            assert!(
                (spring.value() - 100.0).abs() < 1e-3,
                "{config:?} ended at {}",
                spring.value()
            );

            // No residual oscillation once settled
            run(&mut spring, 60, 1.0 / 60.0);
            assert!((spring.value() - 100.0).abs() < 1e-3);
            assert!(spring.is_settled());
        }
    }

    #[test]
    fn test_retarget_keeps_value_and_velocity() {
        let mut spring = Spring::new(SpringConfig::hero(), 0.0);
        spring.set_target(200.0);
        run(&mut spring, 10, 1.0 / 60.0);

        let (value, velocity) = (spring.value(), spring.velocity());
        assert!(velocity > 0.0);

        spring.set_target(-50.0);
        assert_eq!(spring.value(), value);
        assert_eq!(spring.velocity(), velocity);

        // The next frame moves by a bounded amount, no jump
        spring.step(1.0 / 60.0);
        assert!((spring.value() - value).abs() < velocity.abs() / 60.0 + 5.0);
    }

    #[test]
    fn test_degenerate_delta_is_ignored_or_clamped() {
        let mut spring = Spring::new(SpringConfig::cursor(), 0.0);
        spring.set_target(100.0);

        spring.step(0.0);
        spring.step(-1.0);
        spring.step(f32::NAN);
        assert_eq!(spring.value(), 0.0);

        // A ten-minute pause integrates at most MAX_DT
        spring.step(600.0);
        assert!(spring.value().is_finite());
        assert!(spring.value() > 0.0 && spring.value() < 150.0);
    }

    #[test]
    fn test_zero_parameters_do_not_produce_nan() {
        let mut spring = Spring::new(SpringConfig::new(0.0, 0.0), 0.0);
        spring.set_target(10.0);
        run(&mut spring, 120, 1.0 / 60.0);
        assert_eq!(spring.value(), 0.0);

        let mut spring = Spring::new(SpringConfig::new(150.0, 0.0).with_mass(0.0), 0.0);
        spring.set_target(10.0);
        run(&mut spring, 120, 1.0 / 60.0);
        assert!(spring.value().is_finite());
        assert!(spring.velocity().is_finite());

        let mut spring = Spring::new(SpringConfig::new(f32::NAN, -3.0), 5.0);
        spring.set_target(f32::INFINITY);
        run(&mut spring, 10, 1.0 / 60.0);
        assert_eq!(spring.value(), 5.0);
    }

    #[test]
    fn test_damping_ratio() {
        assert!(SpringConfig::wobbly().damping_ratio() < 1.0);
        assert!(SpringConfig::hero().damping_ratio() > 1.0);
        assert!(SpringConfig::new(0.0, 1.0).damping_ratio().is_infinite());
    }
}
