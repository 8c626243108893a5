//! Atelier Animation System
//!
//! Spring physics, tweens, keyframe animations, and liquid shape morphs.
//!
//! # Features
//!
//! - **Spring Physics**: substepped semi-implicit Euler springs with stiffness, damping, mass
//! - **Tweens**: fixed-duration eased transitions that retarget from their current value
//! - **Keyframe Animations**: looping decorative sequences
//! - **Liquid Morphs**: border-radius cycles that never touch layout
//! - **Interruptible**: springs keep their velocity when retargeted

pub mod easing;
pub mod error;
pub mod keyframe;
pub mod morph;
pub mod presets;
pub mod scheduler;
pub mod spring;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use keyframe::{Keyframe, KeyframeAnimation, Tween};
pub use morph::{BorderRadius, CornerRadii, Length, LiquidMorph, MorphKeyframe, RepeatMode, ShapeTransition};
pub use presets::{DecorPreset, MorphPreset};
pub use scheduler::{AnimationScheduler, FrameClock, SpringId};
pub use spring::{Spring, SpringConfig};
