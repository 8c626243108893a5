//! Named shapes and ready-made decorative animations used across the site

use crate::easing::Easing;
use crate::keyframe::KeyframeAnimation;
use crate::morph::{BorderRadius, LiquidMorph, MorphKeyframe, RepeatMode, ShapeTransition};

/// Organic blob, the signature liquid shape
pub const BLOOM: BorderRadius = BorderRadius::percent([60.0, 40.0, 30.0, 70.0], [60.0, 30.0, 70.0, 40.0]);
/// Second phase of the hero and even process-step morph
pub const RIPPLE: BorderRadius = BorderRadius::percent([30.0, 60.0, 70.0, 40.0], [50.0, 60.0, 30.0, 60.0]);
/// Resting shape of odd process steps
pub const TIDE: BorderRadius = BorderRadius::percent([40.0, 60.0, 70.0, 30.0], [30.0, 70.0, 40.0, 60.0]);
/// Second phase of the odd process-step morph
pub const CURRENT: BorderRadius = BorderRadius::percent([70.0, 30.0, 40.0, 60.0], [60.0, 40.0, 30.0, 70.0]);
/// Featured-work hover border
pub const EDGE: BorderRadius = BorderRadius::percent([30.0, 70.0, 70.0, 30.0], [30.0, 30.0, 70.0, 70.0]);
/// Plain rounded card
pub const ROUNDED: BorderRadius = BorderRadius::uniform_px(20.0);
/// Square corners
pub const SQUARE: BorderRadius = BorderRadius::uniform_px(0.0);
/// Contact form message box at rest (`1rem`)
pub const FIELD: BorderRadius = BorderRadius::uniform_px(16.0);
/// Swollen submit button
pub const SWELL: BorderRadius = BorderRadius::percent([50.0, 50.0, 30.0, 70.0], [60.0, 40.0, 60.0, 40.0]);

pub const HERO_PERIOD_MS: u32 = 8_000;
pub const GALLERY_PERIOD_MS: u32 = 10_000;
pub const PROCESS_PERIOD_MS: u32 = 15_000;
pub const MESSAGE_PERIOD_MS: u32 = 8_000;
pub const BUTTON_PERIOD_MS: u32 = 10_000;

/// Pre-built liquid morphs
pub struct MorphPreset;

impl MorphPreset {
    /// Active hero image: bloom → ripple → bloom
    pub fn hero_active(period_ms: u32) -> LiquidMorph {
        Self::build(
            "hero_active",
            &[
                MorphKeyframe { name: "bloom", shape: BLOOM },
                MorphKeyframe { name: "ripple", shape: RIPPLE },
                MorphKeyframe { name: "bloom", shape: BLOOM },
            ],
            period_ms,
            RepeatMode::Loop,
        )
    }

    /// Gallery tiles breathe between a rounded card and a bloom, mirrored
    pub fn gallery_tile(period_ms: u32) -> LiquidMorph {
        Self::build(
            "gallery_tile",
            &[
                MorphKeyframe { name: "rounded", shape: ROUNDED },
                MorphKeyframe { name: "bloom", shape: BLOOM },
                MorphKeyframe { name: "rounded", shape: ROUNDED },
            ],
            period_ms,
            RepeatMode::Mirror,
        )
    }

    /// Process step images alternate between two morph families
    pub fn process_step(index: usize, period_ms: u32) -> LiquidMorph {
        if index % 2 == 0 {
            Self::build(
                "process_even",
                &[
                    MorphKeyframe { name: "bloom", shape: BLOOM },
                    MorphKeyframe { name: "ripple", shape: RIPPLE },
                    MorphKeyframe { name: "bloom", shape: BLOOM },
                ],
                period_ms,
                RepeatMode::Loop,
            )
        } else {
            Self::build(
                "process_odd",
                &[
                    MorphKeyframe { name: "tide", shape: TIDE },
                    MorphKeyframe { name: "current", shape: CURRENT },
                    MorphKeyframe { name: "tide", shape: TIDE },
                ],
                period_ms,
                RepeatMode::Loop,
            )
        }
    }

    /// Message box wobble, started once the message has content
    pub fn message_field() -> LiquidMorph {
        let mut morph = Self::build(
            "message_field",
            &[
                MorphKeyframe { name: "field", shape: FIELD },
                MorphKeyframe { name: "edge", shape: EDGE },
                MorphKeyframe { name: "field", shape: FIELD },
            ],
            MESSAGE_PERIOD_MS,
            RepeatMode::Loop,
        );
        morph.cancel();
        morph
    }

    /// Submit button swell
    pub fn submit_button() -> LiquidMorph {
        Self::build(
            "submit_button",
            &[
                MorphKeyframe { name: "rounded", shape: ROUNDED },
                MorphKeyframe { name: "swell", shape: SWELL },
                MorphKeyframe { name: "rounded", shape: ROUNDED },
            ],
            BUTTON_PERIOD_MS,
            RepeatMode::Loop,
        )
    }

    /// Blob behind a hovered navigation item, square at rest
    pub fn nav_hover_blob() -> ShapeTransition {
        ShapeTransition::new(SQUARE, BLOOM, 500, Easing::EaseInOut)
    }

    /// Contact message box under the pointer
    pub fn message_hover() -> ShapeTransition {
        ShapeTransition::new(FIELD, EDGE, 300, Easing::EaseInOut)
    }

    /// Featured-work card border on hover
    pub fn featured_hover() -> ShapeTransition {
        ShapeTransition::new(SQUARE, EDGE, 800, Easing::EaseInOut)
    }

    fn build(
        name: &'static str,
        keyframes: &[MorphKeyframe],
        period_ms: u32,
        repeat: RepeatMode,
    ) -> LiquidMorph {
        let mut morph = match LiquidMorph::new(name, keyframes, period_ms, Easing::EaseInOut, repeat) {
            Ok(morph) => morph,
            // Every preset has three keyframes
            Err(_) => unreachable!("preset `{name}` is malformed"),
        };
        morph.start();
        morph
    }
}

/// Pre-built looping decorations
pub struct DecorPreset;

impl DecorPreset {
    /// Navigation orb bob: y 20 → 40 → 20 over `3 + i` seconds
    pub fn orb_float(index: usize) -> KeyframeAnimation {
        Self::looping(3000 + 1000 * index as u32, &[20.0, 40.0, 20.0])
    }

    /// Navigation orb glow: scale 1 → 1.5 → 1 over `2 + 0.5i` seconds
    pub fn orb_glow(index: usize) -> KeyframeAnimation {
        Self::looping(2000 + 500 * index as u32, &[1.0, 1.5, 1.0])
    }

    /// Scroll hint on the hero: y 0 → 10 → 0 every two seconds
    pub fn scroll_hint() -> KeyframeAnimation {
        Self::looping(2000, &[0.0, 10.0, 0.0])
    }

    /// Soft pulse for backdrop accents: scale 1 → 1.2 → 1
    pub fn accent_pulse(duration_ms: u32) -> KeyframeAnimation {
        Self::looping(duration_ms, &[1.0, 1.2, 1.0])
    }

    fn looping(duration_ms: u32, values: &[f32]) -> KeyframeAnimation {
        let mut animation = KeyframeAnimation::evenly_spaced(duration_ms, values, Easing::EaseInOut).looping();
        animation.start();
        animation
    }
}
