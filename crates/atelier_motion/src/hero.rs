//! Hero motion rig
//!
//! Five floating images follow the pointer at different depths while a
//! slideshow timer moves the highlight between them. Per frame, in order:
//! read the coalesced pointer sample, retarget and tick the two springs,
//! advance the slideshow timer, then derive transforms from the settled
//! spring values.

use atelier_animation::presets::{DecorPreset, MorphPreset, HERO_PERIOD_MS, ROUNDED};
use atelier_animation::{AnimationScheduler, CornerRadii, KeyframeAnimation, LiquidMorph, SpringConfig, SpringId};
use atelier_core::events::Event;
use atelier_core::timer::{TimerId, TimerQueue};
use smallvec::SmallVec;

use crate::error::Result;
use crate::field::{
    ActiveCycle, Emphasis, FieldFrame, LayerTransform, MotionField, SpringOutputs, ACTIVE_INTERVAL_MS,
    HERO_DEPTH_COEFFICIENTS, TITLE_COEFFICIENT,
};
use crate::pointer::{ContainerRect, MotionProfile, Origin, PointerTracker, MOBILE_BREAKPOINT_PX};

/// Tunables of the hero rig
#[derive(Clone, Debug, PartialEq)]
pub struct HeroConfig {
    pub spring: SpringConfig,
    pub depth_coefficients: Vec<f32>,
    pub title_coefficient: f32,
    pub slideshow_interval_ms: u32,
    pub morph_period_ms: u32,
    pub breakpoint_px: f32,
    pub profile: MotionProfile,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::hero(),
            depth_coefficients: HERO_DEPTH_COEFFICIENTS.to_vec(),
            title_coefficient: TITLE_COEFFICIENT,
            slideshow_interval_ms: ACTIVE_INTERVAL_MS,
            morph_period_ms: HERO_PERIOD_MS,
            breakpoint_px: MOBILE_BREAKPOINT_PX,
            profile: MotionProfile::MobileAware,
        }
    }
}

/// Where an image sits inside the hero, in percent of the container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub left_pct: f32,
    pub top_pct: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Desktop spreads images horizontally; mobile stacks them with an offset
    pub fn for_layer(index: usize, mobile: bool) -> Self {
        let i = index as f32;
        let alternate = (index % 2) as f32;
        if mobile {
            Self {
                left_pct: 10.0 + alternate * 60.0,
                top_pct: 15.0 + i * 15.0,
                width: 150.0,
                height: 200.0,
            }
        } else {
            Self {
                left_pct: 20.0 + i * 15.0,
                top_pct: 10.0 + alternate * 20.0,
                width: 300.0,
                height: 400.0,
            }
        }
    }
}

/// Style bindings of one hero image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroLayerFrame {
    pub transform: LayerTransform,
    pub emphasis: Emphasis,
    pub placement: Placement,
    pub radii: CornerRadii,
}

/// Everything the hero renders for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct HeroFrame {
    pub layers: SmallVec<[HeroLayerFrame; 5]>,
    pub title: LayerTransform,
    pub active_index: usize,
    pub scroll_hint_y: f32,
    /// Pointer tracking is off for this viewport
    pub mobile: bool,
}

/// The mounted hero: owns its springs, timer and morph
#[derive(Debug)]
pub struct HeroMotion {
    tracker: PointerTracker,
    scheduler: AnimationScheduler,
    x: SpringId,
    y: SpringId,
    field: MotionField,
    cycle: ActiveCycle,
    morph: LiquidMorph,
    scroll_hint: KeyframeAnimation,
    timers: TimerQueue,
    slideshow: TimerId,
}

impl HeroMotion {
    pub fn new(config: &HeroConfig) -> Result<Self> {
        let field = MotionField::from_coefficients(&config.depth_coefficients, config.title_coefficient)?;
        let mut timers = TimerQueue::new();
        let slideshow = timers.set_interval(config.slideshow_interval_ms)?;

        let mut scheduler = AnimationScheduler::new();
        let x = scheduler.spring(config.spring, 0.0);
        let y = scheduler.spring(config.spring, 0.0);

        let tracker = PointerTracker::new(Origin::CenterRelative)
            .with_profile(config.profile)
            .with_breakpoint(config.breakpoint_px);

        tracing::debug!(layers = field.len(), profile = ?config.profile, "hero motion mounted");
        Ok(Self {
            tracker,
            scheduler,
            x,
            y,
            cycle: ActiveCycle::new(field.len()),
            field,
            morph: MorphPreset::hero_active(config.morph_period_ms),
            scroll_hint: DecorPreset::scroll_hint(),
            timers,
            slideshow,
        })
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32, timestamp_ms: f64) {
        self.tracker.on_pointer_move(client_x, client_y, timestamp_ms);
    }

    pub fn on_resize(&mut self, viewport_width: f32, container: Option<ContainerRect>) {
        self.tracker.on_resize(viewport_width, container);
    }

    pub fn set_container(&mut self, container: Option<ContainerRect>) {
        self.tracker.set_container(container);
    }

    /// Route a host event to the pointer tracker
    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.tracker.handle_event(event)
    }

    pub fn active_index(&self) -> usize {
        self.cycle.active()
    }

    /// Current pointer spring outputs
    pub fn springs(&self) -> SpringOutputs {
        SpringOutputs {
            x: self.scheduler.value(self.x),
            y: self.scheduler.value(self.y),
        }
    }

    /// Whether anything still needs frames (springs or emphasis in flight)
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations() || self.cycle.is_animating()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Run one frame stamped `now_ms` on the rendering clock
    pub fn frame(&mut self, now_ms: f64) -> HeroFrame {
        if let Some(sample) = self.tracker.sample_frame() {
            self.scheduler.set_target(self.x, sample.x);
            self.scheduler.set_target(self.y, sample.y);
        }

        let dt_ms = self.scheduler.tick(now_ms) * 1000.0;

        for fire in self.timers.advance(f64::from(dt_ms)) {
            if fire.id == self.slideshow {
                let active = self.cycle.advance_by(fire.count);
                // The highlighted image starts its morph from the first shape
                self.morph.restart();
                tracing::trace!(active, "slideshow advanced");
            }
        }

        self.cycle.tick(dt_ms);
        self.morph.tick(dt_ms);
        self.scroll_hint.tick(dt_ms);

        let enabled = self.tracker.is_enabled();
        let field = if enabled {
            self.field.derive(&self.springs())
        } else {
            self.field.neutral()
        };
        self.compose(field, !enabled)
    }

    fn compose(&self, field: FieldFrame, mobile: bool) -> HeroFrame {
        let active = self.cycle.active();
        let layers = field
            .layers
            .iter()
            .enumerate()
            .map(|(index, transform)| {
                let placement = Placement::for_layer(index, mobile);
                let radii = if index == active {
                    self.morph.shape(placement.width, placement.height)
                } else {
                    ROUNDED.resolve(placement.width, placement.height)
                };
                HeroLayerFrame {
                    transform: *transform,
                    emphasis: self.cycle.emphasis(index),
                    placement,
                    radii,
                }
            })
            .collect();

        HeroFrame {
            layers,
            title: field.title,
            active_index: active,
            scroll_hint_y: self.scroll_hint.value(),
            mobile,
        }
    }

    /// Release the timer and springs and cancel the morph
    pub fn teardown(&mut self) {
        self.timers.clear_all();
        self.scheduler.clear();
        self.morph.cancel();
        self.scroll_hint.stop();
        self.tracker.reset();
        tracing::debug!("hero motion torn down");
    }
}
