//! Motion fields
//!
//! A [`MotionField`] turns the two pointer springs into per-layer transforms.
//! Every layer reads the same spring outputs and scales them by its own depth
//! coefficient, so layers never drift apart the way independently sprung
//! layers would. Rotation is mapped once from the X spring and shared.
//!
//! [`ActiveCycle`] adds the discrete "one highlighted element at a time"
//! emphasis on top, with eased scale and opacity transitions.

use atelier_animation::{Easing, Tween};
use smallvec::SmallVec;

use crate::error::{MotionError, Result};
use crate::pointer::PointerSample;
use crate::transform::RangeMap;

/// Depth coefficients of the five hero images, nearest layer last
pub const HERO_DEPTH_COEFFICIENTS: [f32; 5] = [0.1, 0.15, 0.2, 0.25, 0.3];
/// Counter-parallax applied to the hero title
pub const TITLE_COEFFICIENT: f32 = -0.02;
/// Pointer displacement mapped onto the rotation range
pub const ROTATION_INPUT: [f32; 2] = [-500.0, 500.0];
/// Rotation range in degrees
pub const ROTATION_OUTPUT: [f32; 2] = [-15.0, 15.0];

/// Static parallax configuration of one floating element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthLayer {
    pub index: usize,
    pub x_coefficient: f32,
    pub y_coefficient: f32,
    /// Rotation at the ends of [`ROTATION_INPUT`], in degrees
    pub rotation_range: [f32; 2],
}

impl DepthLayer {
    /// A layer with the same coefficient on both axes
    pub const fn uniform(index: usize, coefficient: f32) -> Self {
        Self {
            index,
            x_coefficient: coefficient,
            y_coefficient: coefficient,
            rotation_range: ROTATION_OUTPUT,
        }
    }
}

/// The X and Y pointer spring values for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringOutputs {
    pub x: f32,
    pub y: f32,
}

/// Translation (px) and rotation (degrees) of one element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotate: f32,
}

impl LayerTransform {
    pub const IDENTITY: LayerTransform = LayerTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        rotate: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// All transforms derived in one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldFrame {
    pub layers: SmallVec<[LayerTransform; 5]>,
    pub title: LayerTransform,
}

impl FieldFrame {
    pub fn is_neutral(&self) -> bool {
        self.title.is_identity() && self.layers.iter().all(LayerTransform::is_identity)
    }
}

/// Layered parallax driven by a single pair of springs
#[derive(Clone, Debug)]
pub struct MotionField {
    layers: SmallVec<[DepthLayer; 5]>,
    title_coefficient: f32,
}

impl MotionField {
    pub fn new(layers: impl IntoIterator<Item = DepthLayer>, title_coefficient: f32) -> Result<Self> {
        let layers: SmallVec<[DepthLayer; 5]> = layers.into_iter().collect();
        if layers.is_empty() {
            return Err(MotionError::NoLayers);
        }
        Ok(Self {
            layers,
            title_coefficient,
        })
    }

    /// One uniform layer per coefficient, indexed in order
    pub fn from_coefficients(coefficients: &[f32], title_coefficient: f32) -> Result<Self> {
        Self::new(
            coefficients
                .iter()
                .enumerate()
                .map(|(index, &c)| DepthLayer::uniform(index, c)),
            title_coefficient,
        )
    }

    /// The five-image hero configuration
    pub fn hero() -> Self {
        Self {
            layers: HERO_DEPTH_COEFFICIENTS
                .iter()
                .enumerate()
                .map(|(index, &c)| DepthLayer::uniform(index, c))
                .collect(),
            title_coefficient: TITLE_COEFFICIENT,
        }
    }

    pub fn layers(&self) -> &[DepthLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Derive every transform from this frame's spring outputs
    pub fn derive(&self, springs: &SpringOutputs) -> FieldFrame {
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerTransform {
                translate_x: springs.x * layer.x_coefficient,
                translate_y: springs.y * layer.y_coefficient,
                rotate: RangeMap::new(ROTATION_INPUT, layer.rotation_range).apply(springs.x),
            })
            .collect();

        FieldFrame {
            layers,
            title: LayerTransform {
                translate_x: springs.x * self.title_coefficient,
                translate_y: springs.y * self.title_coefficient,
                rotate: 0.0,
            },
        }
    }

    /// Identity transforms for every layer (tracking disabled)
    pub fn neutral(&self) -> FieldFrame {
        FieldFrame {
            layers: self.layers.iter().map(|_| LayerTransform::IDENTITY).collect(),
            title: LayerTransform::IDENTITY,
        }
    }
}

pub const ACTIVE_INTERVAL_MS: u32 = 3000;
pub const EMPHASIS_TWEEN_MS: u32 = 800;
pub const ACTIVE_SCALE: f32 = 1.0;
pub const ACTIVE_OPACITY: f32 = 1.0;
pub const INACTIVE_SCALE: f32 = 0.8;
pub const INACTIVE_OPACITY: f32 = 0.3;
/// Stacking order of the highlighted element; others stack by index
pub const ACTIVE_Z_INDEX: i32 = 10;

/// Per-element emphasis for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emphasis {
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
}

/// Highlights one of N elements at a time and eases the others back
#[derive(Clone, Debug)]
pub struct ActiveCycle {
    active: usize,
    scale: SmallVec<[Tween; 5]>,
    opacity: SmallVec<[Tween; 5]>,
}

impl ActiveCycle {
    /// Element 0 starts active, every element already at its resting emphasis
    pub fn new(count: usize) -> Self {
        let count = count.max(1);
        let tween = |value| Tween::new(value, EMPHASIS_TWEEN_MS, Easing::EaseInOut);
        Self {
            active: 0,
            scale: (0..count)
                .map(|i| tween(if i == 0 { ACTIVE_SCALE } else { INACTIVE_SCALE }))
                .collect(),
            opacity: (0..count)
                .map(|i| tween(if i == 0 { ACTIVE_OPACITY } else { INACTIVE_OPACITY }))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.scale.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scale.is_empty()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Move the highlight to the next element, wrapping around
    pub fn advance(&mut self) -> usize {
        self.set_active((self.active + 1) % self.len());
        self.active
    }

    /// Advance `steps` times at once (timer catch-up)
    pub fn advance_by(&mut self, steps: u32) -> usize {
        let next = (self.active + steps as usize) % self.len();
        self.set_active(next);
        self.active
    }

    /// Highlight a specific element; out-of-range indices are ignored
    pub fn set_active(&mut self, index: usize) {
        if index >= self.len() {
            tracing::debug!(index, len = self.len(), "active index out of range");
            return;
        }
        self.active = index;
        for i in 0..self.len() {
            let (scale, opacity) = Self::targets(i == index);
            self.scale[i].retarget(scale);
            self.opacity[i].retarget(opacity);
        }
    }

    fn targets(active: bool) -> (f32, f32) {
        if active {
            (ACTIVE_SCALE, ACTIVE_OPACITY)
        } else {
            (INACTIVE_SCALE, INACTIVE_OPACITY)
        }
    }

    pub fn tick(&mut self, dt_ms: f32) {
        for tween in self.scale.iter_mut().chain(self.opacity.iter_mut()) {
            tween.tick(dt_ms);
        }
    }

    /// Current emphasis of element `index` (resting values if out of range)
    pub fn emphasis(&self, index: usize) -> Emphasis {
        let z_index = if index == self.active {
            ACTIVE_Z_INDEX
        } else {
            index as i32
        };
        match (self.scale.get(index), self.opacity.get(index)) {
            (Some(scale), Some(opacity)) => Emphasis {
                scale: scale.value(),
                opacity: opacity.value(),
                z_index,
            },
            _ => Emphasis {
                scale: INACTIVE_SCALE,
                opacity: INACTIVE_OPACITY,
                z_index,
            },
        }
    }

    /// Whether any emphasis transition is still running
    pub fn is_animating(&self) -> bool {
        self.scale
            .iter()
            .chain(self.opacity.iter())
            .any(|tween| !tween.is_finished())
    }
}

const NAV_LABEL_RANGE: [f32; 2] = [-10.0, 10.0];

/// Small drift of navigation labels against the raw viewport pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportParallax {
    pub x: RangeMap,
    pub y: RangeMap,
}

impl Default for ViewportParallax {
    fn default() -> Self {
        Self {
            x: RangeMap::new([0.0, 1920.0], NAV_LABEL_RANGE),
            y: RangeMap::new([0.0, 1080.0], NAV_LABEL_RANGE),
        }
    }
}

impl ViewportParallax {
    pub fn offset(&self, sample: &PointerSample) -> (f32, f32) {
        (self.x.apply(sample.x), self.y.apply(sample.y))
    }
}

/// Background orbs that shift further the later they are in the stack
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackdropParallax {
    pub orbs: usize,
    /// Travel of the first orb across the full viewport; orb `i` moves `(i+1)` times as far
    pub step_px: f32,
}

impl Default for BackdropParallax {
    fn default() -> Self {
        Self {
            orbs: 5,
            step_px: 30.0,
        }
    }
}

impl BackdropParallax {
    /// Offsets for a container-relative sample in a viewport of the given size
    pub fn offsets(&self, sample: &PointerSample, viewport_width: f32, viewport_height: f32) -> SmallVec<[(f32, f32); 5]> {
        (0..self.orbs)
            .map(|i| {
                let travel = self.step_px * (i + 1) as f32;
                (
                    RangeMap::new([0.0, viewport_width], [0.0, travel]).apply(sample.x),
                    RangeMap::new([0.0, viewport_height], [0.0, travel]).apply(sample.y),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_scale_shared_springs() {
        let field = MotionField::hero();
        let frame = field.derive(&SpringOutputs { x: 100.0, y: 50.0 });

        let expected = [(10.0, 5.0), (15.0, 7.5), (20.0, 10.0), (25.0, 12.5), (30.0, 15.0)];
        for (layer, (x, y)) in frame.layers.iter().zip(expected) {
            assert!((layer.translate_x - x).abs() < 1e-4);
            assert!((layer.translate_y - y).abs() < 1e-4);
            assert!((layer.rotate - 3.0).abs() < 1e-4);
        }
        assert!((frame.title.translate_x + 2.0).abs() < 1e-6);
        assert!((frame.title.translate_y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_saturates() {
        let field = MotionField::hero();
        let frame = field.derive(&SpringOutputs { x: -900.0, y: 0.0 });
        assert!(frame.layers.iter().all(|l| l.rotate == -15.0));
        assert!(field.neutral().is_neutral());
    }

    #[test]
    fn test_empty_field_is_rejected() {
        assert_eq!(MotionField::from_coefficients(&[], -0.02).unwrap_err(), MotionError::NoLayers);
    }

    #[test]
    fn test_active_cycle_wraps_and_eases() {
        let mut cycle = ActiveCycle::new(5);
        assert_eq!(cycle.emphasis(0).scale, 1.0);
        assert_eq!(cycle.emphasis(1).opacity, 0.3);
        assert!(!cycle.is_animating());

        assert_eq!(cycle.advance(), 1);
        cycle.tick(400.0);
        let mid = cycle.emphasis(1);
        assert!(mid.scale > 0.8 && mid.scale < 1.0);
        assert_eq!(mid.z_index, ACTIVE_Z_INDEX);
        assert_eq!(cycle.emphasis(0).z_index, 0);

        cycle.tick(400.0);
        assert_eq!(cycle.emphasis(1).opacity, 1.0);
        assert_eq!(cycle.emphasis(0).scale, 0.8);

        assert_eq!(cycle.advance_by(4), 0);
        cycle.set_active(7);
        assert_eq!(cycle.active(), 0);
    }

    #[test]
    fn test_viewport_and_backdrop_parallax() {
        let labels = ViewportParallax::default();
        let center = PointerSample { x: 960.0, y: 540.0, timestamp_ms: 0.0 };
        assert_eq!(labels.offset(&center), (0.0, 0.0));
        let corner = PointerSample { x: 4000.0, y: -20.0, timestamp_ms: 0.0 };
        assert_eq!(labels.offset(&corner), (10.0, -10.0));

        let orbs = BackdropParallax::default().offsets(&center, 1920.0, 1080.0);
        assert_eq!(orbs.len(), 5);
        assert_eq!(orbs[0], (15.0, 15.0));
        assert_eq!(orbs[4], (75.0, 75.0));
    }
}
