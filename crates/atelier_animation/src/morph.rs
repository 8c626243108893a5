//! Liquid shape morphs
//!
//! A liquid morph cycles an element's border radius through an ordered set of
//! named keyframes forever. It only ever produces corner radii for the
//! renderer; element boxes, and therefore layout, are never touched.
//!
//! Radii follow CSS `border-radius` semantics: four horizontal radii, `/`,
//! four vertical radii, corners in the order top-left, top-right,
//! bottom-right, bottom-left. Percentages resolve against the box width
//! (horizontal) and height (vertical).

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::keyframe::Tween;

/// One border-radius component
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Length {
    fn resolve(self, basis: f32) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl FromStr for Length {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnimationError::InvalidLength(s.to_string());
        let (number, make): (&str, fn(f32) -> Length) = if let Some(n) = s.strip_suffix('%') {
            (n, Length::Percent)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, Length::Px)
        } else if s == "0" {
            ("0", Length::Px)
        } else {
            return Err(invalid());
        };

        let value: f32 = number.parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }
        Ok(make(value))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// A CSS border-radius declaration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderRadius {
    pub horizontal: [Length; 4],
    pub vertical: [Length; 4],
}

impl BorderRadius {
    /// Same pixel radius on every corner
    pub const fn uniform_px(px: f32) -> Self {
        Self {
            horizontal: [Length::Px(px); 4],
            vertical: [Length::Px(px); 4],
        }
    }

    /// Elliptical corners given in percentages
    pub const fn percent(horizontal: [f32; 4], vertical: [f32; 4]) -> Self {
        Self {
            horizontal: [
                Length::Percent(horizontal[0]),
                Length::Percent(horizontal[1]),
                Length::Percent(horizontal[2]),
                Length::Percent(horizontal[3]),
            ],
            vertical: [
                Length::Percent(vertical[0]),
                Length::Percent(vertical[1]),
                Length::Percent(vertical[2]),
                Length::Percent(vertical[3]),
            ],
        }
    }

    /// Resolve to pixel radii for a box, scaling down overlapping corners
    /// the way browsers do.
    pub fn resolve(&self, width: f32, height: f32) -> CornerRadii {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let mut radii = CornerRadii {
            x: self.horizontal.map(|len| len.resolve(width)),
            y: self.vertical.map(|len| len.resolve(height)),
        };

        // Adjacent radii on one side may not exceed that side
        let sides = [
            (width, radii.x[0] + radii.x[1]),
            (height, radii.y[1] + radii.y[2]),
            (width, radii.x[2] + radii.x[3]),
            (height, radii.y[3] + radii.y[0]),
        ];
        let factor = sides
            .iter()
            .filter(|(_, sum)| *sum > 0.0)
            .map(|(side, sum)| side / sum)
            .fold(1.0_f32, f32::min);
        if factor < 1.0 {
            radii.x = radii.x.map(|r| r * factor);
            radii.y = radii.y.map(|r| r * factor);
        }
        radii
    }
}

impl FromStr for BorderRadius {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let (horizontal, vertical) = match s.split_once('/') {
            Some((h, v)) => (h, Some(v)),
            None => (s, None),
        };
        let horizontal = parse_corners(horizontal)?;
        let vertical = match vertical {
            Some(v) => parse_corners(v)?,
            None => horizontal,
        };
        Ok(Self {
            horizontal,
            vertical,
        })
    }
}

/// Expand 1-4 values into four corners using CSS shorthand rules
fn parse_corners(s: &str) -> Result<[Length; 4]> {
    let values = s
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<SmallVec<[Length; 4]>>>()?;
    match values.as_slice() {
        [a] => Ok([*a; 4]),
        [a, b] => Ok([*a, *b, *a, *b]),
        [a, b, c] => Ok([*a, *b, *c, *b]),
        [a, b, c, d] => Ok([*a, *b, *c, *d]),
        other => Err(AnimationError::ValueCount(other.len())),
    }
}

impl fmt::Display for BorderRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.horizontal;
        let [e, g, h, i] = self.vertical;
        write!(f, "{a} {b} {c} {d} / {e} {g} {h} {i}")
    }
}

/// Border radii resolved to pixels for one box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerRadii {
    /// Horizontal radius per corner (TL, TR, BR, BL)
    pub x: [f32; 4],
    /// Vertical radius per corner (TL, TR, BR, BL)
    pub y: [f32; 4],
}

impl CornerRadii {
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let mix = |a: [f32; 4], b: [f32; 4]| {
            [
                a[0] + (b[0] - a[0]) * t,
                a[1] + (b[1] - a[1]) * t,
                a[2] + (b[2] - a[2]) * t,
                a[3] + (b[3] - a[3]) * t,
            ]
        };
        Self {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
        }
    }

    /// Render as a pixel `border-radius` value
    pub fn to_css(&self) -> String {
        let [a, b, c, d] = self.x;
        let [e, g, h, i] = self.y;
        format!("{a:.2}px {b:.2}px {c:.2}px {d:.2}px / {e:.2}px {g:.2}px {h:.2}px {i:.2}px")
    }
}

/// A named shape in a morph cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphKeyframe {
    pub name: &'static str,
    pub shape: BorderRadius,
}

/// What happens at the end of each cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Jump back to the first keyframe (sequences usually end where they start)
    #[default]
    Loop,
    /// Play the sequence backwards on every other cycle
    Mirror,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MorphState {
    Idle,
    Running,
    Cancelled,
}

/// Continuous, input-independent border-radius animation
#[derive(Clone, Debug)]
pub struct LiquidMorph {
    name: &'static str,
    keyframes: SmallVec<[MorphKeyframe; 4]>,
    period_ms: f32,
    easing: Easing,
    repeat: RepeatMode,
    elapsed_ms: f32,
    cycles: u64,
    state: MorphState,
}

impl LiquidMorph {
    /// Build a morph over at least two keyframes.
    ///
    /// Keyframes are spaced evenly over `period_ms`; `easing` applies to
    /// each segment.
    pub fn new(
        name: &'static str,
        keyframes: &[MorphKeyframe],
        period_ms: u32,
        easing: Easing,
        repeat: RepeatMode,
    ) -> Result<Self> {
        if keyframes.len() < 2 {
            return Err(AnimationError::TooFewKeyframes(name));
        }
        Ok(Self {
            name,
            keyframes: keyframes.iter().copied().collect(),
            period_ms: period_ms.max(1) as f32,
            easing,
            repeat,
            elapsed_ms: 0.0,
            cycles: 0,
            state: MorphState::Idle,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period_ms(&self) -> f32 {
        self.period_ms
    }

    pub fn keyframes(&self) -> &[MorphKeyframe] {
        &self.keyframes
    }

    /// Start (or restart) from the first keyframe
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.cycles = 0;
        self.state = MorphState::Running;
    }

    /// Alias for [`LiquidMorph::start`]; restarting has no other effect
    pub fn restart(&mut self) {
        self.start();
    }

    /// Stop advancing and fall back to the resting shape
    pub fn cancel(&mut self) {
        self.state = MorphState::Cancelled;
        self.elapsed_ms = 0.0;
        self.cycles = 0;
    }

    pub fn is_running(&self) -> bool {
        self.state == MorphState::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == MorphState::Cancelled
    }

    /// Completed cycles since the last start
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advance by `dt_ms` milliseconds. There is no terminal state.
    pub fn tick(&mut self, dt_ms: f32) {
        if self.state != MorphState::Running || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= self.period_ms {
            let whole = (self.elapsed_ms / self.period_ms).floor();
            self.cycles += whole as u64;
            self.elapsed_ms -= whole * self.period_ms;
        }
    }

    /// Position in the keyframe sequence, 0.0 (first) to 1.0 (last)
    pub fn sequence_position(&self) -> f32 {
        if self.state != MorphState::Running {
            return 0.0;
        }
        let progress = (self.elapsed_ms / self.period_ms).clamp(0.0, 1.0);
        let reversed = self.repeat == RepeatMode::Mirror && self.cycles % 2 == 1;
        if reversed {
            1.0 - progress
        } else {
            progress
        }
    }

    /// The segment the morph is in: (from index, eased local progress)
    fn segment(&self) -> (usize, f32) {
        let segments = (self.keyframes.len() - 1) as f32;
        let scaled = self.sequence_position() * segments;
        let index = (scaled.floor() as usize).min(self.keyframes.len() - 2);
        let local = scaled - index as f32;
        (index, self.easing.apply(local))
    }

    /// Name of the keyframe the shape is currently closest to
    pub fn current_keyframe(&self) -> &'static str {
        let (index, local) = self.segment();
        let nearest = if local < 0.5 { index } else { index + 1 };
        self.keyframes[nearest].name
    }

    /// Current corner radii for a box of the given size
    pub fn shape(&self, width: f32, height: f32) -> CornerRadii {
        let (index, local) = self.segment();
        let from = self.keyframes[index].shape.resolve(width, height);
        let to = self.keyframes[index + 1].shape.resolve(width, height);
        from.lerp(&to, local)
    }
}

/// Eased one-shot transition between two shapes, for hover states.
///
/// Toggling mid-flight reverses from the current blend instead of jumping.
#[derive(Clone, Debug)]
pub struct ShapeTransition {
    rest: BorderRadius,
    active: BorderRadius,
    blend: Tween,
}

impl ShapeTransition {
    pub fn new(rest: BorderRadius, active: BorderRadius, duration_ms: u32, easing: Easing) -> Self {
        Self {
            rest,
            active,
            blend: Tween::new(0.0, duration_ms, easing),
        }
    }

    /// Head for the active shape (`true`) or back to rest
    pub fn set_active(&mut self, active: bool) {
        self.blend.retarget(if active { 1.0 } else { 0.0 });
    }

    pub fn is_active(&self) -> bool {
        self.blend.target() == 1.0
    }

    /// Jump to rest without animating (teardown)
    pub fn reset(&mut self) {
        self.blend.snap(0.0);
    }

    pub fn tick(&mut self, dt_ms: f32) {
        self.blend.tick(dt_ms);
    }

    /// 0.0 at rest, 1.0 fully active
    pub fn blend(&self) -> f32 {
        self.blend.value()
    }

    pub fn shape(&self, width: f32, height: f32) -> CornerRadii {
        self.blend_over(&self.rest.resolve(width, height), width, height)
    }

    /// Blend from a moving `base` (another animation's output) toward the
    /// active shape instead of the fixed rest shape
    pub fn blend_over(&self, base: &CornerRadii, width: f32, height: f32) -> CornerRadii {
        base.lerp(&self.active.resolve(width, height), self.blend.value())
    }
}
