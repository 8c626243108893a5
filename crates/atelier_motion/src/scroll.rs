//! Scroll-keyed parallax for the process page
//!
//! Progress through the page (0 at the top, 1 at the bottom) drives the title
//! lift, the backdrop zoom and fade, and a staggered drift of each step number.
//! Like pointer input, scroll events are coalesced and read once per frame.

use atelier_core::events::{event_types, Event, EventData};
use smallvec::SmallVec;

use crate::transform::RangeMap;

pub const PROCESS_STEPS: usize = 4;

const TITLE_LIFT: RangeMap = RangeMap::new([0.0, 1.0], [0.0, -200.0]);
const BACKDROP_SCALE: RangeMap = RangeMap::new([0.0, 1.0], [1.0, 1.5]);
const BACKDROP_OPACITY: RangeMap = RangeMap::new([0.0, 0.5], [0.3, 0.0]);
const STEP_DRIFT: [f32; 2] = [50.0, -50.0];

/// Scroll-derived style values for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollFrame {
    pub progress: f32,
    pub title_y: f32,
    pub backdrop_scale: f32,
    pub backdrop_opacity: f32,
    pub step_offsets: SmallVec<[f32; 4]>,
}

#[derive(Clone, Debug)]
pub struct ScrollParallax {
    steps: usize,
    progress: f32,
}

impl Default for ScrollParallax {
    fn default() -> Self {
        Self::new(PROCESS_STEPS)
    }
}

impl ScrollParallax {
    pub fn new(steps: usize) -> Self {
        Self {
            steps: steps.max(1),
            progress: 0.0,
        }
    }

    /// Record scroll progress; out-of-range values are clamped, NaN ignored
    pub fn on_scroll(&mut self, progress: f32) {
        if !progress.is_nan() {
            self.progress = progress.clamp(0.0, 1.0);
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        match (event.event_type, &event.data) {
            (event_types::SCROLL, EventData::Scroll { progress }) => {
                self.on_scroll(*progress);
                true
            }
            _ => false,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Step `k` drifts from +50 to -50 while progress crosses its slice `[k/n, (k+1)/n]`
    pub fn step_offset(&self, step: usize) -> f32 {
        let n = self.steps as f32;
        let start = step as f32 / n;
        RangeMap::new([start, start + 1.0 / n], STEP_DRIFT).apply(self.progress)
    }

    pub fn frame(&self) -> ScrollFrame {
        let p = self.progress;
        ScrollFrame {
            progress: p,
            title_y: TITLE_LIFT.apply(p),
            backdrop_scale: BACKDROP_SCALE.apply(p),
            backdrop_opacity: BACKDROP_OPACITY.apply(p),
            step_offsets: (0..self.steps).map(|k| self.step_offset(k)).collect(),
        }
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}
