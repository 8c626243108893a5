//! Process page: scroll parallax over the four steps

use std::cell::RefCell;
use std::rc::Rc;

use atelier_animation::presets::MorphPreset;
use atelier_animation::{CornerRadii, FrameClock, LiquidMorph};
use atelier_core::events::{event_types, EventBus, SubscriptionSet, WINDOW};
use atelier_motion::{ScrollFrame, ScrollParallax};
use smallvec::SmallVec;

use super::{View, Viewport};
use crate::catalog::PROCESS_STEPS;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessFrame {
    pub scroll: ScrollFrame,
    /// Keyframe each step image is closest to
    pub step_shapes: SmallVec<[&'static str; 4]>,
}

struct ProcessState {
    scroll: ScrollParallax,
    morphs: SmallVec<[LiquidMorph; 4]>,
    clock: FrameClock,
    last: Option<ProcessFrame>,
}

pub struct ProcessView {
    morph_period_ms: u32,
    state: Option<Rc<RefCell<ProcessState>>>,
    subscriptions: SubscriptionSet,
}

impl ProcessView {
    pub fn new(morph_period_ms: u32) -> Self {
        Self {
            morph_period_ms,
            state: None,
            subscriptions: SubscriptionSet::new(),
        }
    }

    pub fn progress(&self) -> f32 {
        self.state
            .as_ref()
            .map_or(0.0, |state| state.borrow().scroll.progress())
    }

    pub fn last_frame(&self) -> Option<ProcessFrame> {
        self.state.as_ref()?.borrow().last.clone()
    }

    pub fn step_shape(&self, step: usize, width: f32, height: f32) -> Option<CornerRadii> {
        let state = self.state.as_ref()?.borrow();
        state.morphs.get(step).map(|morph| morph.shape(width, height))
    }
}

impl View for ProcessView {
    fn name(&self) -> &'static str {
        "process"
    }

    fn mount(&mut self, bus: &EventBus, _viewport: Viewport) -> Result<()> {
        self.unmount();
        let state = Rc::new(RefCell::new(ProcessState {
            scroll: ScrollParallax::new(PROCESS_STEPS.len()),
            morphs: (0..PROCESS_STEPS.len())
                .map(|step| MorphPreset::process_step(step, self.morph_period_ms))
                .collect(),
            clock: FrameClock::new(),
            last: None,
        }));

        let s = state.clone();
        self.subscriptions.push(bus.subscribe(WINDOW, event_types::SCROLL, move |event| {
            s.borrow_mut().scroll.handle_event(event);
        }));

        self.state = Some(state);
        tracing::info!("process mounted");
        Ok(())
    }

    fn unmount(&mut self) {
        self.subscriptions.release();
        if let Some(state) = self.state.take() {
            let mut state = state.borrow_mut();
            state.scroll.reset();
            for morph in &mut state.morphs {
                morph.cancel();
            }
            tracing::info!("process unmounted");
        }
    }

    fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    fn frame(&mut self, now_ms: f64) {
        let Some(state) = &self.state else {
            return;
        };
        let mut state = state.borrow_mut();
        let dt_ms = state.clock.advance(now_ms) * 1000.0;
        for morph in &mut state.morphs {
            morph.tick(dt_ms);
        }
        let frame = ProcessFrame {
            scroll: state.scroll.frame(),
            step_shapes: state.morphs.iter().map(LiquidMorph::current_keyframe).collect(),
        };
        state.last = Some(frame);
    }

    fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_animation::presets::PROCESS_PERIOD_MS;
    use atelier_core::events::Event;

    #[test]
    fn test_scroll_events_drive_frame() {
        let bus = EventBus::new();
        let mut view = ProcessView::new(PROCESS_PERIOD_MS);
        view.mount(&bus, Viewport::default()).unwrap();

        bus.dispatch(&mut Event::scroll(0.5, 0.0));
        view.frame(0.0);
        let frame = view.last_frame().unwrap();
        assert_eq!(frame.scroll.title_y, -100.0);
        assert_eq!(frame.scroll.backdrop_opacity, 0.0);
        assert_eq!(frame.scroll.step_offsets[1], -50.0);
        assert_eq!(frame.step_shapes.len(), 4);

        view.unmount();
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(view.progress(), 0.0);
    }
}
