//! Home page: the floating hero and featured work

use std::cell::RefCell;
use std::rc::Rc;

use atelier_animation::presets::MorphPreset;
use atelier_animation::{CornerRadii, FrameClock, ShapeTransition};
use atelier_core::events::{event_types, EventBus, EventData, SubscriptionSet, WINDOW};
use atelier_motion::{ContainerRect, HeroConfig, HeroFrame, HeroMotion, SpringOutputs};
use smallvec::SmallVec;

use super::{elements, View, Viewport};
use crate::catalog::FEATURED_WORK;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct StoriesFrame {
    pub hero: HeroFrame,
    /// Border blend of each featured card, 0.0 square to 1.0 hovered
    pub featured: SmallVec<[f32; 3]>,
}

struct StoriesState {
    hero: HeroMotion,
    featured: SmallVec<[ShapeTransition; 3]>,
    clock: FrameClock,
    last: Option<StoriesFrame>,
}

impl StoriesState {
    fn frame(&mut self, now_ms: f64) {
        let dt_ms = self.clock.advance(now_ms) * 1000.0;
        let hero = self.hero.frame(now_ms);
        for card in &mut self.featured {
            card.tick(dt_ms);
        }
        self.last = Some(StoriesFrame {
            hero,
            featured: self.featured.iter().map(ShapeTransition::blend).collect(),
        });
    }
}

pub struct StoriesView {
    config: HeroConfig,
    state: Option<Rc<RefCell<StoriesState>>>,
    subscriptions: SubscriptionSet,
}

impl StoriesView {
    pub fn new(config: HeroConfig) -> Self {
        Self {
            config,
            state: None,
            subscriptions: SubscriptionSet::new(),
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        Some(self.state.as_ref()?.borrow().hero.active_index())
    }

    pub fn hero_springs(&self) -> Option<SpringOutputs> {
        Some(self.state.as_ref()?.borrow().hero.springs())
    }

    pub fn last_frame(&self) -> Option<StoriesFrame> {
        self.state.as_ref()?.borrow().last.clone()
    }

    pub fn featured_shape(&self, index: usize, width: f32, height: f32) -> Option<CornerRadii> {
        let state = self.state.as_ref()?.borrow();
        state.featured.get(index).map(|card| card.shape(width, height))
    }
}

impl View for StoriesView {
    fn name(&self) -> &'static str {
        "stories"
    }

    fn mount(&mut self, bus: &EventBus, viewport: Viewport) -> Result<()> {
        self.unmount();
        let mut hero = HeroMotion::new(&self.config)?;
        hero.on_resize(viewport.width, Some(viewport.rect()));

        let state = Rc::new(RefCell::new(StoriesState {
            hero,
            featured: FEATURED_WORK.iter().map(|_| MorphPreset::featured_hover()).collect(),
            clock: FrameClock::new(),
            last: None,
        }));

        let s = state.clone();
        self.subscriptions
            .push(bus.subscribe(WINDOW, event_types::POINTER_MOVE, move |event| {
                s.borrow_mut().hero.handle_event(event);
            }));

        // The hero fills the viewport, so its container follows every resize
        let s = state.clone();
        self.subscriptions.push(bus.subscribe(WINDOW, event_types::RESIZE, move |event| {
            if let EventData::Resize { width, height } = event.data {
                let rect = ContainerRect::new(0.0, 0.0, width, height);
                s.borrow_mut().hero.on_resize(width, Some(rect));
            }
        }));

        for index in 0..FEATURED_WORK.len() {
            let element = elements::featured_card(index);
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(element, event_types::HOVER_ENTER, move |_| {
                    if let Some(card) = s.borrow_mut().featured.get_mut(index) {
                        card.set_active(true);
                    }
                }));
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(element, event_types::HOVER_LEAVE, move |_| {
                    if let Some(card) = s.borrow_mut().featured.get_mut(index) {
                        card.set_active(false);
                    }
                }));
        }

        self.state = Some(state);
        tracing::info!(listeners = self.subscriptions.len(), "stories mounted");
        Ok(())
    }

    fn unmount(&mut self) {
        self.subscriptions.release();
        if let Some(state) = self.state.take() {
            state.borrow_mut().hero.teardown();
            tracing::info!("stories unmounted");
        }
    }

    fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    fn frame(&mut self, now_ms: f64) {
        if let Some(state) = &self.state {
            state.borrow_mut().frame(now_ms);
        }
    }

    fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn timer_count(&self) -> usize {
        self.state
            .as_ref()
            .map_or(0, |state| state.borrow().hero.timer_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::events::Event;

    #[test]
    fn test_slideshow_runs_while_mounted() {
        let bus = EventBus::new();
        let mut view = StoriesView::new(HeroConfig::default());
        view.mount(&bus, Viewport::default()).unwrap();
        assert_eq!(view.timer_count(), 1);

        let mut now = 0.0;
        for _ in 0..200 {
            view.frame(now);
            now += 16.0;
        }
        assert_eq!(view.active_index(), Some(1));

        view.unmount();
        assert_eq!(view.timer_count(), 0);
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(view.active_index(), None);
    }

    #[test]
    fn test_resize_below_breakpoint_neutralizes_hero() {
        let bus = EventBus::new();
        let mut view = StoriesView::new(HeroConfig::default());
        view.mount(&bus, Viewport::default()).unwrap();

        bus.dispatch(&mut Event::pointer_move(900.0, 600.0, 0.0));
        bus.dispatch(&mut Event::resize(375.0, 812.0, 0.0));
        view.frame(0.0);

        let frame = view.last_frame().unwrap();
        assert!(frame.hero.mobile);
        assert!(frame.hero.layers.iter().all(|layer| layer.transform.is_identity()));
    }

    #[test]
    fn test_featured_hover_blends_border() {
        let bus = EventBus::new();
        let mut view = StoriesView::new(HeroConfig::default());
        view.mount(&bus, Viewport::default()).unwrap();

        bus.dispatch(&mut Event::new(
            event_types::HOVER_ENTER,
            elements::featured_card(1),
            EventData::None,
            0.0,
        ));
        let mut now = 0.0;
        for _ in 0..60 {
            view.frame(now);
            now += 16.0;
        }
        let frame = view.last_frame().unwrap();
        assert_eq!(frame.featured.as_slice(), &[0.0, 1.0, 0.0]);
    }
}
