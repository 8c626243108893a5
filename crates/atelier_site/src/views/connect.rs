//! Connect page: drifting backdrop orbs and the contact form

use std::cell::RefCell;
use std::rc::Rc;

use atelier_animation::presets::DecorPreset;
use atelier_animation::{CornerRadii, Easing, FrameClock, KeyframeAnimation, Tween};
use atelier_core::events::{event_types, EventBus, EventData, SubscriptionSet, WINDOW};
use atelier_motion::{BackdropParallax, MotionProfile, Origin, PointerSample, PointerTracker};
use smallvec::SmallVec;

use super::{elements, View, Viewport};
use crate::contact::{ContactForm, ContactSubmission, Field, SubmissionSink};
use crate::error::Result;

/// Sink shared between the runtime and the mounted form
pub type SharedSink = Rc<RefCell<dyn SubmissionSink>>;

const UNDERLINE_MS: u32 = 300;
/// Fields drawn with an animated underline
pub const UNDERLINED: [Field; 3] = [Field::Name, Field::Email, Field::Message];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectFrame {
    /// Backdrop orb offsets, nearest orb first
    pub orbs: SmallVec<[(f32, f32); 5]>,
    pub orb_scales: SmallVec<[f32; 5]>,
    /// Underline width fraction for each of [`UNDERLINED`]
    pub underlines: [f32; 3],
}

struct ConnectState {
    viewport: Viewport,
    tracker: PointerTracker,
    backdrop: BackdropParallax,
    sample: PointerSample,
    pulses: SmallVec<[KeyframeAnimation; 5]>,
    form: ContactForm,
    underlines: [Tween; 3],
    sink: SharedSink,
    clock: FrameClock,
    last: ConnectFrame,
}

impl ConnectState {
    fn submit(&mut self) -> ContactSubmission {
        let mut sink = self.sink.borrow_mut();
        self.form.submit(&mut *sink)
    }

    fn frame(&mut self, now_ms: f64) {
        let dt_ms = self.clock.advance(now_ms) * 1000.0;
        if let Some(sample) = self.tracker.sample_frame() {
            self.sample = sample;
        }
        for pulse in &mut self.pulses {
            pulse.tick(dt_ms);
        }
        self.form.tick(dt_ms);
        for (tween, field) in self.underlines.iter_mut().zip(UNDERLINED) {
            tween.retarget(if self.form.underline_visible(field) { 1.0 } else { 0.0 });
            tween.tick(dt_ms);
        }

        self.last = ConnectFrame {
            orbs: self
                .backdrop
                .offsets(&self.sample, self.viewport.width, self.viewport.height),
            orb_scales: self.pulses.iter().map(KeyframeAnimation::value).collect(),
            underlines: [
                self.underlines[0].value(),
                self.underlines[1].value(),
                self.underlines[2].value(),
            ],
        };
    }
}

pub struct ConnectView {
    sink: SharedSink,
    state: Option<Rc<RefCell<ConnectState>>>,
    subscriptions: SubscriptionSet,
}

impl ConnectView {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            sink,
            state: None,
            subscriptions: SubscriptionSet::new(),
        }
    }

    /// Run `f` against the mounted form
    pub fn with_form<R>(&self, f: impl FnOnce(&mut ContactForm) -> R) -> Option<R> {
        let state = self.state.as_ref()?;
        let mut state = state.borrow_mut();
        Some(f(&mut state.form))
    }

    pub fn last_frame(&self) -> ConnectFrame {
        self.state
            .as_ref()
            .map(|state| state.borrow().last.clone())
            .unwrap_or_default()
    }

    pub fn message_shape(&self, width: f32, height: f32) -> Option<CornerRadii> {
        self.with_form(|form| form.message_shape(width, height))
    }

    pub fn button_shape(&self, width: f32, height: f32) -> Option<CornerRadii> {
        self.with_form(|form| form.button_shape(width, height))
    }
}

impl View for ConnectView {
    fn name(&self) -> &'static str {
        "connect"
    }

    fn mount(&mut self, bus: &EventBus, viewport: Viewport) -> Result<()> {
        self.unmount();
        let backdrop = BackdropParallax::default();
        let mut tracker = PointerTracker::new(Origin::ViewportAbsolute).with_profile(MotionProfile::DesktopOnly);
        tracker.on_resize(viewport.width, None);

        let state = Rc::new(RefCell::new(ConnectState {
            viewport,
            tracker,
            pulses: (0..backdrop.orbs)
                .map(|i| DecorPreset::accent_pulse(5000 + 1000 * i as u32))
                .collect(),
            backdrop,
            sample: PointerSample::NEUTRAL,
            form: ContactForm::new(),
            underlines: std::array::from_fn(|_| Tween::new(0.0, UNDERLINE_MS, Easing::EaseInOut)),
            sink: self.sink.clone(),
            clock: FrameClock::new(),
            last: ConnectFrame::default(),
        }));

        let s = state.clone();
        self.subscriptions
            .push(bus.subscribe(WINDOW, event_types::POINTER_MOVE, move |event| {
                s.borrow_mut().tracker.handle_event(event);
            }));
        let s = state.clone();
        self.subscriptions.push(bus.subscribe(WINDOW, event_types::RESIZE, move |event| {
            let mut connect = s.borrow_mut();
            if let EventData::Resize { width, height } = event.data {
                connect.viewport = Viewport::new(width, height);
            }
            connect.tracker.handle_event(event);
        }));

        for field in [Field::Name, Field::Email, Field::SessionType, Field::Message] {
            let element = elements::contact_field(field);
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(element, event_types::HOVER_ENTER, move |_| {
                    s.borrow_mut().form.hover(field);
                }));
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(element, event_types::HOVER_LEAVE, move |_| {
                    s.borrow_mut().form.unhover(field);
                }));
        }

        let s = state.clone();
        self.subscriptions
            .push(bus.subscribe(elements::CONTACT_SUBMIT, event_types::CLICK, move |_| {
                s.borrow_mut().submit();
            }));

        self.state = Some(state);
        tracing::info!(listeners = self.subscriptions.len(), "connect mounted");
        Ok(())
    }

    fn unmount(&mut self) {
        self.subscriptions.release();
        if let Some(state) = self.state.take() {
            let mut state = state.borrow_mut();
            state.form.reset();
            state.tracker.reset();
            for pulse in &mut state.pulses {
                pulse.stop();
            }
            tracing::info!("connect unmounted");
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::events::Event;

    #[derive(Default)]
    struct Collect(Vec<ContactSubmission>);

    impl SubmissionSink for Collect {
        fn submit(&mut self, submission: &ContactSubmission) {
            self.0.push(submission.clone());
        }
    }

    #[test]
    fn test_submit_click_reaches_sink() {
        let collected = Rc::new(RefCell::new(Collect::default()));
        let bus = EventBus::new();
        let mut view = ConnectView::new(collected.clone());
        view.mount(&bus, Viewport::default()).unwrap();

        view.with_form(|form| {
            form.set_field(Field::Name, "Ada").unwrap();
            form.set_field(Field::Message, "Family session in May").unwrap();
        });
        bus.dispatch(&mut Event::click(elements::CONTACT_SUBMIT, 0.0));

        let collected = collected.borrow();
        assert_eq!(collected.0.len(), 1);
        assert_eq!(collected.0[0].name, "Ada");
    }

    #[test]
    fn test_backdrop_orbs_follow_viewport_pointer() {
        let sink: SharedSink = Rc::new(RefCell::new(crate::contact::LoggingSink));
        let bus = EventBus::new();
        let mut view = ConnectView::new(sink);
        view.mount(&bus, Viewport::new(1000.0, 500.0)).unwrap();

        bus.dispatch(&mut Event::pointer_move(500.0, 500.0, 0.0));
        view.frame(0.0);
        let frame = view.last_frame();
        assert_eq!(frame.orbs.len(), 5);
        assert_eq!(frame.orbs[0], (15.0, 30.0));
        assert_eq!(frame.orbs[4], (75.0, 150.0));
    }

    #[test]
    fn test_underline_grows_on_hover() {
        let sink: SharedSink = Rc::new(RefCell::new(crate::contact::LoggingSink));
        let bus = EventBus::new();
        let mut view = ConnectView::new(sink);
        view.mount(&bus, Viewport::default()).unwrap();

        bus.dispatch(&mut Event::new(
            event_types::HOVER_ENTER,
            elements::contact_field(Field::Email),
            EventData::None,
            0.0,
        ));
        let mut now = 0.0;
        for _ in 0..30 {
            view.frame(now);
            now += 16.0;
        }
        assert_eq!(view.last_frame().underlines, [0.0, 1.0, 0.0]);

        view.unmount();
        assert_eq!(bus.listener_count(), 0);
    }
}
