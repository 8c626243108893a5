//! Site chrome: navigation orbs, the full-screen menu, and the custom cursor.
//! Mounted once and kept across page changes.

use std::cell::RefCell;
use std::rc::Rc;

use atelier_animation::presets::{DecorPreset, MorphPreset};
use atelier_animation::{CornerRadii, Easing, FrameClock, KeyframeAnimation, ShapeTransition, SpringConfig, Tween};
use atelier_core::events::{event_types, EventBus, SubscriptionSet, WINDOW};
use atelier_motion::{
    CursorFrame, CustomCursor, MotionProfile, Origin, PointerSample, PointerTracker, ViewportParallax,
};
use smallvec::SmallVec;

use super::{elements, View, Viewport};
use crate::error::Result;
use crate::overlay::{NavState, NavigationIntent, OverlayStateMachine};

pub const NAV_ORBS: usize = 3;
const MENU_FADE_MS: u32 = 500;

/// One floating orb
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbFrame {
    pub y: f32,
    pub glow_scale: f32,
}

/// One menu entry
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavItemFrame {
    /// Label drift against the viewport pointer
    pub label_offset: (f32, f32),
    /// Hover blob, 0.0 square to 1.0 fully blobbed
    pub blob: f32,
    pub hovered: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChromeFrame {
    pub nav: NavState,
    pub menu_opacity: f32,
    pub orbs: SmallVec<[OrbFrame; 3]>,
    pub items: SmallVec<[NavItemFrame; 4]>,
    pub cursor: CursorFrame,
}

struct ChromeState {
    overlay: OverlayStateMachine,
    intent: Option<NavigationIntent>,
    cursor: CustomCursor,
    labels: PointerTracker,
    parallax: ViewportParallax,
    label_sample: PointerSample,
    floats: SmallVec<[KeyframeAnimation; 3]>,
    glows: SmallVec<[KeyframeAnimation; 3]>,
    blobs: SmallVec<[ShapeTransition; 4]>,
    menu: Tween,
    clock: FrameClock,
    last: ChromeFrame,
}

impl ChromeState {
    fn new(settings: &ChromeSettings) -> Self {
        let overlay = OverlayStateMachine::default();
        let items = overlay.items().len();
        Self {
            overlay,
            intent: None,
            cursor: CustomCursor::new(settings.cursor_spring),
            labels: PointerTracker::new(Origin::ViewportAbsolute)
                .with_profile(settings.profile)
                .with_breakpoint(settings.breakpoint_px),
            parallax: ViewportParallax::default(),
            label_sample: PointerSample::NEUTRAL,
            floats: (0..NAV_ORBS).map(DecorPreset::orb_float).collect(),
            glows: (0..NAV_ORBS).map(DecorPreset::orb_glow).collect(),
            blobs: (0..items).map(|_| MorphPreset::nav_hover_blob()).collect(),
            menu: Tween::new(0.0, MENU_FADE_MS, Easing::EaseInOut),
            clock: FrameClock::new(),
            last: ChromeFrame::default(),
        }
    }

    fn frame(&mut self, now_ms: f64) {
        let dt_ms = self.clock.advance(now_ms) * 1000.0;

        let cursor = self.cursor.frame(now_ms);
        if let Some(sample) = self.labels.sample_frame() {
            self.label_sample = sample;
        }

        let nav = self.overlay.state();
        self.menu.retarget(if nav.is_open { 1.0 } else { 0.0 });
        self.menu.tick(dt_ms);
        for animation in self.floats.iter_mut().chain(self.glows.iter_mut()) {
            animation.tick(dt_ms);
        }
        for (index, blob) in self.blobs.iter_mut().enumerate() {
            blob.set_active(nav.hovered == Some(index));
            blob.tick(dt_ms);
        }

        let label_offset = self.parallax.offset(&self.label_sample);
        self.last = ChromeFrame {
            nav,
            menu_opacity: self.menu.value(),
            orbs: self
                .floats
                .iter()
                .zip(&self.glows)
                .map(|(float, glow)| OrbFrame {
                    y: float.value(),
                    glow_scale: glow.value(),
                })
                .collect(),
            items: self
                .blobs
                .iter()
                .enumerate()
                .map(|(index, blob)| NavItemFrame {
                    label_offset,
                    blob: blob.blend(),
                    hovered: nav.hovered == Some(index),
                })
                .collect(),
            cursor,
        };
    }

    fn teardown(&mut self) {
        self.overlay.reset();
        self.intent = None;
        self.cursor.teardown();
        self.labels.reset();
        for animation in self.floats.iter_mut().chain(self.glows.iter_mut()) {
            animation.stop();
        }
        for blob in &mut self.blobs {
            blob.reset();
        }
    }
}

/// Motion settings the chrome is built with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChromeSettings {
    pub cursor_spring: SpringConfig,
    pub profile: MotionProfile,
    pub breakpoint_px: f32,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            cursor_spring: SpringConfig::cursor(),
            profile: MotionProfile::MobileAware,
            breakpoint_px: atelier_motion::MOBILE_BREAKPOINT_PX,
        }
    }
}

#[derive(Default)]
pub struct ChromeView {
    settings: ChromeSettings,
    state: Option<Rc<RefCell<ChromeState>>>,
    subscriptions: SubscriptionSet,
}

impl ChromeView {
    pub fn new(settings: ChromeSettings) -> Self {
        Self {
            settings,
            state: None,
            subscriptions: SubscriptionSet::new(),
        }
    }

    pub fn nav_state(&self) -> NavState {
        self.state
            .as_ref()
            .map(|state| state.borrow().overlay.state())
            .unwrap_or_default()
    }

    /// Navigation chosen since the last call, if any
    pub fn take_intent(&mut self) -> Option<NavigationIntent> {
        self.state.as_ref().and_then(|state| state.borrow_mut().intent.take())
    }

    pub fn last_frame(&self) -> ChromeFrame {
        self.state
            .as_ref()
            .map(|state| state.borrow().last.clone())
            .unwrap_or_default()
    }

    /// Corner radii of the hover blob behind item `index`
    pub fn blob_shape(&self, index: usize, width: f32, height: f32) -> Option<CornerRadii> {
        let state = self.state.as_ref()?.borrow();
        state.blobs.get(index).map(|blob| blob.shape(width, height))
    }

    /// Close the menu without navigating (route changes from outside)
    pub fn close_menu(&mut self) {
        if let Some(state) = &self.state {
            state.borrow_mut().overlay.close();
        }
    }
}

impl View for ChromeView {
    fn name(&self) -> &'static str {
        "chrome"
    }

    fn mount(&mut self, bus: &EventBus, viewport: Viewport) -> Result<()> {
        self.unmount();
        let state = Rc::new(RefCell::new(ChromeState::new(&self.settings)));
        {
            let mut initial = state.borrow_mut();
            initial.labels.on_resize(viewport.width, None);
            initial.cursor.handle_event(&atelier_core::Event::resize(viewport.width, viewport.height, 0.0));
        }

        for index in 0..NAV_ORBS {
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(elements::nav_orb(index), event_types::CLICK, move |_| {
                    let open = s.borrow_mut().overlay.toggle();
                    tracing::debug!(open, "navigation toggled");
                }));
        }

        let s = state.clone();
        self.subscriptions
            .push(bus.subscribe(elements::NAV_CLOSE, event_types::CLICK, move |_| {
                s.borrow_mut().overlay.close();
                tracing::debug!("navigation closed");
            }));

        let items = state.borrow().overlay.items().len();
        for index in 0..items {
            let element = elements::nav_item(index);
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(element, event_types::HOVER_ENTER, move |_| {
                    s.borrow_mut().overlay.hover_enter(index);
                }));
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(element, event_types::HOVER_LEAVE, move |_| {
                    s.borrow_mut().overlay.hover_leave(index);
                }));
            let s = state.clone();
            self.subscriptions.push(bus.subscribe(element, event_types::CLICK, move |_| {
                let mut chrome = s.borrow_mut();
                if let Some(intent) = chrome.overlay.select(index) {
                    chrome.intent = Some(intent);
                }
            }));
        }

        for event_type in [
            event_types::POINTER_MOVE,
            event_types::RESIZE,
            event_types::POINTER_OVER,
            event_types::POINTER_OUT,
        ] {
            let s = state.clone();
            self.subscriptions.push(bus.subscribe(WINDOW, event_type, move |event| {
                let mut chrome = s.borrow_mut();
                chrome.cursor.handle_event(event);
                chrome.labels.handle_event(event);
            }));
        }

        self.state = Some(state);
        tracing::info!(listeners = self.subscriptions.len(), "chrome mounted");
        Ok(())
    }

    fn unmount(&mut self) {
        self.subscriptions.release();
        if let Some(state) = self.state.take() {
            state.borrow_mut().teardown();
            tracing::info!("chrome unmounted");
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
