//! Full-screen lightbox over the gallery
//!
//! The lightbox mirrors the gallery selection with enter and exit
//! sequencing. Entrance runs a layout spring on scale (0.8 → 1) and
//! opacity (0 → 1); exit runs it back. Closing clears the gallery selection
//! immediately, while the outgoing image stays on screen until the exit
//! settles.

use atelier_animation::{AnimationScheduler, SpringConfig, SpringId};
use atelier_core::fsm::StateMachine;

use crate::catalog::ItemId;
use crate::error::GalleryError;
use crate::gallery::GalleryController;

pub const HIDDEN_SCALE: f32 = 0.8;
pub const HIDDEN_OPACITY: f32 = 0.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LightboxPhase {
    #[default]
    Closed,
    Entering,
    Open,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum LightboxEvent {
    Show,
    Hide,
    Settled,
}

/// Which part of the lightbox a click landed on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    CloseButton,
    /// The image and caption; never closes
    Content,
}

/// Style bindings for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightboxFrame {
    pub phase: LightboxPhase,
    /// Item on screen (the outgoing one while exiting)
    pub showing: Option<ItemId>,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Debug)]
pub struct LightboxController {
    machine: StateMachine<LightboxPhase, LightboxEvent>,
    scheduler: AnimationScheduler,
    scale: SpringId,
    opacity: SpringId,
    showing: Option<ItemId>,
}

impl Default for LightboxController {
    fn default() -> Self {
        Self::new(SpringConfig::layout())
    }
}

impl LightboxController {
    pub fn new(spring: SpringConfig) -> Self {
        use LightboxEvent::*;
        use LightboxPhase::*;

        let machine = StateMachine::builder(Closed)
            .on(Closed, Show, Entering)
            .on(Exiting, Show, Entering)
            .on(Entering, Settled, Open)
            .on(Entering, Hide, Exiting)
            .on(Open, Hide, Exiting)
            .on(Exiting, Settled, Closed)
            .build();

        let mut scheduler = AnimationScheduler::new();
        let scale = scheduler.spring(spring, HIDDEN_SCALE);
        let opacity = scheduler.spring(spring, HIDDEN_OPACITY);

        Self {
            machine,
            scheduler,
            scale,
            opacity,
            showing: None,
        }
    }

    pub fn phase(&self) -> LightboxPhase {
        self.machine.current_state()
    }

    /// Whether the lightbox intercepts background interaction
    pub fn is_visible(&self) -> bool {
        self.phase() != LightboxPhase::Closed
    }

    pub fn showing(&self) -> Option<ItemId> {
        self.showing
    }

    /// Select `id` in the gallery and bring it up.
    ///
    /// Opening during an exit restarts the entrance for the new item.
    /// Opening while already open swaps the image in place.
    pub fn open(&mut self, gallery: &mut GalleryController, id: ItemId) -> Result<(), GalleryError> {
        gallery.select(id)?;

        match self.phase() {
            LightboxPhase::Closed | LightboxPhase::Exiting => {
                self.hide_instantly();
                self.machine.send(LightboxEvent::Show);
            }
            LightboxPhase::Entering | LightboxPhase::Open => {}
        }

        self.showing = Some(id);
        self.scheduler.set_target(self.scale, 1.0);
        self.scheduler.set_target(self.opacity, 1.0);
        tracing::debug!(%id, phase = ?self.phase(), "lightbox opened");
        Ok(())
    }

    /// Clear the selection and run the exit. Idempotent.
    pub fn close(&mut self, gallery: &mut GalleryController) {
        gallery.deselect();
        if self.machine.send(LightboxEvent::Hide).moved() {
            self.scheduler.set_target(self.scale, HIDDEN_SCALE);
            self.scheduler.set_target(self.opacity, HIDDEN_OPACITY);
        }
    }

    /// Handle a click inside the lightbox. Returns whether it closed.
    pub fn on_click(&mut self, gallery: &mut GalleryController, target: ClickTarget) -> bool {
        if !self.is_visible() {
            return false;
        }
        match target {
            ClickTarget::Backdrop | ClickTarget::CloseButton => {
                self.close(gallery);
                true
            }
            ClickTarget::Content => false,
        }
    }

    /// Advance the entrance or exit springs for the frame stamped `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> LightboxFrame {
        self.scheduler.tick(now_ms);

        if !self.scheduler.has_active_animations() {
            if let LightboxPhase::Entering | LightboxPhase::Exiting = self.phase() {
                self.machine.send(LightboxEvent::Settled);
            }
            if self.phase() == LightboxPhase::Closed {
                self.showing = None;
            }
        }

        LightboxFrame {
            phase: self.phase(),
            showing: self.showing,
            scale: self.scheduler.value(self.scale),
            opacity: self.scheduler.value(self.opacity),
        }
    }

    /// Snap shut without animating (view teardown)
    pub fn reset(&mut self) {
        self.machine.reset();
        self.showing = None;
        self.hide_instantly();
    }

    fn hide_instantly(&mut self) {
        for (id, value) in [(self.scale, HIDDEN_SCALE), (self.opacity, HIDDEN_OPACITY)] {
            if let Some(spring) = self.scheduler.get_spring_mut(id) {
                spring.snap(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(lightbox: &mut LightboxController, now: &mut f64) -> LightboxFrame {
        let mut frame = lightbox.frame(*now);
        for _ in 0..120 {
            *now += 16.0;
            frame = lightbox.frame(*now);
        }
        frame
    }

    #[test]
    fn test_open_then_backdrop_click_closes() {
        let mut gallery = GalleryController::default();
        let mut lightbox = LightboxController::default();
        let mut now = 0.0;

        lightbox.open(&mut gallery, ItemId(3)).unwrap();
        assert_eq!(lightbox.phase(), LightboxPhase::Entering);
        let frame = settle(&mut lightbox, &mut now);
        assert_eq!(frame.phase, LightboxPhase::Open);
        assert!((frame.scale - 1.0).abs() < 1e-3);

        // Content clicks never close
        assert!(!lightbox.on_click(&mut gallery, ClickTarget::Content));
        assert_eq!(gallery.selected(), Some(ItemId(3)));

        assert!(lightbox.on_click(&mut gallery, ClickTarget::Backdrop));
        assert_eq!(gallery.selected(), None);
        assert_eq!(lightbox.phase(), LightboxPhase::Exiting);
        assert_eq!(lightbox.showing(), Some(ItemId(3)));

        let frame = settle(&mut lightbox, &mut now);
        assert_eq!(frame.phase, LightboxPhase::Closed);
        assert_eq!(frame.showing, None);
        assert!((frame.opacity - HIDDEN_OPACITY).abs() < 1e-3);
    }

    #[test]
    fn test_reopen_during_exit_shows_only_new_item() {
        let mut gallery = GalleryController::default();
        let mut lightbox = LightboxController::default();
        let mut now = 0.0;

        lightbox.open(&mut gallery, ItemId(1)).unwrap();
        settle(&mut lightbox, &mut now);
        lightbox.close(&mut gallery);
        now += 16.0;
        lightbox.frame(now);

        lightbox.open(&mut gallery, ItemId(8)).unwrap();
        assert_eq!(lightbox.phase(), LightboxPhase::Entering);
        assert_eq!(lightbox.showing(), Some(ItemId(8)));

        let frame = settle(&mut lightbox, &mut now);
        assert_eq!(frame.phase, LightboxPhase::Open);
        assert_eq!(frame.showing, Some(ItemId(8)));
        assert_eq!(gallery.selected(), Some(ItemId(8)));
    }

    #[test]
    fn test_unknown_item_leaves_lightbox_closed() {
        let mut gallery = GalleryController::default();
        let mut lightbox = LightboxController::default();
        assert!(lightbox.open(&mut gallery, ItemId(99)).is_err());
        assert_eq!(lightbox.phase(), LightboxPhase::Closed);
        assert!(!lightbox.on_click(&mut gallery, ClickTarget::Backdrop));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut gallery = GalleryController::default();
        let mut lightbox = LightboxController::default();
        lightbox.close(&mut gallery);
        lightbox.open(&mut gallery, ItemId(2)).unwrap();
        lightbox.close(&mut gallery);
        lightbox.close(&mut gallery);
        assert_eq!(lightbox.phase(), LightboxPhase::Exiting);
    }
}
