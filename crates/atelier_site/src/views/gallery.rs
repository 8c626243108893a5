//! Gallery page: category filter, staggered tile entrance, lightbox

use std::cell::RefCell;
use std::rc::Rc;

use atelier_animation::presets::MorphPreset;
use atelier_animation::{CornerRadii, Easing, FrameClock, LiquidMorph, SpringConfig};
use atelier_core::events::{event_types, EventBus, SubscriptionSet};

use super::{elements, View, Viewport};
use crate::catalog::{self, Category, ItemId};
use crate::error::Result;
use crate::gallery::{GalleryController, ViewState};
use crate::lightbox::{ClickTarget, LightboxController, LightboxFrame, LightboxPhase};

const TILE_ENTER_MS: f32 = 500.0;
const TILE_STAGGER_MS: f32 = 100.0;
const TILE_HIDDEN_SCALE: f32 = 0.8;

/// Entrance styling of one visible tile
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileFrame {
    pub id: ItemId,
    pub opacity: f32,
    pub scale: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryFrame {
    pub view: ViewState,
    pub tiles: Vec<TileFrame>,
    pub lightbox: LightboxFrame,
}

struct GalleryState {
    gallery: GalleryController,
    lightbox: LightboxController,
    tile_morph: LiquidMorph,
    /// Time since the visible set last changed
    reveal_ms: f32,
    clock: FrameClock,
    last: Option<GalleryFrame>,
}

impl GalleryState {
    fn set_category(&mut self, category: Category) {
        if self.gallery.active_category() != category {
            self.reveal_ms = 0.0;
        }
        self.gallery.set_category(category);
    }

    fn open(&mut self, id: ItemId) {
        // Tiles hidden by the filter are not on screen to be clicked
        if !self.gallery.visible().iter().any(|item| item.id == id) {
            tracing::debug!(%id, "click on filtered-out tile ignored");
            return;
        }
        if let Err(err) = self.lightbox.open(&mut self.gallery, id) {
            tracing::debug!(%err, "lightbox open rejected");
        }
    }

    fn click(&mut self, target: ClickTarget) {
        self.lightbox.on_click(&mut self.gallery, target);
    }

    fn tile(&self, position: usize, id: ItemId) -> TileFrame {
        let local = (self.reveal_ms - position as f32 * TILE_STAGGER_MS) / TILE_ENTER_MS;
        let eased = Easing::EaseOut.apply(local);
        TileFrame {
            id,
            opacity: eased,
            scale: TILE_HIDDEN_SCALE + (1.0 - TILE_HIDDEN_SCALE) * eased,
        }
    }

    fn frame(&mut self, now_ms: f64) {
        let dt_ms = self.clock.advance(now_ms) * 1000.0;
        self.reveal_ms += dt_ms;
        self.tile_morph.tick(dt_ms);
        let lightbox = self.lightbox.frame(now_ms);

        let tiles = self
            .gallery
            .visible()
            .iter()
            .enumerate()
            .map(|(position, item)| self.tile(position, item.id))
            .collect();

        self.last = Some(GalleryFrame {
            view: self.gallery.state(),
            tiles,
            lightbox,
        });
    }
}

pub struct GalleryView {
    spring: SpringConfig,
    morph_period_ms: u32,
    state: Option<Rc<RefCell<GalleryState>>>,
    subscriptions: SubscriptionSet,
}

impl GalleryView {
    pub fn new(spring: SpringConfig, morph_period_ms: u32) -> Self {
        Self {
            spring,
            morph_period_ms,
            state: None,
            subscriptions: SubscriptionSet::new(),
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.state
            .as_ref()
            .map(|state| state.borrow().gallery.state())
            .unwrap_or_default()
    }

    pub fn visible_ids(&self) -> Vec<ItemId> {
        self.state.as_ref().map_or_else(Vec::new, |state| {
            state.borrow().gallery.visible().iter().map(|item| item.id).collect()
        })
    }

    pub fn lightbox_phase(&self) -> LightboxPhase {
        self.state
            .as_ref()
            .map(|state| state.borrow().lightbox.phase())
            .unwrap_or_default()
    }

    pub fn last_frame(&self) -> Option<GalleryFrame> {
        self.state.as_ref()?.borrow().last.clone()
    }

    /// Corner radii shared by every tile this frame
    pub fn tile_shape(&self, width: f32, height: f32) -> Option<CornerRadii> {
        Some(self.state.as_ref()?.borrow().tile_morph.shape(width, height))
    }
}

impl View for GalleryView {
    fn name(&self) -> &'static str {
        "gallery"
    }

    fn mount(&mut self, bus: &EventBus, _viewport: Viewport) -> Result<()> {
        self.unmount();
        let state = Rc::new(RefCell::new(GalleryState {
            gallery: GalleryController::default(),
            lightbox: LightboxController::new(self.spring),
            tile_morph: MorphPreset::gallery_tile(self.morph_period_ms),
            reveal_ms: 0.0,
            clock: FrameClock::new(),
            last: None,
        }));

        for category in Category::ALL {
            let s = state.clone();
            self.subscriptions.push(bus.subscribe(
                elements::filter_button(category),
                event_types::CLICK,
                move |_| s.borrow_mut().set_category(category),
            ));
        }

        for item in catalog::gallery() {
            let id = item.id;
            let s = state.clone();
            self.subscriptions
                .push(bus.subscribe(elements::gallery_tile(id), event_types::CLICK, move |_| {
                    s.borrow_mut().open(id);
                }));
        }

        let s = state.clone();
        self.subscriptions
            .push(bus.subscribe(elements::LIGHTBOX_BACKDROP, event_types::CLICK, move |_| {
                s.borrow_mut().click(ClickTarget::Backdrop);
            }));
        let s = state.clone();
        self.subscriptions
            .push(bus.subscribe(elements::LIGHTBOX_CLOSE, event_types::CLICK, move |_| {
                s.borrow_mut().click(ClickTarget::CloseButton);
            }));
        // Clicks on the image never reach the backdrop
        let s = state.clone();
        self.subscriptions
            .push(bus.subscribe(elements::LIGHTBOX_CONTENT, event_types::CLICK, move |event| {
                event.stop_propagation();
                s.borrow_mut().click(ClickTarget::Content);
            }));

        self.state = Some(state);
        tracing::info!(listeners = self.subscriptions.len(), "gallery mounted");
        Ok(())
    }

    fn unmount(&mut self) {
        self.subscriptions.release();
        if let Some(state) = self.state.take() {
            let mut state = state.borrow_mut();
            state.lightbox.reset();
            state.gallery.reset();
            state.tile_morph.cancel();
            tracing::info!("gallery unmounted");
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
    use atelier_animation::presets::GALLERY_PERIOD_MS;
    use atelier_core::events::Event;

    fn mounted() -> (EventBus, GalleryView) {
        let bus = EventBus::new();
        let mut view = GalleryView::new(SpringConfig::layout(), GALLERY_PERIOD_MS);
        view.mount(&bus, Viewport::default()).unwrap();
        (bus, view)
    }

    fn click(bus: &EventBus, target: u64) {
        bus.dispatch_along(&mut Event::click(target, 0.0), &elements::path(target));
    }

    #[test]
    fn test_filter_buttons_drive_visible_set() {
        let (bus, view) = mounted();
        click(&bus, elements::filter_button(Category::Family));
        let ids: Vec<u32> = view.visible_ids().iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![4, 8, 13, 16]);
        assert_eq!(view.view_state().active_category, Category::Family);
    }

    #[test]
    fn test_content_click_does_not_reach_backdrop() {
        let (bus, view) = mounted();
        click(&bus, elements::gallery_tile(ItemId(6)));
        assert_eq!(view.view_state().selected, Some(ItemId(6)));

        click(&bus, elements::LIGHTBOX_CONTENT);
        assert_eq!(view.view_state().selected, Some(ItemId(6)));
        assert_eq!(view.lightbox_phase(), LightboxPhase::Entering);

        click(&bus, elements::LIGHTBOX_BACKDROP);
        assert_eq!(view.view_state().selected, None);
        assert_eq!(view.lightbox_phase(), LightboxPhase::Exiting);
    }

    #[test]
    fn test_hidden_tile_click_is_ignored() {
        let (bus, view) = mounted();
        click(&bus, elements::filter_button(Category::Portrait));
        click(&bus, elements::gallery_tile(ItemId(2)));
        assert_eq!(view.view_state().selected, None);
        assert_eq!(view.lightbox_phase(), LightboxPhase::Closed);
    }

    #[test]
    fn test_tiles_enter_with_stagger() {
        let (_bus, mut view) = mounted();
        view.frame(0.0);
        view.frame(200.0);
        let frame = view.last_frame().unwrap();
        assert_eq!(frame.tiles.len(), 18);
        assert!(frame.tiles[0].opacity > frame.tiles[1].opacity);
        assert_eq!(frame.tiles[17].opacity, 0.0);
        assert_eq!(frame.tiles[17].scale, TILE_HIDDEN_SCALE);
    }
}
