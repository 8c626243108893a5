//! Mounted views
//!
//! A view owns everything it registers: its bus subscriptions live in a
//! [`SubscriptionSet`] and its timers and springs live inside its state.
//! Mounting builds fresh state; unmounting drops both, so nothing a view
//! registered can outlive it.
//!
//! [`SubscriptionSet`]: atelier_core::SubscriptionSet

mod chrome;
mod connect;
mod gallery;
mod process;
mod stories;

pub use chrome::{ChromeFrame, ChromeSettings, ChromeView, NavItemFrame, OrbFrame, NAV_ORBS};
pub use connect::{ConnectFrame, ConnectView, SharedSink, UNDERLINED};
pub use gallery::{GalleryFrame, GalleryView, TileFrame};
pub use process::{ProcessFrame, ProcessView};
pub use stories::{StoriesFrame, StoriesView};

use std::fmt;
use std::str::FromStr;

use atelier_core::events::EventBus;
use atelier_motion::ContainerRect;

use crate::error::{Result, SiteError};

/// Size of the browser viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Full-viewport container
    pub fn rect(&self) -> ContainerRect {
        ContainerRect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Lifecycle shared by pages and the site chrome
pub trait View {
    fn name(&self) -> &'static str;

    /// Register listeners on `bus` and build fresh state
    fn mount(&mut self, bus: &EventBus, viewport: Viewport) -> Result<()>;

    /// Release every listener, timer and spring. Safe to call twice.
    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;

    /// Run one frame stamped `now_ms` on the rendering clock
    fn frame(&mut self, now_ms: f64);

    /// Listeners currently held by this view
    fn subscription_count(&self) -> usize;

    /// Timers currently scheduled by this view
    fn timer_count(&self) -> usize {
        0
    }
}

/// Host element identifiers
///
/// Ids are grouped in blocks so an index can be recovered from an id.
pub mod elements {
    use atelier_core::events::{ElementId, WINDOW};

    use crate::catalog::{Category, ItemId};
    use crate::contact::Field;

    /// Close button inside the open navigation overlay
    pub const NAV_CLOSE: ElementId = 10;
    pub const CONTACT_SUBMIT: ElementId = 12;

    pub const LIGHTBOX_BACKDROP: ElementId = 20;
    pub const LIGHTBOX_CLOSE: ElementId = 21;
    pub const LIGHTBOX_CONTENT: ElementId = 22;

    const NAV_ORB_BASE: ElementId = 100;
    const NAV_ITEM_BASE: ElementId = 200;
    const FEATURED_BASE: ElementId = 300;
    const FILTER_BASE: ElementId = 400;
    const CONTACT_FIELD_BASE: ElementId = 500;
    const TILE_BASE: ElementId = 1000;

    pub const fn nav_orb(index: usize) -> ElementId {
        NAV_ORB_BASE + index as ElementId
    }

    pub const fn nav_item(index: usize) -> ElementId {
        NAV_ITEM_BASE + index as ElementId
    }

    pub const fn featured_card(index: usize) -> ElementId {
        FEATURED_BASE + index as ElementId
    }

    pub fn filter_button(category: Category) -> ElementId {
        FILTER_BASE + category.index() as ElementId
    }

    pub const fn gallery_tile(id: ItemId) -> ElementId {
        TILE_BASE + id.0 as ElementId
    }

    pub fn contact_field(field: Field) -> ElementId {
        let offset = match field {
            Field::Name => 0,
            Field::Email => 1,
            Field::SessionType => 2,
            Field::Message => 3,
        };
        CONTACT_FIELD_BASE + offset
    }

    /// Enclosing element, for bubbling
    pub fn parent(element: ElementId) -> Option<ElementId> {
        match element {
            WINDOW => None,
            LIGHTBOX_CLOSE | LIGHTBOX_CONTENT => Some(LIGHTBOX_BACKDROP),
            _ => Some(WINDOW),
        }
    }

    /// Bubbling path from `target` out to the window, innermost first
    pub fn path(target: ElementId) -> smallvec::SmallVec<[ElementId; 4]> {
        let mut path = smallvec::smallvec![target];
        let mut current = target;
        while let Some(parent) = parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }
}

/// Top-level pages, keyed by path
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Stories,
    Gallery,
    Process,
    Connect,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Stories, Route::Gallery, Route::Process, Route::Connect];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Stories => "/",
            Route::Gallery => "/gallery",
            Route::Process => "/process",
            Route::Connect => "/connect",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = SiteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .ok_or_else(|| SiteError::UnknownRoute(s.to_string()))
    }
}

/// The mounted page
pub enum Page {
    Stories(StoriesView),
    Gallery(GalleryView),
    Process(ProcessView),
    Connect(ConnectView),
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Stories(_) => Route::Stories,
            Page::Gallery(_) => Route::Gallery,
            Page::Process(_) => Route::Process,
            Page::Connect(_) => Route::Connect,
        }
    }

    pub fn view(&self) -> &dyn View {
        match self {
            Page::Stories(view) => view,
            Page::Gallery(view) => view,
            Page::Process(view) => view,
            Page::Connect(view) => view,
        }
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        match self {
            Page::Stories(view) => view,
            Page::Gallery(view) => view,
            Page::Process(view) => view,
            Page::Connect(view) => view,
        }
    }

    pub fn as_stories(&self) -> Option<&StoriesView> {
        match self {
            Page::Stories(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_gallery(&self) -> Option<&GalleryView> {
        match self {
            Page::Gallery(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_process(&self) -> Option<&ProcessView> {
        match self {
            Page::Process(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_connect(&self) -> Option<&ConnectView> {
        match self {
            Page::Connect(view) => Some(view),
            _ => None,
        }
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("route", &self.route())
            .field("mounted", &self.view().is_mounted())
            .finish()
    }
}
