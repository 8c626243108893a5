//! Site runtime
//!
//! Owns the event bus, the always-mounted chrome and the current page.
//! Events are applied synchronously on dispatch; `frame` runs every mounted
//! view once against the rendering clock.

use std::cell::RefCell;
use std::rc::Rc;

use atelier_core::events::{event_types, ElementId, Event, EventBus, EventData};

use crate::config::SiteConfig;
use crate::contact::LoggingSink;
use crate::error::Result;
use crate::views::{
    elements, ChromeSettings, ChromeView, ConnectView, GalleryView, Page, ProcessView, Route, SharedSink,
    StoriesView, View, Viewport,
};

pub struct SiteRuntime {
    bus: EventBus,
    config: SiteConfig,
    viewport: Viewport,
    sink: SharedSink,
    chrome: ChromeView,
    page: Page,
    now_ms: f64,
    frames: u64,
}

impl SiteRuntime {
    /// Mount the chrome and the home page, logging contact submissions
    pub fn new(config: SiteConfig) -> Result<Self> {
        Self::with_sink(config, Rc::new(RefCell::new(LoggingSink)))
    }

    pub fn with_sink(config: SiteConfig, sink: SharedSink) -> Result<Self> {
        let bus = EventBus::new();
        let viewport = Viewport::new(config.runtime.width, config.runtime.height);

        let mut chrome = ChromeView::new(ChromeSettings {
            cursor_spring: config.motion.cursor_spring,
            profile: config.motion.profile,
            breakpoint_px: config.motion.breakpoint_px,
        });
        chrome.mount(&bus, viewport)?;

        let mut page = build_page(&config, &sink, Route::Stories);
        page.view_mut().mount(&bus, viewport)?;

        Ok(Self {
            bus,
            config,
            viewport,
            sink,
            chrome,
            page,
            now_ms: 0.0,
            frames: 0,
        })
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn route(&self) -> Route {
        self.page.route()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn chrome(&self) -> &ChromeView {
        &self.chrome
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run every mounted view for the frame stamped `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        self.frames += 1;
        self.chrome.frame(now_ms);
        self.page.view_mut().frame(now_ms);
    }

    /// Deliver an event along its bubbling path, then follow any navigation
    /// the chrome asked for.
    pub fn dispatch(&mut self, mut event: Event) -> Result<()> {
        if let EventData::Resize { width, height } = event.data {
            self.viewport = Viewport::new(width, height);
        }
        let path = elements::path(event.target);
        self.bus.dispatch_along(&mut event, &path);

        if let Some(intent) = self.chrome.take_intent() {
            self.navigate(intent.path)?;
        }
        Ok(())
    }

    pub fn click(&mut self, target: ElementId) -> Result<()> {
        self.dispatch(Event::click(target, self.now_ms))
    }

    pub fn hover_enter(&mut self, target: ElementId) -> Result<()> {
        self.dispatch(Event::new(event_types::HOVER_ENTER, target, EventData::None, self.now_ms))
    }

    pub fn hover_leave(&mut self, target: ElementId) -> Result<()> {
        self.dispatch(Event::new(event_types::HOVER_LEAVE, target, EventData::None, self.now_ms))
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) -> Result<()> {
        self.dispatch(Event::pointer_move(client_x, client_y, self.now_ms))
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.dispatch(Event::resize(width, height, self.now_ms))
    }

    pub fn scroll(&mut self, progress: f32) -> Result<()> {
        self.dispatch(Event::scroll(progress, self.now_ms))
    }

    /// Swap the mounted page. Unknown paths leave the current page in place.
    pub fn navigate(&mut self, path: &str) -> Result<()> {
        let route: Route = path.parse()?;
        self.chrome.close_menu();
        if route == self.page.route() && self.page.view().is_mounted() {
            return Ok(());
        }

        self.page.view_mut().unmount();
        let mut page = build_page(&self.config, &self.sink, route);
        page.view_mut().mount(&self.bus, self.viewport)?;
        self.page = page;
        tracing::info!(%route, "navigated");
        Ok(())
    }

    /// Live listeners across every mounted view
    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }

    pub fn timer_count(&self) -> usize {
        self.chrome.timer_count() + self.page.view().timer_count()
    }

    /// Unmount everything
    pub fn shutdown(&mut self) {
        self.page.view_mut().unmount();
        self.chrome.unmount();
    }
}

impl Drop for SiteRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SiteRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteRuntime")
            .field("route", &self.route())
            .field("viewport", &self.viewport)
            .field("frames", &self.frames)
            .field("bus", &self.bus)
            .finish()
    }
}

fn build_page(config: &SiteConfig, sink: &SharedSink, route: Route) -> Page {
    match route {
        Route::Stories => Page::Stories(StoriesView::new(config.hero_config())),
        Route::Gallery => Page::Gallery(GalleryView::new(
            config.motion.layout_spring,
            config.morph.gallery_period_ms,
        )),
        Route::Process => Page::Process(ProcessView::new(config.morph.process_period_ms)),
        Route::Connect => Page::Connect(ConnectView::new(sink.clone())),
    }
}
