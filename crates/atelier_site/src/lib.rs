//! Atelier Site
//!
//! The portfolio pages as mountable views over a shared event bus.
//!
//! # Features
//!
//! - **Gallery**: category filter, staggered tile entrance, and a spring-driven lightbox
//! - **Navigation Overlay**: open/closed menu state with hover tracking and route intents
//! - **Contact Form**: field state, hover underlines, and a pluggable submission sink
//! - **Runtime**: page swaps with full listener and timer teardown
//! - **Headless Scenarios**: JSON-driven frame stepping with structured reports
//!
//! # Example
//!
//! ```ignore
//! use atelier_site::{SiteConfig, SiteRuntime};
//!
//! let mut site = SiteRuntime::new(SiteConfig::default())?;
//! site.pointer_move(640.0, 400.0)?;
//! site.frame(16.0);
//! site.navigate("/gallery")?;
//! ```

pub mod catalog;
pub mod config;
pub mod contact;
pub mod error;
pub mod gallery;
pub mod headless;
pub mod lightbox;
pub mod overlay;
pub mod runtime;
pub mod scenario;
pub mod views;

pub use catalog::{Category, FeaturedProject, GalleryItem, ItemId, NavItem, ProcessStep};
pub use config::{MorphConfig, MotionConfig, RuntimeConfig, SiteConfig, SlideshowConfig};
pub use contact::{ContactForm, ContactSubmission, Field, LoggingSink, SessionType, SubmissionSink};
pub use error::{GalleryError, Result, SiteError};
pub use gallery::{GalleryController, ViewState};
pub use headless::{drive_frames, FrameBudget, FrameStamp, ReportStatus, RunReport, StepFailure};
pub use lightbox::{ClickTarget, LightboxController, LightboxFrame, LightboxPhase};
pub use overlay::{NavEvent, NavPhase, NavState, NavigationIntent, OverlayStateMachine};
pub use runtime::SiteRuntime;
pub use scenario::{
    run_loaded_scenario, run_scenario, AssertionResult, LightboxTarget, RunOutcome, ScenarioStep, SiteScenario, SiteSnapshot,
};
pub use views::{elements, Page, Route, View, Viewport};
