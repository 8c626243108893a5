//! JSON scenarios
//!
//! A scenario is a flat list of steps run against a freshly mounted site:
//! clock advances, host events, and checks against a [`SiteSnapshot`].
//! The first failing step ends the run; the report names it.
//!
//! ```json
//! { "route": "/gallery", "steps": [
//!     { "type": "set_category", "category": "portrait" },
//!     { "type": "open_item", "id": 3 },
//!     { "type": "wait", "ms": 500 },
//!     { "type": "assert_selected", "id": 3 }
//! ] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::{Category, ItemId};
use crate::config::SiteConfig;
use crate::headless::{drive_frames, FrameBudget, RunReport, StepFailure};
use crate::runtime::SiteRuntime;
use crate::views::elements;

#[derive(Clone, Debug, Deserialize)]
pub struct SiteScenario {
    /// Page to start on instead of `/`
    #[serde(default)]
    pub route: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl SiteScenario {
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Invalid scenario JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to load scenario {}", path.display()))
    }
}

/// Lightbox region a scenario can click
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightboxTarget {
    Backdrop,
    Close,
    Content,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Advance the clock by at least `ms`, one tick at a time
    Wait { ms: u64 },
    Tick { frames: u32 },
    PointerMove { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
    Scroll { progress: f32 },
    Navigate { path: String },
    ToggleMenu {
        #[serde(default)]
        orb: usize,
    },
    CloseMenu,
    HoverNav { index: usize },
    LeaveNav { index: usize },
    SelectNav { index: usize },
    SetCategory { category: Category },
    OpenItem { id: ItemId },
    ClickLightbox { target: LightboxTarget },
    AssertRoute { path: String },
    AssertMenuOpen { open: bool },
    AssertHovered { index: Option<usize> },
    AssertActiveIndex { index: usize },
    AssertSelected { id: Option<ItemId> },
    AssertVisibleCount { count: usize },
    AssertListenerCount { count: usize },
}

impl ScenarioStep {
    pub fn name(&self) -> &'static str {
        use ScenarioStep::*;

        match self {
            Wait { .. } => "wait",
            Tick { .. } => "tick",
            PointerMove { .. } => "pointer_move",
            Resize { .. } => "resize",
            Scroll { .. } => "scroll",
            Navigate { .. } => "navigate",
            ToggleMenu { .. } => "toggle_menu",
            CloseMenu => "close_menu",
            HoverNav { .. } => "hover_nav",
            LeaveNav { .. } => "leave_nav",
            SelectNav { .. } => "select_nav",
            SetCategory { .. } => "set_category",
            OpenItem { .. } => "open_item",
            ClickLightbox { .. } => "click_lightbox",
            AssertRoute { .. } => "assert_route",
            AssertMenuOpen { .. } => "assert_menu_open",
            AssertHovered { .. } => "assert_hovered",
            AssertActiveIndex { .. } => "assert_active_index",
            AssertSelected { .. } => "assert_selected",
            AssertVisibleCount { .. } => "assert_visible_count",
            AssertListenerCount { .. } => "assert_listener_count",
        }
    }

    pub fn is_assertion(&self) -> bool {
        self.name().starts_with("assert_")
    }
}

/// Discrete site state, as seen by assertions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteSnapshot {
    pub route: String,
    pub menu_open: bool,
    pub hovered: Option<usize>,
    /// `None` off the home page
    pub active_index: Option<usize>,
    /// `None` off the gallery page
    pub visible_count: Option<usize>,
    pub selected: Option<ItemId>,
    pub listener_count: usize,
}

impl SiteSnapshot {
    pub fn capture(site: &SiteRuntime) -> Self {
        let nav = site.chrome().nav_state();
        let gallery = site.page().as_gallery();
        Self {
            route: site.route().path().to_string(),
            menu_open: nav.is_open,
            hovered: nav.hovered,
            active_index: site.page().as_stories().and_then(|stories| stories.active_index()),
            visible_count: gallery.map(|gallery| gallery.visible_ids().len()),
            selected: gallery.and_then(|gallery| gallery.view_state().selected),
            listener_count: site.listener_count(),
        }
    }

    /// Check one assertion step. Action steps pass trivially.
    pub fn check(&self, step: &ScenarioStep) -> AssertionResult {
        match step {
            ScenarioStep::AssertRoute { path } => AssertionResult::compare("route", path.as_str(), self.route.as_str()),
            ScenarioStep::AssertMenuOpen { open } => AssertionResult::compare("menu", *open, self.menu_open),
            ScenarioStep::AssertHovered { index } => AssertionResult::compare("hovered", *index, self.hovered),
            ScenarioStep::AssertActiveIndex { index } => match self.active_index {
                Some(active) => AssertionResult::compare("active_index", *index, active),
                None => AssertionResult::off_page("active_index", self),
            },
            ScenarioStep::AssertSelected { id } => match self.visible_count {
                Some(_) => AssertionResult::compare("selected", *id, self.selected),
                None => AssertionResult::off_page("selected", self),
            },
            ScenarioStep::AssertVisibleCount { count } => match self.visible_count {
                Some(visible) => AssertionResult::compare("visible_count", *count, visible),
                None => AssertionResult::off_page("visible_count", self),
            },
            ScenarioStep::AssertListenerCount { count } => {
                AssertionResult::compare("listener_count", *count, self.listener_count)
            }
            _ => AssertionResult::Passed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed {
        /// Stable machine-readable reason
        code: &'static str,
        message: String,
    },
}

impl AssertionResult {
    fn compare<T: PartialEq + std::fmt::Debug>(code: &'static str, expected: T, actual: T) -> Self {
        if expected == actual {
            return AssertionResult::Passed;
        }
        AssertionResult::Failed {
            code,
            message: format!("expected {expected:?}, found {actual:?}"),
        }
    }

    fn off_page(code: &'static str, snapshot: &SiteSnapshot) -> Self {
        AssertionResult::Failed {
            code,
            message: format!("not observable on {}", snapshot.route),
        }
    }
}

#[derive(Clone, Debug)]
pub enum RunOutcome {
    Passed(RunReport),
    Failed(RunReport),
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::Passed(report) | RunOutcome::Failed(report) => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed(_))
    }
}

/// Site plus the logical clock a scenario advances
struct ScenarioRunner {
    site: SiteRuntime,
    budget: FrameBudget,
    now_ms: u64,
    frames: u64,
}

impl ScenarioRunner {
    fn advance(&mut self, frames: u32) -> Result<()> {
        if frames == 0 {
            return Ok(());
        }
        let site = &mut self.site;
        let ran = &mut self.frames;
        self.now_ms = drive_frames(self.budget.with_frames(frames), self.now_ms, |stamp| {
            site.frame(stamp.now_ms as f64);
            *ran += 1;
            Ok(())
        })?;
        Ok(())
    }

    /// Apply an action step. Host-side errors come back as the inner `Err`.
    fn act(&mut self, step: &ScenarioStep) -> Result<std::result::Result<(), String>> {
        match step {
            ScenarioStep::Wait { ms } => return self.advance(ticks_for(*ms, self.budget.tick_ms)).map(Ok),
            ScenarioStep::Tick { frames } => return self.advance(*frames).map(Ok),
            _ => {}
        }

        let site = &mut self.site;
        let applied = match step {
            ScenarioStep::PointerMove { x, y } => site.pointer_move(*x, *y),
            ScenarioStep::Resize { width, height } => site.resize(*width, *height),
            ScenarioStep::Scroll { progress } => site.scroll(*progress),
            ScenarioStep::Navigate { path } => site.navigate(path),
            ScenarioStep::ToggleMenu { orb } => site.click(elements::nav_orb(*orb)),
            ScenarioStep::CloseMenu => site.click(elements::NAV_CLOSE),
            ScenarioStep::HoverNav { index } => site.hover_enter(elements::nav_item(*index)),
            ScenarioStep::LeaveNav { index } => site.hover_leave(elements::nav_item(*index)),
            ScenarioStep::SelectNav { index } => site.click(elements::nav_item(*index)),
            ScenarioStep::SetCategory { category } => site.click(elements::filter_button(*category)),
            ScenarioStep::OpenItem { id } => site.click(elements::gallery_tile(*id)),
            ScenarioStep::ClickLightbox { target } => site.click(match target {
                LightboxTarget::Backdrop => elements::LIGHTBOX_BACKDROP,
                LightboxTarget::Close => elements::LIGHTBOX_CLOSE,
                LightboxTarget::Content => elements::LIGHTBOX_CONTENT,
            }),
            _ => Ok(()),
        };
        Ok(applied.map_err(|err| err.to_string()))
    }

    fn fail(&self, index: usize, step: &ScenarioStep, message: String) -> RunOutcome {
        tracing::debug!(index, step = step.name(), %message, "scenario step failed");
        let failure = StepFailure {
            index,
            step: step.name().to_string(),
            message,
        };
        RunOutcome::Failed(RunReport::failed(failure, self.frames, self.now_ms))
    }
}

/// Frames needed to cover `ms` on a `tick_ms` clock
fn ticks_for(ms: u64, tick_ms: u64) -> u32 {
    let ticks = ms.div_ceil(tick_ms.max(1));
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Parse and run a scenario with the default configuration.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    run_loaded_scenario(&SiteScenario::from_json(input)?, &SiteConfig::default())
}

/// Run `scenario` on a site built from `config`.
///
/// `Err` means the run could not start or the clock could not advance;
/// a failing step is reported through [`RunOutcome::Failed`].
pub fn run_loaded_scenario(scenario: &SiteScenario, config: &SiteConfig) -> Result<RunOutcome> {
    let mut site = SiteRuntime::new(config.clone()).context("Failed to start site")?;
    if let Some(route) = scenario.route.as_deref() {
        site.navigate(route)
            .with_context(|| format!("Invalid start route {route}"))?;
    }

    let mut runner = ScenarioRunner {
        site,
        budget: FrameBudget::from(&config.runtime),
        now_ms: 0,
        frames: 0,
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        if step.is_assertion() {
            if let AssertionResult::Failed { code, message } = SiteSnapshot::capture(&runner.site).check(step) {
                return Ok(runner.fail(index, step, format!("{code}: {message}")));
            }
        } else if let Err(message) = runner.act(step)? {
            return Ok(runner.fail(index, step, message));
        }
    }

    tracing::debug!(steps = scenario.steps.len(), frames = runner.frames, "scenario passed");
    Ok(RunOutcome::Passed(RunReport::passed(runner.frames, runner.now_ms)))
}
