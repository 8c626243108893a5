//! Pointer tracking
//!
//! Raw pointer events arrive far more often than frames. The tracker keeps
//! only the latest one and converts it into a [`PointerSample`] once per frame
//! in [`PointerTracker::sample_frame`], against the container geometry known
//! at that moment.

use atelier_core::events::{event_types, Event, EventData};
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};

/// Viewports narrower than this disable pointer-driven motion
pub const MOBILE_BREAKPOINT_PX: f32 = 768.0;

/// Which behavior variant a motion rig runs with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionProfile {
    /// Collapse to a neutral transform below the breakpoint
    #[default]
    MobileAware,
    /// Track the pointer at every viewport width
    DesktopOnly,
}

/// Coordinate space of produced samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Origin {
    /// Relative to the container center (hero parallax)
    #[default]
    CenterRelative,
    /// Relative to the container top-left corner (page backdrops)
    ContainerRelative,
    /// Raw viewport coordinates (cursor, navigation labels)
    ViewportAbsolute,
}

/// Bounding box of the reference container in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the box has real, positive dimensions
    pub fn is_laid_out(&self) -> bool {
        let finite = [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        finite && self.width > 0.0 && self.height > 0.0
    }
}

/// A normalized pointer position, handed out by value
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: f64,
}

impl PointerSample {
    /// Sample every dependent treats as "no displacement"
    pub const NEUTRAL: PointerSample = PointerSample {
        x: 0.0,
        y: 0.0,
        timestamp_ms: 0.0,
    };
}

#[derive(Clone, Copy, Debug)]
struct RawPointer {
    client_x: f32,
    client_y: f32,
    timestamp_ms: f64,
}

/// Coalesces pointer and viewport events into one sample per frame
#[derive(Clone, Debug)]
pub struct PointerTracker {
    origin: Origin,
    profile: MotionProfile,
    breakpoint_px: f32,
    viewport_width: Option<f32>,
    container: Option<ContainerRect>,
    raw: Option<RawPointer>,
    skipped_frames: u64,
}

impl PointerTracker {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            profile: MotionProfile::default(),
            breakpoint_px: MOBILE_BREAKPOINT_PX,
            viewport_width: None,
            container: None,
            raw: None,
            skipped_frames: 0,
        }
    }

    pub fn with_profile(mut self, profile: MotionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_breakpoint(mut self, breakpoint_px: f32) -> Self {
        if breakpoint_px.is_finite() && breakpoint_px >= 0.0 {
            self.breakpoint_px = breakpoint_px;
        }
        self
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn profile(&self) -> MotionProfile {
        self.profile
    }

    /// Record a raw pointer position. Later events in the same frame win.
    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32, timestamp_ms: f64) {
        if !client_x.is_finite() || !client_y.is_finite() {
            return;
        }
        self.raw = Some(RawPointer {
            client_x,
            client_y,
            timestamp_ms,
        });
    }

    /// Viewport resized; the container may have moved with it
    pub fn on_resize(&mut self, viewport_width: f32, container: Option<ContainerRect>) {
        if viewport_width.is_finite() {
            let was_enabled = self.is_enabled();
            self.viewport_width = Some(viewport_width);
            if was_enabled != self.is_enabled() {
                tracing::debug!(viewport_width, enabled = !was_enabled, "pointer tracking toggled");
            }
        }
        self.container = container;
    }

    pub fn set_container(&mut self, container: Option<ContainerRect>) {
        self.container = container;
    }

    pub fn container(&self) -> Option<ContainerRect> {
        self.container
    }

    /// Route a host event to the matching handler. Returns whether it was used.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match (event.event_type, &event.data) {
            (event_types::POINTER_MOVE, EventData::Pointer { client_x, client_y }) => {
                self.on_pointer_move(*client_x, *client_y, event.timestamp_ms);
                true
            }
            (event_types::RESIZE, EventData::Resize { width, .. }) => {
                let width = *width;
                if width.is_finite() {
                    self.viewport_width = Some(width);
                }
                true
            }
            _ => false,
        }
    }

    /// Whether pointer motion is live at the current viewport width.
    ///
    /// Before the first resize the width is unknown and tracking stays on.
    pub fn is_enabled(&self) -> bool {
        match (self.profile, self.viewport_width) {
            (MotionProfile::DesktopOnly, _) => true,
            (MotionProfile::MobileAware, Some(width)) => width >= self.breakpoint_px,
            (MotionProfile::MobileAware, None) => true,
        }
    }

    /// Normalize the latest raw event against the current container
    pub fn normalize(&self, client_x: f32, client_y: f32) -> Result<(f32, f32)> {
        if self.origin == Origin::ViewportAbsolute {
            return Ok((client_x, client_y));
        }
        let rect = self
            .container
            .filter(ContainerRect::is_laid_out)
            .ok_or(MotionError::GeometryUnavailable)?;
        Ok(match self.origin {
            Origin::CenterRelative => (
                client_x - rect.left - rect.width / 2.0,
                client_y - rect.top - rect.height / 2.0,
            ),
            _ => (client_x - rect.left, client_y - rect.top),
        })
    }

    /// The sample this frame should use.
    ///
    /// `None` means "leave the springs alone": no pointer seen yet, or the
    /// container is not laid out. A disabled tracker yields the neutral
    /// sample so dependents settle back to identity.
    pub fn sample_frame(&mut self) -> Option<PointerSample> {
        if !self.is_enabled() {
            return Some(PointerSample::NEUTRAL);
        }
        let raw = self.raw?;
        match self.normalize(raw.client_x, raw.client_y) {
            Ok((x, y)) => Some(PointerSample {
                x,
                y,
                timestamp_ms: raw.timestamp_ms,
            }),
            Err(err) => {
                self.skipped_frames += 1;
                tracing::debug!(%err, "pointer sample skipped");
                None
            }
        }
    }

    /// Frames skipped because the container had no geometry
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Forget the pointer (view teardown)
    pub fn reset(&mut self) {
        self.raw = None;
        self.skipped_frames = 0;
    }
}
