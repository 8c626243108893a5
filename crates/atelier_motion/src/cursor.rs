//! Spring-following custom cursor

use atelier_animation::{AnimationScheduler, SpringConfig, SpringId};
use atelier_core::events::{event_types, Event, EventData};

use crate::pointer::{MotionProfile, Origin, PointerTracker};

/// Cursor position and hover state for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorFrame {
    pub x: f32,
    pub y: f32,
    /// Pointer is over a magnetic element
    pub hovering: bool,
}

#[derive(Debug)]
pub struct CustomCursor {
    tracker: PointerTracker,
    scheduler: AnimationScheduler,
    x: SpringId,
    y: SpringId,
    hovering: bool,
}

impl Default for CustomCursor {
    fn default() -> Self {
        Self::new(SpringConfig::cursor())
    }
}

impl CustomCursor {
    pub fn new(spring: SpringConfig) -> Self {
        let mut scheduler = AnimationScheduler::new();
        let x = scheduler.spring(spring, 0.0);
        let y = scheduler.spring(spring, 0.0);
        Self {
            tracker: PointerTracker::new(Origin::ViewportAbsolute).with_profile(MotionProfile::DesktopOnly),
            scheduler,
            x,
            y,
            hovering: false,
        }
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32, timestamp_ms: f64) {
        self.tracker.on_pointer_move(client_x, client_y, timestamp_ms);
    }

    /// Pointer entered an element; only magnetic ones switch the hover look
    pub fn pointer_over(&mut self, magnetic: bool) {
        if magnetic {
            self.hovering = true;
        }
    }

    pub fn pointer_out(&mut self) {
        self.hovering = false;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        match (event.event_type, &event.data) {
            (event_types::POINTER_OVER, EventData::Hover { magnetic }) => {
                self.pointer_over(*magnetic);
                true
            }
            (event_types::POINTER_OUT, _) => {
                self.pointer_out();
                true
            }
            _ => self.tracker.handle_event(event),
        }
    }

    pub fn frame(&mut self, now_ms: f64) -> CursorFrame {
        if let Some(sample) = self.tracker.sample_frame() {
            self.scheduler.set_target(self.x, sample.x);
            self.scheduler.set_target(self.y, sample.y);
        }
        self.scheduler.tick(now_ms);
        CursorFrame {
            x: self.scheduler.value(self.x),
            y: self.scheduler.value(self.y),
            hovering: self.hovering,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations()
    }

    pub fn teardown(&mut self) {
        self.scheduler.clear();
        self.tracker.reset();
        self.hovering = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_converges_on_pointer() {
        let mut cursor = CustomCursor::default();
        cursor.handle_event(&Event::pointer_move(320.0, 180.0, 0.0));

        let mut now = 0.0;
        let mut frame = CursorFrame::default();
        for _ in 0..120 {
            now += 16.0;
            frame = cursor.frame(now);
        }
        assert!((frame.x - 320.0).abs() < 1e-3);
        assert!((frame.y - 180.0).abs() < 1e-3);
        assert!(!cursor.is_animating());
    }

    #[test]
    fn test_only_magnetic_targets_hover() {
        let mut cursor = CustomCursor::default();
        cursor.handle_event(&Event::new(
            event_types::POINTER_OVER,
            7,
            EventData::Hover { magnetic: false },
            0.0,
        ));
        assert!(!cursor.is_hovering());

        cursor.handle_event(&Event::new(
            event_types::POINTER_OVER,
            8,
            EventData::Hover { magnetic: true },
            1.0,
        ));
        assert!(cursor.frame(16.0).hovering);

        cursor.handle_event(&Event::new(event_types::POINTER_OUT, 8, EventData::None, 2.0));
        assert!(!cursor.is_hovering());
    }
}
