//! Full-screen navigation overlay state
//!
//! Open/closed lives in a [`StateMachine`]; the hovered item is cleared by
//! the machine's entry callback for `Closed`, so no path into `Closed` can
//! leave a highlight behind.

use std::cell::Cell;
use std::rc::Rc;

use atelier_core::fsm::StateMachine;

use crate::catalog::{NavItem, NAV_ITEMS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavPhase {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavEvent {
    Toggle,
    Open,
    Close,
}

/// Discrete overlay readout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    pub is_open: bool,
    pub hovered: Option<usize>,
}

/// Where the user asked to go. Emitted only after the overlay has closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationIntent {
    pub index: usize,
    pub path: &'static str,
}

pub struct OverlayStateMachine {
    machine: StateMachine<NavPhase, NavEvent>,
    hovered: Rc<Cell<Option<usize>>>,
    items: &'static [NavItem],
}

impl Default for OverlayStateMachine {
    fn default() -> Self {
        Self::new(&NAV_ITEMS)
    }
}

impl OverlayStateMachine {
    pub fn new(items: &'static [NavItem]) -> Self {
        let hovered = Rc::new(Cell::new(None));
        let clear = hovered.clone();
        let machine = StateMachine::builder(NavPhase::Closed)
            .on(NavPhase::Closed, NavEvent::Toggle, NavPhase::Open)
            .on(NavPhase::Open, NavEvent::Toggle, NavPhase::Closed)
            .on(NavPhase::Closed, NavEvent::Open, NavPhase::Open)
            .on(NavPhase::Open, NavEvent::Close, NavPhase::Closed)
            .on_enter(NavPhase::Closed, move || clear.set(None))
            .build();

        Self {
            machine,
            hovered,
            items,
        }
    }

    pub fn items(&self) -> &'static [NavItem] {
        self.items
    }

    pub fn is_open(&self) -> bool {
        self.machine.is_in(NavPhase::Open)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered.get()
    }

    pub fn state(&self) -> NavState {
        NavState {
            is_open: self.is_open(),
            hovered: self.hovered(),
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.machine.send(NavEvent::Toggle);
        self.is_open()
    }

    /// No-op when already open
    pub fn open(&mut self) {
        self.machine.send(NavEvent::Open);
    }

    /// No-op when already closed; always clears the hover
    pub fn close(&mut self) {
        self.machine.send(NavEvent::Close);
        self.hovered.set(None);
    }

    /// Highlight item `index`. Ignored while closed or out of range.
    pub fn hover_enter(&mut self, index: usize) {
        if self.is_open() && index < self.items.len() {
            self.hovered.set(Some(index));
        }
    }

    /// Drop the highlight, but only if `index` still holds it.
    ///
    /// A leave from the previous item that arrives after the enter of the next
    /// one must not clear the new highlight.
    pub fn hover_leave(&mut self, index: usize) {
        if self.hovered.get() == Some(index) {
            self.hovered.set(None);
        }
    }

    /// Close the overlay, then hand back where to go.
    ///
    /// Items are only on screen while the overlay is open, so a select
    /// arriving while closed yields nothing.
    pub fn select(&mut self, index: usize) -> Option<NavigationIntent> {
        if !self.is_open() {
            return None;
        }
        let item = self.items.get(index)?;
        self.close();
        tracing::debug!(path = item.path, "navigation selected");
        Some(NavigationIntent {
            index,
            path: item.path,
        })
    }

    /// Back to the mount-time state without running callbacks
    pub fn reset(&mut self) {
        self.machine.reset();
        self.hovered.set(None);
    }
}

impl std::fmt::Debug for OverlayStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStateMachine")
            .field("state", &self.state())
            .field("items", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_an_involution() {
        let mut overlay = OverlayStateMachine::default();
        for _ in 0..3 {
            let before = overlay.is_open();
            overlay.toggle();
            overlay.toggle();
            assert_eq!(overlay.is_open(), before);
            overlay.toggle();
        }
    }

    #[test]
    fn test_open_and_close_are_idempotent() {
        let mut overlay = OverlayStateMachine::default();
        overlay.close();
        assert!(!overlay.is_open());
        overlay.open();
        overlay.open();
        assert!(overlay.is_open());
        overlay.close();
        overlay.close();
        assert_eq!(overlay.state(), NavState::default());
    }

    #[test]
    fn test_close_resets_hover() {
        let mut overlay = OverlayStateMachine::default();
        overlay.open();
        overlay.hover_enter(2);
        assert_eq!(overlay.hovered(), Some(2));
        overlay.close();
        assert_eq!(overlay.hovered(), None);

        overlay.open();
        overlay.hover_enter(1);
        overlay.toggle();
        assert_eq!(overlay.hovered(), None);
    }

    #[test]
    fn test_hover_ignored_while_closed() {
        let mut overlay = OverlayStateMachine::default();
        overlay.hover_enter(0);
        assert_eq!(overlay.hovered(), None);
        overlay.open();
        overlay.hover_enter(9);
        assert_eq!(overlay.hovered(), None);
    }

    #[test]
    fn test_enter_then_stale_leave_keeps_new_highlight() {
        let mut overlay = OverlayStateMachine::default();
        overlay.open();
        overlay.hover_enter(0);

        // Same tick: enter on 1 arrives before leave on 0
        overlay.hover_enter(1);
        overlay.hover_leave(0);
        assert_eq!(overlay.hovered(), Some(1));

        overlay.hover_leave(1);
        assert_eq!(overlay.hovered(), None);
    }

    #[test]
    fn test_select_closes_before_intent() {
        let mut overlay = OverlayStateMachine::default();
        overlay.open();
        overlay.hover_enter(2);
        let intent = overlay.select(2).unwrap();
        assert_eq!(intent.path, "/process");
        assert!(!overlay.is_open());
        assert_eq!(overlay.hovered(), None);
        assert_eq!(overlay.select(4), None);
    }

    #[test]
    fn test_select_while_closed_yields_nothing() {
        let mut overlay = OverlayStateMachine::default();
        assert_eq!(overlay.select(1), None);
        assert_eq!(overlay.state(), NavState::default());

        overlay.open();
        overlay.close();
        assert_eq!(overlay.select(0), None);

        overlay.open();
        assert_eq!(overlay.select(0).map(|intent| intent.path), Some("/"));
    }
}
