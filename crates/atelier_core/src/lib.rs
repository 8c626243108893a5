//! Atelier Core Runtime
//!
//! This crate provides the foundational primitives for the Atelier site:
//!
//! - **Event Dispatch**: host-view events routed to scoped subscriptions
//! - **State Machines**: typed finite state machines for discrete view state
//! - **Timers**: intervals and timeouts driven by the frame clock
//!
//! # Example
//!
//! ```rust
//! use atelier_core::events::{event_types, Event, EventBus, WINDOW};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let bus = EventBus::new();
//! let moves = Rc::new(Cell::new(0));
//! let counter = moves.clone();
//!
//! let subscription = bus.subscribe(WINDOW, event_types::POINTER_MOVE, move |_| {
//!     counter.set(counter.get() + 1);
//! });
//!
//! bus.dispatch(&mut Event::pointer_move(10.0, 20.0, 0.0));
//! assert_eq!(moves.get(), 1);
//!
//! // Teardown: the listener goes away with its subscription
//! drop(subscription);
//! assert_eq!(bus.listener_count(), 0);
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod timer;

pub use error::{CoreError, Result};
pub use events::{ElementId, Event, EventBus, EventData, EventType, Subscription, SubscriptionSet};
pub use fsm::{Outcome, StateMachine, Transition};
pub use timer::{TimerFire, TimerId, TimerQueue};
