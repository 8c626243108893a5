//! Event dispatch system
//!
//! Host-view events (pointer, hover, click, resize, scroll) are routed to
//! listeners keyed by `(element, event type)`. Every listener is owned by a
//! [`Subscription`] guard: dropping the guard removes the listener, so a view
//! that drops its subscriptions on unmount can never leave a handler behind.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

/// Event type identifier
pub type EventType = u32;

/// Identifier of the element an event targets
pub type ElementId = u64;

/// Pseudo-element used for window-level listeners (global pointer, resize, scroll)
pub const WINDOW: ElementId = 0;

/// Event types delivered by the hosting view layer
pub mod event_types {
    use super::EventType;

    pub const POINTER_MOVE: EventType = 1;
    /// Pointer entered an element (bubbles, carries the magnetic flag)
    pub const POINTER_OVER: EventType = 2;
    /// Pointer left an element
    pub const POINTER_OUT: EventType = 3;
    pub const CLICK: EventType = 4;
    /// Per-item hover start (does not bubble in the host)
    pub const HOVER_ENTER: EventType = 5;
    pub const HOVER_LEAVE: EventType = 6;
    pub const RESIZE: EventType = 10;
    /// Scroll progress sampled against a tracked container
    pub const SCROLL: EventType = 11;
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: ElementId,
    pub data: EventData,
    /// Host timestamp in milliseconds
    pub timestamp_ms: f64,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Pointer {
        client_x: f32,
        client_y: f32,
    },
    Hover {
        /// Whether the hovered element (or an ancestor) is marked magnetic
        magnetic: bool,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Scroll {
        /// Scroll progress through the tracked container, 0.0 to 1.0
        progress: f32,
    },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: ElementId, data: EventData, timestamp_ms: f64) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp_ms,
            propagation_stopped: false,
        }
    }

    /// Window-level pointer move
    pub fn pointer_move(client_x: f32, client_y: f32, timestamp_ms: f64) -> Self {
        Self::new(
            event_types::POINTER_MOVE,
            WINDOW,
            EventData::Pointer { client_x, client_y },
            timestamp_ms,
        )
    }

    /// Window resize
    pub fn resize(width: f32, height: f32, timestamp_ms: f64) -> Self {
        Self::new(
            event_types::RESIZE,
            WINDOW,
            EventData::Resize { width, height },
            timestamp_ms,
        )
    }

    /// Scroll progress sample
    pub fn scroll(progress: f32, timestamp_ms: f64) -> Self {
        Self::new(
            event_types::SCROLL,
            WINDOW,
            EventData::Scroll { progress },
            timestamp_ms,
        )
    }

    /// Click on an element
    pub fn click(target: ElementId, timestamp_ms: f64) -> Self {
        Self::new(event_types::CLICK, target, EventData::None, timestamp_ms)
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

new_key_type! {
    /// Unique identifier for a registered listener
    pub struct ListenerId;
}

/// Event handler function type
pub type EventHandler = Box<dyn FnMut(&mut Event)>;

struct Listener {
    key: (ElementId, EventType),
    /// Taken out while the handler runs so it may subscribe or unsubscribe
    handler: Option<EventHandler>,
}

#[derive(Default)]
struct Registry {
    listeners: SlotMap<ListenerId, Listener>,
    routes: FxHashMap<(ElementId, EventType), SmallVec<[ListenerId; 4]>>,
}

impl Registry {
    fn remove(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.listeners.remove(id) else {
            return false;
        };
        if let Some(ids) = self.routes.get_mut(&listener.key) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                self.routes.remove(&listener.key);
            }
        }
        true
    }
}

/// Dispatches events to subscribed handlers
///
/// Cloning the bus yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an element and event type.
    ///
    /// The handler stays registered for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription removes the listener immediately"]
    pub fn subscribe<F>(&self, element: ElementId, event_type: EventType, handler: F) -> Subscription
    where
        F: FnMut(&mut Event) + 'static,
    {
        let key = (element, event_type);
        let mut registry = self.registry.borrow_mut();
        let id = registry.listeners.insert(Listener {
            key,
            handler: Some(Box::new(handler)),
        });
        registry.routes.entry(key).or_default().push(id);
        tracing::trace!(element, event_type, "listener registered");

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Dispatch an event to the listeners of its target only
    pub fn dispatch(&self, event: &mut Event) {
        let target = event.target;
        self.dispatch_along(event, &[target]);
    }

    /// Dispatch an event along a bubbling path, innermost element first.
    ///
    /// Stops as soon as a handler calls [`Event::stop_propagation`].
    pub fn dispatch_along(&self, event: &mut Event, path: &[ElementId]) {
        for &element in path {
            let ids: SmallVec<[ListenerId; 4]> = {
                let registry = self.registry.borrow();
                match registry.routes.get(&(element, event.event_type)) {
                    Some(ids) => ids.clone(),
                    None => continue,
                }
            };

            for id in ids {
                if event.propagation_stopped {
                    return;
                }
                let handler = {
                    let mut registry = self.registry.borrow_mut();
                    registry
                        .listeners
                        .get_mut(id)
                        .and_then(|listener| listener.handler.take())
                };
                // Removed by an earlier handler in this dispatch
                let Some(mut handler) = handler else {
                    continue;
                };

                handler(event);

                let mut registry = self.registry.borrow_mut();
                if let Some(listener) = registry.listeners.get_mut(id) {
                    listener.handler = Some(handler);
                }
            }

            if event.propagation_stopped {
                return;
            }
        }
    }

    /// Number of live listeners across all elements
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Number of live listeners for one element and event type
    pub fn listeners_for(&self, element: ElementId, event_type: EventType) -> usize {
        self.registry
            .borrow()
            .routes
            .get(&(element, event_type))
            .map_or(0, |ids| ids.len())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Scoped ownership of one listener.
///
/// Dropping the subscription (or calling [`Subscription::cancel`]) removes
/// the listener from its bus. Outliving the bus is harmless.
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().listeners.contains_key(self.id))
    }

    /// Remove the listener now
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.id) {
                tracing::trace!(id = ?self.id, "listener removed");
            }
        }
    }
}

/// A set of subscriptions released together when a view tears down
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Drop every subscription in the set
    pub fn release(&mut self) {
        self.subscriptions.clear();
    }
}
