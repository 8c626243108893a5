//! Integration tests for events + FSM + timers + springs
//!
//! These tests verify that:
//! - Pointer events can drive spring targets through a subscription
//! - FSM transitions can retarget animations
//! - Frame-driven timers advance discrete state
//! - Dropping subscriptions detaches every handler

use atelier_animation::{AnimationScheduler, Spring, SpringConfig};
use atelier_core::events::{event_types, Event, EventBus, EventData, SubscriptionSet, WINDOW};
use atelier_core::fsm::{StateMachine, Transition};
use atelier_core::timer::TimerQueue;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Panel {
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum PanelEvent {
    Toggle,
}

/// Pointer events retarget a spring; the frame loop moves it
#[test]
fn test_pointer_events_drive_spring_target() {
    let bus = EventBus::new();
    let spring = Rc::new(RefCell::new(Spring::new(SpringConfig::hero(), 0.0)));

    let handle = spring.clone();
    let _subscription = bus.subscribe(WINDOW, event_types::POINTER_MOVE, move |event| {
        if let EventData::Pointer { client_x, .. } = event.data {
            handle.borrow_mut().set_target(client_x);
        }
    });

    bus.dispatch(&mut Event::pointer_move(240.0, 10.0, 0.0));
    assert_eq!(spring.borrow().target(), 240.0);
    assert_eq!(spring.borrow().value(), 0.0);

    for _ in 0..240 {
        spring.borrow_mut().step(1.0 / 60.0);
    }
    assert!((spring.borrow().value() - 240.0).abs() < 1e-3);
}

/// FSM entry actions retarget a spring the way the lightbox entrance does
#[test]
fn test_fsm_transition_retargets_scale() {
    let scale = Rc::new(RefCell::new(Spring::new(SpringConfig::layout(), 0.8)));

    let open_scale = scale.clone();
    let close_scale = scale.clone();
    let mut panel = StateMachine::builder(Panel::Closed)
        .on(Panel::Closed, PanelEvent::Toggle, Panel::Open)
        .on(Panel::Open, PanelEvent::Toggle, Panel::Closed)
        .on_enter(Panel::Open, move || open_scale.borrow_mut().set_target(1.0))
        .on_enter(Panel::Closed, move || close_scale.borrow_mut().set_target(0.8))
        .build();

    assert!(panel.send(PanelEvent::Toggle).moved());
    assert_eq!(scale.borrow().target(), 1.0);

    for _ in 0..120 {
        scale.borrow_mut().step(1.0 / 60.0);
    }
    assert!((scale.borrow().value() - 1.0).abs() < 1e-3);

    panel.send(PanelEvent::Toggle);
    assert!(panel.is_in(Panel::Closed));
    assert_eq!(scale.borrow().target(), 0.8);
}

/// Guards see shared state owned outside the machine
#[test]
fn test_guarded_transition_reads_shared_flag() {
    let enabled = Rc::new(Cell::new(false));
    let guard_flag = enabled.clone();

    let mut panel = StateMachine::new(
        Panel::Closed,
        vec![
            Transition::new(Panel::Closed, PanelEvent::Toggle, Panel::Open)
                .with_guard(move || guard_flag.get()),
        ],
    );

    assert!(!panel.send(PanelEvent::Toggle).moved());
    enabled.set(true);
    assert_eq!(panel.send(PanelEvent::Toggle).state(), Panel::Open);
}

/// An interval timer cycles an index; each change retargets per-element springs
#[test]
fn test_timer_cycles_active_index_and_springs_follow() {
    let mut timers = TimerQueue::new();
    let mut scheduler = AnimationScheduler::new();
    let interval = timers.set_interval(3000).unwrap();

    let opacity: Vec<_> = (0..5)
        .map(|i| scheduler.spring(SpringConfig::stiff(), if i == 0 { 1.0 } else { 0.3 }))
        .collect();

    let mut active = 0usize;
    let mut now = 0.0;
    for _ in 0..200 {
        now += 16.0;
        for fire in timers.advance(16.0) {
            assert_eq!(fire.id, interval);
            active = (active + fire.count as usize) % opacity.len();
            for (i, id) in opacity.iter().enumerate() {
                scheduler.set_target(*id, if i == active { 1.0 } else { 0.3 });
            }
        }
        scheduler.tick(now);
    }

    // 3200 ms elapsed: exactly one step
    assert_eq!(active, 1);
    assert!(scheduler.get_spring(opacity[1]).is_some_and(|s| s.target() == 1.0));
    assert!(scheduler.get_spring(opacity[0]).is_some_and(|s| s.target() == 0.3));
}

/// Dropping a subscription set detaches every listener it owned
#[test]
fn test_subscription_set_teardown() {
    let bus = EventBus::new();
    let hits = Rc::new(Cell::new(0));
    let mut subscriptions = SubscriptionSet::new();

    for event_type in [event_types::POINTER_MOVE, event_types::RESIZE, event_types::SCROLL] {
        let hits = hits.clone();
        subscriptions.push(bus.subscribe(WINDOW, event_type, move |_| hits.set(hits.get() + 1)));
    }
    assert_eq!(bus.listener_count(), 3);

    bus.dispatch(&mut Event::resize(800.0, 600.0, 0.0));
    assert_eq!(hits.get(), 1);

    drop(subscriptions);
    assert_eq!(bus.listener_count(), 0);

    bus.dispatch(&mut Event::scroll(0.5, 1.0));
    bus.dispatch(&mut Event::pointer_move(1.0, 1.0, 2.0));
    assert_eq!(hits.get(), 1);
}
