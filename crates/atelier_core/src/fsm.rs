//! Finite state machines for discrete view state
//!
//! Menu open/closed, lightbox phases and similar two-to-four state controls
//! are flat machines over `Copy` state and event enums. Transitions may
//! carry a guard and actions; states may carry enter and exit hooks.
//!
//! An event with no matching transition from the current state is ignored,
//! so "open while open" style calls are idempotent.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Bound for state and event identifiers
pub trait FsmKey: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> FsmKey for T {}

pub type Guard = Box<dyn Fn() -> bool>;
pub type Action = Box<dyn FnMut()>;

const HISTORY_LIMIT: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Hook {
    Enter,
    Exit,
}

type Hooks<S> = FxHashMap<(Hook, S), SmallVec<[Action; 1]>>;

fn add_hook<S: FsmKey>(hooks: &mut Hooks<S>, hook: Hook, state: S, action: Action) {
    hooks.entry((hook, state)).or_default().push(action);
}

fn run_hooks<S: FsmKey>(hooks: &mut Hooks<S>, hook: Hook, state: S) {
    if let Some(actions) = hooks.get_mut(&(hook, state)) {
        actions.iter_mut().for_each(|action| action());
    }
}

/// `from --event--> to`, optionally guarded
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
    pub guard: Option<Guard>,
    pub actions: SmallVec<[Action; 2]>,
}

impl<S: FsmKey, E: FsmKey> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
            guard: None,
            actions: SmallVec::new(),
        }
    }

    /// Only fire while `guard` returns true
    pub fn with_guard(self, guard: impl Fn() -> bool + 'static) -> Self {
        Self {
            guard: Some(Box::new(guard)),
            ..self
        }
    }

    /// Run `action` between the exit and enter hooks
    pub fn with_action(mut self, action: impl FnMut() + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    fn fires(&self, state: S, event: E) -> bool {
        if self.from_state != state || self.event != event {
            return false;
        }
        self.guard.as_ref().map_or(true, |guard| guard())
    }
}

/// Outcome of sending an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome<S> {
    Moved { from: S, to: S },
    /// No transition matched; the machine stayed put
    Ignored(S),
}

impl<S: Copy> Outcome<S> {
    /// State after the event
    pub fn state(&self) -> S {
        match *self {
            Outcome::Moved { to, .. } => to,
            Outcome::Ignored(state) => state,
        }
    }

    pub fn moved(&self) -> bool {
        matches!(self, Outcome::Moved { .. })
    }
}

pub struct StateMachineBuilder<S, E> {
    machine: StateMachine<S, E>,
}

impl<S: FsmKey, E: FsmKey> StateMachineBuilder<S, E> {
    pub fn new(initial_state: S) -> Self {
        Self {
            machine: StateMachine::new(initial_state, Vec::new()),
        }
    }

    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        self.machine.transitions.push(transition);
        self
    }

    /// Unguarded `from --event--> to`
    pub fn on(self, from: S, event: E, to: S) -> Self {
        self.transition(Transition::new(from, event, to))
    }

    pub fn on_enter(mut self, state: S, action: impl FnMut() + 'static) -> Self {
        self.machine.on_enter(state, action);
        self
    }

    pub fn on_exit(mut self, state: S, action: impl FnMut() + 'static) -> Self {
        self.machine.on_exit(state, action);
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        self.machine
    }
}

pub struct StateMachine<S, E> {
    initial_state: S,
    current_state: S,
    transitions: Vec<Transition<S, E>>,
    hooks: Hooks<S>,
    /// Last [`HISTORY_LIMIT`] transitions, oldest first
    history: VecDeque<(S, E, S)>,
}

impl<S: FsmKey, E: FsmKey> StateMachine<S, E> {
    pub fn new(initial_state: S, transitions: Vec<Transition<S, E>>) -> Self {
        Self {
            initial_state,
            current_state: initial_state,
            transitions,
            hooks: FxHashMap::default(),
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Recent `(from, event, to)` triples, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &(S, E, S)> + '_ {
        self.history.iter()
    }

    /// Whether `event` would move the machine right now
    pub fn can_send(&self, event: E) -> bool {
        self.transitions.iter().any(|t| t.fires(self.current_state, event))
    }

    /// Fire the first transition matching `event`.
    ///
    /// Order: exit hooks of the old state, transition actions, state change,
    /// enter hooks of the new state.
    pub fn send(&mut self, event: E) -> Outcome<S> {
        let from = self.current_state;
        let Some(index) = self.transitions.iter().position(|t| t.fires(from, event)) else {
            tracing::trace!(state = ?from, ?event, "event ignored");
            return Outcome::Ignored(from);
        };

        run_hooks(&mut self.hooks, Hook::Exit, from);
        let transition = &mut self.transitions[index];
        transition.actions.iter_mut().for_each(|action| action());
        let to = transition.to_state;

        self.current_state = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back((from, event, to));
        run_hooks(&mut self.hooks, Hook::Enter, to);

        tracing::trace!(?from, ?to, ?event, "transition");
        Outcome::Moved { from, to }
    }

    /// Return to the initial state without running hooks.
    ///
    /// Used on view teardown, where the machine is discarded or re-mounted fresh.
    pub fn reset(&mut self) {
        self.current_state = self.initial_state;
        self.history.clear();
    }

    pub fn on_enter(&mut self, state: S, action: impl FnMut() + 'static) {
        add_hook(&mut self.hooks, Hook::Enter, state, Box::new(action));
    }

    pub fn on_exit(&mut self, state: S, action: impl FnMut() + 'static) {
        add_hook(&mut self.hooks, Hook::Exit, state, Box::new(action));
    }
}

impl<S: FsmKey, E: FsmKey> Debug for StateMachine<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &self.current_state)
            .field("transitions", &self.transitions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Phase {
        Idle,
        Hovered,
        Pressed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Input {
        Enter,
        Leave,
        Down,
        Up,
    }

    use Input::{Down, Enter, Leave, Up};
    use Phase::{Hovered, Idle, Pressed};

    fn button() -> StateMachine<Phase, Input> {
        StateMachine::builder(Idle)
            .on(Idle, Enter, Hovered)
            .on(Hovered, Leave, Idle)
            .on(Hovered, Down, Pressed)
            .on(Pressed, Up, Hovered)
            .build()
    }

    #[test]
    fn test_press_cycle() {
        let mut fsm = button();
        assert_eq!(fsm.current_state(), Idle);

        for (input, expected) in [(Enter, Hovered), (Down, Pressed), (Up, Hovered)] {
            assert_eq!(fsm.send(input).state(), expected);
        }
        assert_eq!(fsm.send(Leave), Outcome::Moved { from: Hovered, to: Idle });
    }

    #[test]
    fn test_unmatched_event_is_ignored() {
        let mut fsm = button();
        let outcome = fsm.send(Down);
        assert_eq!(outcome, Outcome::Ignored(Idle));
        assert!(!outcome.moved());
        assert_eq!(fsm.history().len(), 0);
    }

    #[test]
    fn test_guard_blocks_transition() {
        let enabled = Rc::new(Cell::new(true));
        let flag = enabled.clone();

        let mut fsm = StateMachine::builder(Idle)
            .transition(Transition::new(Idle, Enter, Hovered).with_guard(move || flag.get()))
            .on(Hovered, Leave, Idle)
            .build();

        assert!(fsm.send(Enter).moved());
        fsm.send(Leave);
        enabled.set(false);

        assert!(!fsm.can_send(Enter));
        assert_eq!(fsm.send(Enter), Outcome::Ignored(Idle));
    }

    #[test]
    fn test_hooks_and_actions_run_once_per_move() {
        let entries = Rc::new(Cell::new(0));
        let exits = Rc::new(Cell::new(0));
        let actions = Rc::new(Cell::new(0));

        let (on_entry, on_exit, on_action) = (entries.clone(), exits.clone(), actions.clone());
        let mut fsm = StateMachine::builder(Idle)
            .transition(Transition::new(Idle, Enter, Hovered).with_action(move || on_action.set(on_action.get() + 1)))
            .on(Hovered, Leave, Idle)
            .on_enter(Hovered, move || on_entry.set(on_entry.get() + 1))
            .on_exit(Hovered, move || on_exit.set(on_exit.get() + 1))
            .build();

        fsm.send(Enter);
        assert_eq!((entries.get(), exits.get(), actions.get()), (1, 0, 1));

        fsm.send(Enter);
        assert_eq!((entries.get(), exits.get(), actions.get()), (1, 0, 1));

        fsm.send(Leave);
        assert_eq!((entries.get(), exits.get(), actions.get()), (1, 1, 1));
    }

    #[test]
    fn test_history_is_bounded_and_reset_clears() {
        let mut fsm = button();
        for _ in 0..HISTORY_LIMIT {
            fsm.send(Enter);
            fsm.send(Leave);
        }
        assert_eq!(fsm.history().len(), HISTORY_LIMIT);
        assert_eq!(fsm.history().last(), Some(&(Hovered, Leave, Idle)));
        assert_eq!(fsm.history().next(), Some(&(Idle, Enter, Hovered)));

        fsm.send(Enter);
        fsm.reset();
        assert!(fsm.is_in(Idle));
        assert_eq!(fsm.history().len(), 0);
    }
}
