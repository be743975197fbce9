//! Table-driven state machines over small `Copy` enums.
//!
//! Each `(state, event)` pair maps to at most one target. Wildcard entries
//! apply from every state that has no explicit entry for the event, except
//! the wildcard's own target. An optional guard can veto a transition.
//! Unmatched events are ignored.

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub trait StateKind: Copy + Eq + Hash + Debug {}
impl<T: Copy + Eq + Hash + Debug> StateKind for T {}

type Guard = Box<dyn Fn() -> bool>;

/// A single edge, used with [`StateMachineBuilder::transition`] when the
/// edge needs a guard
pub struct Transition<S, E> {
    from: Option<S>,
    event: E,
    to: S,
    guard: Option<Guard>,
}

impl<S: StateKind, E: StateKind> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Transition {
            from: Some(from),
            event,
            to,
            guard: None,
        }
    }

    pub fn from_any(event: E, to: S) -> Self {
        Transition {
            from: None,
            event,
            to,
            guard: None,
        }
    }

    /// The edge is only taken while `guard` returns true
    pub fn with_guard(self, guard: impl Fn() -> bool + 'static) -> Self {
        Transition {
            guard: Some(Box::new(guard)),
            ..self
        }
    }
}

struct Edge<S> {
    to: S,
    guard: Option<Guard>,
}

impl<S: StateKind> Edge<S> {
    fn allowed(&self) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard())
    }
}

pub struct StateMachineBuilder<S, E> {
    machine: StateMachine<S, E>,
}

impl<S: StateKind, E: StateKind> StateMachineBuilder<S, E> {
    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        let edge = Edge {
            to: transition.to,
            guard: transition.guard,
        };
        match transition.from {
            Some(from) => self.machine.edges.insert((from, transition.event), edge),
            None => self.machine.wildcards.insert(transition.event, edge),
        };
        self
    }

    pub fn on(self, from: S, event: E, to: S) -> Self {
        self.transition(Transition::new(from, event, to))
    }

    pub fn on_any(self, event: E, to: S) -> Self {
        self.transition(Transition::from_any(event, to))
    }

    pub fn build(self) -> StateMachine<S, E> {
        self.machine
    }
}

pub struct StateMachine<S, E> {
    state: S,
    edges: FxHashMap<(S, E), Edge<S>>,
    wildcards: FxHashMap<E, Edge<S>>,
    history: Vec<(S, E, S)>,
}

impl<S: StateKind, E: StateKind> StateMachine<S, E> {
    pub fn builder(initial: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder {
            machine: StateMachine {
                state: initial,
                edges: FxHashMap::default(),
                wildcards: FxHashMap::default(),
                history: Vec::new(),
            },
        }
    }

    pub fn current_state(&self) -> S {
        self.state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.state == state
    }

    /// Every transition taken so far, oldest first
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    fn target(&self, event: E) -> Option<S> {
        if let Some(edge) = self.edges.get(&(self.state, event)) {
            return edge.allowed().then_some(edge.to);
        }
        self.wildcards
            .get(&event)
            .filter(|edge| edge.to != self.state && edge.allowed())
            .map(|edge| edge.to)
    }

    pub fn can_send(&self, event: E) -> bool {
        self.target(event).is_some()
    }

    /// Applies `event` and returns the resulting state
    pub fn send(&mut self, event: E) -> S {
        if let Some(to) = self.target(event) {
            tracing::trace!(from = ?self.state, ?event, ?to, "fsm transition");
            self.history.push((self.state, event, to));
            self.state = to;
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Card {
        Idle,
        Hovered,
        Lifted,
        Gone,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Input {
        Enter,
        Leave,
        Press,
        Release,
        Unmount,
    }

    use Card::{Gone, Hovered, Idle, Lifted};
    use Input::{Enter, Leave, Press, Release, Unmount};

    fn card() -> StateMachine<Card, Input> {
        StateMachine::builder(Idle)
            .on(Idle, Enter, Hovered)
            .on(Hovered, Leave, Idle)
            .on(Hovered, Press, Lifted)
            .on(Lifted, Release, Hovered)
            .on_any(Unmount, Gone)
            .build()
    }

    #[test]
    fn follows_the_table() {
        let mut fsm = card();
        for (input, expected) in [(Enter, Hovered), (Press, Lifted), (Release, Hovered), (Leave, Idle)] {
            assert_eq!(fsm.send(input), expected);
        }
        assert_eq!(fsm.history().len(), 4);
    }

    #[test]
    fn unmatched_events_change_nothing() {
        let mut fsm = card();
        assert_eq!(fsm.send(Press), Idle);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn wildcard_fires_once() {
        let mut fsm = card();
        fsm.send(Enter);
        fsm.send(Press);
        assert_eq!(fsm.send(Unmount), Gone);
        fsm.send(Unmount);
        assert_eq!(fsm.history().last(), Some(&(Lifted, Unmount, Gone)));
        assert_eq!(fsm.history().len(), 3);
        assert!(!fsm.can_send(Enter));
    }

    #[test]
    fn guard_vetoes_until_open() {
        let open = Rc::new(Cell::new(false));
        let gate = open.clone();
        let mut fsm: StateMachine<Card, Input> = StateMachine::builder(Idle)
            .transition(Transition::new(Idle, Enter, Hovered).with_guard(move || gate.get()))
            .build();

        fsm.send(Enter);
        assert!(fsm.is_in(Idle));
        open.set(true);
        assert!(fsm.can_send(Enter));
        fsm.send(Enter);
        assert!(fsm.is_in(Hovered));
    }
}
