//! Table-driven finite state machines
//!
//! Widgets describe their interaction states as a small transition table:
//!
//! ```rust
//! use arbor_core::fsm::StateMachine;
//!
//! const CLOSED: u32 = 0;
//! const OPEN: u32 = 1;
//! const TOGGLE: u32 = 100;
//!
//! let mut fsm = StateMachine::builder(CLOSED)
//!     .on(CLOSED, TOGGLE, OPEN)
//!     .on(OPEN, TOGGLE, CLOSED)
//!     .build();
//!
//! assert_eq!(fsm.send(TOGGLE), Some((CLOSED, OPEN)));
//! assert_eq!(fsm.current(), OPEN);
//! ```
//!
//! `send` reports the `(from, to)` pair when a transition fired, which lets
//! the caller run entry/exit side effects exactly once per transition.

use smallvec::SmallVec;

use crate::events::EventType;

/// Numeric state id
pub type StateId = u32;

/// One row of the transition table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub event: EventType,
    pub to: StateId,
}

/// A finite state machine with a fixed transition table
#[derive(Clone, Debug)]
pub struct StateMachine {
    initial: StateId,
    current: StateId,
    transitions: SmallVec<[Transition; 8]>,
}

impl StateMachine {
    /// Start building a machine in `initial`
    pub fn builder(initial: StateId) -> StateMachineBuilder {
        StateMachineBuilder {
            initial,
            transitions: SmallVec::new(),
        }
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Whether `event` would fire a transition from the current state
    pub fn can(&self, event: EventType) -> bool {
        self.find(self.current, event).is_some()
    }

    /// Feed an event. Returns `(from, to)` when a transition fired.
    ///
    /// Self-loops (`from == to`) count as transitions.
    pub fn send(&mut self, event: EventType) -> Option<(StateId, StateId)> {
        let to = self.find(self.current, event)?.to;
        let from = std::mem::replace(&mut self.current, to);
        Some((from, to))
    }

    /// Jump straight to `state`, bypassing the table.
    ///
    /// Returns `(from, to)` if the state actually changed.
    pub fn force(&mut self, state: StateId) -> Option<(StateId, StateId)> {
        if self.current == state {
            return None;
        }
        let from = std::mem::replace(&mut self.current, state);
        Some((from, state))
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    fn find(&self, from: StateId, event: EventType) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.event == event)
    }
}

/// Builder for [`StateMachine`]
#[derive(Debug)]
pub struct StateMachineBuilder {
    initial: StateId,
    transitions: SmallVec<[Transition; 8]>,
}

impl StateMachineBuilder {
    /// Add a transition `from --event--> to`. The first matching row wins.
    pub fn on(mut self, from: StateId, event: EventType, to: StateId) -> Self {
        self.transitions.push(Transition { from, event, to });
        self
    }

    pub fn build(self) -> StateMachine {
        StateMachine {
            initial: self.initial,
            current: self.initial,
            transitions: self.transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: StateId = 0;
    const ACTIVE: StateId = 1;
    const GO: EventType = 10;
    const STOP: EventType = 11;
    const PING: EventType = 12;

    fn machine() -> StateMachine {
        StateMachine::builder(IDLE)
            .on(IDLE, GO, ACTIVE)
            .on(ACTIVE, STOP, IDLE)
            .on(ACTIVE, PING, ACTIVE)
            .build()
    }

    #[test]
    fn test_send_follows_table() {
        let mut fsm = machine();
        assert_eq!(fsm.send(STOP), None);
        assert_eq!(fsm.current(), IDLE);

        assert_eq!(fsm.send(GO), Some((IDLE, ACTIVE)));
        assert_eq!(fsm.send(PING), Some((ACTIVE, ACTIVE)));
        assert_eq!(fsm.send(STOP), Some((ACTIVE, IDLE)));
    }

    #[test]
    fn test_can() {
        let fsm = machine();
        assert!(fsm.can(GO));
        assert!(!fsm.can(PING));
    }

    #[test]
    fn test_force_and_reset() {
        let mut fsm = machine();
        assert_eq!(fsm.force(IDLE), None);
        assert_eq!(fsm.force(ACTIVE), Some((IDLE, ACTIVE)));
        assert_eq!(fsm.current(), ACTIVE);

        fsm.reset();
        assert_eq!(fsm.current(), fsm.initial());
    }
}
