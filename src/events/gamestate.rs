//! Deferred state-stack requests.
//!
//! States never touch the stack directly. They queue a [`StateEvent`] and the
//! scheduler applies the queue at the start of the next tick, in FIFO order,
//! before any state updates. A push carries a factory so the new state is
//! only built when it is linked.

use std::collections::VecDeque;
use std::fmt;

use crate::states::GameState;

/// Builds the state to push.
pub type StateFactory = Box<dyn FnOnce() -> GameState>;

pub enum StateEvent {
    Push(StateFactory),
    Pop,
}

impl StateEvent {
    pub fn push(factory: impl FnOnce() -> GameState + 'static) -> Self {
        StateEvent::Push(Box::new(factory))
    }
}

impl fmt::Debug for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateEvent::Push(_) => f.write_str("Push(..)"),
            StateEvent::Pop => f.write_str("Pop"),
        }
    }
}

/// FIFO of pending stack requests.
#[derive(Debug, Default)]
pub struct StateQueue {
    events: VecDeque<StateEvent>,
}

impl StateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, factory: impl FnOnce() -> GameState + 'static) {
        self.events.push_back(StateEvent::push(factory));
    }

    pub fn pop(&mut self) {
        self.events.push_back(StateEvent::Pop);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every queued request. Requests queued while these are applied
    /// wait for the next drain.
    pub fn take(&mut self) -> VecDeque<StateEvent> {
        std::mem::take(&mut self.events)
    }
}
