//! Polled input state.
//!
//! [`InputState`] keeps one [`BoolState`] per [`InputAction`]. Events fold
//! into it as they are dispatched; the edge flags (`just_pressed`,
//! `just_released`) last until the end of the tick that observed them.

use crate::events::input::{InputAction, InputEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Whether the action is currently held.
    pub active: bool,
    /// Pressed since the last tick ended.
    pub just_pressed: bool,
    /// Released since the last tick ended.
    pub just_released: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    actions: [BoolState; InputAction::ALL.len()],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InputEvent) {
        let state = &mut self.actions[event.action.index()];
        if event.pressed {
            if !state.active {
                state.just_pressed = true;
            }
            state.active = true;
        } else {
            if state.active {
                state.just_released = true;
            }
            state.active = false;
        }
    }

    pub fn get(&self, action: InputAction) -> BoolState {
        self.actions[action.index()]
    }

    pub fn held(&self, action: InputAction) -> bool {
        self.get(action).active
    }

    pub fn just_pressed(&self, action: InputAction) -> bool {
        self.get(action).just_pressed
    }

    pub fn any_just_pressed(&self) -> bool {
        self.actions.iter().any(|s| s.just_pressed)
    }

    /// Horizontal axis from Left/Right: -1, 0 or 1.
    pub fn axis_x(&self) -> f32 {
        let mut x = 0.0;
        if self.held(InputAction::Left) {
            x -= 1.0;
        }
        if self.held(InputAction::Right) {
            x += 1.0;
        }
        x
    }

    /// Clear edge flags. Called once at the end of every tick.
    pub fn end_tick(&mut self) {
        for s in &mut self.actions {
            s.just_pressed = false;
            s.just_released = false;
        }
    }
}
