//! Input action events.
//!
//! The host window layer maps physical keys to [`InputAction`]s and queues an
//! [`InputEvent`] for every press and release. The scheduler hands each event
//! to the state stack top-first and also folds it into the polled
//! [`InputState`](crate::resources::input::InputState).

/// Logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Up,
    Down,
    Left,
    Right,
    /// Jump / swim stroke (default: Space).
    Jump,
    /// Run / fire (default: Shift).
    Run,
    /// Menu confirm (default: Enter).
    Confirm,
    /// Back/cancel (default: Escape).
    Back,
    Pause,
}

impl InputAction {
    pub const ALL: [InputAction; 9] = [
        InputAction::Up,
        InputAction::Down,
        InputAction::Left,
        InputAction::Right,
        InputAction::Jump,
        InputAction::Run,
        InputAction::Confirm,
        InputAction::Back,
        InputAction::Pause,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// An action was pressed (`true`) or released (`false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: InputAction,
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(action: InputAction) -> Self {
        Self { action, pressed: true }
    }

    pub fn release(action: InputAction) -> Self {
        Self {
            action,
            pressed: false,
        }
    }
}
