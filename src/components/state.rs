//! Movement/behaviour state stored per entity.
//!
//! The store only holds the value; gameplay code decides transitions and
//! replaces the component in place every tick (see
//! [`crate::systems::state`]).

/// Discrete entity states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntityState {
    #[default]
    Idle,
    Dead,
    Walk,
    Run,
    Slip,
    Duck,
    Airborne,
    RunJump,
    Underwater,
    Swim,
    Door,
    Pipe,
}

impl EntityState {
    /// Animation state name this state plays.
    pub fn animation(self) -> &'static str {
        match self {
            EntityState::Idle => "idle",
            EntityState::Dead => "dead",
            EntityState::Walk => "walk",
            EntityState::Run => "run",
            EntityState::Slip => "slip",
            EntityState::Duck => "duck",
            EntityState::Airborne => "jump",
            EntityState::RunJump => "runjump",
            EntityState::Underwater => "underwater",
            EntityState::Swim => "swim",
            EntityState::Door => "door",
            EntityState::Pipe => "pipe",
        }
    }

    /// States that gameplay sets explicitly and the per-tick selection must
    /// not overwrite.
    pub fn is_scripted(self) -> bool {
        matches!(self, EntityState::Dead | EntityState::Door | EntityState::Pipe)
    }
}

/// Component wrapper so the state can be replaced atomically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct State(pub EntityState);
