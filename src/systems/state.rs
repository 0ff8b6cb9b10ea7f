//! Per-tick movement state selection.
//!
//! Replaces each entity's [`State`] from its velocity and flags. Dead, Door
//! and Pipe are set by gameplay scripts and left alone here.

use crate::components::direction::Direction;
use crate::components::flags::Flags;
use crate::components::state::{EntityState, State};
use crate::components::velocity::Velocity;
use crate::ecs::EntityStore;
use crate::systems::input::WALK_SPEED;

/// Horizontal speed below which an entity counts as standing still.
const STILL: f32 = 1e-3;

/// Pick the state for one entity.
pub fn choose(current: EntityState, velocity: Velocity, flags: Flags, facing: Option<Direction>) -> EntityState {
    if current.is_scripted() {
        return current;
    }
    let vx = velocity.0.x;
    let moving = vx.abs() > STILL;
    let on_ground = flags.has(Flags::ON_GROUND);

    if flags.has(Flags::UNDERWATER) {
        return if on_ground && !moving {
            EntityState::Underwater
        } else {
            EntityState::Swim
        };
    }

    if !on_ground {
        return if flags.has(Flags::RUNNING) && vx.abs() > WALK_SPEED {
            EntityState::RunJump
        } else {
            EntityState::Airborne
        };
    }

    if flags.has(Flags::DUCKING) {
        return EntityState::Duck;
    }
    if !moving {
        return EntityState::Idle;
    }
    // still sliding the other way after a turn
    if facing.is_some_and(|d| d.sign() * vx < 0.0) {
        return EntityState::Slip;
    }
    if flags.has(Flags::RUNNING) && vx.abs() > WALK_SPEED {
        EntityState::Run
    } else {
        EntityState::Walk
    }
}

pub fn select(store: &mut EntityStore) {
    for e in store.view::<(State, Velocity, Flags)>() {
        let current = store.get::<State>(e).0;
        let next = choose(
            current,
            *store.get::<Velocity>(e),
            *store.get::<Flags>(e),
            store.try_get::<Direction>(e).copied(),
        );
        if next != current {
            store.emplace(e, State(next));
        }
    }
}
