//! Player control.
//!
//! Reads the polled [`InputState`] and steers the subworld's player entity:
//! horizontal acceleration toward walk or run speed, jumping from the ground,
//! swim strokes under water and ducking. Speeds are in tiles per tick.

use crate::components::direction::Direction;
use crate::components::flags::Flags;
use crate::components::state::State;
use crate::components::velocity::Velocity;
use crate::events::input::InputAction;
use crate::resources::input::InputState;
use crate::resources::subworld::Subworld;

pub const WALK_SPEED: f32 = 0.09;
pub const RUN_SPEED: f32 = 0.15;
/// Horizontal speed change per tick while a direction is held.
pub const ACCELERATION: f32 = 0.01;
/// Horizontal slowdown per tick with no direction held.
pub const FRICTION: f32 = 0.008;
pub const JUMP_SPEED: f32 = 0.42;
pub const SWIM_STROKE: f32 = 0.12;
/// Horizontal speed cap under water.
pub const SWIM_SPEED: f32 = 0.05;

fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}

/// Apply one tick of player control. Returns whether the player jumped or
/// took a swim stroke this tick.
pub fn control_player(subworld: &mut Subworld, input: &InputState) -> bool {
    let Some(player) = subworld.player() else {
        return false;
    };
    let store = &mut subworld.store;
    if !store.has::<Velocity>(player) || !store.has::<Flags>(player) {
        return false;
    }
    if store.try_get::<State>(player).is_some_and(|s| s.0.is_scripted()) {
        return false;
    }

    let flags = *store.get::<Flags>(player);
    let on_ground = flags.has(Flags::ON_GROUND);
    let underwater = flags.has(Flags::UNDERWATER);
    let running = input.held(InputAction::Run);
    let ducking = on_ground && !underwater && input.held(InputAction::Down);
    let axis = if ducking { 0.0 } else { input.axis_x() };

    let max_speed = if underwater {
        SWIM_SPEED
    } else if running {
        RUN_SPEED
    } else {
        WALK_SPEED
    };
    let step = if axis == 0.0 { FRICTION } else { ACCELERATION };

    let mut jumped = false;
    store.update::<Velocity, _>(player, |v| {
        v.0.x = approach(v.0.x, axis * max_speed, step);
        if input.just_pressed(InputAction::Jump) {
            if underwater {
                v.0.y = SWIM_STROKE;
                jumped = true;
            } else if on_ground {
                v.0.y = JUMP_SPEED;
                jumped = true;
            }
        }
    });
    store.update::<Flags, _>(player, |f| {
        f.assign(Flags::RUNNING, running && !underwater);
        f.assign(Flags::DUCKING, ducking);
    });
    if let Some(dir) = Direction::from_dx(axis) {
        if store.has::<Direction>(player) {
            store.update::<Direction, _>(player, |d| *d = dir);
        }
    }
    jumped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::position::Position;
    use crate::ecs::Entity;
    use crate::events::input::InputEvent;
    use crate::geometry::Rect;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn world(flags: u32) -> (Subworld, Entity) {
        let mut sw = Subworld::new(Rect::new(0, 0, 64, 16));
        let p = sw.store.create_entity();
        sw.store.emplace(p, Position::new(4.0, 1.0));
        sw.store.emplace(p, Velocity::default());
        sw.store.emplace(p, Flags::new(flags));
        sw.store.emplace(p, Direction::Right);
        sw.set_player(Some(p));
        (sw, p)
    }

    fn pressing(actions: &[InputAction]) -> InputState {
        let mut input = InputState::new();
        for &a in actions {
            input.apply(InputEvent::press(a));
        }
        input
    }

    #[test]
    fn test_walk_accelerates_to_cap() {
        let (mut sw, p) = world(Flags::ON_GROUND);
        let input = pressing(&[InputAction::Right]);
        control_player(&mut sw, &input);
        assert!(approx_eq(sw.store.get::<Velocity>(p).0.x, ACCELERATION));
        for _ in 0..50 {
            control_player(&mut sw, &input);
        }
        assert!(approx_eq(sw.store.get::<Velocity>(p).0.x, WALK_SPEED));
    }

    #[test]
    fn test_turning_faces_input_before_velocity() {
        let (mut sw, p) = world(Flags::ON_GROUND);
        sw.store.emplace(p, Velocity::new(WALK_SPEED, 0.0));
        control_player(&mut sw, &pressing(&[InputAction::Left]));
        assert_eq!(*sw.store.get::<Direction>(p), Direction::Left);
        assert!(sw.store.get::<Velocity>(p).0.x > 0.0);
    }

    #[test]
    fn test_running_sets_flag() {
        let (mut sw, p) = world(Flags::ON_GROUND);
        control_player(&mut sw, &pressing(&[InputAction::Right, InputAction::Run]));
        assert!(sw.store.get::<Flags>(p).has(Flags::RUNNING));
        control_player(&mut sw, &pressing(&[InputAction::Right]));
        assert!(!sw.store.get::<Flags>(p).has(Flags::RUNNING));
    }

    #[test]
    fn test_jump_only_from_ground() {
        let (mut sw, p) = world(0);
        assert!(!control_player(&mut sw, &pressing(&[InputAction::Jump])));
        assert_eq!(sw.store.get::<Velocity>(p).0.y, 0.0);

        sw.store.emplace(p, Flags::new(Flags::ON_GROUND));
        assert!(control_player(&mut sw, &pressing(&[InputAction::Jump])));
        assert_eq!(sw.store.get::<Velocity>(p).0.y, JUMP_SPEED);
    }

    #[test]
    fn test_held_jump_does_not_repeat() {
        let (mut sw, _) = world(Flags::ON_GROUND);
        let mut input = pressing(&[InputAction::Jump]);
        assert!(control_player(&mut sw, &input));
        input.end_tick();
        assert!(!control_player(&mut sw, &input));
    }

    #[test]
    fn test_swim_stroke_in_midwater() {
        let (mut sw, p) = world(Flags::UNDERWATER);
        assert!(control_player(&mut sw, &pressing(&[InputAction::Jump])));
        assert_eq!(sw.store.get::<Velocity>(p).0.y, SWIM_STROKE);
    }

    #[test]
    fn test_duck_on_ground_stops_walking() {
        let (mut sw, p) = world(Flags::ON_GROUND);
        sw.store.emplace(p, Velocity::new(0.02, 0.0));
        control_player(&mut sw, &pressing(&[InputAction::Down, InputAction::Right]));
        let flags = *sw.store.get::<Flags>(p);
        assert!(flags.has(Flags::DUCKING));
        assert!(approx_eq(sw.store.get::<Velocity>(p).0.x, 0.02 - FRICTION));

        // no ducking in the air
        sw.store.emplace(p, Flags::default());
        control_player(&mut sw, &pressing(&[InputAction::Down]));
        assert!(!sw.store.get::<Flags>(p).has(Flags::DUCKING));
    }

    #[test]
    fn test_no_player_is_noop() {
        let mut sw = Subworld::new(Rect::new(0, 0, 8, 8));
        assert!(!control_player(&mut sw, &pressing(&[InputAction::Jump])));
    }
}
