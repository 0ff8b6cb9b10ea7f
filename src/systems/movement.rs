use crate::components::direction::Direction;
use crate::components::position::Position;
use crate::components::velocity::Velocity;
use crate::ecs::{Entity, EntityStore};

/// Raw integration: `position += velocity` for every entity holding both.
/// Velocity is in tiles per tick, so no time step is involved.
pub fn integrate(store: &mut EntityStore) {
    for e in store.view::<(Position, Velocity)>() {
        let v = store.get::<Velocity>(e).0;
        store.update::<Position, _>(e, |p| p.0 += v);
    }
}

/// Turn entities to face their horizontal motion. `skip` is left alone; the
/// player faces where input points, not where it slides.
pub fn face_velocity(store: &mut EntityStore, skip: Option<Entity>) {
    for e in store.view::<(Velocity, Direction)>() {
        if Some(e) == skip {
            continue;
        }
        if let Some(dir) = Direction::from_dx(store.get::<Velocity>(e).0.x) {
            store.update::<Direction, _>(e, |d| *d = dir);
        }
    }
}
