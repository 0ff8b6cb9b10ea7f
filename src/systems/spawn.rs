//! Entity construction from definitions.

use log::debug;

use crate::components::audio::Audio;
use crate::components::collision::Collision;
use crate::components::direction::Direction;
use crate::components::flags::Flags;
use crate::components::info::Info;
use crate::components::position::Position;
use crate::components::render::Render;
use crate::components::state::State;
use crate::components::timers::Timers;
use crate::components::velocity::Velocity;
use crate::ecs::{Entity, EntityStore};
use crate::error::Result;
use crate::geometry::Vec2;
use crate::resources::definitions::EntityDefs;
use crate::systems::render::ENTITY_LAYER;

/// Create an entity of `kind` at `position` with the full component set its
/// definition implies.
pub fn spawn_entity(store: &mut EntityStore, defs: &EntityDefs, kind: &str, position: Vec2<f32>) -> Result<Entity> {
    let def = defs.require(kind)?;

    let mut flags = Flags::default();
    flags.assign(Flags::GRAVITY, def.gravity);
    flags.assign(Flags::SOLID, def.solid);

    let e = store.create_entity();
    store.emplace(e, Info::new(kind));
    store.emplace(e, Position(position));
    store.emplace(e, Velocity::default());
    store.emplace(e, Direction::default());
    store.emplace(e, flags);
    store.emplace(e, State::default());
    store.emplace(e, Timers::default());
    store.emplace(e, Collision::new(def.hitbox));
    store.emplace(e, Render::new(def.render.clone()).with_layer(ENTITY_LAYER));
    store.emplace(e, Audio::default());
    debug!("spawned {} '{}' at ({}, {})", e, kind, position.x, position.y);
    Ok(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::geometry::Rect;
    use crate::resources::definitions::{Definition, EntityDef};

    #[test]
    fn test_spawn_attaches_definition_archetype() {
        let mut defs = EntityDefs::new();
        defs.register(
            "goomba",
            EntityDef {
                hitbox: Rect::new(0.1, 0.0, 0.8, 0.9),
                gravity: true,
                ..EntityDef::empty()
            },
        )
        .unwrap();
        let mut store = EntityStore::new();
        let e = spawn_entity(&mut store, &defs, "goomba", Vec2::new(3.0, 4.0)).unwrap();
        assert_eq!(store.get::<Position>(e).0, Vec2::new(3.0, 4.0));
        assert!(store.get::<Flags>(e).has(Flags::GRAVITY));
        assert!(!store.get::<Flags>(e).has(Flags::SOLID));
        assert_eq!(store.get::<Collision>(e).hitbox, Rect::new(0.1, 0.0, 0.8, 0.9));
        assert_eq!(&*store.get::<Info>(e).kind, "goomba");
        assert_eq!(store.component_count(e), 10);
    }

    #[test]
    fn test_spawn_unknown_kind_is_an_error() {
        let mut store = EntityStore::new();
        let err = spawn_entity(&mut store, &EntityDefs::new(), "koopa", Vec2::ZERO).unwrap_err();
        assert!(matches!(err, EngineError::UnknownDefinition { .. }));
        assert!(store.is_empty());
    }
}
