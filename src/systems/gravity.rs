use crate::components::flags::Flags;
use crate::components::velocity::Velocity;
use crate::ecs::EntityStore;

/// Downward acceleration in tiles per tick².
pub const GRAVITY: f32 = 0.02;
/// Fall speed cap in tiles per tick. Kept below one tile so a falling
/// hitbox can never skip a row of tiles.
pub const TERMINAL_FALL: f32 = 0.5;
pub const WATER_GRAVITY: f32 = 0.004;
pub const WATER_TERMINAL_FALL: f32 = 0.08;

/// Accelerate every [`Flags::GRAVITY`] entity downwards.
pub fn apply_gravity(store: &mut EntityStore) {
    for e in store.view::<(Velocity, Flags)>() {
        let flags = *store.get::<Flags>(e);
        if !flags.has(Flags::GRAVITY) {
            continue;
        }
        let (g, terminal) = if flags.has(Flags::UNDERWATER) {
            (WATER_GRAVITY, WATER_TERMINAL_FALL)
        } else {
            (GRAVITY, TERMINAL_FALL)
        };
        store.update::<Velocity, _>(e, |v| v.0.y = (v.0.y - g).max(-terminal));
    }
}
