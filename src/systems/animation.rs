//! Animation clock.
//!
//! Every tick each [`Render`] switches to the animation its [`State`] names
//! (when the frame table has one) and advances by the tick length.

use crate::components::render::Render;
use crate::components::state::State;
use crate::ecs::EntityStore;

pub fn advance(store: &mut EntityStore, dt: f32) {
    for e in store.view::<(Render,)>() {
        let wanted = store.try_get::<State>(e).map(|s| s.0.animation());
        store.update::<Render, _>(e, |r| {
            if let Some(name) = wanted {
                r.play(name);
            }
            r.tick(dt);
        });
    }
}
