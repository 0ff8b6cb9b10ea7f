use smallvec::SmallVec;

use crate::components::timers::Timers;
use crate::ecs::{Entity, EntityStore};

/// Count down every entity timer by `dt` seconds and report the ones that
/// ran out, in entity order.
pub fn tick(store: &mut EntityStore, dt: f32) -> Vec<(Entity, String)> {
    let mut expired = Vec::new();
    for e in store.view::<(Timers,)>() {
        let names: SmallVec<[String; 2]> = store.update::<Timers, _>(e, |t| t.tick(dt));
        expired.extend(names.into_iter().map(|n| (e, n)));
    }
    expired
}
