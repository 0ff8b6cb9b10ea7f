use crate::components::collision::Collision;
use crate::components::position::Position;
use crate::geometry::Vec2;
use crate::resources::camera2d::Camera;
use crate::resources::subworld::Subworld;

/// Point the camera at the centre of the subworld's camera target, or of the
/// player once the target is gone.
pub fn follow_target(camera: &mut Camera, subworld: &Subworld) {
    let Some(target) = subworld.camera_target() else {
        return;
    };
    let Some(pos) = subworld.store.try_get::<Position>(target) else {
        return;
    };
    let center = match subworld.store.try_get::<Collision>(target) {
        Some(c) => c.world_box(pos.0).midpoint(),
        None => pos.0 + Vec2::new(0.5, 0.5),
    };
    camera.follow(center, subworld.bounds);
}
