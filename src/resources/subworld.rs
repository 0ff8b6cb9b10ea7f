//! One self-contained region of a level.

use log::warn;

use crate::ecs::{Entity, EntityStore};
use crate::geometry::Rect;
use crate::resources::parallax::ParallaxLayer;
use crate::resources::tilemap::Tilemap;

/// Tiles, entities and metadata of one level region.
///
/// The player and camera target are weak handles into [`Subworld::store`];
/// they are checked against the store on every read and may come back
/// `None` once the entity is gone.
#[derive(Default)]
pub struct Subworld {
    pub tilemap: Tilemap,
    pub store: EntityStore,
    /// Playable area in tiles; the camera never leaves it.
    pub bounds: Rect<i32>,
    pub theme: String,
    /// Water surface height in tiles. Everything below is underwater.
    pub water: Option<f32>,
    pub backgrounds: Vec<ParallaxLayer>,
    player: Option<Entity>,
    camera_target: Option<Entity>,
}

impl Subworld {
    pub fn new(bounds: Rect<i32>) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn set_player(&mut self, entity: Option<Entity>) {
        self.player = entity;
    }

    pub fn set_camera_target(&mut self, entity: Option<Entity>) {
        self.camera_target = entity;
    }

    pub fn player(&self) -> Option<Entity> {
        self.revalidate(self.player, "player")
    }

    /// The camera target, falling back to the player when it is unset or
    /// gone.
    pub fn camera_target(&self) -> Option<Entity> {
        self.revalidate(self.camera_target, "camera target")
            .or_else(|| self.player())
    }

    fn revalidate(&self, handle: Option<Entity>, what: &str) -> Option<Entity> {
        let e = handle?;
        if self.store.is_valid(e) {
            Some(e)
        } else {
            warn!("{} handle {} is stale", what, e);
            None
        }
    }
}
