//! Tile collision data for an entity.
//!
//! The hitbox comes from the entity's definition and is expressed relative to
//! the entity [`Position`](super::position::Position). The tile collision
//! system rewrites `contacts` every tick.

use smallvec::SmallVec;

use crate::geometry::{Rect, Vec2};
use crate::resources::definitions::CollisionType;

/// Which side of the entity touched a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

/// One tile the entity was pushed out of this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileContact {
    pub tile: Vec2<i32>,
    pub side: Side,
    pub collision: CollisionType,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collision {
    /// Hitbox relative to the entity position, in tile units.
    pub hitbox: Rect<f32>,
    pub contacts: SmallVec<[TileContact; 4]>,
}

impl Collision {
    pub fn new(hitbox: Rect<f32>) -> Self {
        Self {
            hitbox,
            contacts: SmallVec::new(),
        }
    }

    /// Hitbox placed at `position` in world space.
    pub fn world_box(&self, position: Vec2<f32>) -> Rect<f32> {
        self.hitbox.translate(position)
    }

    pub fn touching(&self, side: Side) -> bool {
        self.contacts.iter().any(|c| c.side == side)
    }

    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }
}
