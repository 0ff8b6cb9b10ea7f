//! Append-only definition registries.
//!
//! Tile and entity kinds are registered once while content loads and are
//! read-only afterwards. Registering an id twice is a content error; looking
//! up an id that was never registered is a bug in the caller and panics.
//!
//! Both registries are seeded with the empty id `""` mapping to a transparent
//! default so that the tile sentinel always resolves.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::components::animation::RenderStates;
use crate::error::{DefKind, EngineError, Result};
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionType {
    #[default]
    None,
    Solid,
    Platform,
    Slope,
}

impl CollisionType {
    /// Blocks movement from every side.
    pub fn is_solid(self) -> bool {
        matches!(self, CollisionType::Solid | CollisionType::Slope)
    }
}

/// Surface profile of a slope tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeKind {
    #[default]
    Flat,
    Up,
    Down,
    UpGentleLow,
    UpGentleHigh,
    DownGentleHigh,
    DownGentleLow,
}

impl SlopeKind {
    /// Surface height at the left and right tile edges, in tiles.
    pub fn heights(self) -> (f32, f32) {
        match self {
            SlopeKind::Flat => (1.0, 1.0),
            SlopeKind::Up => (0.0, 1.0),
            SlopeKind::Down => (1.0, 0.0),
            SlopeKind::UpGentleLow => (0.0, 0.5),
            SlopeKind::UpGentleHigh => (0.5, 1.0),
            SlopeKind::DownGentleHigh => (1.0, 0.5),
            SlopeKind::DownGentleLow => (0.5, 0.0),
        }
    }

    /// Surface height at `t` in `[0, 1]` across the tile.
    pub fn height_at(self, t: f32) -> f32 {
        let (left, right) = self.heights();
        left + (right - left) * t.clamp(0.0, 1.0)
    }
}

pub trait Definition {
    const KIND: DefKind;
    fn empty() -> Self;
}

#[derive(Debug, Clone, Default)]
pub struct TileDef {
    pub collision: CollisionType,
    pub slope: SlopeKind,
    pub render: RenderStates,
}

impl Definition for TileDef {
    const KIND: DefKind = DefKind::Tile;
    fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct EntityDef {
    /// Hitbox relative to the entity position, in tiles.
    pub hitbox: Rect<f32>,
    pub render: RenderStates,
    pub gravity: bool,
    pub solid: bool,
}

impl Definition for EntityDef {
    const KIND: DefKind = DefKind::Entity;
    fn empty() -> Self {
        Self {
            hitbox: Rect::new(0.0, 0.0, 1.0, 1.0),
            render: RenderStates::new(),
            gravity: false,
            solid: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Definitions<D> {
    defs: BTreeMap<String, D>,
}

pub type TileDefs = Definitions<TileDef>;
pub type EntityDefs = Definitions<EntityDef>;

impl<D: Definition> Default for Definitions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Definition> Definitions<D> {
    pub fn new() -> Self {
        let mut defs = BTreeMap::new();
        defs.insert(String::new(), D::empty());
        Self { defs }
    }

    /// Add a definition. A second registration of `id` fails and leaves the
    /// first one in place.
    pub fn register(&mut self, id: impl Into<String>, def: D) -> Result<()> {
        let id = id.into();
        if self.defs.contains_key(&id) {
            return Err(EngineError::Redefinition { kind: D::KIND, id });
        }
        self.defs.insert(id, def);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if `id` was never registered.
    pub fn get(&self, id: &str) -> &D {
        self.defs
            .get(id)
            .unwrap_or_else(|| panic!("unknown {} definition '{}'", D::KIND, id))
    }

    pub fn try_get(&self, id: &str) -> Option<&D> {
        self.defs.get(id)
    }

    /// Like [`Definitions::try_get`] but as a load-time error.
    pub fn require(&self, id: &str) -> Result<&D> {
        self.try_get(id).ok_or_else(|| EngineError::UnknownDefinition {
            kind: D::KIND,
            id: id.to_string(),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.defs.contains_key(id)
    }

    /// Number of definitions, including the seeded empty one.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definitions sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &D)> + '_ {
        self.defs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TileDefs {
    pub fn collision_at(&self, id: &str) -> CollisionType {
        self.get(id).collision
    }
}
