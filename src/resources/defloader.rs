//! Content loading: JSON definition trees and level files.
//!
//! ```text
//! tiles.json      {"tiles": [{name, collision, slope, type, frames, firstindex}]}
//! entities.json   {"entities": [{name, hitbox, gravity, solid, states}]}
//! world.json      {"levels": [..], "sounds": {id: path}, "music": {id: path}}   (optional)
//! levels/<n>.json {"subworlds": [{id, theme, water, bounds, palette, layers,
//!                                 entities, player, backgrounds}]}
//! ```
//!
//! Tile layers are base64 little-endian `u32` blocks, top row first; see
//! [`Tilemap::apply_layer`](crate::resources::tilemap::Tilemap::apply_layer).
//! Every tile and entity kind a level references must already be registered;
//! a miss is reported as [`EngineError::UnknownDefinition`].

use std::collections::BTreeMap;

use log::{info, warn};
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::components::animation::{RenderStates, TILE_PIXELS};
use crate::components::info::Info;
use crate::error::{DefKind, EngineError, Result};
use crate::geometry::{Rect, Vec2};
use crate::resources::assets::AssetSource;
use crate::resources::definitions::{CollisionType, EntityDef, EntityDefs, SlopeKind, TileDef, TileDefs};
use crate::resources::level::Level;
use crate::resources::parallax::ParallaxLayer;
use crate::resources::tilemap::TileId;
use crate::systems::spawn::spawn_entity;

pub const TILES_FILE: &str = "tiles.json";
pub const ENTITIES_FILE: &str = "entities.json";
pub const WORLD_FILE: &str = "world.json";

/// Duration of an animated frame that does not set its own.
pub const DEFAULT_FRAME_SECONDS: f32 = 0.125;

/// Entity kind spawned at a subworld's `player` position.
pub const PLAYER_KIND: &str = "player";

#[derive(Debug, Clone, Deserialize)]
struct FrameData {
    texture: String,
    origin: [i32; 2],
    #[serde(default)]
    size: Option<[i32; 2]>,
    #[serde(default)]
    offset: [f32; 2],
    #[serde(default)]
    duration: Option<f32>,
}

impl FrameData {
    fn push(&self, render: &mut RenderStates, default_duration: f32) {
        let [w, h] = self.size.unwrap_or([TILE_PIXELS, TILE_PIXELS]);
        let clip = Rect::new(self.origin[0], self.origin[1], w, h);
        render.push_frame(
            self.texture.as_str(),
            clip,
            Vec2::new(self.offset[0], self.offset[1]),
            self.duration.unwrap_or(default_duration),
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TileKind {
    #[default]
    Single,
    Animated,
    Indexed,
}

#[derive(Debug, Deserialize)]
struct TileData {
    name: String,
    #[serde(default)]
    collision: CollisionType,
    #[serde(default)]
    slope: SlopeKind,
    #[serde(default, rename = "type")]
    kind: TileKind,
    frames: Vec<FrameData>,
    #[serde(default)]
    firstindex: u32,
}

#[derive(Debug, Deserialize)]
struct TilesFile {
    tiles: Vec<TileData>,
}

#[derive(Debug, Deserialize)]
struct EntityData {
    name: String,
    hitbox: [f32; 4],
    #[serde(default)]
    gravity: bool,
    #[serde(default)]
    solid: bool,
    #[serde(default)]
    states: BTreeMap<String, Vec<FrameData>>,
}

#[derive(Debug, Deserialize)]
struct EntitiesFile {
    entities: Vec<EntityData>,
}

/// Level list and sound registrations shared by the whole game.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldData {
    #[serde(default)]
    pub levels: Vec<String>,
    #[serde(default)]
    pub sounds: BTreeMap<String, String>,
    #[serde(default)]
    pub music: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LayerData {
    width: u32,
    height: u32,
    data: String,
}

#[derive(Debug, Deserialize)]
struct SpawnData {
    kind: String,
    x: f32,
    y: f32,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubworldData {
    id: u32,
    #[serde(default)]
    theme: String,
    #[serde(default)]
    water: Option<f32>,
    bounds: [i32; 4],
    #[serde(default)]
    palette: Vec<String>,
    #[serde(default)]
    layers: Vec<LayerData>,
    #[serde(default)]
    entities: Vec<SpawnData>,
    #[serde(default)]
    player: Option<[f32; 2]>,
    #[serde(default)]
    backgrounds: Vec<ParallaxLayer>,
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    subworlds: Vec<SubworldData>,
}

/// All definitions a game session needs, loaded once.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub tiles: TileDefs,
    pub entities: EntityDefs,
    pub world: WorldData,
}

/// Expand the tile tree into `(id, definition)` pairs, in file order.
pub fn parse_tiles(json: &str) -> Result<Vec<(String, TileDef)>> {
    let file: TilesFile = serde_json::from_str(json)?;
    let mut out = Vec::new();
    for tile in file.tiles {
        match tile.kind {
            TileKind::Single | TileKind::Animated => {
                let default_duration = if tile.kind == TileKind::Animated {
                    DEFAULT_FRAME_SECONDS
                } else {
                    0.0
                };
                let mut render = RenderStates::new();
                for frame in &tile.frames {
                    frame.push(&mut render, default_duration);
                }
                out.push((
                    tile.name,
                    TileDef {
                        collision: tile.collision,
                        slope: tile.slope,
                        render,
                    },
                ));
            }
            TileKind::Indexed => {
                for (i, frame) in tile.frames.iter().enumerate() {
                    let mut render = RenderStates::new();
                    frame.push(&mut render, 0.0);
                    out.push((
                        format!("{}_{}", tile.name, tile.firstindex as usize + i),
                        TileDef {
                            collision: tile.collision,
                            slope: tile.slope,
                            render,
                        },
                    ));
                }
            }
        }
    }
    Ok(out)
}

pub fn parse_entities(json: &str) -> Result<Vec<(String, EntityDef)>> {
    let file: EntitiesFile = serde_json::from_str(json)?;
    let mut out = Vec::with_capacity(file.entities.len());
    for ent in file.entities {
        let mut render = RenderStates::new();
        for (state, frames) in &ent.states {
            render.set_state(state.as_str(), 0);
            let default_duration = if frames.len() > 1 { DEFAULT_FRAME_SECONDS } else { 0.0 };
            for frame in frames {
                frame.push(&mut render, default_duration);
            }
        }
        let initial = if render.has_state("idle") {
            Some("idle".to_string())
        } else {
            render.state_names().first().map(|s| s.to_string())
        };
        if let Some(state) = initial {
            render.set_state(state, 0);
        }
        let [x, y, w, h] = ent.hitbox;
        out.push((
            ent.name,
            EntityDef {
                hitbox: Rect::new(x, y, w, h).normalized(),
                render,
                gravity: ent.gravity,
                solid: ent.solid,
            },
        ));
    }
    Ok(out)
}

/// Register every tile in `tiles.json`. Returns how many were added.
pub fn load_tile_defs(src: &dyn AssetSource, defs: &mut TileDefs) -> Result<usize> {
    let parsed = parse_tiles(&src.read_to_string(TILES_FILE)?)?;
    let n = parsed.len();
    for (id, def) in parsed {
        defs.register(id, def)?;
    }
    info!("registered {} tile definitions", n);
    Ok(n)
}

pub fn load_entity_defs(src: &dyn AssetSource, defs: &mut EntityDefs) -> Result<usize> {
    let parsed = parse_entities(&src.read_to_string(ENTITIES_FILE)?)?;
    let n = parsed.len();
    for (id, def) in parsed {
        defs.register(id, def)?;
    }
    info!("registered {} entity definitions", n);
    Ok(n)
}

/// Load the optional `world.json`. A missing file yields an empty world.
pub fn load_world(src: &dyn AssetSource) -> Result<WorldData> {
    match src.read_to_string(WORLD_FILE) {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(EngineError::AssetNotFound(path)) => {
            warn!("{} not found, no level list", path);
            Ok(WorldData::default())
        }
        Err(e) => Err(e),
    }
}

pub fn load_content(src: &dyn AssetSource) -> Result<Content> {
    let mut content = Content::default();
    load_tile_defs(src, &mut content.tiles)?;
    load_entity_defs(src, &mut content.entities)?;
    content.world = load_world(src)?;
    Ok(content)
}

pub fn level_path(name: &str) -> String {
    format!("levels/{}.json", name)
}

/// Build a [`Level`] from `levels/<name>.json`.
///
/// The current subworld is the first one listed in the file.
pub fn load_level(src: &dyn AssetSource, name: &str, content: &Content) -> Result<Level> {
    parse_level(&src.read_to_string(&level_path(name))?, content)
}

pub fn parse_level(json: &str, content: &Content) -> Result<Level> {
    let file: LevelFile = serde_json::from_str(json)?;
    let mut level = Level::new();
    if let Some(first) = file.subworlds.first() {
        level.current = first.id;
    }

    let mut seen = FxHashSet::default();
    for data in file.subworlds {
        if !seen.insert(data.id) {
            return Err(EngineError::Redefinition {
                kind: DefKind::Subworld,
                id: data.id.to_string(),
            });
        }
        let id = if level.subworld_exists(data.id) {
            data.id
        } else {
            level.create_subworld_at(data.id)
        };
        let Some(sw) = level.subworld_mut(id) else {
            continue;
        };

        let [bx, by, bw, bh] = data.bounds;
        sw.bounds = Rect::new(bx, by, bw, bh).normalized();
        sw.theme = data.theme;
        sw.water = data.water;
        sw.backgrounds = data.backgrounds;

        let palette = data
            .palette
            .iter()
            .map(|id| content.tiles.require(id).map(|_| TileId::new(id)))
            .collect::<Result<Vec<TileId>>>()?;
        for layer in &data.layers {
            sw.tilemap
                .apply_layer(sw.bounds.pos, layer.width, layer.height, &layer.data, &palette)?;
        }

        for spawn in &data.entities {
            let e = spawn_entity(
                &mut sw.store,
                &content.entities,
                &spawn.kind,
                Vec2::new(spawn.x, spawn.y),
            )?;
            if let Some(name) = &spawn.name {
                sw.store.update::<Info, _>(e, |info| info.name = Some(name.clone()));
            }
        }

        if let Some([px, py]) = data.player {
            let player = spawn_entity(&mut sw.store, &content.entities, PLAYER_KIND, Vec2::new(px, py))?;
            sw.set_player(Some(player));
        }
    }

    Ok(level)
}
