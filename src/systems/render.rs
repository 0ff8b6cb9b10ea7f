//! Draw-command extraction.
//!
//! The engine does not rasterize. Each frame it walks the visible part of the
//! current subworld and hands one [`DrawCmd`] per sprite or tile to a
//! [`Renderer`]. Positions are world coordinates in tiles; clip rects and
//! offsets are in texture pixels.
//!
//! Commands are emitted back to front: parallax layers first, then tiles,
//! then entities sorted by their render layer.

use std::sync::Arc;

use crate::components::direction::Direction;
use crate::components::flags::Flags;
use crate::components::position::Position;
use crate::components::render::Render;
use crate::geometry::{Rect, Vec2};
use crate::resources::camera2d::Camera;
use crate::resources::definitions::TileDefs;
use crate::resources::parallax::ParallaxLayer;
use crate::resources::subworld::Subworld;

/// Layer of the tile pass. Parallax layers sit below, entities default above.
pub const TILE_LAYER: i32 = 0;
pub const ENTITY_LAYER: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub texture: Arc<str>,
    pub clip: Rect<i32>,
    /// World position in tiles.
    pub position: Vec2<f32>,
    /// Pixel offset applied after positioning.
    pub offset: Vec2<f32>,
    /// Per-axis scale; a negative x mirrors the sprite.
    pub scale: Vec2<f32>,
    pub layer: i32,
}

/// Outward drawing interface.
pub trait Renderer {
    /// Called once per frame before any command.
    fn begin_frame(&mut self) {}
    fn draw(&mut self, cmd: &DrawCmd);
    /// Called once per frame after the last command.
    fn end_frame(&mut self) {}
}

/// Renderer that records the commands of the latest frame, used headless
/// and by tests.
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
    /// Frames completed so far.
    pub frames: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Renderer for DrawList {
    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, cmd: &DrawCmd) {
        self.commands.push(cmd.clone());
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

/// Emit every background layer, in the order given.
pub fn draw_backgrounds(layers: &[ParallaxLayer], camera: &Camera, renderer: &mut dyn Renderer) {
    for (i, layer) in layers.iter().enumerate() {
        for cmd in layer.compose(camera, i as i32 - layers.len() as i32) {
            renderer.draw(&cmd);
        }
    }
}

/// Emit the non-empty tiles overlapping the camera view.
///
/// Each tile resolves its animation frame from `elapsed` seconds of world
/// time; all instances of an animated tile stay in phase.
pub fn draw_tiles(
    subworld: &Subworld,
    tiles: &TileDefs,
    camera: &Camera,
    elapsed: f32,
    renderer: &mut dyn Renderer,
) {
    let (min, max) = camera.view_rect().tile_span();
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            let id = subworld.tilemap.read(x, y);
            if id.is_none() {
                continue;
            }
            let def = tiles.get(id.as_str());
            if def.render.frames().is_empty() {
                continue;
            }
            let frame = def.render.frame(def.render.frame_offset(elapsed));
            renderer.draw(&DrawCmd {
                texture: frame.texture.clone(),
                clip: frame.clip,
                position: Vec2::new(x as f32, y as f32),
                offset: frame.offset,
                scale: Vec2::new(1.0, 1.0),
                layer: TILE_LAYER,
            });
        }
    }
}

/// Emit visible entities with a [`Render`] component, sorted by layer.
///
/// An entity is culled when a one-tile box at its position misses the view.
/// Entities flagged [`Flags::HIDDEN`] are skipped.
pub fn draw_entities(subworld: &Subworld, camera: &Camera, renderer: &mut dyn Renderer) {
    let store = &subworld.store;
    let view = camera.view_rect();
    let mut cmds: Vec<DrawCmd> = store
        .view::<(Position, Render)>()
        .into_iter()
        .filter(|e| !store.try_get::<Flags>(*e).is_some_and(|f| f.has(Flags::HIDDEN)))
        .filter_map(|e| {
            let pos = store.get::<Position>(e).0;
            if !Rect::from_parts(pos, Vec2::new(1.0, 1.0)).intersects(&view) {
                return None;
            }
            let render = store.get::<Render>(e);
            let frame = render.frame()?;
            let sign = store.try_get::<Direction>(e).map_or(1.0, |d| d.sign());
            Some(DrawCmd {
                texture: frame.texture.clone(),
                clip: frame.clip,
                position: pos,
                offset: frame.offset,
                scale: Vec2::new(sign, 1.0),
                layer: render.layer,
            })
        })
        .collect();

    // stable: equal layers keep entity order
    cmds.sort_by_key(|c| c.layer);
    for cmd in &cmds {
        renderer.draw(cmd);
    }
}
