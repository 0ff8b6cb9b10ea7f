//! Layered parallax backgrounds.
//!
//! A layer is one background image that scrolls at `factor` times the camera
//! speed: `factor = 1` moves with the world, `factor = 0` stays fixed to the
//! screen. Repeating layers are tiled across the view; the first copy is
//! found with floor division so negative camera positions tile the same way
//! positive ones do.

use std::sync::Arc;

use serde::Deserialize;

use crate::components::animation::TILE_PIXELS;
use crate::geometry::{Rect, Vec2};
use crate::resources::camera2d::Camera;
use crate::systems::render::DrawCmd;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParallaxLayer {
    pub texture: Arc<str>,
    /// Image size in pixels.
    pub size: Vec2<i32>,
    #[serde(default = "default_factor")]
    pub factor: Vec2<f32>,
    /// Layer origin in tiles, relative to the scrolled position.
    #[serde(default)]
    pub offset: Vec2<f32>,
    #[serde(default = "default_true")]
    pub repeat_x: bool,
    #[serde(default)]
    pub repeat_y: bool,
}

fn default_factor() -> Vec2<f32> {
    Vec2::new(0.5, 0.5)
}

fn default_true() -> bool {
    true
}

impl ParallaxLayer {
    pub fn new(texture: impl Into<Arc<str>>, size: Vec2<i32>, factor: Vec2<f32>) -> Self {
        Self {
            texture: texture.into(),
            size,
            factor,
            offset: Vec2::ZERO,
            repeat_x: true,
            repeat_y: false,
        }
    }

    /// Image size in tiles.
    pub fn world_size(&self) -> Vec2<f32> {
        self.size.as_f32() / TILE_PIXELS as f32
    }

    /// World position of the copy with index `(0, 0)` for this camera.
    pub fn origin(&self, camera: &Camera) -> Vec2<f32> {
        let view = camera.view_rect();
        let one = Vec2::new(1.0, 1.0);
        self.offset + view.pos.mul_elem(one - self.factor)
    }

    /// Draw commands covering the camera view for this layer.
    pub fn compose(&self, camera: &Camera, layer: i32) -> Vec<DrawCmd> {
        let size = self.world_size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Vec::new();
        }
        let view = camera.view_rect();
        let origin = self.origin(camera);

        let xs = copies(self.repeat_x, view.left(), view.right(), origin.x, size.x);
        let ys = copies(self.repeat_y, view.bottom(), view.top(), origin.y, size.y);
        let clip = Rect::from_parts(Vec2::new(0, 0), self.size);

        let mut cmds = Vec::new();
        for j in ys.clone() {
            for i in xs.clone() {
                let pos = Vec2::new(origin.x + i as f32 * size.x, origin.y + j as f32 * size.y);
                if !Rect::from_parts(pos, size).intersects(&view) {
                    continue;
                }
                cmds.push(DrawCmd {
                    texture: self.texture.clone(),
                    clip,
                    position: pos,
                    offset: Vec2::ZERO,
                    scale: Vec2::new(1.0, 1.0),
                    layer,
                });
            }
        }
        cmds
    }
}

/// Copy indices along one axis that may overlap `[lo, hi)`.
fn copies(repeat: bool, lo: f32, hi: f32, origin: f32, size: f32) -> std::ops::RangeInclusive<i32> {
    if !repeat {
        return 0..=0;
    }
    let first = ((lo - origin) / size).floor() as i32;
    let last = ((hi - origin) / size).floor() as i32;
    first..=last
}
