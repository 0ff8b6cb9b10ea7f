//! World camera.
//!
//! The camera is a view rectangle in world units (tiles) centred on
//! [`Camera::center`]. Gameplay moves it with [`Camera::follow`], which keeps
//! the view inside the subworld bounds; draw code culls against
//! [`Camera::view_rect`].

use crate::components::animation::TILE_PIXELS;
use crate::geometry::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Vec2<f32>,
    /// View size in tiles.
    pub view: Vec2<f32>,
}

impl Camera {
    pub fn new(view: Vec2<f32>) -> Self {
        Self {
            center: view / 2.0,
            view,
        }
    }

    /// Camera whose view matches a render target of `width`×`height` pixels.
    pub fn for_resolution(width: u32, height: u32) -> Self {
        let px = TILE_PIXELS as f32;
        Self::new(Vec2::new(width as f32 / px, height as f32 / px))
    }

    pub fn view_rect(&self) -> Rect<f32> {
        Rect::from_parts(self.center - self.view / 2.0, self.view)
    }

    /// Centre on `target`, then clamp so the view stays inside `bounds`.
    /// On an axis where the bounds are smaller than the view, centre on the
    /// bounds instead.
    pub fn follow(&mut self, target: Vec2<f32>, bounds: Rect<i32>) {
        let bounds = bounds.normalized().as_f32();
        self.center = Vec2::new(
            clamp_axis(target.x, bounds.left(), bounds.right(), self.view.x),
            clamp_axis(target.y, bounds.bottom(), bounds.top(), self.view.y),
        );
    }
}

fn clamp_axis(target: f32, lo: f32, hi: f32, view: f32) -> f32 {
    if hi - lo <= view {
        (lo + hi) / 2.0
    } else {
        target.clamp(lo + view / 2.0, hi - view / 2.0)
    }
}
