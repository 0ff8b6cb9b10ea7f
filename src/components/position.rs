use crate::geometry::Vec2;

/// World-space position in tile units, bottom-left origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position(pub Vec2<f32>);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}
