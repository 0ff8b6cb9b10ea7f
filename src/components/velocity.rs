use crate::geometry::Vec2;

/// Velocity in tile units per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity(pub Vec2<f32>);

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}
