/// Facing direction. Sprites are authored facing right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Horizontal scale sign used when drawing.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction matching the sign of `dx`, or `None` for zero.
    pub fn from_dx(dx: f32) -> Option<Self> {
        if dx < 0.0 {
            Some(Direction::Left)
        } else if dx > 0.0 {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_flip() {
        assert_eq!(Direction::Left.sign(), -1.0);
        assert_eq!(Direction::Right.sign(), 1.0);
        assert_eq!(Direction::Left.flipped(), Direction::Right);
        assert_eq!(Direction::from_dx(-0.5), Some(Direction::Left));
        assert_eq!(Direction::from_dx(0.0), None);
    }
}
