//! Per-entity boolean flags packed into a bit set.

/// Bit set of entity flags. Unknown bits are preserved untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    /// Affected by gravity.
    pub const GRAVITY: u32 = 1 << 0;
    /// Standing on a solid or platform tile this tick.
    pub const ON_GROUND: u32 = 1 << 1;
    /// Below the subworld's water line.
    pub const UNDERWATER: u32 = 1 << 2;
    /// Collides with SOLID/PLATFORM tiles.
    pub const SOLID: u32 = 1 << 3;
    /// Not drawn.
    pub const HIDDEN: u32 = 1 << 4;
    /// Running input held this tick.
    pub const RUNNING: u32 = 1 << 5;
    /// Holding down while grounded.
    pub const DUCKING: u32 = 1 << 6;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn has(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    pub fn assign(&mut self, flag: u32, on: bool) {
        if on { self.set(flag) } else { self.clear(flag) }
    }

    pub fn with(mut self, flag: u32) -> Self {
        self.set(flag);
        self
    }
}
