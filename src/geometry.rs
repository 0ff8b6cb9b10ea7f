//! 2D vector and axis-aligned rectangle value types.
//!
//! Everything here is plain `Copy` data with pure operations. World space uses
//! a bottom-left origin: `y` grows upwards, so a rect's `bottom()` is `y` and
//! its `top()` is `y + height`.
//!
//! No division-by-zero checks are made at this layer; callers own that.

use std::ops::{Add, AddAssign, BitAnd, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Two-component vector over a numeric type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Copy + Add<Output = T> + Mul<Output = T>> Vec2<T> {
    /// Dot product.
    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }
}

impl<T: Copy + Mul<Output = T>> Vec2<T> {
    /// Componentwise product.
    pub fn mul_elem(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }
}

impl Vec2<f32> {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    pub fn normalized(self) -> Self {
        let len = self.magnitude();
        if len == 0.0 { self } else { self / len }
    }
}

impl Vec2<f64> {
    pub fn magnitude(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(self) -> Self {
        let len = self.magnitude();
        if len == 0.0 { self } else { self / len }
    }
}

impl Vec2<i32> {
    pub fn as_f32(self) -> Vec2<f32> {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Copy + Add<Output = T>> AddAssign for Vec2<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.x = self.x + rhs.x;
        self.y = self.y + rhs.y;
    }
}

impl<T: Copy + Sub<Output = T>> SubAssign for Vec2<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.x = self.x - rhs.x;
        self.y = self.y - rhs.y;
    }
}

impl<T: Copy + Mul<Output = T>> Mul<T> for Vec2<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<T: Copy + Div<Output = T>> Div<T> for Vec2<T> {
    type Output = Self;
    fn div(self, rhs: T) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl<T: Neg<Output = T>> Neg for Vec2<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T> From<(T, T)> for Vec2<T> {
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle: a position plus a size.
///
/// Width and height may be negative while a rect is being computed (for
/// example when inverting a tile region); call [`Rect::normalized`] before
/// using one as an iteration bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect<T> {
    pub pos: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Copy> Rect<T> {
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            pos: Vec2 { x, y },
            size: Vec2 {
                x: width,
                y: height,
            },
        }
    }

    pub const fn from_parts(pos: Vec2<T>, size: Vec2<T>) -> Self {
        Self { pos, size }
    }

    pub fn x(&self) -> T {
        self.pos.x
    }
    pub fn y(&self) -> T {
        self.pos.y
    }
    pub fn width(&self) -> T {
        self.size.x
    }
    pub fn height(&self) -> T {
        self.size.y
    }
}

impl<T> Rect<T>
where
    T: Copy + PartialOrd + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Div<Output = T>,
{
    pub fn left(&self) -> T {
        self.pos.x
    }
    pub fn right(&self) -> T {
        self.pos.x + self.size.x
    }
    pub fn bottom(&self) -> T {
        self.pos.y
    }
    pub fn top(&self) -> T {
        self.pos.y + self.size.y
    }

    pub fn translate(&self, by: Vec2<T>) -> Self {
        Self::from_parts(self.pos + by, self.size)
    }

    /// Scale both position and size by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        Self::from_parts(self.pos * factor, self.size * factor)
    }

    /// Centre point. `two` is passed in so the same code serves ints and floats.
    fn midpoint_with(&self, two: T) -> Vec2<T> {
        Vec2::new(self.pos.x + self.size.x / two, self.pos.y + self.size.y / two)
    }

    /// Flip negative extents so that `size` is non-negative.
    pub fn normalized(&self) -> Self {
        let mut r = *self;
        if self.right() < self.left() {
            r.pos.x = self.right();
            r.size.x = self.left() - self.right();
        }
        if self.top() < self.bottom() {
            r.pos.y = self.top();
            r.size.y = self.bottom() - self.top();
        }
        r
    }

    /// Strict overlap test: rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }

    /// Overlapping region. Disjoint rects produce a non-positive extent; check
    /// [`Rect::intersects`] first when a valid area is needed.
    pub fn intersection(&self, other: &Self) -> Self {
        let left = partial_max(self.left(), other.left());
        let bottom = partial_max(self.bottom(), other.bottom());
        let right = partial_min(self.right(), other.right());
        let top = partial_min(self.top(), other.top());
        Self::new(left, bottom, right - left, top - bottom)
    }

    /// Half-open containment: left/bottom edges inclusive, right/top exclusive.
    pub fn contains_point(&self, p: Vec2<T>) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.bottom() && p.y < self.top()
    }

    pub fn contains_rect(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }
}

impl Rect<f32> {
    pub fn midpoint(&self) -> Vec2<f32> {
        self.midpoint_with(2.0)
    }

    /// Inclusive range of integer tile coordinates this rect overlaps,
    /// as `(min, max)`. Edges that land exactly on a tile boundary do not
    /// pull in the next tile.
    pub fn tile_span(&self) -> (Vec2<i32>, Vec2<i32>) {
        let r = self.normalized();
        let min = Vec2::new(r.left().floor() as i32, r.bottom().floor() as i32);
        let max = Vec2::new(
            (r.right().ceil() as i32 - 1).max(min.x),
            (r.top().ceil() as i32 - 1).max(min.y),
        );
        (min, max)
    }
}

impl Rect<i32> {
    pub fn midpoint(&self) -> Vec2<i32> {
        self.midpoint_with(2)
    }

    pub fn as_f32(&self) -> Rect<f32> {
        Rect::from_parts(self.pos.as_f32(), self.size.as_f32())
    }
}

impl<T> BitAnd for Rect<T>
where
    T: Copy + PartialOrd + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Div<Output = T>,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(&rhs)
    }
}

fn partial_min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

fn partial_max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1, 2);
        let b = Vec2::new(3, 5);
        assert_eq!(a + b, Vec2::new(4, 7));
        assert_eq!(b - a, Vec2::new(2, 3));
        assert_eq!(a * 3, Vec2::new(3, 6));
        assert_eq!(b / 2, Vec2::new(1, 2));
        assert_eq!(-a, Vec2::new(-1, -2));
        assert_eq!(a.dot(b), 13);
    }

    #[test]
    fn test_vec2_magnitude_and_normalize() {
        let v = Vec2::new(3.0f32, 4.0);
        assert!(approx_eq(v.magnitude(), 5.0));
        let n = v.normalized();
        assert!(approx_eq(n.x, 0.6));
        assert!(approx_eq(n.y, 0.8));
        assert_eq!(Vec2::<f32>::ZERO.normalized(), Vec2::<f32>::ZERO);
    }

    #[test]
    fn test_rect_accessors() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(r.x(), 1);
        assert_eq!(r.y(), 2);
        assert_eq!(r.width(), 3);
        assert_eq!(r.height(), 4);
        assert_eq!(r.right(), 4);
        assert_eq!(r.top(), 6);
        assert_eq!(r.midpoint(), Vec2::new(2, 4));
    }

    #[test]
    fn test_edge_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0f32, 0.0, 1.0, 1.0);
        let right = Rect::new(1.0f32, 0.0, 1.0, 1.0);
        let above = Rect::new(0.0f32, 1.0, 1.0, 1.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&above));
        assert!(a.intersects(&Rect::new(0.5, 0.5, 1.0, 1.0)));
    }

    #[test]
    fn test_intersection_of_overlapping_rects() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 1, 4, 2);
        assert_eq!(a & b, Rect::new(2, 1, 2, 2));
    }

    #[test]
    fn test_intersection_of_disjoint_rects_is_degenerate() {
        let a = Rect::new(0, 0, 1, 1);
        let b = Rect::new(5, 5, 1, 1);
        let i = a & b;
        assert!(i.width() <= 0 || i.height() <= 0);
    }

    #[test]
    fn test_normalized_flips_negative_extents() {
        let r = Rect::new(4, 4, -3, -2);
        assert_eq!(r.normalized(), Rect::new(1, 2, 3, 2));
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(0, 0, 2, 2);
        assert!(r.contains_point(Vec2::new(0, 0)));
        assert!(r.contains_point(Vec2::new(1, 1)));
        assert!(!r.contains_point(Vec2::new(2, 1)));
        assert!(r.contains_rect(&Rect::new(0, 0, 1, 2)));
        assert!(!r.contains_rect(&Rect::new(1, 1, 2, 2)));
    }

    #[test]
    fn test_translate_and_scale() {
        let r = Rect::new(1.0f32, 1.0, 2.0, 2.0);
        assert_eq!(r.translate(Vec2::new(1.0, -1.0)), Rect::new(2.0, 0.0, 2.0, 2.0));
        assert_eq!(r.scale(16.0), Rect::new(16.0, 16.0, 32.0, 32.0));
    }

    #[test]
    fn test_tile_span() {
        let r = Rect::new(0.25f32, -0.5, 1.0, 1.0);
        assert_eq!(r.tile_span(), (Vec2::new(0, -1), Vec2::new(1, 0)));
        // exact boundary does not reach the next tile
        let exact = Rect::new(0.0f32, 0.0, 1.0, 1.0);
        assert_eq!(exact.tile_span(), (Vec2::new(0, 0), Vec2::new(0, 0)));
    }
}
