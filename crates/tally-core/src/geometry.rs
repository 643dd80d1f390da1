//! Geometric primitives for the bouncing card: `Point`, `Size`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// A 2D point with x and y coordinates.
///
/// Also used as a velocity vector (pixels per baseline frame).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp each coordinate into `[0, max]` of the given bounds.
    #[must_use]
    pub fn clamp_to(&self, max: Size) -> Self {
        Self::new(
            self.x.clamp(0.0, max.width.max(0.0)),
            self.y.clamp(0.0, max.height.max(0.0)),
        )
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Scale size by a factor.
    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Space left after placing `inner` inside `self`, never negative.
    #[must_use]
    pub fn room_for(&self, inner: &Self) -> Self {
        Self::new(
            (self.width - inner.width).max(0.0),
            (self.height - inner.height).max(0.0),
        )
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ops() {
        let p = Point::new(1.0, 2.0) + Point::new(3.0, 4.0);
        assert_eq!(p, Point::new(4.0, 6.0));
        assert_eq!(Point::new(2.0, -1.0) * 1.5, Point::new(3.0, -1.5));
    }

    #[test]
    fn test_point_clamp_to() {
        let p = Point::new(-5.0, 500.0).clamp_to(Size::new(100.0, 200.0));
        assert_eq!(p, Point::new(0.0, 200.0));
    }

    #[test]
    fn test_point_clamp_to_negative_bounds() {
        let p = Point::new(10.0, 10.0).clamp_to(Size::new(-20.0, -1.0));
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn test_size_room_for() {
        let viewport = Size::new(800.0, 600.0);
        assert_eq!(
            viewport.room_for(&Size::new(260.0, 180.0)),
            Size::new(540.0, 420.0)
        );
        assert_eq!(
            Size::new(100.0, 100.0).room_for(&Size::new(260.0, 180.0)),
            Size::ZERO
        );
    }

    #[test]
    fn test_size_scale() {
        assert_eq!(Size::new(10.0, 20.0).scale(0.5), Size::new(5.0, 10.0));
        assert_eq!(Size::new(10.0, 20.0).scale(0.0), Size::ZERO);
    }
}
