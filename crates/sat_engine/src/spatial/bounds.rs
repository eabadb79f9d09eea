//! Axis-aligned rectangles for spatial partitioning

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner of the rectangle
    pub min: Vec2,
    /// Maximum corner of the rectangle
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle centered at a point with given half-extents
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the rectangle
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Check whether a point lies inside (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Closest point inside the rectangle to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Whether a circle touches this rectangle
    pub fn intersects_circle(&self, center: Vec2, radius: f64) -> bool {
        (self.closest_point(center) - center).norm_squared() <= radius * radius
    }

    /// Quadrant index (0-3) of a point relative to the center
    ///
    /// Bit 0 is set for +X, bit 1 for +Y.
    pub fn quadrant_of(&self, point: Vec2) -> usize {
        let center = self.center();
        let x_bit = usize::from(point.x >= center.x);
        let y_bit = usize::from(point.y >= center.y);
        (y_bit << 1) | x_bit
    }

    /// Bounds of quadrant `index` as produced by [`Rect::quadrant_of`]
    pub fn quadrant(&self, index: usize) -> Self {
        let quarter = self.extents() * 0.5;
        let x_sign = if index & 1 != 0 { 1.0 } else { -1.0 };
        let y_sign = if index & 2 != 0 { 1.0 } else { -1.0 };
        let center = self.center() + Vec2::new(quarter.x * x_sign, quarter.y * y_sign);
        Self::from_center_extents(center, quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadrants_tile_parent() {
        let rect = Rect::new(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0));
        let q3 = rect.quadrant(3);
        assert_relative_eq!(q3.min, Vec2::new(0.0, 0.0));
        assert_relative_eq!(q3.max, Vec2::new(10.0, 10.0));
        let q0 = rect.quadrant(0);
        assert_relative_eq!(q0.min, Vec2::new(-10.0, -10.0));
        assert_eq!(rect.quadrant_of(Vec2::new(5.0, -5.0)), 1);
        assert_eq!(rect.quadrant_of(Vec2::new(-5.0, 5.0)), 2);
    }

    #[test]
    fn test_circle_intersection() {
        let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0));
        assert!(rect.intersects_circle(Vec2::new(5.0, 2.0), 1.0));
        assert!(!rect.intersects_circle(Vec2::new(6.0, 6.0), 2.0));
        assert!(rect.contains_point(Vec2::new(4.0, 0.0)));
    }
}
