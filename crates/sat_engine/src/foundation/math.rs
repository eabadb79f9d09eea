//! Math utilities and types
//!
//! Provides the 2D vector types used by the collision pipeline. All
//! arithmetic comes from nalgebra; this module only adds the handful of
//! helpers SAT needs on top of it.

pub use nalgebra::{Point2, Vector2};

/// 2D vector type (world units, double precision)
pub type Vec2 = Vector2<f64>;

/// Lengths at or below this are treated as zero when normalizing
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// Returns the left-hand perpendicular `(-y, x)` of a vector
#[inline]
pub fn perpendicular(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Normalizes a vector, returning `None` for (near) zero-length input
///
/// Used wherever a direction is derived from two points that may coincide,
/// so callers never propagate NaN components.
#[inline]
pub fn try_unit(v: &Vec2) -> Option<Vec2> {
    v.try_normalize(NORMALIZE_EPSILON)
}

/// Scales a vector down so its length does not exceed `max_length`
pub fn truncate(v: &Vec2, max_length: f64) -> Vec2 {
    let length_sq = v.norm_squared();
    if length_sq > max_length * max_length {
        v * (max_length / length_sq.sqrt())
    } else {
        *v
    }
}

/// Projects a vertex set onto an axis, returning the `(min, max)` interval
///
/// An empty vertex set projects to an empty interval (`min > max`).
pub fn project_onto_axis(vertices: &[Vec2], axis: &Vec2) -> (f64, f64) {
    vertices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        let projected = axis.dot(v);
        (min.min(projected), max.max(projected))
    })
}

/// Arithmetic mean of a vertex set (zero for an empty set)
pub fn centroid(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::zeros();
    }
    #[allow(clippy::cast_precision_loss)]
    let count = vertices.len() as f64;
    vertices.iter().fold(Vec2::zeros(), |acc, v| acc + v) / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perpendicular_is_orthogonal() {
        let v = Vec2::new(3.0, -2.0);
        assert_relative_eq!(perpendicular(&v).dot(&v), 0.0);
        assert_relative_eq!(perpendicular(&v).norm(), v.norm());
    }

    #[test]
    fn test_try_unit_rejects_zero_vector() {
        assert!(try_unit(&Vec2::zeros()).is_none());
        let unit = try_unit(&Vec2::new(0.0, 4.0)).unwrap();
        assert_relative_eq!(unit, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_truncate_only_shrinks() {
        let long = truncate(&Vec2::new(3.0, 4.0), 1.0);
        assert_relative_eq!(long.norm(), 1.0);

        let short = truncate(&Vec2::new(0.3, 0.4), 1.0);
        assert_relative_eq!(short, Vec2::new(0.3, 0.4));
    }

    #[test]
    fn test_project_onto_axis() {
        let square = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        let (min, max) = project_onto_axis(&square, &Vec2::new(1.0, 0.0));
        assert_relative_eq!(min, -1.0);
        assert_relative_eq!(max, 1.0);
    }

    #[test]
    fn test_centroid() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)];
        assert_relative_eq!(centroid(&tri), Vec2::new(1.0, 1.0));
    }
}
