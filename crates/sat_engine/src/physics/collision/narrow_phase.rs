//! Separating Axis Theorem narrow phase
//!
//! Two convex shapes are disjoint iff some axis exists onto which their
//! projections do not overlap. Every test below walks its candidate axes and
//! bails out on the first gap, because the broad phase hands us far more
//! near misses than real contacts. Nothing is allocated until a collision
//! has been confirmed.
//!
//! All contacts are oriented from the first shape toward the second.

use serde::{Deserialize, Serialize};

use super::result::CollisionResult;
use super::shape::{Circle, ConvexHull, Polygon, Shape};
use crate::foundation::math::{project_onto_axis, try_unit, Vec2};

/// Which face normals the polygon-polygon test enumerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolygonAxes {
    /// Only hull A's normals. Cheaper, but can report overlap for some
    /// configurations where only one of B's normals separates the pair.
    #[default]
    HostOnly,
    /// Normals of both hulls (complete SAT for convex polygons)
    Both,
}

/// Penetration along a separating axis, oriented from the first shape toward the second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Penetration depth (never negative)
    pub overlap: f64,
    /// Unit axis; moving the second shape by `axis * overlap` separates the pair
    pub axis: Vec2,
}

impl Contact {
    /// The same contact seen from the second shape
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            overlap: self.overlap,
            axis: -self.axis,
        }
    }
}

/// SAT narrow phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NarrowPhase {
    polygon_axes: PolygonAxes,
}

impl NarrowPhase {
    /// Create a narrow phase with the given polygon axis policy
    pub const fn new(polygon_axes: PolygonAxes) -> Self {
        Self { polygon_axes }
    }

    /// Polygon axis policy in use
    pub const fn polygon_axes(&self) -> PolygonAxes {
        self.polygon_axes
    }

    /// Test two hulls, producing a result that names their hosts
    pub fn test(&self, hull_a: &ConvexHull, hull_b: &ConvexHull) -> Option<CollisionResult> {
        let contact = self.test_shapes(hull_a.shape(), hull_b.shape())?;
        Some(CollisionResult::new(contact.overlap, contact.axis, hull_a.host(), hull_b.host()))
    }

    /// Test two bare shapes
    pub fn test_shapes(&self, a: &Shape, b: &Shape) -> Option<Contact> {
        match (a, b) {
            (Shape::Circle(a), Shape::Circle(b)) => circle_circle(a, b),
            (Shape::Polygon(a), Shape::Polygon(b)) => self.polygon_polygon(a, b),
            (Shape::Circle(circle), Shape::Polygon(polygon)) => circle_polygon(circle, polygon),
            (Shape::Polygon(polygon), Shape::Circle(circle)) => {
                circle_polygon(circle, polygon).map(Contact::flipped)
            }
        }
    }

    fn polygon_polygon(&self, a: &Polygon, b: &Polygon) -> Option<Contact> {
        let extra_axes: &[Vec2] = match self.polygon_axes {
            PolygonAxes::HostOnly => &[],
            PolygonAxes::Both => b.face_normals(),
        };

        let mut best: Option<Contact> = None;
        for axis in a.face_normals().iter().chain(extra_axes) {
            let first = project_onto_axis(a.vertices(), axis);
            let second = project_onto_axis(b.vertices(), axis);
            let contact = axis_penetration(first, second, axis)?;

            // Strict comparison: ties keep the earlier axis.
            if best.map_or(true, |best| contact.overlap < best.overlap) {
                best = Some(contact);
            }
        }
        best
    }
}

/// Circle-circle test
///
/// Works on squared distances and only takes the square root once a hit is
/// confirmed. Coincident centers have no defined axis; they report full
/// penetration along +X.
fn circle_circle(a: &Circle, b: &Circle) -> Option<Contact> {
    let delta = b.center - a.center;
    let distance_sq = delta.norm_squared();
    let radius_sum = a.radius + b.radius;
    if distance_sq >= radius_sum * radius_sum {
        return None;
    }

    let axis = try_unit(&delta).unwrap_or_else(Vec2::x);
    Some(Contact {
        overlap: radius_sum - distance_sq.sqrt(),
        axis,
    })
}

/// Circle-polygon test, oriented from the circle toward the polygon
///
/// The first axis runs from the polygon vertex nearest the circle center to
/// that center; then every face normal is tried. Penetration is measured as
/// the distance between the nearest vertex and the circle boundary.
fn circle_polygon(circle: &Circle, polygon: &Polygon) -> Option<Contact> {
    let center = circle.center;
    let vertices = polygon.vertices();

    let mut closest = *vertices.first()?;
    let mut closest_sq = (center - closest).norm_squared();
    for vertex in &vertices[1..] {
        let distance_sq = (center - vertex).norm_squared();
        if distance_sq < closest_sq {
            closest_sq = distance_sq;
            closest = *vertex;
        }
    }

    let vertex_axis = try_unit(&(center - closest));
    if let Some(axis) = vertex_axis {
        circle_axis_penetration(circle, vertices, &axis)?;
    }

    let mut least: Option<Contact> = None;
    for axis in polygon.face_normals() {
        let contact = circle_axis_penetration(circle, vertices, axis)?;
        if least.map_or(true, |least| contact.overlap < least.overlap) {
            least = Some(contact);
        }
    }

    match vertex_axis {
        // The axis points vertex -> circle, i.e. polygon toward circle.
        Some(axis) => Some(Contact {
            overlap: (closest_sq.sqrt() - circle.radius).abs(),
            axis: -axis,
        }),
        // Circle center sits exactly on a vertex.
        None => least,
    }
}

fn circle_axis_penetration(circle: &Circle, vertices: &[Vec2], axis: &Vec2) -> Option<Contact> {
    let projected_center = axis.dot(&circle.center);
    let circle_span = (projected_center - circle.radius, projected_center + circle.radius);
    axis_penetration(circle_span, project_onto_axis(vertices, axis), axis)
}

/// Compares two projected intervals on `axis`
///
/// Returns `None` on a gap. Otherwise returns the shallower of the two ways
/// to push the second interval clear of the first, with the axis flipped
/// when pushing backwards is cheaper. Touching intervals count as overlap.
fn axis_penetration(first: (f64, f64), second: (f64, f64), axis: &Vec2) -> Option<Contact> {
    let (min1, max1) = first;
    let (min2, max2) = second;
    if min1 - max2 > 0.0 || min2 - max1 > 0.0 {
        return None;
    }

    let forward = max1 - min2;
    let backward = max2 - min1;
    Some(if forward <= backward {
        Contact {
            overlap: forward,
            axis: *axis,
        }
    } else {
        Contact {
            overlap: backward,
            axis: -axis,
        }
    })
}
