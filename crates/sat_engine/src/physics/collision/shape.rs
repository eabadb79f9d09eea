//! Convex collision shapes
//!
//! Shapes are stored in WORLD SPACE: polygon vertices are already
//! transformed, and face normals are precomputed once per transform so the
//! narrow phase never builds axes on the fly.
//!
//! # Degenerate polygons
//!
//! A polygon built from exactly two vertices is a line segment. Every SAT
//! axis of a segment is parallel to one of two directions, so it gets padded
//! with a synthetic third vertex just off the end of the segment, turning it
//! into a very thin triangle with three proper edges.

use thiserror::Error;

use crate::ecs::Entity;
use crate::foundation::math::{centroid, perpendicular, truncate, try_unit, Vec2};
use nalgebra::Rotation2;

/// Smallest offset of the synthetic vertex that pads a two-vertex polygon
pub const DEGENERATE_PAD: f64 = 1e-10;

/// Offset used to pad a segment ending at `end`
///
/// Grows with the magnitude of `end` so the synthetic vertex stays a few
/// ulps away from it far from the origin.
fn degenerate_pad(end: &Vec2) -> f64 {
    DEGENERATE_PAD.max(end.amax() * f64::EPSILON * 4.0)
}

/// Errors raised while building shapes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A polygon needs at least two vertices
    #[error("polygon needs at least 2 vertices, got {0}")]
    TooFewVertices(usize),

    /// Circle radius must be positive and finite
    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// Two consecutive vertices coincide
    #[error("polygon edge {0} has zero length")]
    DegenerateEdge(usize),

    /// Regular polygons need at least three sides
    #[error("regular polygon needs at least 3 sides, got {0}")]
    InvalidSides(usize),
}

/// Discriminant of a [`Shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A circle
    Circle,
    /// A convex polygon
    Polygon,
}

/// A circle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center position
    pub center: Vec2,
    /// Radius (always positive)
    pub radius: f64,
}

impl Circle {
    /// Creates a circle, rejecting non-positive or non-finite radii
    pub fn new(center: Vec2, radius: f64) -> Result<Self, ShapeError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ShapeError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }
}

/// A convex polygon in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    face_normals: Vec<Vec2>,
    center: Vec2,
    padded: bool,
}

impl Polygon {
    /// Creates a polygon from world-space vertices
    ///
    /// Vertices are expected in winding order; face normals point outward for
    /// counter-clockwise winding. Two-vertex input is padded to a thin
    /// triangle.
    pub fn new(mut vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        if vertices.len() < 2 {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }

        let center = centroid(&vertices);
        let padded = vertices.len() == 2;
        if padded {
            let pad_length = degenerate_pad(&vertices[1]);
            let pad = truncate(&perpendicular(&(vertices[1] - vertices[0])), pad_length);
            let synthetic = vertices[1] + pad;
            vertices.push(synthetic);
        }

        let face_normals = compute_face_normals(&vertices)?;
        Ok(Self {
            vertices,
            face_normals,
            center,
            padded,
        })
    }

    /// Creates a polygon from model-space vertices placed at `position` and rotated by `angle` radians
    pub fn transformed(local: &[Vec2], position: Vec2, angle: f64) -> Result<Self, ShapeError> {
        let rotation = Rotation2::new(angle);
        Self::new(local.iter().map(|v| rotation * v + position).collect())
    }

    /// World-space vertices (including the synthetic vertex of a padded segment)
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Unit face normals, one per edge; edge `i` runs from vertex `i` to vertex `i + 1`
    pub fn face_normals(&self) -> &[Vec2] {
        &self.face_normals
    }

    /// Centroid of the input vertices
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Whether this polygon was padded from a two-vertex segment
    pub const fn is_padded_segment(&self) -> bool {
        self.padded
    }

    fn translate(&mut self, delta: &Vec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
        self.center += delta;
    }
}

fn compute_face_normals(vertices: &[Vec2]) -> Result<Vec<Vec2>, ShapeError> {
    let count = vertices.len();
    (0..count)
        .map(|i| {
            let edge = vertices[(i + 1) % count] - vertices[i];
            try_unit(&Vec2::new(edge.y, -edge.x)).ok_or(ShapeError::DegenerateEdge(i))
        })
        .collect()
}

/// A convex collision shape in world space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Circle hull
    Circle(Circle),
    /// Convex polygon hull
    Polygon(Polygon),
}

impl Shape {
    /// Creates a circle shape
    pub fn circle(center: Vec2, radius: f64) -> Result<Self, ShapeError> {
        Circle::new(center, radius).map(Self::Circle)
    }

    /// Creates a polygon shape from world-space vertices
    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        Polygon::new(vertices).map(Self::Polygon)
    }

    /// Creates an axis-aligned rectangle (counter-clockwise winding)
    pub fn rectangle(center: Vec2, half_extents: Vec2) -> Result<Self, ShapeError> {
        let (hx, hy) = (half_extents.x, half_extents.y);
        Self::polygon(vec![
            center + Vec2::new(-hx, -hy),
            center + Vec2::new(hx, -hy),
            center + Vec2::new(hx, hy),
            center + Vec2::new(-hx, hy),
        ])
    }

    /// Creates a regular polygon inscribed in a circle of `radius`
    pub fn regular_polygon(center: Vec2, radius: f64, sides: usize) -> Result<Self, ShapeError> {
        if sides < 3 {
            return Err(ShapeError::InvalidSides(sides));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ShapeError::InvalidRadius(radius));
        }
        #[allow(clippy::cast_precision_loss)]
        let step = std::f64::consts::TAU / sides as f64;
        #[allow(clippy::cast_precision_loss)]
        let vertices = (0..sides)
            .map(|i| {
                let angle = step * i as f64;
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self::polygon(vertices)
    }

    /// Shape discriminant
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle(_) => ShapeKind::Circle,
            Self::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Center position
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Circle(circle) => circle.center,
            Self::Polygon(polygon) => polygon.center,
        }
    }

    /// Radius (circles only)
    pub const fn radius(&self) -> Option<f64> {
        match self {
            Self::Circle(circle) => Some(circle.radius),
            Self::Polygon(_) => None,
        }
    }

    /// World-space vertices (empty for circles)
    pub fn vertices(&self) -> &[Vec2] {
        match self {
            Self::Circle(_) => &[],
            Self::Polygon(polygon) => polygon.vertices(),
        }
    }

    /// Unit face normals (empty for circles)
    pub fn face_normals(&self) -> &[Vec2] {
        match self {
            Self::Circle(_) => &[],
            Self::Polygon(polygon) => polygon.face_normals(),
        }
    }

    /// Radius of the smallest circle around the center enclosing the shape
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Self::Circle(circle) => circle.radius,
            Self::Polygon(polygon) => polygon
                .vertices
                .iter()
                .map(|v| (v - polygon.center).norm())
                .fold(0.0, f64::max),
        }
    }

    /// Moves the shape by `delta`; face normals are unaffected by translation
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Self::Circle(circle) => circle.center += delta,
            Self::Polygon(polygon) => polygon.translate(&delta),
        }
    }

    /// Moves the shape so its center lands on `center`
    pub fn set_center(&mut self, center: Vec2) {
        let delta = center - self.center();
        self.translate(delta);
    }
}

/// A shape attached to the entity that hosts it
///
/// The host handle lets a [`CollisionResult`](super::CollisionResult) name
/// its participants without borrowing their geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    host: Entity,
    shape: Shape,
}

impl ConvexHull {
    /// Attach a shape to a host entity
    pub const fn new(host: Entity, shape: Shape) -> Self {
        Self { host, shape }
    }

    /// Entity hosting this hull
    pub const fn host(&self) -> Entity {
        self.host
    }

    /// World-space geometry
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mutable geometry, for hosts that move their hull each frame
    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }
}
