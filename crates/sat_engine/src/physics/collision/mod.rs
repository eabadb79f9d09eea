//! Narrow-phase collision detection
//!
//! # Architecture
//!
//! - **World Space Storage**: Hull geometry is kept transformed; hosts move it each frame
//! - **Sum-Type Dispatch**: One exhaustive match over `(Shape, Shape)` picks the test
//! - **No Garbage**: Misses return `None` without touching the heap
//!
//! # Module Organization
//!
//! - [`shape`] - Circles, convex polygons and the hulls that attach them to entities
//! - [`narrow_phase`] - Separating Axis Theorem tests
//! - [`result`] - Collision results and the per-collider result slot

pub mod shape;
pub mod narrow_phase;
pub mod result;

// Re-export commonly used types
pub use shape::{Circle, ConvexHull, Polygon, Shape, ShapeError, ShapeKind};
pub use narrow_phase::{Contact, NarrowPhase, PolygonAxes};
pub use result::{CollisionResult, ResultSlot};
