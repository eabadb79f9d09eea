//! Broad-phase spatial partitioning
//!
//! Provides the [`SpatialIndex`] trait that colliders query for potential
//! collision lists, and two implementations:
//!
//! - [`SpatialGrid`] - uniform grid, PCL is the 3x3 block of cells
//! - [`Quadtree`] - bounded quadtree, PCL is a radius search

pub mod bounds;
pub mod grid;
pub mod quadtree;
pub mod spatial_index;

use std::cell::RefCell;
use std::rc::Rc;

pub use bounds::Rect;
pub use grid::{GridConfig, SpatialGrid};
pub use quadtree::{Quadtree, QuadtreeConfig};
pub use spatial_index::{AuxKey, AuxValue, CellId, ObjectKey, SpatialIndex};

/// A spatial index shared between the colliders of one scene
///
/// Colliders are single threaded and hold clones of the same `Rc`.
pub type SharedIndex<S = dyn SpatialIndex> = Rc<RefCell<S>>;
