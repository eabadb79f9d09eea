//! # SAT Engine
//!
//! Two-phase 2D collision detection for frame-stepped games.
//!
//! ## Features
//!
//! - **Broad Phase**: Uniform grid and quadtree spatial indices with per-object auxiliary data
//! - **Narrow Phase**: Separating Axis Theorem tests for circles and convex polygons
//! - **Collider Protocol**: Per-entity components with collision masks and continue/stop callbacks
//! - **Allocation Aware**: One reusable collision result slot per collider, no garbage per candidate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use sat_engine::prelude::*;
//!
//! struct Ship {
//!     position: Vec2,
//! }
//!
//! impl CollisionHost for Ship {
//!     fn on_collide(
//!         &mut self,
//!         _candidate: Entity,
//!         _time: f64,
//!         _target_mask: CollisionMask,
//!         contact: Option<&CollisionResult>,
//!     ) -> ScanStatus {
//!         if let Some(contact) = contact {
//!             self.position -= contact.impulse_vector;
//!         }
//!         ScanStatus::Continue
//!     }
//! }
//!
//! impl HostEntity for Ship {
//!     fn position(&self) -> Vec2 {
//!         self.position
//!     }
//!
//!     fn collision_host(&mut self) -> Option<&mut dyn CollisionHost> {
//!         Some(self)
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let index = Rc::new(RefCell::new(SpatialGrid::new(GridConfig::default())));
//!     let mut world = World::new();
//!     let ship_entity = world.create_entity();
//!     world.attach_hull(ship_entity, Shape::circle(Vec2::zeros(), 5.0)?);
//!
//!     let mut collider = ConvexColliderComponent::attach(ship_entity, Rc::clone(&index));
//!     let mut ship = Ship { position: Vec2::zeros() };
//!     collider.execute(0.0, &mut ship, &world)?;
//!     Ok(())
//! }
//! ```

// Core engine modules
pub mod core;

pub mod config;
pub mod foundation;
pub mod ecs;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{BroadPhaseConfig, BroadPhaseKind, CollisionConfig, LoggingConfig},
        config::{Config, ConfigError},
        ecs::{Entity, HullSource, World},
        foundation::math::Vec2,
        physics::{
            Collider, ColliderComponent, ColliderError, CollisionHost, CollisionMask,
            CollisionResult, ConvexColliderComponent, ConvexHull, HostEntity, MaskFilter,
            NarrowPhase, PolygonAxes, ScanStatus, Shape, ShapeError, ShapeKind,
        },
        spatial::{AuxKey, AuxValue, GridConfig, Quadtree, QuadtreeConfig, SpatialGrid, SpatialIndex},
    };
}
