//! # Collision Configuration
//!
//! Consolidates the tunables of the collision pipeline into one serializable
//! structure: which broad phase to build and how, how collision masks are
//! compared, which axes the polygon narrow phase enumerates, and logging.
//!
//! ## Example
//!
//! ```toml
//! mask_filter = "Literal"
//! polygon_axes = "HostOnly"
//! collide_self = false
//!
//! [broad_phase]
//! kind = "Grid"
//!
//! [broad_phase.grid]
//! cell_size = 64.0
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{Config, ConfigError};
use crate::physics::{MaskFilter, NarrowPhase, PolygonAxes};
use crate::spatial::{GridConfig, Quadtree, QuadtreeConfig, SharedIndex, SpatialGrid};

/// Which broad-phase structure to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BroadPhaseKind {
    /// Uniform grid of square cells
    #[default]
    Grid,
    /// Adaptive quadtree
    Quadtree,
}

/// Broad-phase configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadPhaseConfig {
    /// Structure to build
    pub kind: BroadPhaseKind,
    /// Grid parameters (used when `kind` is `Grid`)
    pub grid: GridConfig,
    /// Quadtree parameters (used when `kind` is `Quadtree`)
    pub quadtree: QuadtreeConfig,
}

impl BroadPhaseConfig {
    /// Build the configured spatial index as a shared handle
    pub fn build(&self) -> SharedIndex {
        match self.kind {
            BroadPhaseKind::Grid => Rc::new(RefCell::new(SpatialGrid::new(self.grid.clone()))),
            BroadPhaseKind::Quadtree => Rc::new(RefCell::new(Quadtree::new(self.quadtree.clone()))),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "broad_phase.grid.cell_size",
                reason: format!("must be a positive finite number, got {}", self.grid.cell_size),
            });
        }

        let bounds = &self.quadtree.bounds;
        if !(bounds.max.x > bounds.min.x && bounds.max.y > bounds.min.y) {
            return Err(ConfigError::Invalid {
                field: "broad_phase.quadtree.bounds",
                reason: "max corner must be strictly greater than min corner".to_string(),
            });
        }

        if self.quadtree.max_objects_per_node == 0 {
            return Err(ConfigError::Invalid {
                field: "broad_phase.quadtree.max_objects_per_node",
                reason: "must be at least 1".to_string(),
            });
        }

        if !(self.quadtree.query_radius.is_finite() && self.quadtree.query_radius >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "broad_phase.quadtree.query_radius",
                reason: format!("must be a non-negative finite number, got {}", self.quadtree.query_radius),
            });
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter passed to env_logger (overridden by `RUST_LOG`)
    pub level: String,
    /// Whether log lines carry timestamps
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timestamps: true,
        }
    }
}

/// # Collision Configuration
///
/// Top-level configuration for the collision pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// How host and target collision masks are compared
    pub mask_filter: MaskFilter,
    /// Which hull's face normals the polygon-polygon test enumerates
    pub polygon_axes: PolygonAxes,
    /// Default `collide_self` flag for new colliders
    pub collide_self: bool,
    /// Broad-phase structure
    pub broad_phase: BroadPhaseConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl CollisionConfig {
    /// Narrow phase configured from this config
    pub fn narrow_phase(&self) -> NarrowPhase {
        NarrowPhase::new(self.polygon_axes)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.broad_phase.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Config for CollisionConfig {}
