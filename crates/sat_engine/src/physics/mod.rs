//! Physics module for collision detection
//!
//! Provides the SAT narrow phase, collision masks and the per-entity collider
//! components that drive broad and narrow phase once per frame.

pub mod binding;
pub mod collider;
pub mod collider_system;
pub mod collision;
pub mod collision_mask;
pub mod host;

pub use binding::IndexBinding;
pub use collider::{Collider, ColliderComponent, ColliderError, ConvexColliderComponent};
pub use collider_system::{ColliderSystem, FrameStats};
pub use collision::{
    Circle,
    CollisionResult,
    Contact,
    ConvexHull,
    NarrowPhase,
    Polygon,
    PolygonAxes,
    ResultSlot,
    Shape,
    ShapeError,
    ShapeKind,
};
pub use collision_mask::{CollisionMask, MaskFilter};
pub use host::{CollisionHost, HostEntity, ScanStatus};
