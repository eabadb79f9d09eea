//! Core engine systems
//!
//! Houses the unified configuration consumed by the collision pipeline.

pub mod config;

pub use config::{BroadPhaseConfig, BroadPhaseKind, CollisionConfig, LoggingConfig};
