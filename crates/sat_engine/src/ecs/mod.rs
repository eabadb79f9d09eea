//! Entities and the world that owns their hulls

pub mod entity;
pub mod world;

pub use entity::Entity;
pub use world::{HullSource, World};
