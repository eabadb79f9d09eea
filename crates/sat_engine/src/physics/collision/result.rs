//! Collision results and the per-collider result slot

use crate::ecs::Entity;
use crate::foundation::math::Vec2;

/// Outcome of a successful narrow-phase test
///
/// `unit_vector` points from hull A toward hull B. Moving B by
/// `impulse_vector` (or A by its negation) separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Penetration depth along `unit_vector` (never negative)
    pub overlap: f64,
    /// Separating axis, unit length
    pub unit_vector: Vec2,
    /// Host of the first tested hull
    pub hull_a: Entity,
    /// Host of the second tested hull
    pub hull_b: Entity,
    /// Minimum translation vector, `unit_vector * overlap`
    pub impulse_vector: Vec2,
}

impl CollisionResult {
    /// Builds a result, deriving the impulse vector
    pub fn new(overlap: f64, unit_vector: Vec2, hull_a: Entity, hull_b: Entity) -> Self {
        Self {
            overlap,
            unit_vector,
            hull_a,
            hull_b,
            impulse_vector: unit_vector * overlap,
        }
    }

    /// The same contact seen from hull B
    pub fn reversed(&self) -> Self {
        Self::new(self.overlap, -self.unit_vector, self.hull_b, self.hull_a)
    }

    /// The push that separates `entity` from the other participant
    ///
    /// Returns `None` when `entity` took no part in this collision.
    pub fn impulse_for(&self, entity: Entity) -> Option<Vec2> {
        if entity == self.hull_a {
            Some(-self.impulse_vector)
        } else if entity == self.hull_b {
            Some(self.impulse_vector)
        } else {
            None
        }
    }

    /// The participant that is not `entity`
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if entity == self.hull_a {
            Some(self.hull_b)
        } else if entity == self.hull_b {
            Some(self.hull_a)
        } else {
            None
        }
    }
}

/// Single-result arena owned by one collider
///
/// Holds at most one live [`CollisionResult`]. Storing a new result releases
/// the previous one first; nothing outside the owning collider can keep a
/// reference across a store because access is only through borrows of the
/// slot.
#[derive(Debug, Default)]
pub struct ResultSlot {
    current: Option<CollisionResult>,
    stores: u64,
    releases: u64,
}

impl ResultSlot {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            current: None,
            stores: 0,
            releases: 0,
        }
    }

    /// Replace the live result, returning the one that was released
    pub fn store(&mut self, result: CollisionResult) -> Option<CollisionResult> {
        let released = self.release();
        self.current = Some(result);
        self.stores += 1;
        released
    }

    /// Release the live result, if any
    pub fn release(&mut self) -> Option<CollisionResult> {
        let released = self.current.take();
        if released.is_some() {
            self.releases += 1;
        }
        released
    }

    /// The live result
    pub const fn get(&self) -> Option<&CollisionResult> {
        self.current.as_ref()
    }

    /// Number of results stored over the slot's lifetime
    pub const fn stores(&self) -> u64 {
        self.stores
    }

    /// Number of results released over the slot's lifetime
    pub const fn releases(&self) -> u64 {
        self.releases
    }

    /// Results currently live (0 or 1)
    pub const fn live(&self) -> u64 {
        self.stores - self.releases
    }
}
