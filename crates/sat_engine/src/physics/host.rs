//! Capabilities a collider's owning entity can expose

use crate::ecs::Entity;
use crate::foundation::math::Vec2;

use super::collision::CollisionResult;
use super::collision_mask::CollisionMask;

/// Whether a collider keeps scanning its candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStatus {
    /// Test the next candidate
    #[default]
    Continue,
    /// Abandon the rest of the candidate list this frame
    Stop,
}

impl ScanStatus {
    /// Whether the scan was halted
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Collision response hooks
///
/// Both methods default to doing nothing, so hosts implement only what they
/// react to.
pub trait CollisionHost {
    /// A candidate collided with the host
    ///
    /// `contact` carries the narrow-phase result when the collider ran one.
    /// Returning [`ScanStatus::Stop`] skips the remaining candidates.
    fn on_collide(
        &mut self,
        candidate: Entity,
        time: f64,
        target_mask: CollisionMask,
        contact: Option<&CollisionResult>,
    ) -> ScanStatus {
        let _ = (candidate, time, target_mask, contact);
        ScanStatus::Continue
    }

    /// A candidate with the host's own mask was seen while self collision is off
    fn on_collide_end(&mut self, time: f64) {
        let _ = time;
    }
}

/// The entity a collider is attached to
pub trait HostEntity {
    /// World-space position fed to the spatial index each frame
    fn position(&self) -> Vec2;

    /// Collision hooks, if this entity reacts to collisions at all
    ///
    /// Entities returning `None` are still placed in the spatial index but
    /// never query it.
    fn collision_host(&mut self) -> Option<&mut dyn CollisionHost> {
        None
    }
}
