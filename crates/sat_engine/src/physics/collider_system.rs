//! Frame stepping for a set of colliders
//!
//! Colliders run one after another in the order they are handed over. Each
//! one commits its host's position to the spatial index before scanning, so a
//! collider sees the new position of every entity stepped before it this
//! frame and the previous frame's position of every entity stepped after it.

use crate::ecs::HullSource;

use super::collider::{Collider, ColliderError};
use super::host::HostEntity;

/// Counters from one stepped frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Colliders executed
    pub executed: usize,
    /// Colliders whose host stopped the scan early
    pub stopped: usize,
}

/// Drives colliders once per simulation tick
#[derive(Debug, Default)]
pub struct ColliderSystem {
    frame: u64,
    last_stats: FrameStats,
}

impl ColliderSystem {
    /// Create a new collider system
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute every `(collider, host)` pair in order
    ///
    /// The first collider error aborts the frame and is returned.
    pub fn step<'a, I>(
        &mut self,
        time: f64,
        hulls: &dyn HullSource,
        entries: I,
    ) -> Result<FrameStats, ColliderError>
    where
        I: IntoIterator<Item = (&'a mut dyn Collider, &'a mut dyn HostEntity)>,
    {
        self.frame += 1;
        let mut stats = FrameStats::default();

        for (collider, host) in entries {
            let status = collider.execute(time, host, hulls)?;
            stats.executed += 1;
            if status.is_stop() {
                stats.stopped += 1;
            }
        }

        log::trace!(
            "Frame {} (t={time}): {} colliders, {} stopped early",
            self.frame,
            stats.executed,
            stats.stopped
        );
        self.last_stats = stats;
        Ok(stats)
    }

    /// Number of frames stepped so far
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Counters of the most recent successful frame
    pub const fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Entity, World};
    use crate::foundation::math::Vec2;
    use crate::physics::{CollisionHost, CollisionMask, ColliderComponent, ScanStatus};
    use crate::physics::collision::CollisionResult;
    use crate::spatial::{GridConfig, SpatialGrid, SpatialIndex};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Walker {
        position: Vec2,
        seen: Vec<Entity>,
        stop: bool,
    }

    impl CollisionHost for Walker {
        fn on_collide(
            &mut self,
            candidate: Entity,
            _time: f64,
            _target_mask: CollisionMask,
            _contact: Option<&CollisionResult>,
        ) -> ScanStatus {
            self.seen.push(candidate);
            if self.stop {
                ScanStatus::Stop
            } else {
                ScanStatus::Continue
            }
        }
    }

    impl HostEntity for Walker {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn collision_host(&mut self) -> Option<&mut dyn CollisionHost> {
            Some(self)
        }
    }

    fn walker(x: f64, stop: bool) -> Walker {
        Walker {
            position: Vec2::new(x, 0.0),
            seen: Vec::new(),
            stop,
        }
    }

    #[test]
    fn test_step_counts_and_order() {
        let index = Rc::new(RefCell::new(SpatialGrid::new(GridConfig { cell_size: 10.0 })));
        let world = World::new();
        let mut a = ColliderComponent::attach(Entity::new(1), Rc::clone(&index));
        let mut b = ColliderComponent::attach(Entity::new(2), Rc::clone(&index));
        a.set_collision_mask(CollisionMask::PLAYER).unwrap();
        b.set_collision_mask(CollisionMask::ENEMY).unwrap();
        let mut host_a = walker(1.0, false);
        let mut host_b = walker(2.0, true);

        let mut system = ColliderSystem::new();
        let stats = system
            .step(
                0.0,
                &world,
                [
                    (&mut a as &mut dyn Collider, &mut host_a as &mut dyn HostEntity),
                    (&mut b as &mut dyn Collider, &mut host_b as &mut dyn HostEntity),
                ],
            )
            .unwrap();

        // A ran before B was ever placed
        assert!(host_a.seen.is_empty());
        assert_eq!(host_b.seen, vec![Entity::new(1)]);
        assert_eq!(stats, FrameStats { executed: 2, stopped: 1 });
        assert_eq!(system.frame(), 1);
        assert_eq!(system.last_stats(), stats);
        assert_eq!(index.borrow().object_count(), 2);
    }
}
