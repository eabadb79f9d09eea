//! Per-entity collider components
//!
//! A collider is attached to one entity and driven once per frame:
//!
//! 1. The entity's position is written to the shared spatial index
//! 2. Entities without collision hooks stop there
//! 3. The potential collision list (PCL) around the entity is fetched
//! 4. Each candidate, in PCL order, is mask filtered and tested until a
//!    hook answers [`ScanStatus::Stop`] or the list runs out
//!
//! [`ColliderComponent`] reports broad-phase proximity only.
//! [`ConvexColliderComponent`] additionally runs the SAT narrow phase and
//! reports only true overlaps, with the contact attached.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::core::config::CollisionConfig;
use crate::ecs::{Entity, HullSource};
use crate::foundation::math::Vec2;
use crate::spatial::SpatialIndex;

use super::binding::IndexBinding;
use super::collision::{CollisionResult, NarrowPhase, ResultSlot};
use super::collision_mask::{CollisionMask, MaskFilter};
use super::host::{HostEntity, ScanStatus};

/// Errors raised while driving a collider
#[derive(Debug, Error)]
pub enum ColliderError {
    /// A convex test needed a hull the entity does not have
    #[error("{0} has no convex hull")]
    MissingHull(Entity),

    /// The shared spatial index was already borrowed
    #[error("spatial index is already borrowed")]
    IndexUnavailable,
}

/// Common interface of the collider components
pub trait Collider {
    /// Entity this collider is attached to
    fn owner(&self) -> Entity;

    /// Decide the outcome of one candidate that passed the mask filter
    fn test_collision(
        &mut self,
        time: f64,
        candidate: Entity,
        host_mask: CollisionMask,
        target_mask: CollisionMask,
        host: &mut dyn HostEntity,
        hulls: &dyn HullSource,
    ) -> Result<ScanStatus, ColliderError>;

    /// Run one frame of collision detection for the host
    fn execute(
        &mut self,
        time: f64,
        host: &mut dyn HostEntity,
        hulls: &dyn HullSource,
    ) -> Result<ScanStatus, ColliderError>;
}

/// Report a candidate to the host, honouring the same-mask rule
///
/// Different masks (or self collision enabled) reach `on_collide`, whose
/// answer is the status. Equal masks reach `on_collide_end` and always
/// continue.
fn respond(
    collide_self: bool,
    host: &mut dyn HostEntity,
    candidate: Entity,
    time: f64,
    host_mask: CollisionMask,
    target_mask: CollisionMask,
    contact: Option<&CollisionResult>,
) -> ScanStatus {
    let Some(hooks) = host.collision_host() else {
        return ScanStatus::Continue;
    };

    if collide_self || host_mask != target_mask {
        hooks.on_collide(candidate, time, target_mask, contact)
    } else {
        hooks.on_collide_end(time);
        ScanStatus::Continue
    }
}

/// Broad-phase collider
///
/// Reports every PCL candidate that passes the mask filter.
pub struct ColliderComponent<S: SpatialIndex + ?Sized = dyn SpatialIndex> {
    binding: IndexBinding<S>,
    collide_self: bool,
    mask_filter: MaskFilter,
    pcl: Vec<Entity>,
    detached: bool,
}

impl<S: SpatialIndex + ?Sized> ColliderComponent<S> {
    /// Attach a collider to `owner`, publishing [`CollisionMask::ALL`]
    pub fn attach(owner: Entity, index: Rc<RefCell<S>>) -> Self {
        let component = Self {
            binding: IndexBinding::new(owner, index),
            collide_self: false,
            mask_filter: MaskFilter::default(),
            pcl: Vec::new(),
            detached: false,
        };
        if component.binding.set_mask(CollisionMask::ALL).is_err() {
            log::warn!("{owner}: spatial index busy, collision mask not published at attach");
        }
        log::debug!("Attached collider to {owner}");
        component
    }

    /// Attach a collider using the filter and self-collision settings of `config`
    pub fn with_config(owner: Entity, index: Rc<RefCell<S>>, config: &CollisionConfig) -> Self {
        let mut component = Self::attach(owner, index);
        component.collide_self = config.collide_self;
        component.mask_filter = config.mask_filter;
        component
    }

    /// Entity this collider is attached to
    pub const fn owner(&self) -> Entity {
        self.binding.owner()
    }

    /// Publish a new collision mask for the owner
    pub fn set_collision_mask(&mut self, mask: CollisionMask) -> Result<(), ColliderError> {
        self.binding.set_mask(mask)
    }

    /// The owner's published collision mask
    pub fn collision_mask(&self) -> Result<CollisionMask, ColliderError> {
        self.binding.own_mask()
    }

    /// Whether candidates sharing the owner's mask are reported as collisions
    pub fn set_collide_self(&mut self, collide_self: bool) {
        self.collide_self = collide_self;
    }

    /// See [`ColliderComponent::set_collide_self`]
    pub const fn collide_self(&self) -> bool {
        self.collide_self
    }

    /// Change how masks are compared
    pub fn set_mask_filter(&mut self, filter: MaskFilter) {
        self.mask_filter = filter;
    }

    /// Current mask comparison
    pub const fn mask_filter(&self) -> MaskFilter {
        self.mask_filter
    }

    /// Base response for a candidate, without narrow-phase data
    pub fn test_collision(
        &self,
        time: f64,
        candidate: Entity,
        host_mask: CollisionMask,
        target_mask: CollisionMask,
        host: &mut dyn HostEntity,
    ) -> ScanStatus {
        respond(
            self.collide_self,
            host,
            candidate,
            time,
            host_mask,
            target_mask,
            None,
        )
    }

    /// Run the frame protocol, deciding each candidate with `test`
    ///
    /// `test` receives the host, the candidate, both masks and the
    /// self-collision flag.
    fn scan<F>(
        &mut self,
        time: f64,
        host: &mut dyn HostEntity,
        test: F,
    ) -> Result<ScanStatus, ColliderError>
    where
        F: FnMut(
            &mut dyn HostEntity,
            Entity,
            CollisionMask,
            CollisionMask,
            bool,
        ) -> Result<ScanStatus, ColliderError>,
    {
        let position = host.position();
        self.binding.update_position(position)?;

        if host.collision_host().is_none() {
            return Ok(ScanStatus::Continue);
        }

        let mut pcl = std::mem::take(&mut self.pcl);
        let status = self.scan_candidates(time, position, host, &mut pcl, test);
        self.pcl = pcl;
        status
    }

    fn scan_candidates<F>(
        &self,
        time: f64,
        position: Vec2,
        host: &mut dyn HostEntity,
        pcl: &mut Vec<Entity>,
        mut test: F,
    ) -> Result<ScanStatus, ColliderError>
    where
        F: FnMut(
            &mut dyn HostEntity,
            Entity,
            CollisionMask,
            CollisionMask,
            bool,
        ) -> Result<ScanStatus, ColliderError>,
    {
        let owner = self.owner();
        self.binding.query_pcl_into(position, pcl)?;

        let mut status = ScanStatus::Continue;
        for &candidate in pcl.iter() {
            if candidate == owner {
                continue;
            }

            let (host_mask, target_mask) = self.binding.masks_for(candidate)?;
            if !self.mask_filter.passes(host_mask, target_mask) {
                log::trace!("{owner}: {candidate} filtered by mask");
                continue;
            }

            status = test(&mut *host, candidate, host_mask, target_mask, self.collide_self)?;
            if status.is_stop() {
                log::trace!("{owner}: scan stopped at {candidate} (t={time})");
                break;
            }
        }
        Ok(status)
    }

    /// Detach from the owner, clearing its mask in the index
    pub fn detach(mut self) {
        self.release();
    }

    /// Detach and drop the owner from the index entirely
    pub fn destroy(mut self) -> Result<(), ColliderError> {
        self.release();
        self.binding.remove_owner().map(|_| ())
    }

    fn release(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        let owner = self.owner();
        match self.binding.set_mask(CollisionMask::NONE) {
            Ok(()) => log::debug!("Detached collider from {owner}"),
            Err(err) => log::warn!("{owner}: mask not cleared on detach: {err}"),
        }
    }
}

impl<S: SpatialIndex + ?Sized> Collider for ColliderComponent<S> {
    fn owner(&self) -> Entity {
        self.binding.owner()
    }

    fn test_collision(
        &mut self,
        time: f64,
        candidate: Entity,
        host_mask: CollisionMask,
        target_mask: CollisionMask,
        host: &mut dyn HostEntity,
        _hulls: &dyn HullSource,
    ) -> Result<ScanStatus, ColliderError> {
        Ok(Self::test_collision(
            self,
            time,
            candidate,
            host_mask,
            target_mask,
            host,
        ))
    }

    fn execute(
        &mut self,
        time: f64,
        host: &mut dyn HostEntity,
        _hulls: &dyn HullSource,
    ) -> Result<ScanStatus, ColliderError> {
        self.scan(time, host, |host, candidate, host_mask, target_mask, collide_self| {
            Ok(respond(
                collide_self,
                host,
                candidate,
                time,
                host_mask,
                target_mask,
                None,
            ))
        })
    }
}

impl<S: SpatialIndex + ?Sized> Drop for ColliderComponent<S> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<S: SpatialIndex + ?Sized> std::fmt::Debug for ColliderComponent<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColliderComponent")
            .field("owner", &self.owner())
            .field("collide_self", &self.collide_self)
            .field("mask_filter", &self.mask_filter)
            .finish_non_exhaustive()
    }
}

/// SAT-aware collider
///
/// Candidates are only reported when their hull truly overlaps the owner's.
/// The latest contact stays readable through
/// [`ConvexColliderComponent::collision_data`] until the next one replaces it.
pub struct ConvexColliderComponent<S: SpatialIndex + ?Sized = dyn SpatialIndex> {
    base: ColliderComponent<S>,
    narrow_phase: NarrowPhase,
    slot: ResultSlot,
}

/// Narrow-phase test of one candidate, storing any contact in `slot`
fn convex_test(
    narrow_phase: &NarrowPhase,
    slot: &mut ResultSlot,
    hulls: &dyn HullSource,
    owner: Entity,
    candidate: Entity,
) -> Result<bool, ColliderError> {
    let own_hull = hulls.hull(owner).ok_or(ColliderError::MissingHull(owner))?;
    let other_hull = hulls
        .hull(candidate)
        .ok_or(ColliderError::MissingHull(candidate))?;

    match narrow_phase.test(own_hull, other_hull) {
        Some(result) => {
            slot.store(result);
            Ok(true)
        }
        None => Ok(false),
    }
}

impl<S: SpatialIndex + ?Sized> ConvexColliderComponent<S> {
    /// Attach a convex collider to `owner` with the default narrow phase
    pub fn attach(owner: Entity, index: Rc<RefCell<S>>) -> Self {
        Self {
            base: ColliderComponent::attach(owner, index),
            narrow_phase: NarrowPhase::default(),
            slot: ResultSlot::new(),
        }
    }

    /// Attach a convex collider configured by `config`
    pub fn with_config(owner: Entity, index: Rc<RefCell<S>>, config: &CollisionConfig) -> Self {
        Self {
            base: ColliderComponent::with_config(owner, index, config),
            narrow_phase: config.narrow_phase(),
            slot: ResultSlot::new(),
        }
    }

    /// Entity this collider is attached to
    pub const fn owner(&self) -> Entity {
        self.base.owner()
    }

    /// Publish a new collision mask for the owner
    pub fn set_collision_mask(&mut self, mask: CollisionMask) -> Result<(), ColliderError> {
        self.base.set_collision_mask(mask)
    }

    /// The owner's published collision mask
    pub fn collision_mask(&self) -> Result<CollisionMask, ColliderError> {
        self.base.collision_mask()
    }

    /// Whether candidates sharing the owner's mask are reported as collisions
    pub fn set_collide_self(&mut self, collide_self: bool) {
        self.base.set_collide_self(collide_self);
    }

    /// See [`ConvexColliderComponent::set_collide_self`]
    pub const fn collide_self(&self) -> bool {
        self.base.collide_self()
    }

    /// Change how masks are compared
    pub fn set_mask_filter(&mut self, filter: MaskFilter) {
        self.base.set_mask_filter(filter);
    }

    /// Narrow phase used by this collider
    pub const fn narrow_phase(&self) -> &NarrowPhase {
        &self.narrow_phase
    }

    /// The most recent contact, if any
    pub const fn collision_data(&self) -> Option<&CollisionResult> {
        self.slot.get()
    }

    /// Lifecycle counters of the result slot
    pub const fn result_slot(&self) -> &ResultSlot {
        &self.slot
    }

    /// SAT test against `candidate`, then the base response
    ///
    /// Returns [`ScanStatus::Continue`] without calling any hook when the
    /// hulls do not overlap.
    pub fn test_collision(
        &mut self,
        time: f64,
        candidate: Entity,
        host_mask: CollisionMask,
        target_mask: CollisionMask,
        host: &mut dyn HostEntity,
        hulls: &dyn HullSource,
    ) -> Result<ScanStatus, ColliderError> {
        let owner = self.owner();
        if !convex_test(&self.narrow_phase, &mut self.slot, hulls, owner, candidate)? {
            return Ok(ScanStatus::Continue);
        }
        Ok(respond(
            self.base.collide_self,
            host,
            candidate,
            time,
            host_mask,
            target_mask,
            self.slot.get(),
        ))
    }

    /// Detach from the owner, releasing the contact and clearing the mask
    pub fn detach(mut self) {
        self.slot.release();
        self.base.release();
    }

    /// Detach and drop the owner from the index entirely
    pub fn destroy(mut self) -> Result<(), ColliderError> {
        self.slot.release();
        self.base.release();
        self.base.binding.remove_owner().map(|_| ())
    }
}

impl<S: SpatialIndex + ?Sized> Collider for ConvexColliderComponent<S> {
    fn owner(&self) -> Entity {
        self.base.owner()
    }

    fn test_collision(
        &mut self,
        time: f64,
        candidate: Entity,
        host_mask: CollisionMask,
        target_mask: CollisionMask,
        host: &mut dyn HostEntity,
        hulls: &dyn HullSource,
    ) -> Result<ScanStatus, ColliderError> {
        Self::test_collision(self, time, candidate, host_mask, target_mask, host, hulls)
    }

    fn execute(
        &mut self,
        time: f64,
        host: &mut dyn HostEntity,
        hulls: &dyn HullSource,
    ) -> Result<ScanStatus, ColliderError> {
        let owner = self.base.owner();
        let narrow_phase = &self.narrow_phase;
        let slot = &mut self.slot;
        self.base.scan(time, host, |host, candidate, host_mask, target_mask, collide_self| {
            if !convex_test(narrow_phase, slot, hulls, owner, candidate)? {
                return Ok(ScanStatus::Continue);
            }
            Ok(respond(
                collide_self,
                host,
                candidate,
                time,
                host_mask,
                target_mask,
                slot.get(),
            ))
        })
    }
}

impl<S: SpatialIndex + ?Sized> std::fmt::Debug for ConvexColliderComponent<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvexColliderComponent")
            .field("base", &self.base)
            .field("narrow_phase", &self.narrow_phase)
            .field("slot", &self.slot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::physics::collision::{ConvexHull, Shape};
    use crate::physics::host::CollisionHost;
    use crate::spatial::{AuxKey, AuxValue, GridConfig, SpatialGrid};
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::collections::HashMap;

    type Index = Rc<RefCell<SpatialGrid>>;

    fn index() -> Index {
        Rc::new(RefCell::new(SpatialGrid::new(GridConfig { cell_size: 100.0 })))
    }

    #[derive(Default)]
    struct Probe {
        position: Vec2,
        reactive: bool,
        stop_on: Option<Entity>,
        collided: Vec<Entity>,
        contacts: Vec<CollisionResult>,
        ended: usize,
    }

    impl Probe {
        fn reactive(position: Vec2) -> Self {
            Self {
                position,
                reactive: true,
                ..Self::default()
            }
        }
    }

    impl CollisionHost for Probe {
        fn on_collide(
            &mut self,
            candidate: Entity,
            _time: f64,
            _target_mask: CollisionMask,
            contact: Option<&CollisionResult>,
        ) -> ScanStatus {
            self.collided.push(candidate);
            self.contacts.extend(contact.copied());
            if self.stop_on == Some(candidate) {
                ScanStatus::Stop
            } else {
                ScanStatus::Continue
            }
        }

        fn on_collide_end(&mut self, _time: f64) {
            self.ended += 1;
        }
    }

    impl HostEntity for Probe {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn collision_host(&mut self) -> Option<&mut dyn CollisionHost> {
            if self.reactive {
                Some(self)
            } else {
                None
            }
        }
    }

    fn place(index: &Index, entity: Entity, mask: CollisionMask, position: Vec2) {
        let mut index = index.borrow_mut();
        index.update_object(entity, position);
        index.set_aux(entity, AuxValue::Mask(mask));
    }

    #[test]
    fn test_attach_publishes_all_and_drop_clears() {
        let index = index();
        let owner = Entity::new(1);
        let collider = ColliderComponent::attach(owner, Rc::clone(&index));
        assert_eq!(collider.collision_mask().unwrap(), CollisionMask::ALL);
        assert!(!collider.collide_self());

        drop(collider);
        assert_eq!(index.borrow().collision_mask(owner), Some(CollisionMask::NONE));
    }

    #[test]
    fn test_stop_halts_the_scan() {
        let index = index();
        let owner = Entity::new(1);
        let (x, y, z) = (Entity::new(10), Entity::new(11), Entity::new(12));
        for candidate in [x, y, z] {
            place(&index, candidate, CollisionMask::ENEMY, Vec2::new(1.0, 1.0));
        }

        let mut collider = ColliderComponent::attach(owner, Rc::clone(&index));
        let mut probe = Probe::reactive(Vec2::new(2.0, 2.0));
        probe.stop_on = Some(x);

        let status = collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert_eq!(status, ScanStatus::Stop);
        assert_eq!(probe.collided, vec![x]);
    }

    #[test]
    fn test_full_scan_in_pcl_order() {
        let index = index();
        let owner = Entity::new(1);
        let (x, y, z) = (Entity::new(10), Entity::new(11), Entity::new(12));
        for candidate in [x, y, z] {
            place(&index, candidate, CollisionMask::ENEMY, Vec2::new(1.0, 1.0));
        }

        let mut collider = ColliderComponent::attach(owner, Rc::clone(&index));
        let mut probe = Probe::reactive(Vec2::new(2.0, 2.0));
        let status = collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert_eq!(status, ScanStatus::Continue);
        assert_eq!(probe.collided, vec![x, y, z]);
        assert!(probe.contacts.is_empty());
    }

    /// Grid that counts PCL queries
    struct CountingIndex {
        inner: SpatialGrid,
        queries: Cell<usize>,
    }

    impl SpatialIndex for CountingIndex {
        fn update_object(&mut self, entity: Entity, position: Vec2) {
            self.inner.update_object(entity, position);
        }

        fn remove_object(&mut self, entity: Entity) -> bool {
            self.inner.remove_object(entity)
        }

        fn query_pcl_into(&self, position: Vec2, out: &mut Vec<Entity>) {
            self.queries.set(self.queries.get() + 1);
            self.inner.query_pcl_into(position, out);
        }

        fn get_aux(&self, entity: Entity, key: AuxKey) -> Option<AuxValue> {
            self.inner.get_aux(entity, key)
        }

        fn set_aux(&mut self, entity: Entity, value: AuxValue) {
            self.inner.set_aux(entity, value);
        }

        fn contains(&self, entity: Entity) -> bool {
            self.inner.contains(entity)
        }

        fn position_of(&self, entity: Entity) -> Option<Vec2> {
            self.inner.position_of(entity)
        }

        fn object_count(&self) -> usize {
            self.inner.object_count()
        }

        fn clear(&mut self) {
            self.inner.clear();
        }
    }

    #[test]
    fn test_hookless_host_is_placed_but_never_queries() {
        let index = Rc::new(RefCell::new(CountingIndex {
            inner: SpatialGrid::default(),
            queries: Cell::new(0),
        }));
        let owner = Entity::new(1);

        let mut collider = ColliderComponent::attach(owner, Rc::clone(&index));
        let mut probe = Probe {
            position: Vec2::new(3.0, 4.0),
            ..Probe::default()
        };

        let status = collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert_eq!(status, ScanStatus::Continue);
        assert_eq!(index.borrow().position_of(owner), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(index.borrow().queries.get(), 0);

        probe.reactive = true;
        collider.execute(1.0, &mut probe, &World::new()).unwrap();
        assert_eq!(index.borrow().queries.get(), 1);
    }

    #[test]
    fn test_same_mask_ends_unless_collide_self() {
        let index = index();
        let owner = Entity::new(1);
        let peer = Entity::new(2);
        place(&index, peer, CollisionMask::ALL, Vec2::zeros());

        let mut collider = ColliderComponent::attach(owner, Rc::clone(&index));
        let mut probe = Probe::reactive(Vec2::zeros());
        collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert_eq!(probe.ended, 1);
        assert!(probe.collided.is_empty());

        collider.set_collide_self(true);
        collider.execute(1.0, &mut probe, &World::new()).unwrap();
        assert_eq!(probe.ended, 1);
        assert_eq!(probe.collided, vec![peer]);
    }

    #[test]
    fn test_owner_is_not_its_own_candidate() {
        let index = index();
        let owner = Entity::new(1);
        let mut collider = ColliderComponent::attach(owner, Rc::clone(&index));
        collider.set_collide_self(true);
        let mut probe = Probe::reactive(Vec2::zeros());
        collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert!(probe.collided.is_empty());
        assert_eq!(probe.ended, 0);
    }

    #[test]
    fn test_mask_filters() {
        let index = index();
        let owner = Entity::new(1);
        let enemy = Entity::new(2);
        let pickup = Entity::new(3);
        place(&index, enemy, CollisionMask::ENEMY, Vec2::zeros());
        place(&index, pickup, CollisionMask::PICKUP, Vec2::zeros());

        let mut collider = ColliderComponent::attach(owner, Rc::clone(&index));
        collider
            .set_collision_mask(CollisionMask::PLAYER | CollisionMask::ENEMY)
            .unwrap();

        // Literal filter admits every candidate
        let mut probe = Probe::reactive(Vec2::zeros());
        collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert_eq!(probe.collided, vec![enemy, pickup]);

        collider.set_mask_filter(MaskFilter::Intersecting);
        let mut probe = Probe::reactive(Vec2::zeros());
        collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert_eq!(probe.collided, vec![enemy]);
    }

    #[test]
    fn test_base_test_collision_without_hooks_continues() {
        let index = index();
        let collider = ColliderComponent::attach(Entity::new(1), index);
        let mut probe = Probe::default();
        let status = collider.test_collision(
            0.0,
            Entity::new(2),
            CollisionMask::PLAYER,
            CollisionMask::ENEMY,
            &mut probe,
        );
        assert_eq!(status, ScanStatus::Continue);
    }

    fn convex_world() -> (World, Entity, Entity, Entity) {
        let mut world = World::new();
        let host = world.create_entity();
        let touching = world.create_entity();
        let near_miss = world.create_entity();
        world.attach_hull(host, Shape::circle(Vec2::zeros(), 5.0).unwrap());
        world.attach_hull(touching, Shape::circle(Vec2::new(8.0, 0.0), 4.0).unwrap());
        world.attach_hull(near_miss, Shape::circle(Vec2::new(0.0, 20.0), 4.0).unwrap());
        (world, host, touching, near_miss)
    }

    #[test]
    fn test_convex_reports_only_true_overlaps() {
        let index = index();
        let (world, host, touching, near_miss) = convex_world();
        place(&index, touching, CollisionMask::ENEMY, Vec2::new(8.0, 0.0));
        place(&index, near_miss, CollisionMask::ENEMY, Vec2::new(0.0, 20.0));

        let mut collider = ConvexColliderComponent::attach(host, Rc::clone(&index));
        let mut probe = Probe::reactive(Vec2::zeros());
        collider.execute(0.0, &mut probe, &world).unwrap();

        assert_eq!(probe.collided, vec![touching]);
        let contact = collider.collision_data().unwrap();
        assert_relative_eq!(contact.overlap, 1.0);
        assert_relative_eq!(contact.unit_vector, Vec2::new(1.0, 0.0));
        assert_eq!(contact.hull_a, host);
        assert_eq!(contact.hull_b, touching);
        assert_eq!(probe.contacts.len(), 1);
    }

    #[test]
    fn test_convex_slot_releases_before_storing() {
        let index = index();
        let (world, host, touching, _) = convex_world();
        let mut collider = ConvexColliderComponent::attach(host, Rc::clone(&index));
        let mut probe = Probe::reactive(Vec2::zeros());

        for _ in 0..2 {
            collider
                .test_collision(
                    0.0,
                    touching,
                    CollisionMask::PLAYER,
                    CollisionMask::ENEMY,
                    &mut probe,
                    &world,
                )
                .unwrap();
        }

        let slot = collider.result_slot();
        assert_eq!(slot.stores(), 2);
        assert_eq!(slot.releases(), 1);
        assert_eq!(slot.live(), 1);
        assert_eq!(probe.collided, vec![touching, touching]);
    }

    #[test]
    fn test_convex_miss_calls_no_hook() {
        let index = index();
        let (world, host, _, near_miss) = convex_world();
        let mut collider = ConvexColliderComponent::attach(host, Rc::clone(&index));
        collider.set_collide_self(true);
        let mut probe = Probe::reactive(Vec2::zeros());

        let status = collider
            .test_collision(
                0.0,
                near_miss,
                CollisionMask::ALL,
                CollisionMask::ALL,
                &mut probe,
                &world,
            )
            .unwrap();
        assert_eq!(status, ScanStatus::Continue);
        assert!(probe.collided.is_empty());
        assert_eq!(probe.ended, 0);
        assert!(collider.collision_data().is_none());
    }

    #[test]
    fn test_missing_hull_is_an_error() {
        let index = index();
        let host = Entity::new(1);
        let ghost = Entity::new(2);
        place(&index, ghost, CollisionMask::ENEMY, Vec2::zeros());

        let mut hulls = HashMap::new();
        hulls.insert(
            host,
            ConvexHull::new(host, Shape::circle(Vec2::zeros(), 1.0).unwrap()),
        );

        let mut collider = ConvexColliderComponent::attach(host, Rc::clone(&index));
        let mut probe = Probe::reactive(Vec2::zeros());
        let err = collider.execute(0.0, &mut probe, &hulls).unwrap_err();
        assert!(matches!(err, ColliderError::MissingHull(e) if e == ghost));
    }

    #[test]
    fn test_detach_and_destroy() {
        let index = index();
        let (world, host, touching, _) = convex_world();
        let mut collider = ConvexColliderComponent::attach(host, Rc::clone(&index));
        let mut probe = Probe::reactive(Vec2::zeros());
        collider
            .test_collision(
                0.0,
                touching,
                CollisionMask::PLAYER,
                CollisionMask::ENEMY,
                &mut probe,
                &world,
            )
            .unwrap();
        collider.detach();
        assert_eq!(index.borrow().collision_mask(host), Some(CollisionMask::NONE));
        assert!(!index.borrow().contains(host));

        let mut other = ConvexColliderComponent::attach(touching, Rc::clone(&index));
        other.execute(0.0, &mut Probe::default(), &world).unwrap();
        assert!(index.borrow().contains(touching));
        other.destroy().unwrap();
        assert!(!index.borrow().contains(touching));
        assert!(index.borrow().collision_mask(touching).is_none());
    }

    #[test]
    fn test_with_config_applies_settings() {
        let config = CollisionConfig {
            mask_filter: MaskFilter::Intersecting,
            collide_self: true,
            ..CollisionConfig::default()
        };
        let collider: ConvexColliderComponent<SpatialGrid> =
            ConvexColliderComponent::with_config(Entity::new(1), index(), &config);
        assert!(collider.collide_self());
        assert_eq!(collider.base.mask_filter(), MaskFilter::Intersecting);
        assert_eq!(collider.narrow_phase().polygon_axes(), config.polygon_axes);
    }

    #[test]
    fn test_dyn_index_handle() {
        let shared: crate::spatial::SharedIndex = index();
        let mut collider: Box<dyn Collider> =
            Box::new(ColliderComponent::attach(Entity::new(1), Rc::clone(&shared)));
        let mut probe = Probe::reactive(Vec2::new(5.0, 5.0));
        collider.execute(0.0, &mut probe, &World::new()).unwrap();
        assert!(shared.borrow().contains(Entity::new(1)));
        assert_eq!(collider.owner(), Entity::new(1));
    }
}
