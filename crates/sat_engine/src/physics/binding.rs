//! Owner-scoped access to a shared spatial index
//!
//! A collider only ever writes its own entity's entries. [`IndexBinding`] is
//! the only way colliders touch the index, and it has no method that takes a
//! foreign entity for writing.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use crate::spatial::{AuxValue, SpatialIndex};

use super::collider::ColliderError;
use super::collision_mask::CollisionMask;

/// Handle to a shared index, bound to one owning entity
pub struct IndexBinding<S: SpatialIndex + ?Sized = dyn SpatialIndex> {
    owner: Entity,
    index: Rc<RefCell<S>>,
}

impl<S: SpatialIndex + ?Sized> IndexBinding<S> {
    /// Bind `owner` to `index`
    pub fn new(owner: Entity, index: Rc<RefCell<S>>) -> Self {
        Self { owner, index }
    }

    /// Entity whose entries this binding writes
    pub const fn owner(&self) -> Entity {
        self.owner
    }

    fn read(&self) -> Result<Ref<'_, S>, ColliderError> {
        self.index
            .try_borrow()
            .map_err(|_| ColliderError::IndexUnavailable)
    }

    fn write(&self) -> Result<RefMut<'_, S>, ColliderError> {
        self.index
            .try_borrow_mut()
            .map_err(|_| ColliderError::IndexUnavailable)
    }

    /// Place the owner at `position`
    pub fn update_position(&self, position: Vec2) -> Result<(), ColliderError> {
        self.write()?.update_object(self.owner, position);
        Ok(())
    }

    /// Publish the owner's collision mask
    pub fn set_mask(&self, mask: CollisionMask) -> Result<(), ColliderError> {
        self.write()?.set_aux(self.owner, AuxValue::Mask(mask));
        Ok(())
    }

    /// The owner's published mask
    pub fn own_mask(&self) -> Result<CollisionMask, ColliderError> {
        self.mask_of(self.owner)
    }

    /// Mask published by any entity; entities without a collider read as empty
    pub fn mask_of(&self, entity: Entity) -> Result<CollisionMask, ColliderError> {
        Ok(self.read()?.collision_mask(entity).unwrap_or(CollisionMask::NONE))
    }

    /// Owner and candidate masks, read under one borrow
    pub fn masks_for(
        &self,
        candidate: Entity,
    ) -> Result<(CollisionMask, CollisionMask), ColliderError> {
        let index = self.read()?;
        let host = index.collision_mask(self.owner).unwrap_or(CollisionMask::NONE);
        let target = index.collision_mask(candidate).unwrap_or(CollisionMask::NONE);
        Ok((host, target))
    }

    /// Fill `out` with the PCL around `position`
    pub fn query_pcl_into(&self, position: Vec2, out: &mut Vec<Entity>) -> Result<(), ColliderError> {
        self.read()?.query_pcl_into(position, out);
        Ok(())
    }

    /// Drop the owner from the index along with its aux data
    pub fn remove_owner(&self) -> Result<bool, ColliderError> {
        Ok(self.write()?.remove_object(self.owner))
    }
}

impl<S: SpatialIndex + ?Sized> std::fmt::Debug for IndexBinding<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBinding")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
