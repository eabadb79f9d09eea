//! Entity registry and hull storage

use std::collections::HashMap;

use super::Entity;
use crate::foundation::math::Vec2;
use crate::physics::collision::{ConvexHull, Shape};

/// Read access to the convex hull attached to an entity
///
/// Convex colliders resolve PCL entries to hulls through this trait, so any
/// store that can answer "what hull does this entity own" works.
pub trait HullSource {
    /// Hull owned by `entity`, if any
    fn hull(&self, entity: Entity) -> Option<&ConvexHull>;
}

/// World containing all entities and their hulls
#[derive(Debug)]
pub struct World {
    next_entity_id: u32,
    entities: Vec<Entity>,
    hulls: HashMap<Entity, ConvexHull>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            next_entity_id: 0,
            entities: Vec::new(),
            hulls: HashMap::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.push(entity);
        entity
    }

    /// Destroy an entity and drop its hull
    ///
    /// Returns `false` if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let Some(index) = self.entities.iter().position(|&e| e == entity) else {
            return false;
        };
        self.entities.remove(index);
        self.hulls.remove(&entity);
        true
    }

    /// Whether `entity` was created by this world and not yet destroyed
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Attach a shape to `entity`, replacing any previous hull
    pub fn attach_hull(&mut self, entity: Entity, shape: Shape) -> Option<ConvexHull> {
        self.hulls.insert(entity, ConvexHull::new(entity, shape))
    }

    /// Remove the hull attached to `entity`
    pub fn detach_hull(&mut self, entity: Entity) -> Option<ConvexHull> {
        self.hulls.remove(&entity)
    }

    /// Mutable access to an entity's hull
    pub fn hull_mut(&mut self, entity: Entity) -> Option<&mut ConvexHull> {
        self.hulls.get_mut(&entity)
    }

    /// Move an entity's hull so its center sits at `center`
    pub fn move_hull_to(&mut self, entity: Entity, center: Vec2) -> bool {
        match self.hulls.get_mut(&entity) {
            Some(hull) => {
                hull.shape_mut().set_center(center);
                true
            }
            None => false,
        }
    }

    /// Translate an entity's hull by `offset`
    pub fn translate_hull(&mut self, entity: Entity, offset: Vec2) -> bool {
        match self.hulls.get_mut(&entity) {
            Some(hull) => {
                hull.shape_mut().translate(offset);
                true
            }
            None => false,
        }
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl HullSource for World {
    fn hull(&self, entity: Entity) -> Option<&ConvexHull> {
        self.hulls.get(&entity)
    }
}

impl HullSource for HashMap<Entity, ConvexHull> {
    fn hull(&self, entity: Entity) -> Option<&ConvexHull> {
        self.get(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_entity_lifecycle() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        assert_ne!(a, b);
        assert_eq!(world.entity_count(), 2);

        assert!(world.destroy_entity(a));
        assert!(!world.is_alive(a));
        assert!(world.is_alive(b));
        assert!(!world.destroy_entity(a));
        assert_eq!(world.entities().copied().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_hulls_follow_their_entity() {
        let mut world = World::new();
        let e = world.create_entity();
        let shape = Shape::rectangle(Vec2::zeros(), Vec2::new(1.0, 1.0)).unwrap();
        assert!(world.attach_hull(e, shape).is_none());
        assert_eq!(world.hull(e).unwrap().host(), e);

        assert!(world.move_hull_to(e, Vec2::new(10.0, 0.0)));
        assert_relative_eq!(world.hull(e).unwrap().shape().center(), Vec2::new(10.0, 0.0));

        assert!(world.translate_hull(e, Vec2::new(0.0, 2.0)));
        assert_relative_eq!(world.hull(e).unwrap().shape().center(), Vec2::new(10.0, 2.0));

        world.destroy_entity(e);
        assert!(world.hull(e).is_none());
        assert!(!world.move_hull_to(e, Vec2::zeros()));
    }

    #[test]
    fn test_hash_map_is_a_hull_source() {
        let e = Entity::new(7);
        let mut hulls = HashMap::new();
        hulls.insert(e, ConvexHull::new(e, Shape::circle(Vec2::zeros(), 1.0).unwrap()));
        assert!(HullSource::hull(&hulls, e).is_some());
        assert!(HullSource::hull(&hulls, Entity::new(8)).is_none());
    }
}
