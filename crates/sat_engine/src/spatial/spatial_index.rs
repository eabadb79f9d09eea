//! Broad-phase spatial index interface
//!
//! An index tracks one point per entity and answers "who is near here" with a
//! potential collision list (PCL). Each entity also owns a small record of
//! auxiliary data that colliders use to publish their collision mask.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use crate::physics::CollisionMask;

new_key_type! {
    /// Stable handle to an object record inside an index
    pub struct ObjectKey;
}

/// Location of an object inside an index
///
/// Only meaningful to the index that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellId {
    /// Grid cell at column/row
    Grid {
        /// Column index
        col: i64,
        /// Row index
        row: i64,
    },
    /// Quadtree node, as a depth and a 2-bit-per-level child path
    Quad {
        /// Depth of the node (root is 0)
        depth: u32,
        /// Quadrant indices from the root, most significant first
        path: u64,
    },
    /// Outside the area covered by a bounded index
    Overflow,
}

/// Keys of per-entity auxiliary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxKey {
    /// The collision mask published by the entity's collider
    CollisionMask,
    /// The cell the index last placed the entity in
    LastCell,
}

/// Per-entity auxiliary values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxValue {
    /// Value stored under [`AuxKey::CollisionMask`]
    Mask(CollisionMask),
    /// Value stored under [`AuxKey::LastCell`]
    Cell(CellId),
}

impl AuxValue {
    /// The key this value is stored under
    pub const fn key(&self) -> AuxKey {
        match self {
            Self::Mask(_) => AuxKey::CollisionMask,
            Self::Cell(_) => AuxKey::LastCell,
        }
    }
}

/// Spatial index used by colliders for broad-phase candidate lookup
///
/// The trait is object safe; colliders share one index as
/// [`SharedIndex`](super::SharedIndex).
pub trait SpatialIndex {
    /// Insert `entity` at `position`, or move it there
    fn update_object(&mut self, entity: Entity, position: Vec2);

    /// Remove `entity` and all of its auxiliary data
    ///
    /// Returns `true` if the entity was known to the index.
    fn remove_object(&mut self, entity: Entity) -> bool;

    /// Fill `out` with the entities near `position`
    ///
    /// `out` is cleared first. The order is deterministic for a given
    /// sequence of updates. The PCL may include the querying entity itself.
    fn query_pcl_into(&self, position: Vec2, out: &mut Vec<Entity>);

    /// Entities near `position`, in a freshly allocated list
    fn query_pcl(&self, position: Vec2) -> Vec<Entity> {
        let mut out = Vec::new();
        self.query_pcl_into(position, &mut out);
        out
    }

    /// Read one auxiliary value
    fn get_aux(&self, entity: Entity, key: AuxKey) -> Option<AuxValue>;

    /// Write one auxiliary value under [`AuxValue::key`]
    ///
    /// Aux data may be written before the entity has a position.
    fn set_aux(&mut self, entity: Entity, value: AuxValue);

    /// Whether `entity` currently has a position in the index
    fn contains(&self, entity: Entity) -> bool;

    /// Last position given to `entity`
    fn position_of(&self, entity: Entity) -> Option<Vec2>;

    /// Number of entities with a position
    fn object_count(&self) -> usize;

    /// Drop every object and all auxiliary data
    fn clear(&mut self);

    /// Typed read of [`AuxKey::CollisionMask`]
    fn collision_mask(&self, entity: Entity) -> Option<CollisionMask> {
        match self.get_aux(entity, AuxKey::CollisionMask) {
            Some(AuxValue::Mask(mask)) => Some(mask),
            _ => None,
        }
    }

    /// Typed read of [`AuxKey::LastCell`]
    fn last_cell(&self, entity: Entity) -> Option<CellId> {
        match self.get_aux(entity, AuxKey::LastCell) {
            Some(AuxValue::Cell(cell)) => Some(cell),
            _ => None,
        }
    }
}

/// Auxiliary data carried by each object record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AuxData {
    pub collision_mask: Option<CollisionMask>,
    pub last_cell: Option<CellId>,
}

impl AuxData {
    pub const fn get(&self, key: AuxKey) -> Option<AuxValue> {
        match key {
            AuxKey::CollisionMask => match self.collision_mask {
                Some(mask) => Some(AuxValue::Mask(mask)),
                None => None,
            },
            AuxKey::LastCell => match self.last_cell {
                Some(cell) => Some(AuxValue::Cell(cell)),
                None => None,
            },
        }
    }

    pub fn set(&mut self, value: AuxValue) {
        match value {
            AuxValue::Mask(mask) => self.collision_mask = Some(mask),
            AuxValue::Cell(cell) => self.last_cell = Some(cell),
        }
    }
}

/// One entity as seen by an index
#[derive(Debug, Clone)]
pub(crate) struct ObjectRecord {
    pub entity: Entity,
    /// `None` until the first `update_object`
    pub position: Option<Vec2>,
    pub aux: AuxData,
}

/// Entity-to-record storage shared by the index implementations
///
/// Records live in a slot map so partitions can hold compact keys instead of
/// entity lookups.
#[derive(Debug, Default)]
pub(crate) struct ObjectTable {
    records: SlotMap<ObjectKey, ObjectRecord>,
    lookup: HashMap<Entity, ObjectKey>,
    placed: usize,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for `entity`, creating an empty record if needed
    pub fn entry(&mut self, entity: Entity) -> ObjectKey {
        if let Some(&key) = self.lookup.get(&entity) {
            return key;
        }
        let key = self.records.insert(ObjectRecord {
            entity,
            position: None,
            aux: AuxData::default(),
        });
        self.lookup.insert(entity, key);
        key
    }

    pub fn key_of(&self, entity: Entity) -> Option<ObjectKey> {
        self.lookup.get(&entity).copied()
    }

    pub fn record(&self, key: ObjectKey) -> Option<&ObjectRecord> {
        self.records.get(key)
    }

    pub fn record_of(&self, entity: Entity) -> Option<&ObjectRecord> {
        self.key_of(entity).and_then(|key| self.records.get(key))
    }

    /// Set the position of a record, returning the previous one
    pub fn set_position(&mut self, key: ObjectKey, position: Vec2) -> Option<Vec2> {
        let record = self.records.get_mut(key)?;
        let previous = record.position.replace(position);
        if previous.is_none() {
            self.placed += 1;
        }
        previous
    }

    pub fn set_aux(&mut self, key: ObjectKey, value: AuxValue) {
        if let Some(record) = self.records.get_mut(key) {
            record.aux.set(value);
        }
    }

    pub fn remove(&mut self, entity: Entity) -> Option<(ObjectKey, ObjectRecord)> {
        let key = self.lookup.remove(&entity)?;
        let record = self.records.remove(key)?;
        if record.position.is_some() {
            self.placed -= 1;
        }
        Some((key, record))
    }

    pub fn entity(&self, key: ObjectKey) -> Option<Entity> {
        self.records.get(key).map(|record| record.entity)
    }

    pub const fn placed(&self) -> usize {
        self.placed
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.lookup.clear();
        self.placed = 0;
    }
}
