//! Quadtree spatial index
//!
//! Divides a bounded region into hierarchical quadrants. A leaf splits into
//! four children once it holds `max_objects_per_node` objects. Objects
//! outside the bounds go to an overflow list that every query also scans.
//!
//! The PCL of a position is every object within `query_radius` of it, found
//! depth first with children visited in quadrant order.

use serde::{Deserialize, Serialize};

use super::bounds::Rect;
use super::spatial_index::{AuxKey, AuxValue, CellId, ObjectKey, ObjectTable, SpatialIndex};
use crate::ecs::Entity;
use crate::foundation::math::Vec2;

/// Deepest level a node path can encode
const MAX_PATH_DEPTH: u32 = 31;

/// Configuration for quadtree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// Maximum objects per node before subdivision
    pub max_objects_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node half-size (prevents excessive subdivision)
    pub min_node_size: f64,

    /// Radius searched around a position when building a PCL
    pub query_radius: f64,

    /// Region covered by the root node
    pub bounds: Rect,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_objects_per_node: 8,
            max_depth: 8,
            min_node_size: 1.0,
            query_radius: 128.0,
            bounds: Rect::new(Vec2::new(-1024.0, -1024.0), Vec2::new(1024.0, 1024.0)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct QuadEntry {
    key: ObjectKey,
    position: Vec2,
}

/// Single node in the quadtree hierarchy
#[derive(Debug)]
struct QuadNode {
    bounds: Rect,
    entries: Vec<QuadEntry>,
    children: Option<Box<[QuadNode; 4]>>,
    depth: u32,
    path: u64,
}

impl QuadNode {
    fn new(bounds: Rect, depth: u32, path: u64) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            depth,
            path,
        }
    }

    const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    const fn cell_id(&self) -> CellId {
        CellId::Quad {
            depth: self.depth,
            path: self.path,
        }
    }

    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        let bounds = self.bounds;
        let depth = self.depth + 1;
        let path = self.path;
        let mut children: Box<[QuadNode; 4]> = Box::new(std::array::from_fn(|quadrant| {
            QuadNode::new(bounds.quadrant(quadrant), depth, (path << 2) | quadrant as u64)
        }));

        for entry in std::mem::take(&mut self.entries) {
            children[bounds.quadrant_of(entry.position)].entries.push(entry);
        }
        self.children = Some(children);
    }

    /// Insert an entry that lies inside this node, returning where it landed
    fn insert(&mut self, entry: QuadEntry, config: &QuadtreeConfig) -> CellId {
        if self.is_leaf() {
            let should_subdivide = self.entries.len() >= config.max_objects_per_node
                && self.depth < config.max_depth.min(MAX_PATH_DEPTH)
                && self.bounds.extents().x > config.min_node_size;

            if !should_subdivide {
                self.entries.push(entry);
                return self.cell_id();
            }
            self.subdivide();
        }

        let quadrant = self.bounds.quadrant_of(entry.position);
        match self.children.as_mut() {
            Some(children) => children[quadrant].insert(entry, config),
            None => {
                self.entries.push(entry);
                self.cell_id()
            }
        }
    }

    /// Remove `key` from this node or any descendant
    fn remove(&mut self, key: ObjectKey) -> bool {
        if let Some(index) = self.entries.iter().position(|e| e.key == key) {
            self.entries.remove(index);
            return true;
        }

        if let Some(ref mut children) = self.children {
            for child in children.iter_mut() {
                if child.remove(key) {
                    return true;
                }
            }
        }

        false
    }

    /// Follow `path` for `levels` steps, then remove below that node
    ///
    /// Nodes never merge, so the node an entry was placed in is always an
    /// ancestor of (or equal to) the node holding it now.
    fn remove_along(&mut self, key: ObjectKey, levels: u32, path: u64) -> bool {
        if levels > 0 {
            if let Some(ref mut children) = self.children {
                let quadrant = ((path >> (2 * (levels - 1))) & 3) as usize;
                return children[quadrant].remove_along(key, levels - 1, path);
            }
        }
        self.remove(key)
    }

    fn query_radius(
        &self,
        center: Vec2,
        radius: f64,
        objects: &ObjectTable,
        results: &mut Vec<Entity>,
    ) {
        if !self.bounds.intersects_circle(center, radius) {
            return;
        }

        let radius_sq = radius * radius;
        for entry in &self.entries {
            if (entry.position - center).norm_squared() <= radius_sq {
                results.extend(objects.entity(entry.key));
            }
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_radius(center, radius, objects, results);
            }
        }
    }

    fn count_leaves(&self) -> usize {
        match self.children {
            Some(ref children) => children.iter().map(QuadNode::count_leaves).sum(),
            None => 1,
        }
    }
}

/// Quadtree broad phase
#[derive(Debug)]
pub struct Quadtree {
    root: QuadNode,
    overflow: Vec<QuadEntry>,
    config: QuadtreeConfig,
    objects: ObjectTable,
}

impl Quadtree {
    /// Create an empty quadtree covering `config.bounds`
    pub fn new(config: QuadtreeConfig) -> Self {
        Self {
            root: QuadNode::new(config.bounds, 0, 0),
            overflow: Vec::new(),
            config,
            objects: ObjectTable::new(),
        }
    }

    /// Quadtree configuration
    pub const fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Number of leaf nodes
    pub fn leaf_count(&self) -> usize {
        self.root.count_leaves()
    }

    /// Whether the root has split at least once
    pub const fn is_subdivided(&self) -> bool {
        !self.root.is_leaf()
    }

    fn unlink(&mut self, key: ObjectKey, cell: Option<CellId>) {
        let removed = match cell {
            Some(CellId::Overflow) => {
                let before = self.overflow.len();
                self.overflow.retain(|e| e.key != key);
                self.overflow.len() != before
            }
            Some(CellId::Quad { depth, path }) => self.root.remove_along(key, depth, path),
            _ => false,
        };
        if !removed {
            self.root.remove(key);
            self.overflow.retain(|e| e.key != key);
        }
    }

    fn link(&mut self, entry: QuadEntry) -> CellId {
        if self.root.bounds.contains_point(entry.position) {
            self.root.insert(entry, &self.config)
        } else {
            self.overflow.push(entry);
            CellId::Overflow
        }
    }
}

impl Default for Quadtree {
    fn default() -> Self {
        Self::new(QuadtreeConfig::default())
    }
}

impl SpatialIndex for Quadtree {
    fn update_object(&mut self, entity: Entity, position: Vec2) {
        let key = self.objects.entry(entity);
        if let Some(record) = self.objects.record(key) {
            if record.position.is_some() {
                let previous = record.aux.last_cell;
                self.unlink(key, previous);
            }
        }
        self.objects.set_position(key, position);
        let cell = self.link(QuadEntry { key, position });
        self.objects.set_aux(key, AuxValue::Cell(cell));
    }

    fn remove_object(&mut self, entity: Entity) -> bool {
        match self.objects.remove(entity) {
            Some((key, record)) => {
                if record.position.is_some() {
                    self.unlink(key, record.aux.last_cell);
                }
                true
            }
            None => false,
        }
    }

    fn query_pcl_into(&self, position: Vec2, out: &mut Vec<Entity>) {
        out.clear();
        let radius = self.config.query_radius;
        self.root.query_radius(position, radius, &self.objects, out);

        let radius_sq = radius * radius;
        for entry in &self.overflow {
            if (entry.position - position).norm_squared() <= radius_sq {
                out.extend(self.objects.entity(entry.key));
            }
        }
    }

    fn get_aux(&self, entity: Entity, key: AuxKey) -> Option<AuxValue> {
        self.objects.record_of(entity)?.aux.get(key)
    }

    fn set_aux(&mut self, entity: Entity, value: AuxValue) {
        let key = self.objects.entry(entity);
        self.objects.set_aux(key, value);
    }

    fn contains(&self, entity: Entity) -> bool {
        self.position_of(entity).is_some()
    }

    fn position_of(&self, entity: Entity) -> Option<Vec2> {
        self.objects.record_of(entity)?.position
    }

    fn object_count(&self) -> usize {
        self.objects.placed()
    }

    fn clear(&mut self) {
        self.root = QuadNode::new(self.config.bounds, 0, 0);
        self.overflow.clear();
        self.objects.clear();
    }
}
