//! Uniform grid spatial index
//!
//! Space is cut into square cells of `cell_size`. An entity's PCL is every
//! object in the 3x3 block of cells around its own cell, visited row by row
//! and, within a cell, in insertion order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::spatial_index::{AuxKey, AuxValue, CellId, ObjectKey, ObjectTable, SpatialIndex};
use crate::ecs::Entity;
use crate::foundation::math::Vec2;

/// Configuration for the uniform grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one square cell
    pub cell_size: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 64.0 }
    }
}

/// Uniform grid broad phase
#[derive(Debug)]
pub struct SpatialGrid {
    config: GridConfig,
    cells: HashMap<(i64, i64), Vec<ObjectKey>>,
    objects: ObjectTable,
}

impl SpatialGrid {
    /// Create an empty grid
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            cells: HashMap::new(),
            objects: ObjectTable::new(),
        }
    }

    /// Grid configuration
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Column and row of the cell containing `position`
    ///
    /// Coordinates beyond the `i64` range clamp to the outermost cell.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, position: Vec2) -> (i64, i64) {
        let col = (position.x / self.config.cell_size).floor() as i64;
        let row = (position.y / self.config.cell_size).floor() as i64;
        (col, row)
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    fn unlink(&mut self, key: ObjectKey, cell: (i64, i64)) {
        if let Some(bucket) = self.cells.get_mut(&cell) {
            bucket.retain(|&k| k != key);
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl SpatialIndex for SpatialGrid {
    fn update_object(&mut self, entity: Entity, position: Vec2) {
        let key = self.objects.entry(entity);
        let previous_cell = self
            .objects
            .record(key)
            .filter(|record| record.position.is_some())
            .and_then(|record| record.aux.last_cell);
        self.objects.set_position(key, position);

        let (col, row) = self.cell_of(position);
        let cell = CellId::Grid { col, row };
        if previous_cell == Some(cell) {
            return;
        }
        if let Some(CellId::Grid { col, row }) = previous_cell {
            self.unlink(key, (col, row));
        }
        self.cells.entry((col, row)).or_default().push(key);
        self.objects.set_aux(key, AuxValue::Cell(cell));
    }

    fn remove_object(&mut self, entity: Entity) -> bool {
        match self.objects.remove(entity) {
            Some((key, record)) => {
                if let Some(CellId::Grid { col, row }) = record.aux.last_cell {
                    self.unlink(key, (col, row));
                }
                true
            }
            None => false,
        }
    }

    fn query_pcl_into(&self, position: Vec2, out: &mut Vec<Entity>) {
        out.clear();
        let (col, row) = self.cell_of(position);
        for dr in -1..=1 {
            let Some(r) = row.checked_add(dr) else {
                continue;
            };
            for dc in -1..=1 {
                let Some(c) = col.checked_add(dc) else {
                    continue;
                };
                let Some(bucket) = self.cells.get(&(c, r)) else {
                    continue;
                };
                out.extend(bucket.iter().filter_map(|&key| self.objects.entity(key)));
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
        self.cells.clear();
        self.objects.clear();
    }
}
