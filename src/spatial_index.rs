//! Uniform grid index for room overlap lookups.
//!
//! Maintains persistent cell buckets that are updated incrementally when
//! rooms move, spawn, or are destroyed rather than rebuilt on every query.

use std::collections::{BTreeSet, HashMap};

use hecs::Entity;

use crate::geometry::Aabb;

type Cell = (i32, i32);

/// Cached footprint bounds bucketed by grid cell.
#[derive(Debug, Clone)]
pub struct OverlapIndex {
    cell_size: f32,

    /// Cell -> rooms whose bounds touch the cell
    cells: HashMap<Cell, Vec<Entity>>,

    /// Room -> bounds, needed to find its cells again on update/removal
    bounds: HashMap<Entity, Aabb>,
}

impl OverlapIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: HashMap::new(),
            bounds: HashMap::new(),
        }
    }

    /// Start tracking a room.
    pub fn register(&mut self, entity: Entity, bounds: Aabb) {
        if self.bounds.contains_key(&entity) {
            self.remove(entity);
        }
        for cell in self.cells_for(&bounds) {
            self.cells.entry(cell).or_default().push(entity);
        }
        self.bounds.insert(entity, bounds);
    }

    /// Move a tracked room to new bounds.
    pub fn update(&mut self, entity: Entity, bounds: Aabb) {
        let Some(old) = self.bounds.get(&entity).copied() else {
            return; // Not tracked
        };
        if self.cells_for(&old) == self.cells_for(&bounds) {
            self.bounds.insert(entity, bounds);
            return;
        }
        self.remove(entity);
        self.register(entity, bounds);
    }

    /// Stop tracking a room.
    pub fn remove(&mut self, entity: Entity) {
        let Some(bounds) = self.bounds.remove(&entity) else {
            return;
        };
        for cell in self.cells_for(&bounds) {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                bucket.retain(|&e| e != entity);
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.bounds.clear();
    }

    #[inline]
    pub fn bounds(&self, entity: Entity) -> Option<Aabb> {
        self.bounds.get(&entity).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Rooms whose bounds strictly intersect `area`, in handle order.
    pub fn query(&self, area: &Aabb, exclude: Option<Entity>) -> Vec<Entity> {
        let mut hits = BTreeSet::new();
        for cell in self.cells_for(area) {
            let Some(bucket) = self.cells.get(&cell) else {
                continue;
            };
            for &entity in bucket {
                if Some(entity) == exclude {
                    continue;
                }
                if let Some(other) = self.bounds.get(&entity) {
                    if other.intersects(area) {
                        hits.insert(entity);
                    }
                }
            }
        }
        hits.into_iter().collect()
    }

    fn cells_for(&self, bounds: &Aabb) -> Vec<Cell> {
        let min_x = (bounds.min.x / self.cell_size).floor() as i32;
        let min_y = (bounds.min.y / self.cell_size).floor() as i32;
        let max_x = (bounds.max.x / self.cell_size).floor() as i32;
        let max_y = (bounds.max.y / self.cell_size).floor() as i32;

        let mut cells = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                cells.push((x, y));
            }
        }
        cells
    }
}
