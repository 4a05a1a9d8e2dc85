//! Default in-memory room host.
//!
//! Rooms live in a `hecs::World` as plain component bundles; overlap queries
//! go through an [`OverlapIndex`] that is kept in sync on every move.

use glam::Vec3;
use hecs::World;

use crate::components::{Footprint, Position, Room, RoomFlags};
use crate::constants::*;
use crate::error::{GenerationError, Result};
use crate::geometry::Aabb;
use crate::host::{RoomHandle, RoomHost};
use crate::spatial_index::OverlapIndex;

/// What new rooms are stamped from. Without one, spawning is a configuration fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTemplate {
    pub name: String,
}

impl Default for RoomTemplate {
    fn default() -> Self {
        Self {
            name: "room".to_string(),
        }
    }
}

pub struct RoomArena {
    world: World,
    index: OverlapIndex,
    template: Option<RoomTemplate>,
    footprint_unit: f32,
}

impl RoomArena {
    pub fn new(footprint_unit: f32) -> Self {
        Self::with_template(Some(RoomTemplate::default()), footprint_unit)
    }

    pub fn with_template(template: Option<RoomTemplate>, footprint_unit: f32) -> Self {
        Self {
            world: World::new(),
            index: OverlapIndex::new(OVERLAP_CELL_SIZE),
            template,
            footprint_unit,
        }
    }

    pub fn set_template(&mut self, template: Option<RoomTemplate>) {
        self.template = template;
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn contains(&self, room: RoomHandle) -> bool {
        self.world.contains(room)
    }

    /// Live rooms in handle order
    pub fn handles(&self) -> Vec<RoomHandle> {
        let mut handles: Vec<RoomHandle> = self.world.iter().map(|e| e.entity()).collect();
        handles.sort();
        handles
    }

    pub fn bounds(&self, room: RoomHandle) -> Result<Aabb> {
        self.index.bounds(room).ok_or(GenerationError::StaleRoom(room))
    }

    /// Number of unordered room pairs whose footprints intersect
    pub fn overlapping_pairs(&self) -> usize {
        let mut pairs = 0;
        for room in self.handles() {
            if let Some(bounds) = self.index.bounds(room) {
                pairs += self
                    .index
                    .query(&bounds, Some(room))
                    .into_iter()
                    .filter(|&other| other > room)
                    .count();
            }
        }
        pairs
    }

    /// Destroy every room.
    pub fn clear(&mut self) {
        self.world.clear();
        self.index.clear();
    }

    fn bounds_of(&self, position: Vec3, footprint: &Footprint) -> Aabb {
        Aabb::around(position.truncate(), footprint.half_extents(self.footprint_unit))
    }
}

impl RoomHost for RoomArena {
    fn create_room(&mut self, position: Vec3, footprint: Footprint) -> Result<RoomHandle> {
        let Some(template) = &self.template else {
            return Err(GenerationError::MissingRoomTemplate);
        };
        if footprint.width == 0 || footprint.depth == 0 {
            return Err(GenerationError::ConfigurationFault(format!(
                "room footprint must be positive, got {}x{}",
                footprint.width, footprint.depth
            )));
        }

        log::trace!("stamping '{}' room at {:?}", template.name, position);
        let room = self
            .world
            .spawn((Position::new(position), footprint, RoomFlags::default()));
        let bounds = self.bounds_of(position, &footprint);
        self.index.register(room, bounds);
        Ok(room)
    }

    fn destroy_room(&mut self, room: RoomHandle) -> Result<()> {
        self.world
            .despawn(room)
            .map_err(|_| GenerationError::StaleRoom(room))?;
        self.index.remove(room);
        Ok(())
    }

    fn get_overlapping(&self, room: RoomHandle) -> Result<Vec<RoomHandle>> {
        let bounds = self.bounds(room)?;
        Ok(self.index.query(&bounds, Some(room)))
    }

    fn translate(&mut self, room: RoomHandle, offset: Vec3) -> Result<()> {
        let footprint = *self
            .world
            .get::<&Footprint>(room)
            .map_err(|_| GenerationError::StaleRoom(room))?;

        let position = {
            let mut pos = self
                .world
                .get::<&mut Position>(room)
                .map_err(|_| GenerationError::StaleRoom(room))?;
            pos.0 += offset;
            pos.0
        };

        let bounds = self.bounds_of(position, &footprint);
        self.index.update(room, bounds);
        Ok(())
    }

    fn get_position(&self, room: RoomHandle) -> Result<Vec3> {
        self.world
            .get::<&Position>(room)
            .map(|p| p.0)
            .map_err(|_| GenerationError::StaleRoom(room))
    }

    fn room(&self, room: RoomHandle) -> Result<Room> {
        let mut query = self
            .world
            .query_one::<(&Position, &Footprint, &RoomFlags)>(room)
            .map_err(|_| GenerationError::StaleRoom(room))?;
        let (pos, footprint, flags) = query.get().ok_or(GenerationError::StaleRoom(room))?;
        Ok(Room {
            position: pos.0,
            footprint: *footprint,
            flags: *flags,
        })
    }

    fn set_flags(&mut self, room: RoomHandle, flags: RoomFlags) -> Result<()> {
        let mut current = self
            .world
            .get::<&mut RoomFlags>(room)
            .map_err(|_| GenerationError::StaleRoom(room))?;
        *current = flags;
        Ok(())
    }

    fn footprint_unit(&self) -> f32 {
        self.footprint_unit
    }
}
