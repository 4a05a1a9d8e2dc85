//! Collaborator interfaces the generator drives.
//!
//! The pipeline never owns room storage or drawing itself. A host supplies
//! room creation, overlap queries and movement; a sink receives debug lines.

use glam::Vec3;

use crate::components::{Footprint, Room, RoomFlags};
use crate::error::Result;

/// Stable handle to a room. Handles of destroyed rooms are never reused for
/// another live room, so a stale handle always fails instead of aliasing.
pub type RoomHandle = hecs::Entity;

/// Room storage and spatial queries provided by the host environment.
///
/// Every operation on a destroyed or unknown handle must return
/// [`GenerationError::StaleRoom`](crate::error::GenerationError::StaleRoom).
pub trait RoomHost {
    fn create_room(&mut self, position: Vec3, footprint: Footprint) -> Result<RoomHandle>;

    fn destroy_room(&mut self, room: RoomHandle) -> Result<()>;

    /// Rooms whose footprint currently intersects `room`'s, in a stable order.
    fn get_overlapping(&self, room: RoomHandle) -> Result<Vec<RoomHandle>>;

    fn translate(&mut self, room: RoomHandle, offset: Vec3) -> Result<()>;

    fn get_position(&self, room: RoomHandle) -> Result<Vec3>;

    fn room(&self, room: RoomHandle) -> Result<Room>;

    fn set_flags(&mut self, room: RoomHandle, flags: RoomFlags) -> Result<()>;

    /// World units per footprint unit
    fn footprint_unit(&self) -> f32;

    fn footprint(&self, room: RoomHandle) -> Result<Footprint> {
        self.room(room).map(|r| r.footprint)
    }

    fn flags(&self, room: RoomHandle) -> Result<RoomFlags> {
        self.room(room).map(|r| r.flags)
    }

    fn update_flags(&mut self, room: RoomHandle, f: impl FnOnce(&mut RoomFlags)) -> Result<()>
    where
        Self: Sized,
    {
        let mut flags = self.flags(room)?;
        f(&mut flags);
        self.set_flags(room, flags)
    }
}

/// Receiver for fire-and-forget line drawing requests.
pub trait SegmentSink {
    fn draw_segment(&mut self, p0: Vec3, p1: Vec3, color: Vec3, persistent: bool, duration: f32);
}

/// Sink that drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SegmentSink for NullSink {
    fn draw_segment(&mut self, _: Vec3, _: Vec3, _: Vec3, _: bool, _: f32) {}
}
