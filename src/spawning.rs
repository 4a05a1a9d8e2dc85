//! Candidate room spawning.
//!
//! Scatters rooms of random footprint inside the spawn disc and hands them to
//! the host. A failed spawn leaves nothing behind.

use glam::Vec3;
use rand::Rng;

use crate::components::{Footprint, RoomFlags};
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::host::{RoomHandle, RoomHost};
use crate::sampler::sample_disc;

/// Footprint ranges for one spawn pass, all inclusive
#[derive(Debug, Clone, Copy)]
pub struct RoomDef {
    pub footprint_min: u32,
    pub footprint_max: u32,
    pub height_min: u32,
    pub height_max: u32,
}

impl RoomDef {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            footprint_min: config.footprint_min,
            footprint_max: config.footprint_max,
            height_min: config.height_min,
            height_max: config.height_max,
        }
    }

    /// Draw a footprint. Height is independent of width and depth.
    pub fn roll(&self, rng: &mut impl Rng) -> Footprint {
        Footprint::new(
            rng.gen_range(self.footprint_min..=self.footprint_max),
            rng.gen_range(self.footprint_min..=self.footprint_max),
            rng.gen_range(self.height_min..=self.height_max),
        )
    }
}

/// Spawn `config.room_count` rooms flagged for separation.
///
/// On any host failure every room created by this call is destroyed again and
/// the error is returned.
pub fn spawn_rooms(
    host: &mut impl RoomHost,
    rng: &mut impl Rng,
    config: &GenerationConfig,
) -> Result<Vec<RoomHandle>> {
    puffin::profile_function!();

    let def = RoomDef::from_config(config);
    let mut spawned = Vec::with_capacity(config.room_count);

    for _ in 0..config.room_count {
        let offset = sample_disc(rng, config.spawn_radius);
        let position = Vec3::new(
            config.spawn_center.x + offset.x,
            config.spawn_center.y + offset.y,
            config.plane_height,
        );
        let footprint = def.roll(rng);

        let created = host
            .create_room(position, footprint)
            .and_then(|room| host.set_flags(room, RoomFlags::moving()).map(|_| room));

        match created {
            Ok(room) => spawned.push(room),
            Err(err) => {
                log::error!("room spawn failed after {} rooms: {err}", spawned.len());
                for room in spawned.drain(..) {
                    if let Err(cleanup) = host.destroy_room(room) {
                        log::warn!("could not roll back room {room:?}: {cleanup}");
                    }
                }
                return Err(err);
            }
        }
    }

    log::debug!("spawned {} rooms", spawned.len());
    Ok(spawned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{RoomArena, RoomTemplate};
    use crate::error::GenerationError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(room_count: usize) -> GenerationConfig {
        GenerationConfig {
            room_count,
            spawn_center: Vec3::new(100.0, -50.0, 7.0),
            plane_height: 3.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawned_rooms_respect_config() {
        let config = config(25);
        let mut arena = RoomArena::new(config.footprint_unit);
        let mut rng = StdRng::seed_from_u64(1);

        let rooms = spawn_rooms(&mut arena, &mut rng, &config).unwrap();
        assert_eq!(rooms.len(), 25);
        assert_eq!(arena.len(), 25);

        for room in rooms {
            let data = arena.room(room).unwrap();
            assert_eq!(data.position.z, 3.0);
            let offset = data.center() - config.spawn_center.truncate();
            assert!(offset.length() <= config.spawn_radius + 1e-3);
            assert!((config.footprint_min..=config.footprint_max).contains(&data.footprint.width));
            assert!((config.footprint_min..=config.footprint_max).contains(&data.footprint.depth));
            assert!(data.footprint.height <= config.height_max);
            assert!(data.flags.to_move);
            assert!(!data.flags.is_main);
        }
    }

    #[test]
    fn test_missing_template_spawns_nothing() {
        let config = config(5);
        let mut arena = RoomArena::with_template(None, config.footprint_unit);
        let mut rng = StdRng::seed_from_u64(1);

        let err = spawn_rooms(&mut arena, &mut rng, &config).unwrap_err();
        assert!(matches!(err, GenerationError::MissingRoomTemplate));
        assert!(arena.is_empty());
    }

    /// Host that runs out of capacity part way through a spawn
    struct LimitedArena {
        inner: RoomArena,
        capacity: usize,
    }

    impl RoomHost for LimitedArena {
        fn create_room(&mut self, position: Vec3, footprint: Footprint) -> Result<RoomHandle> {
            if self.inner.len() >= self.capacity {
                self.inner.set_template(None);
            }
            self.inner.create_room(position, footprint)
        }
        fn destroy_room(&mut self, room: RoomHandle) -> Result<()> {
            self.inner.destroy_room(room)
        }
        fn get_overlapping(&self, room: RoomHandle) -> Result<Vec<RoomHandle>> {
            self.inner.get_overlapping(room)
        }
        fn translate(&mut self, room: RoomHandle, offset: Vec3) -> Result<()> {
            self.inner.translate(room, offset)
        }
        fn get_position(&self, room: RoomHandle) -> Result<Vec3> {
            self.inner.get_position(room)
        }
        fn room(&self, room: RoomHandle) -> Result<crate::components::Room> {
            self.inner.room(room)
        }
        fn set_flags(&mut self, room: RoomHandle, flags: RoomFlags) -> Result<()> {
            self.inner.set_flags(room, flags)
        }
        fn footprint_unit(&self) -> f32 {
            self.inner.footprint_unit()
        }
    }

    #[test]
    fn test_partial_spawn_is_rolled_back() {
        let config = config(10);
        let mut host = LimitedArena {
            inner: RoomArena::with_template(Some(RoomTemplate::default()), 10.0),
            capacity: 4,
        };
        let mut rng = StdRng::seed_from_u64(3);

        assert!(spawn_rooms(&mut host, &mut rng, &config).is_err());
        assert!(host.inner.is_empty());
    }
}
