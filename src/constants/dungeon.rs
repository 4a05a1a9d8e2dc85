//! Room spawning and selection constants.

/// Number of candidate rooms spawned per generation run
pub const DUNGEON_ROOM_COUNT: usize = 30;
/// Radius of the disc rooms are scattered in (world units)
pub const DUNGEON_SPAWN_RADIUS: f32 = 500.0;
/// Height of the plane all rooms sit on
pub const DUNGEON_PLANE_HEIGHT: f32 = 0.0;
/// Smallest footprint width/depth (footprint units)
pub const DUNGEON_FOOTPRINT_MIN: u32 = 4;
/// Largest footprint width/depth (footprint units)
pub const DUNGEON_FOOTPRINT_MAX: u32 = 12;
/// World units per footprint unit
pub const DUNGEON_FOOTPRINT_UNIT: f32 = 10.0;
/// Decorative room height range (footprint units)
pub const DUNGEON_HEIGHT_MIN: u32 = 0;
pub const DUNGEON_HEIGHT_MAX: u32 = 10;

/// Rooms whose width + depth exceeds this may be promoted to main rooms
pub const MAIN_ROOM_SCALE_THRESHOLD: u32 = 14;
/// Chance a room above the threshold is promoted
pub const MAIN_ROOM_CHANCE: f64 = 0.25;
/// Chance a room that was not promoted gets destroyed (the rest survive as main rooms)
pub const MAIN_ROOM_DISCARD_CHANCE: f64 = 0.8;
