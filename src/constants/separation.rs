//! Overlap resolution and spacing constants.

/// Distance a room is nudged per overlapping peer per tick
pub const SEPARATION_STEP: f32 = 5.0;
/// Separation along X is scaled by this (rooms spread further along Y)
pub const SEPARATION_X_DAMPING: f32 = 0.5;
/// Distance a main room is nudged per violating pair per tick
pub const DISTANCE_STEP: f32 = 2.0;
/// Minimum planar distance between main room centers
pub const MIN_ROOM_DISTANCE: f32 = 150.0;
/// Ticks a settling stage may run before it is abandoned
pub const MAX_SETTLE_ITERATIONS: u32 = 10_000;
/// Cell size of the overlap index grid (world units)
pub const OVERLAP_CELL_SIZE: f32 = 64.0;
