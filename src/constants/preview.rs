//! Debug line and preview image constants.

use glam::Vec3;

/// Triangulation edges
pub const TRIANGLE_LINE_COLOR: Vec3 = Vec3::new(0.2, 0.6, 1.0);
/// Spanning tree (and reintroduced) edges
pub const TREE_LINE_COLOR: Vec3 = Vec3::new(0.1, 0.9, 0.3);
/// Hallway legs
pub const HALLWAY_LINE_COLOR: Vec3 = Vec3::new(1.0, 0.8, 0.2);

/// Preview image edge length in pixels
pub const PREVIEW_SIZE: u32 = 1024;
/// Blank border around the layout in pixels
pub const PREVIEW_MARGIN: u32 = 32;
/// Background fill
pub const PREVIEW_BACKGROUND: [u8; 3] = [16, 16, 24];
/// Fill for main rooms
pub const PREVIEW_MAIN_ROOM: [u8; 3] = [180, 70, 60];
/// Fill for rooms that were kept but never promoted
pub const PREVIEW_ROOM: [u8; 3] = [70, 70, 90];
