use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Position component - room center in world coordinates (only X/Y matter for layout)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(point: Vec3) -> Self {
        Self(point)
    }

    pub fn planar(&self) -> Vec2 {
        self.0.truncate()
    }
}

/// Footprint component - room size in footprint units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub depth: u32,
    /// Decorative only, never used for layout
    pub height: u32,
}

impl Footprint {
    pub fn new(width: u32, depth: u32, height: u32) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Size measure used by main room selection
    pub fn scale(&self) -> u32 {
        self.width + self.depth
    }

    /// Planar extents in world units
    pub fn size(&self, unit: f32) -> Vec2 {
        Vec2::new(self.width as f32, self.depth as f32) * unit
    }

    pub fn half_extents(&self, unit: f32) -> Vec2 {
        self.size(unit) * 0.5
    }
}

/// Classification flags set by the pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomFlags {
    /// Survived main room selection
    pub is_main: bool,
    /// Subject to the current settling stage
    pub to_move: bool,
}

impl RoomFlags {
    pub fn moving() -> Self {
        Self {
            is_main: false,
            to_move: true,
        }
    }
}

/// Read-only view of a room as stored by a host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub position: Vec3,
    pub footprint: Footprint,
    pub flags: RoomFlags,
}

impl Room {
    pub fn center(&self) -> Vec2 {
        self.position.truncate()
    }
}
