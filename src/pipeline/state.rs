//! Pipeline stages and the data carried between them.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::delaunay::Triangle;
use crate::geometry::Point2D;
use crate::hallways::Hallway;
use crate::host::RoomHandle;
use crate::mst::Edge;

/// Generation stages, in the order the pipeline visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    SpawnRooms,
    SeparateRooms,
    HighlightMainRooms,
    DistantiateRooms,
    DrawDelTriangles,
    DrawMinSpanTree,
    DrawHallWays,
    /// Pause before `PipelineState::resume_stage`
    Waiting,
    /// Finished, or halted after a failure
    None,
}

impl Stage {
    /// Stages that repeat every tick until their rooms stop moving
    pub fn is_settling(self) -> bool {
        matches!(self, Stage::SeparateRooms | Stage::DistantiateRooms)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SpawnRooms => "spawn rooms",
            Stage::SeparateRooms => "separate rooms",
            Stage::HighlightMainRooms => "highlight main rooms",
            Stage::DistantiateRooms => "distantiate rooms",
            Stage::DrawDelTriangles => "draw triangles",
            Stage::DrawMinSpanTree => "draw spanning tree",
            Stage::DrawHallWays => "draw hallways",
            Stage::Waiting => "waiting",
            Stage::None => "none",
        };
        f.write_str(name)
    }
}

/// A spanning-tree edge resolved back to the rooms at its ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: RoomHandle,
    pub to: RoomHandle,
    pub edge: Edge,
}

/// Everything the pipeline knows about the run in progress
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub stage: Stage,
    /// Where `Waiting` hands over once the pause is over
    pub resume_stage: Option<Stage>,
    pub wait_elapsed: f32,
    /// Ticks spent in the current settling stage
    pub settle_iterations: u32,

    /// Live rooms in spawn order
    pub rooms: Vec<RoomHandle>,
    pub main_rooms: Vec<RoomHandle>,

    /// Main room centers captured right before triangulation
    pub room_locations: HashMap<Point2D, RoomHandle>,
    /// Triangulation input, in main room order
    pub points: Vec<Vec2>,
    pub triangles: Vec<Triangle>,
    pub connections: Vec<Connection>,
    pub hallways: Vec<Hallway>,

    /// Ticks that did work since the last restart
    pub ticks: u64,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to `SpawnRooms` with nothing recorded
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::None
    }

    /// Room standing at a captured location
    pub fn room_at(&self, point: Point2D) -> Option<RoomHandle> {
        self.room_locations.get(&point).copied()
    }
}
