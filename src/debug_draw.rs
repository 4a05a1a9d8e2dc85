//! Recorded debug lines (triangulation, tree edges, hallways).
//!
//! These are separate from room state - they're pushed by the pipeline,
//! aged every tick and removed without affecting generation.

use glam::Vec3;

use crate::events::GenerationEvent;
use crate::host::SegmentSink;
use crate::pipeline::Stage;

/// A line segment drawn by the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Vec3,
    /// Persistent lines ignore their timer
    pub persistent: bool,
    pub timer: f32,    // Time remaining
    pub duration: f32, // Total lifetime (for fading)
}

impl DebugLine {
    pub fn new(start: Vec3, end: Vec3, color: Vec3, persistent: bool, duration: f32) -> Self {
        Self {
            start,
            end,
            color,
            persistent,
            timer: duration,
            duration,
        }
    }

    /// Remaining life from 1.0 (just drawn) to 0.0 (expired); persistent lines stay at 1.0
    pub fn remaining(&self) -> f32 {
        if self.persistent || self.duration <= 0.0 {
            1.0
        } else {
            (self.timer / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_expired(&self) -> bool {
        !self.persistent && self.timer <= 0.0
    }

    /// Age the line, returns true if still alive
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.persistent {
            self.timer -= dt;
        }
        !self.is_expired()
    }
}

/// Buffer of every live debug line
#[derive(Debug, Default)]
pub struct DebugLines {
    lines: Vec<DebugLine>,
}

impl DebugLines {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Age all lines, removing expired ones
    pub fn update(&mut self, dt: f32) {
        self.lines.retain_mut(|line| line.update(dt));
    }

    pub fn iter(&self) -> impl Iterator<Item = &DebugLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// React to a pipeline event
    pub fn handle_event(&mut self, event: &GenerationEvent) {
        if let GenerationEvent::StageEntered {
            stage: Stage::SpawnRooms,
        } = event
        {
            // A new run starts from a clean slate
            self.clear();
        }
    }
}

impl SegmentSink for DebugLines {
    fn draw_segment(&mut self, p0: Vec3, p1: Vec3, color: Vec3, persistent: bool, duration: f32) {
        self.lines
            .push(DebugLine::new(p0, p1, color, persistent, duration));
    }
}
