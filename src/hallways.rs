//! L-shaped corridors between connected rooms.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::Segment;
use crate::host::SegmentSink;
use crate::mst::Edge;

/// Two legs meeting at the corner `(b.x, a.y)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hallway {
    pub horizontal: Segment,
    pub vertical: Segment,
}

impl Hallway {
    pub fn corner(&self) -> Vec2 {
        self.horizontal.end
    }

    pub fn length(&self) -> f32 {
        self.horizontal.length() + self.vertical.length()
    }
}

/// Corridor from `a` to `b`: a horizontal leg out of `a` and a vertical leg out of `b`.
pub fn synthesize(a: Vec2, b: Vec2) -> Hallway {
    let x_diff = b.x - a.x;
    let y_diff = a.y - b.y;
    Hallway {
        horizontal: Segment::new(a, Vec2::new(a.x + x_diff, a.y)),
        vertical: Segment::new(b, Vec2::new(b.x, b.y + y_diff)),
    }
}

pub fn synthesize_all(edges: &[Edge]) -> Vec<Hallway> {
    edges
        .iter()
        .map(|e| synthesize(e.a.to_vec2(), e.b.to_vec2()))
        .collect()
}

/// Send both legs of every hallway to `sink` as persistent lines.
pub fn draw_hallways(sink: &mut dyn SegmentSink, hallways: &[Hallway], plane_height: f32, color: Vec3) {
    for hallway in hallways {
        for leg in [hallway.horizontal, hallway.vertical] {
            let (p0, p1) = leg.to_world(plane_height);
            sink.draw_segment(p0, p1, color, true, 0.0);
        }
    }
}
