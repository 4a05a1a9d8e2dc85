//! Serializable snapshot of a generation run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::Footprint;
use crate::error::Result;
use crate::geometry::Aabb;
use crate::hallways::Hallway;
use crate::host::{RoomHandle, RoomHost};
use crate::pipeline::PipelineState;

/// Stable numeric id for a room handle
pub fn room_id(room: RoomHandle) -> u64 {
    room.to_bits().get()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: u64,
    pub center: Vec2,
    /// World-space width and depth
    pub size: Vec2,
    pub footprint: Footprint,
    pub is_main: bool,
}

impl RoomSnapshot {
    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.center, self.size * 0.5)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub from: u64,
    pub to: u64,
    pub a: Vec2,
    pub b: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub rooms: Vec<RoomSnapshot>,
    pub triangles: Vec<[Vec2; 3]>,
    pub connections: Vec<ConnectionSnapshot>,
    pub hallways: Vec<Hallway>,
}

impl DungeonLayout {
    /// Read the live rooms from `host` and the connectivity recorded in `state`.
    pub fn capture(host: &impl RoomHost, state: &PipelineState) -> Result<Self> {
        puffin::profile_function!();

        let unit = host.footprint_unit();
        let mut rooms = Vec::with_capacity(state.rooms.len());
        for &handle in &state.rooms {
            let room = host.room(handle)?;
            rooms.push(RoomSnapshot {
                id: room_id(handle),
                center: room.center(),
                size: room.footprint.size(unit),
                footprint: room.footprint,
                is_main: room.flags.is_main,
            });
        }

        let triangles = state
            .triangles
            .iter()
            .map(|t| t.vertices().map(|i| state.points[i]))
            .collect();

        let connections = state
            .connections
            .iter()
            .map(|c| ConnectionSnapshot {
                from: room_id(c.from),
                to: room_id(c.to),
                a: c.edge.a.to_vec2(),
                b: c.edge.b.to_vec2(),
            })
            .collect();

        Ok(Self {
            rooms,
            triangles,
            connections,
            hallways: state.hallways.clone(),
        })
    }

    /// Box around every room and hallway, `None` for an empty layout
    pub fn bounds(&self) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        for room in &self.rooms {
            let b = room.bounds();
            bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
        }
        for hallway in &self.hallways {
            for p in [
                hallway.horizontal.start,
                hallway.horizontal.end,
                hallway.vertical.start,
            ] {
                bounds = Some(bounds.map_or(Aabb::new(p, p), |acc| acc.include_point(p)));
            }
        }
        bounds
    }

    pub fn main_room_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_main).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::RoomArena;
    use crate::components::RoomFlags;
    use glam::Vec3;

    #[test]
    fn test_capture_reads_rooms_from_host() {
        let mut arena = RoomArena::new(10.0);
        let a = arena
            .create_room(Vec3::new(5.0, 5.0, 0.0), Footprint::new(4, 6, 1))
            .unwrap();
        let b = arena
            .create_room(Vec3::new(100.0, 0.0, 0.0), Footprint::new(8, 8, 1))
            .unwrap();
        arena
            .set_flags(b, RoomFlags { is_main: true, to_move: false })
            .unwrap();

        let mut state = PipelineState::new();
        state.rooms = vec![a, b];

        let layout = DungeonLayout::capture(&arena, &state).unwrap();
        assert_eq!(layout.rooms.len(), 2);
        assert_eq!(layout.rooms[0].size, Vec2::new(40.0, 60.0));
        assert_eq!(layout.main_room_count(), 1);
        assert_ne!(layout.rooms[0].id, layout.rooms[1].id);

        let bounds = layout.bounds().unwrap();
        assert_eq!(bounds.min, Vec2::new(-15.0, -40.0));
        assert_eq!(bounds.max, Vec2::new(140.0, 40.0));
    }

    #[test]
    fn test_capture_fails_on_destroyed_room() {
        let mut arena = RoomArena::new(10.0);
        let a = arena.create_room(Vec3::ZERO, Footprint::new(4, 4, 0)).unwrap();
        arena.destroy_room(a).unwrap();

        let mut state = PipelineState::new();
        state.rooms = vec![a];
        assert!(DungeonLayout::capture(&arena, &state).is_err());
    }

    #[test]
    fn test_json_contains_rooms() {
        let layout = DungeonLayout {
            rooms: vec![RoomSnapshot {
                id: 7,
                center: Vec2::ZERO,
                size: Vec2::ONE,
                footprint: Footprint::new(1, 1, 0),
                is_main: true,
            }],
            ..Default::default()
        };
        let json = layout.to_json().unwrap();
        let back: DungeonLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
        assert!(DungeonLayout::default().bounds().is_none());
    }
}
