//! Settling passes: overlap separation and minimum spacing of main rooms.
//!
//! Both are fixed-point iterations. One call is one pass; the pipeline keeps
//! calling them tick after tick until a pass reports the set as settled.

use glam::{Vec2, Vec3};

use crate::constants::SEPARATION_X_DAMPING;
use crate::error::Result;
use crate::host::{RoomHandle, RoomHost};

/// Nudge `room` and every peer overlapping it apart.
///
/// Returns `true` when `room` had no overlapping peer. For each peer, the
/// room farther from `anchor` is pushed further out and the closer one is
/// pulled in, along the anchor-to-farther direction. The push is planar and
/// weaker along X.
pub fn separate_once(
    host: &mut impl RoomHost,
    room: RoomHandle,
    anchor: Vec3,
    step: f32,
) -> Result<bool> {
    let peers = host.get_overlapping(room)?;
    if peers.is_empty() {
        return Ok(true);
    }

    for peer in peers {
        let room_pos = host.get_position(room)?;
        let peer_pos = host.get_position(peer)?;

        let room_is_farther = room_pos.distance(anchor) > peer_pos.distance(anchor);
        let target = if room_is_farther { room_pos } else { peer_pos };

        // Points outward through the peer, or inward when the room is the far one
        let mut offset = planar_push(anchor, target, step);
        if room_is_farther {
            offset = -offset;
        }

        host.translate(peer, offset)?;
        host.translate(room, -offset)?;
    }

    Ok(false)
}

fn planar_push(anchor: Vec3, target: Vec3, step: f32) -> Vec3 {
    let mut dir = (target - anchor).normalize_or_zero();
    dir.z = 0.0;
    if dir.truncate().length_squared() <= f32::EPSILON {
        return Vec3::Y * step;
    }
    dir.x *= SEPARATION_X_DAMPING;
    dir * step
}

/// One pass over every ordered pair of `rooms`, pushing apart any pair whose
/// planar distance is below `min_distance`. Returns `true` when no pair was
/// too close.
pub fn enforce_min_distance(
    host: &mut impl RoomHost,
    rooms: &[RoomHandle],
    min_distance: f32,
    step: f32,
) -> Result<bool> {
    let mut settled = true;

    for &a in rooms {
        for &b in rooms {
            if a == b {
                continue;
            }
            let pa = host.get_position(a)?.truncate();
            let pb = host.get_position(b)?.truncate();
            let delta = pa - pb;
            if delta.length() >= min_distance {
                continue;
            }

            settled = false;
            let dir = delta.try_normalize().unwrap_or(Vec2::Y);
            let offset = (dir * step).extend(0.0);
            host.translate(a, offset)?;
            host.translate(b, -offset)?;
        }
    }

    Ok(settled)
}

/// Smallest planar distance between any two of `rooms`
pub fn min_pairwise_distance(host: &impl RoomHost, rooms: &[RoomHandle]) -> Result<Option<f32>> {
    let mut centers = Vec::with_capacity(rooms.len());
    for &room in rooms {
        centers.push(host.get_position(room)?.truncate());
    }

    let mut best: Option<f32> = None;
    for (i, a) in centers.iter().enumerate() {
        for b in &centers[i + 1..] {
            let d = a.distance(*b);
            best = Some(best.map_or(d, |m| m.min(d)));
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::RoomArena;
    use crate::components::Footprint;

    fn room(arena: &mut RoomArena, x: f32, y: f32, size: u32) -> RoomHandle {
        arena
            .create_room(Vec3::new(x, y, 0.0), Footprint::new(size, size, 0))
            .unwrap()
    }

    #[test]
    fn test_lone_room_is_settled() {
        let mut arena = RoomArena::new(10.0);
        let a = room(&mut arena, 0.0, 0.0, 4);
        assert!(separate_once(&mut arena, a, Vec3::ZERO, 5.0).unwrap());
    }

    #[test]
    fn test_farther_room_moves_outward() {
        let mut arena = RoomArena::new(10.0);
        let near = room(&mut arena, 0.0, 100.0, 4);
        let far = room(&mut arena, 0.0, 120.0, 4);

        assert!(!separate_once(&mut arena, near, Vec3::ZERO, 5.0).unwrap());
        assert_eq!(arena.get_position(far).unwrap(), Vec3::new(0.0, 125.0, 0.0));
        assert_eq!(arena.get_position(near).unwrap(), Vec3::new(0.0, 95.0, 0.0));

        // Same outcome when the far room drives the pass
        assert!(!separate_once(&mut arena, far, Vec3::ZERO, 5.0).unwrap());
        assert_eq!(arena.get_position(far).unwrap(), Vec3::new(0.0, 130.0, 0.0));
        assert_eq!(arena.get_position(near).unwrap(), Vec3::new(0.0, 90.0, 0.0));
    }

    #[test]
    fn test_push_along_x_is_damped() {
        let mut arena = RoomArena::new(10.0);
        let near = room(&mut arena, 100.0, 0.0, 4);
        let far = room(&mut arena, 120.0, 0.0, 4);

        separate_once(&mut arena, near, Vec3::ZERO, 5.0).unwrap();
        assert_eq!(arena.get_position(far).unwrap(), Vec3::new(122.5, 0.0, 0.0));
        assert_eq!(arena.get_position(near).unwrap(), Vec3::new(97.5, 0.0, 0.0));
    }

    #[test]
    fn test_coincident_rooms_at_anchor_still_separate() {
        let mut arena = RoomArena::new(10.0);
        let a = room(&mut arena, 0.0, 0.0, 4);
        let b = room(&mut arena, 0.0, 0.0, 4);

        separate_once(&mut arena, a, Vec3::ZERO, 5.0).unwrap();
        let pa = arena.get_position(a).unwrap();
        let pb = arena.get_position(b).unwrap();
        assert!(pa.distance(pb) > 0.0);
    }

    #[test]
    fn test_repeated_passes_settle_two_rooms() {
        let mut arena = RoomArena::new(10.0);
        let a = room(&mut arena, 10.0, 5.0, 8);
        let b = room(&mut arena, 30.0, 25.0, 6);
        let rooms = [a, b];

        let mut overlapping = arena.overlapping_pairs();
        assert_eq!(overlapping, 1);

        let mut settled = false;
        for _ in 0..1_000 {
            let mut all = true;
            for &r in &rooms {
                all &= separate_once(&mut arena, r, Vec3::ZERO, 5.0).unwrap();
            }
            let now = arena.overlapping_pairs();
            assert!(now <= overlapping);
            overlapping = now;
            if all {
                settled = true;
                break;
            }
        }

        assert!(settled);
        assert_eq!(arena.overlapping_pairs(), 0);
        assert!(separate_once(&mut arena, a, Vec3::ZERO, 5.0).unwrap());
        assert!(separate_once(&mut arena, b, Vec3::ZERO, 5.0).unwrap());
    }

    #[test]
    fn test_distance_pass_pushes_pair_apart() {
        let mut arena = RoomArena::new(10.0);
        let a = room(&mut arena, 10.0, 0.0, 1);
        let b = room(&mut arena, 0.0, 0.0, 1);

        assert!(!enforce_min_distance(&mut arena, &[a, b], 50.0, 2.0).unwrap());
        // Both ordered pairs fire in one pass
        assert_eq!(arena.get_position(a).unwrap(), Vec3::new(14.0, 0.0, 0.0));
        assert_eq!(arena.get_position(b).unwrap(), Vec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn test_distance_pass_converges_to_minimum() {
        let mut arena = RoomArena::new(10.0);
        let rooms = [
            room(&mut arena, 0.0, 0.0, 1),
            room(&mut arena, 5.0, 3.0, 1),
            room(&mut arena, -4.0, 8.0, 1),
            room(&mut arena, 2.0, -6.0, 1),
            room(&mut arena, 0.0, 0.0, 1),
        ];

        let mut settled = false;
        for _ in 0..10_000 {
            if enforce_min_distance(&mut arena, &rooms, 60.0, 2.0).unwrap() {
                settled = true;
                break;
            }
        }

        assert!(settled);
        let closest = min_pairwise_distance(&arena, &rooms).unwrap().unwrap();
        assert!(closest >= 60.0 - 1e-3, "closest pair at {closest}");
    }

    #[test]
    fn test_distance_pass_on_spread_rooms_is_noop() {
        let mut arena = RoomArena::new(10.0);
        let a = room(&mut arena, 0.0, 0.0, 1);
        let b = room(&mut arena, 100.0, 0.0, 1);

        assert!(enforce_min_distance(&mut arena, &[a, b], 50.0, 2.0).unwrap());
        assert_eq!(arena.get_position(a).unwrap(), Vec3::ZERO);
    }
}
