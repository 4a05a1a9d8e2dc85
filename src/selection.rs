//! Main room selection.
//!
//! Large rooms are promoted at a fixed chance. Everything else is usually
//! destroyed, but a fraction survives as a main room anyway, which keeps the
//! final layouts from looking uniform.

use rand::Rng;

use crate::config::GenerationConfig;
use crate::error::{GenerationError, Result};
use crate::host::{RoomHandle, RoomHost};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    /// Scale (width + depth) a room must exceed to be considered large
    pub threshold: u32,
    /// Chance a large room is promoted
    pub main_chance: f64,
    /// Chance a room that was not promoted is destroyed
    pub discard_chance: f64,
}

impl SelectionPolicy {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            threshold: config.main_room_threshold,
            main_chance: config.main_room_chance,
            discard_chance: config.discard_chance,
        }
    }

    /// Both chances must be probabilities.
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("main_chance", self.main_chance),
            ("discard_chance", self.discard_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GenerationError::ConfigurationFault(format!(
                    "selection {name} must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// Result of one selection pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionOutcome {
    /// Surviving rooms, all flagged main, in input order
    pub main_rooms: Vec<RoomHandle>,
    pub destroyed: usize,
}

/// Classify every room in `rooms`, destroying the ones that are dropped.
///
/// An invalid `policy` is rejected before any room is touched.
pub fn select_main_rooms(
    host: &mut impl RoomHost,
    rooms: &[RoomHandle],
    rng: &mut impl Rng,
    policy: &SelectionPolicy,
) -> Result<SelectionOutcome> {
    puffin::profile_function!();

    policy.validate()?;
    let mut outcome = SelectionOutcome::default();

    for &room in rooms {
        let scale = host.footprint(room)?.scale();
        let promoted = scale > policy.threshold && rng.gen_bool(policy.main_chance);

        if !promoted && rng.gen_bool(policy.discard_chance) {
            host.destroy_room(room)?;
            outcome.destroyed += 1;
            continue;
        }

        host.update_flags(room, |flags| flags.is_main = true)?;
        outcome.main_rooms.push(room);
    }

    log::info!(
        "selected {} main rooms, destroyed {}",
        outcome.main_rooms.len(),
        outcome.destroyed
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::RoomArena;
    use crate::components::Footprint;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arena_with(sizes: &[(u32, u32)]) -> (RoomArena, Vec<RoomHandle>) {
        let mut arena = RoomArena::new(10.0);
        let rooms = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, d))| {
                arena
                    .create_room(Vec3::new(i as f32 * 1000.0, 0.0, 0.0), Footprint::new(w, d, 0))
                    .unwrap()
            })
            .collect();
        (arena, rooms)
    }

    #[test]
    fn test_only_large_rooms_survive_strict_policy() {
        let (mut arena, rooms) = arena_with(&[(10, 10), (4, 4), (8, 7), (7, 7)]);
        let policy = SelectionPolicy {
            threshold: 14,
            main_chance: 1.0,
            discard_chance: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = select_main_rooms(&mut arena, &rooms, &mut rng, &policy).unwrap();
        assert_eq!(outcome.main_rooms, vec![rooms[0], rooms[2]]);
        assert_eq!(outcome.destroyed, 2);
        assert_eq!(arena.len(), 2);
        assert!(arena.flags(rooms[0]).unwrap().is_main);
        assert!(arena.get_position(rooms[1]).is_err());
    }

    #[test]
    fn test_nothing_destroyed_without_discard_chance() {
        let (mut arena, rooms) = arena_with(&[(4, 4), (5, 5), (12, 12)]);
        let policy = SelectionPolicy {
            threshold: 14,
            main_chance: 0.0,
            discard_chance: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = select_main_rooms(&mut arena, &rooms, &mut rng, &policy).unwrap();
        assert_eq!(outcome.main_rooms, rooms);
        assert_eq!(outcome.destroyed, 0);
        for room in rooms {
            assert!(arena.flags(room).unwrap().is_main);
        }
    }

    #[test]
    fn test_out_of_range_policy_is_rejected() {
        let (mut arena, rooms) = arena_with(&[(10, 10), (4, 4)]);
        let mut rng = StdRng::seed_from_u64(0);
        for policy in [
            SelectionPolicy { threshold: 14, main_chance: 1.5, discard_chance: 0.5 },
            SelectionPolicy { threshold: 14, main_chance: 0.5, discard_chance: -0.1 },
            SelectionPolicy { threshold: 14, main_chance: f64::NAN, discard_chance: 0.5 },
        ] {
            let err = select_main_rooms(&mut arena, &rooms, &mut rng, &policy).unwrap_err();
            assert!(err.is_configuration_fault());
        }
        assert_eq!(arena.len(), 2);
        assert!(!arena.flags(rooms[0]).unwrap().is_main);
    }

    #[test]
    fn test_default_policy_keeps_about_forty_percent_of_large_rooms() {
        let sizes = vec![(10, 10); 2_000];
        let (mut arena, rooms) = arena_with(&sizes);
        let policy = SelectionPolicy::from_config(&GenerationConfig::default());
        let mut rng = StdRng::seed_from_u64(99);

        let outcome = select_main_rooms(&mut arena, &rooms, &mut rng, &policy).unwrap();
        // 1/4 promoted plus 1/5 of the remaining 3/4
        let share = outcome.main_rooms.len() as f64 / sizes.len() as f64;
        assert!((share - 0.4).abs() < 0.05, "kept share {share}");
    }
}
