//! Generation settings.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! JSON file only needs to name what it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{GenerationError, Result};
use crate::mst::EdgeOrder;

/// How the spanning tree stage picks the corridors to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Spanning tree only
    Minimal,
    /// Spanning tree plus some cycle-forming edges
    #[default]
    Natural,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub room_count: usize,
    /// Rooms are scattered around this point; it is also the separation anchor
    pub spawn_center: Vec3,
    pub spawn_radius: f32,
    pub plane_height: f32,

    pub footprint_min: u32,
    pub footprint_max: u32,
    pub footprint_unit: f32,
    pub height_min: u32,
    pub height_max: u32,

    pub main_room_threshold: u32,
    pub main_room_chance: f64,
    pub discard_chance: f64,

    pub separation_step: f32,
    pub distance_step: f32,
    pub min_distance: f32,
    /// `None` lets settling stages run until they converge
    pub max_settle_iterations: Option<u32>,

    pub connectivity: Connectivity,
    pub edge_order: EdgeOrder,
    pub reintroduce_chance: f64,

    /// Seconds to pause after the triangle and tree stages
    pub wait_duration: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            room_count: DUNGEON_ROOM_COUNT,
            spawn_center: Vec3::new(0.0, 0.0, DUNGEON_PLANE_HEIGHT),
            spawn_radius: DUNGEON_SPAWN_RADIUS,
            plane_height: DUNGEON_PLANE_HEIGHT,
            footprint_min: DUNGEON_FOOTPRINT_MIN,
            footprint_max: DUNGEON_FOOTPRINT_MAX,
            footprint_unit: DUNGEON_FOOTPRINT_UNIT,
            height_min: DUNGEON_HEIGHT_MIN,
            height_max: DUNGEON_HEIGHT_MAX,
            main_room_threshold: MAIN_ROOM_SCALE_THRESHOLD,
            main_room_chance: MAIN_ROOM_CHANCE,
            discard_chance: MAIN_ROOM_DISCARD_CHANCE,
            separation_step: SEPARATION_STEP,
            distance_step: DISTANCE_STEP,
            min_distance: MIN_ROOM_DISTANCE,
            max_settle_iterations: Some(MAX_SETTLE_ITERATIONS),
            connectivity: Connectivity::default(),
            edge_order: EdgeOrder::default(),
            reintroduce_chance: REINTRODUCE_CHANCE,
            wait_duration: WAIT_DURATION,
        }
    }
}

impl GenerationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the stages cannot work with.
    pub fn validate(&self) -> Result<()> {
        let fault = |msg: String| -> Result<()> { Err(GenerationError::ConfigurationFault(msg)) };

        if !(self.spawn_radius.is_finite() && self.spawn_radius > 0.0) {
            return fault(format!("spawn_radius must be positive, got {}", self.spawn_radius));
        }
        if self.footprint_min == 0 || self.footprint_min > self.footprint_max {
            return fault(format!(
                "footprint range [{}, {}] must be non-empty and positive",
                self.footprint_min, self.footprint_max
            ));
        }
        if self.height_min > self.height_max {
            return fault(format!(
                "height range [{}, {}] is empty",
                self.height_min, self.height_max
            ));
        }
        if !(self.footprint_unit.is_finite() && self.footprint_unit > 0.0) {
            return fault(format!("footprint_unit must be positive, got {}", self.footprint_unit));
        }
        for (name, chance) in [
            ("main_room_chance", self.main_room_chance),
            ("discard_chance", self.discard_chance),
            ("reintroduce_chance", self.reintroduce_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return fault(format!("{name} must be within [0, 1], got {chance}"));
            }
        }
        for (name, value) in [
            ("separation_step", self.separation_step),
            ("distance_step", self.distance_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return fault(format!("{name} must be positive, got {value}"));
            }
        }
        if !(self.min_distance.is_finite() && self.min_distance >= 0.0) {
            return fault(format!("min_distance must not be negative, got {}", self.min_distance));
        }
        if !(self.wait_duration.is_finite() && self.wait_duration >= 0.0) {
            return fault(format!("wait_duration must not be negative, got {}", self.wait_duration));
        }
        Ok(())
    }
}
