//! Tick-driven generation pipeline.
//!
//! One stage advances per tick. The two settling stages repeat until their
//! rooms stop moving, and the drawing stages pause in `Waiting` so the debug
//! lines stay visible for a while before the next stage replaces them.

mod generator;
mod state;

pub use generator::DungeonGenerator;
pub use state::{Connection, PipelineState, Stage};
