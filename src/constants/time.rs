//! Pipeline timing constants.

/// Seconds the pipeline pauses after drawing triangles and the spanning tree
pub const WAIT_DURATION: f32 = 1.0;
/// Default tick length used by the headless runner (seconds)
pub const DEFAULT_TICK: f32 = 1.0 / 60.0;
/// Upper bound on ticks for a headless run
pub const MAX_RUN_TICKS: u64 = 100_000;
