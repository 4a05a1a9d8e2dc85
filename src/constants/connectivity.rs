//! Room graph constants.

/// Chance a cycle-forming edge is kept when building natural connectivity
pub const REINTRODUCE_CHANCE: f64 = 1.0 / 6.0;
