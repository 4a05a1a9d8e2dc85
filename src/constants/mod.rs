//! Generator constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! These feed `GenerationConfig::default()`; runs override them through config.

mod connectivity;
mod dungeon;
mod preview;
mod separation;
mod time;

pub use connectivity::*;
pub use dungeon::*;
pub use preview::*;
pub use separation::*;
pub use time::*;
