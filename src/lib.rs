//! Procedural dungeon layout generation.
//!
//! Rooms are scattered in a disc, pushed apart until nothing overlaps, thinned
//! down to a set of main rooms and spread to a minimum distance. The main room
//! centers are then triangulated, reduced to a spanning tree (optionally with a
//! few cycles put back) and every remaining edge becomes an L-shaped hallway.
//!
//! [`DungeonGenerator`] runs these stages one tick at a time against any
//! [`RoomHost`]; [`RoomArena`] is the in-memory host.

pub mod arena;
pub mod components;
pub mod config;
pub mod constants;
pub mod debug_draw;
pub mod delaunay;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hallways;
pub mod host;
pub mod layout;
pub mod mst;
pub mod pipeline;
pub mod raster;
pub mod sampler;
pub mod selection;
pub mod separation;
pub mod spatial_index;
pub mod spawning;

pub use arena::{RoomArena, RoomTemplate};
pub use config::{Connectivity, GenerationConfig};
pub use debug_draw::DebugLines;
pub use error::{GenerationError, Result};
pub use events::GenerationEvent;
pub use host::{NullSink, RoomHandle, RoomHost, SegmentSink};
pub use layout::DungeonLayout;
pub use mst::EdgeOrder;
pub use pipeline::{DungeonGenerator, Stage};
