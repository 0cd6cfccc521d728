//! Host map capabilities and an in-memory grid implementation

pub mod grid_map;
pub mod host;
pub mod path;
pub mod pathfinding;
pub mod regions;

pub use grid_map::{GridMap, Terrain};
pub use host::{Danger, MapView, PathEndMode, StructureKind, TraverseMode, TraverseParams};
pub use path::{Path, PathPool};
