//! Pathfinding and navigation (§4.6, §4.7).

pub mod astar;
pub mod grid;
pub mod heap;
pub mod navigator;
pub mod point;

pub use astar::{find_path, Path, PathfinderConfig};
pub use grid::{PathGrid, PathBlockType};
pub use navigator::{clamp_yaw_delta, MoveCommand, Navigator, NavigatorConfig};
pub use point::{make_hash, PathPoint};
