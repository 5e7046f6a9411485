//! Leaf utility crate: positional newtypes, math primitives, binary
//! serialization helpers, deterministic RNG, and lock type aliases shared by
//! every other crate in the workspace.

pub mod locks;
pub mod math;
pub mod nibble;
pub mod random;
pub mod serial;
pub mod types;

pub use math::{Aabb, Axis, Vector2, Vector3};
pub use nibble::NibbleArray;
pub use serial::{ReadFrom, VarInt, WriteTo};
pub use types::{BlockPos, ChunkPos, RegionPos};
