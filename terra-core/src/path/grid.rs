//! The block-grid query surface the pathfinder expands neighbours against
//! (§4.6 "Standability classes").
//!
//! The full block registry is an external collaborator (§1); this crate
//! only needs the seven-way classification terra-registry already carries
//! as [`PathBlockType`], which the caller (backed by the real world +
//! registry) supplies through the [`PathGrid`] trait.

pub use terra_registry::PathBlockType;
use terra_utils::BlockPos;

/// Pathfinder-specific queries over [`PathBlockType`] that don't belong on
/// the registry type itself (§4.6).
pub trait PathBlockTypeExt {
    /// Whether an entity can occupy this cell at all.
    fn is_walkable(self, avoid_water: bool) -> bool;

    /// Whether stepping up into this cell from one block below is allowed
    /// (§4.6 "`fence_gate`, `trapdoor` are signals forbidding step-up").
    fn allows_step_up(self) -> bool;
}

impl PathBlockTypeExt for PathBlockType {
    fn is_walkable(self, avoid_water: bool) -> bool {
        match self {
            Self::Blocked | Self::Lava => false,
            Self::Water => !avoid_water,
            Self::Passable | Self::Open | Self::FenceGate | Self::Trapdoor => true,
        }
    }

    fn allows_step_up(self) -> bool {
        !matches!(self, Self::FenceGate | Self::Trapdoor)
    }
}

/// The block-grid surface the A* search and navigator query; implemented by
/// the real world + block registry outside this crate.
pub trait PathGrid {
    /// The standability classification of the cell at `pos`.
    fn node_type(&self, pos: BlockPos) -> PathBlockType;

    /// Whether the cell at `pos` is air/non-solid (used by the drop search
    /// and the step-up check).
    fn is_clear(&self, pos: BlockPos) -> bool;
}
