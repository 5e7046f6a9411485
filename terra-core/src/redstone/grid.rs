//! The world query surface the redstone engine reads and writes through
//! (§4.8), mirroring [`crate::path::PathGrid`]'s pattern of keeping the
//! block registry an external collaborator.

use terra_utils::BlockPos;

use super::direction::Direction;

/// What a cell contributes to redstone propagation (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedstoneDevice {
    /// No redstone component here.
    None,
    /// Redstone dust; carries the current power level via [`RedstoneGrid::power`].
    Wire,
    /// A torch; `lit` reflects its current inverted state.
    Torch { lit: bool },
    /// An always-on power source (block of redstone).
    SourceBlock,
    /// A repeater; `facing` is the direction it points *toward its output*.
    Repeater { facing: Direction, lit: bool },
    /// A comparator; `facing` is the direction it points toward its output.
    Comparator { facing: Direction, lit: bool },
}

/// The block-grid surface the redstone engine reads and writes through;
/// implemented by the real world + block registry outside this crate.
pub trait RedstoneGrid {
    fn device(&self, pos: BlockPos) -> RedstoneDevice;

    /// The wire power level stored at `pos` (only meaningful when
    /// `device(pos)` is [`RedstoneDevice::Wire`]).
    fn power(&self, pos: BlockPos) -> u8;

    fn set_power(&mut self, pos: BlockPos, power: u8);

    /// Whether the block at `pos` is a full opaque cube, used for the
    /// wire-over-stair diagonal connection rule (§4.8 "wires diagonally
    /// connected through non-solid blocks").
    fn is_solid(&self, pos: BlockPos) -> bool;
}
