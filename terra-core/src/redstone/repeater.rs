//! Repeaters: directional delay amplifiers (§4.8 "Repeater").

use terra_utils::BlockPos;

use super::direction::Direction;
use super::grid::{RedstoneDevice, RedstoneGrid};

/// Output power a lit repeater always provides (§4.8 "always 15 when on").
pub const OUTPUT_POWER: u8 = 15;

/// Decodes the 1-4 tick delay from the metadata's delay bits
/// (`(meta >> 2) & 0x3) + 1`, §4.8 "Metadata encodes a 1-4 tick delay").
#[must_use]
pub const fn delay_ticks(metadata: u8) -> u8 {
    ((metadata >> 2) & 0x3) + 1
}

/// A repeater is locked if an adjacent repeater facing perpendicularly into
/// it is currently powered on (§4.8 "then it ignores input changes until
/// unlocked").
#[must_use]
pub fn is_locked(grid: &dyn RedstoneGrid, pos: BlockPos, facing: Direction) -> bool {
    for side in Direction::HORIZONTAL {
        if !side.is_perpendicular_to(facing) {
            continue;
        }
        let neighbour = side.apply(pos);
        if let RedstoneDevice::Repeater {
            facing: neighbour_facing,
            lit: true,
        } = grid.device(neighbour)
        {
            if neighbour_facing == side.opposite() {
                return true;
            }
        }
    }
    false
}

/// Whether the input side (opposite the repeater's facing) is currently
/// powered, the trigger that schedules the delayed flip.
#[must_use]
pub fn has_input_power(grid: &dyn RedstoneGrid, pos: BlockPos, facing: Direction) -> bool {
    let input_side = facing.opposite();
    let neighbour = input_side.apply(pos);
    match grid.device(neighbour) {
        RedstoneDevice::Wire => grid.power(neighbour) > 0,
        RedstoneDevice::Torch { lit } => lit,
        RedstoneDevice::SourceBlock => true,
        RedstoneDevice::Repeater {
            facing: neighbour_facing,
            lit,
        } => lit && neighbour_facing == input_side.opposite(),
        RedstoneDevice::Comparator {
            facing: neighbour_facing,
            lit,
        } => lit && neighbour_facing == input_side.opposite(),
        RedstoneDevice::None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_delay_from_metadata_bits() {
        assert_eq!(delay_ticks(0b0000), 1);
        assert_eq!(delay_ticks(0b0100), 2);
        assert_eq!(delay_ticks(0b1000), 3);
        assert_eq!(delay_ticks(0b1100), 4);
    }
}
