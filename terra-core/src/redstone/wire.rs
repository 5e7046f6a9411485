//! Wire signal propagation (§4.8 "Wire propagation").

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use terra_utils::BlockPos;

use super::direction::Direction;
use super::grid::{RedstoneDevice, RedstoneGrid};

const MAX_POWER: u8 = 15;

/// The strongest power a wire at `pos` can see from its neighbours, per
/// §4.8: horizontal wire neighbours decayed by 1, wire connected
/// diagonally through a non-solid block, and directly adjacent source
/// blocks (torches, redstone blocks, repeaters facing in) at full power.
fn incoming_power(grid: &dyn RedstoneGrid, pos: BlockPos) -> u8 {
    let mut max_power = 0u8;

    for direction in Direction::HORIZONTAL {
        let neighbour = direction.apply(pos);
        match grid.device(neighbour) {
            RedstoneDevice::Wire => {
                max_power = max_power.max(grid.power(neighbour).saturating_sub(1));
            }
            RedstoneDevice::Torch { lit: true } | RedstoneDevice::SourceBlock => {
                max_power = MAX_POWER;
            }
            RedstoneDevice::Repeater {
                facing,
                lit: true,
            } if facing == direction.opposite() => {
                // The repeater points *toward* the wire iff its facing is
                // the opposite of the direction we walked to reach it.
                max_power = MAX_POWER;
            }
            _ => {}
        }

        // Wire-over-stair: a wire one block above a solid neighbour, or one
        // block below a non-solid neighbour, still connects (§4.8).
        if grid.is_solid(neighbour) {
            let above = neighbour.up();
            if grid.device(above) == RedstoneDevice::Wire {
                max_power = max_power.max(grid.power(above).saturating_sub(1));
            }
        } else {
            let below = neighbour.down();
            if grid.device(below) == RedstoneDevice::Wire {
                max_power = max_power.max(grid.power(below).saturating_sub(1));
            }
        }
    }

    max_power
}

/// Propagates a power change outward from `start` until the wire network
/// reaches a fixed point (§4.8 "Propagation is recursive ... until fixed
/// point"). Returns every wire cell whose power changed, in update order.
pub fn propagate(grid: &mut dyn RedstoneGrid, start: BlockPos) -> Vec<(BlockPos, u8)> {
    let mut changed = Vec::new();
    let mut queue: VecDeque<BlockPos> = VecDeque::new();
    let mut queued: FxHashSet<BlockPos> = FxHashSet::default();

    queue.push_back(start);
    queued.insert(start);

    while let Some(pos) = queue.pop_front() {
        queued.remove(&pos);
        if grid.device(pos) != RedstoneDevice::Wire {
            continue;
        }

        let new_power = incoming_power(grid, pos);
        let old_power = grid.power(pos);
        if new_power == old_power {
            continue;
        }

        grid.set_power(pos, new_power);
        changed.push((pos, new_power));

        for direction in Direction::HORIZONTAL {
            let neighbour = direction.apply(pos);
            if grid.device(neighbour) == RedstoneDevice::Wire && queued.insert(neighbour) {
                queue.push_back(neighbour);
            }
        }
        let above = pos.up();
        if grid.device(above) == RedstoneDevice::Wire && queued.insert(above) {
            queue.push_back(above);
        }
        let below = pos.down();
        if grid.device(below) == RedstoneDevice::Wire && queued.insert(below) {
            queue.push_back(below);
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct TestGrid {
        devices: FxHashMap<BlockPos, RedstoneDevice>,
        powers: FxHashMap<BlockPos, u8>,
    }

    impl RedstoneGrid for TestGrid {
        fn device(&self, pos: BlockPos) -> RedstoneDevice {
            self.devices.get(&pos).copied().unwrap_or(RedstoneDevice::None)
        }
        fn power(&self, pos: BlockPos) -> u8 {
            self.powers.get(&pos).copied().unwrap_or(0)
        }
        fn set_power(&mut self, pos: BlockPos, power: u8) {
            self.powers.insert(pos, power);
        }
        fn is_solid(&self, _pos: BlockPos) -> bool {
            false
        }
    }

    #[test]
    fn decays_one_per_block_from_a_source() {
        let mut grid = TestGrid::default();
        let source = BlockPos::new(0, 1, 0);
        grid.devices.insert(source, RedstoneDevice::SourceBlock);
        for i in 1..=5 {
            grid.devices.insert(BlockPos::new(i, 1, 0), RedstoneDevice::Wire);
        }

        propagate(&mut grid, BlockPos::new(1, 1, 0));
        // Re-propagate downstream wires after the first cell settles, as a
        // real engine would on each changed neighbour.
        for i in 1..=4 {
            propagate(&mut grid, BlockPos::new(i, 1, 0));
        }

        assert_eq!(grid.power(BlockPos::new(1, 1, 0)), 15);
        assert_eq!(grid.power(BlockPos::new(2, 1, 0)), 14);
        assert_eq!(grid.power(BlockPos::new(5, 1, 0)), 11);
    }

    #[test]
    fn unpowered_wire_settles_at_zero() {
        let mut grid = TestGrid::default();
        grid.devices.insert(BlockPos::new(0, 1, 0), RedstoneDevice::Wire);
        let changed = propagate(&mut grid, BlockPos::new(0, 1, 0));
        assert!(changed.is_empty());
        assert_eq!(grid.power(BlockPos::new(0, 1, 0)), 0);
    }
}
