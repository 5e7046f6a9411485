//! Piston extension and retraction (§4.8 "Piston").

use terra_utils::BlockPos;

use super::direction::Direction;

/// Maximum chain length a piston can push (§4.8 "Push limit: 12 blocks in a
/// chain").
pub const MAX_PUSH_DISTANCE: usize = 12;

/// Blocks that can never be pushed or pulled, regardless of chain length
/// (§4.8 "`can_push` excludes obsidian, bedrock, extended piston parts, end
/// portals, tile-entity-bearing blocks").
#[must_use]
pub fn is_unpushable(block_id: u16) -> bool {
    matches!(
        block_id,
        49   // obsidian
        | 7  // bedrock
        | 36 // piston extension (moving)
        | 34 // piston head
        | 119 // end portal
        | 120 // end portal frame
        | 137 // command block
    ) || has_tile_entity(block_id)
}

/// Blocks that carry tile-entity state and can't survive being moved
/// (§4.8).
#[must_use]
pub fn has_tile_entity(block_id: u16) -> bool {
    matches!(
        block_id,
        54 | 61 | 62   // chest, furnace (lit/unlit)
        | 52 | 25 | 84 // spawner, note block, jukebox
        | 116 | 117 | 118 // enchanting table, brewing stand, cauldron
        | 130 | 138 | 144 // ender chest, beacon, skull
        | 154 | 146 // hopper, trapped chest
    )
}

/// The outcome of scanning a push chain (§4.8 "scan forward, find the chain
/// of pushable blocks").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushPlan {
    /// Nothing blocks the push; `chain` lists the blocks to move, nearest
    /// first.
    Clear { chain: Vec<BlockPos> },
    /// The chain exceeds [`MAX_PUSH_DISTANCE`] or hits an unpushable block.
    Blocked,
}

/// Scans forward from the piston base along `facing`, collecting the chain
/// of blocks that would be pushed (§4.8 "On an extend trigger").
/// `block_at` returns the block id at a position, `is_air` tests for an
/// empty cell (the scan's terminator).
pub fn plan_push(
    base: BlockPos,
    facing: Direction,
    block_at: impl Fn(BlockPos) -> u16,
    is_air: impl Fn(BlockPos) -> bool,
) -> PushPlan {
    let mut chain = Vec::new();
    let mut pos = facing.apply(base);

    for _ in 0..=MAX_PUSH_DISTANCE {
        if is_air(pos) {
            return PushPlan::Clear { chain };
        }
        let block_id = block_at(pos);
        if is_unpushable(block_id) {
            return PushPlan::Blocked;
        }
        chain.push(pos);
        if chain.len() > MAX_PUSH_DISTANCE {
            return PushPlan::Blocked;
        }
        pos = facing.apply(pos);
    }

    PushPlan::Blocked
}

/// Applies a push plan, moving the farthest block first so nothing is
/// overwritten before it's read (§4.8 "move the chain one block along the
/// facing direction (farthest first)"). `move_block` relocates the block at
/// `from` to `to`; `place_head` sets the piston head block adjacent to the
/// base.
pub fn apply_push(
    base: BlockPos,
    facing: Direction,
    chain: &[BlockPos],
    mut move_block: impl FnMut(BlockPos, BlockPos),
    mut place_head: impl FnMut(BlockPos),
) {
    for &pos in chain.iter().rev() {
        move_block(pos, facing.apply(pos));
    }
    place_head(facing.apply(base));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn clear_chain_stops_at_air() {
        let mut blocks = HashMap::new();
        blocks.insert(BlockPos::new(1, 1, 0), 1u16);
        blocks.insert(BlockPos::new(2, 1, 0), 1u16);

        let plan = plan_push(
            BlockPos::new(0, 1, 0),
            Direction::East,
            |p| blocks.get(&p).copied().unwrap_or(0),
            |p| !blocks.contains_key(&p),
        );

        match plan {
            PushPlan::Clear { chain } => {
                assert_eq!(chain, vec![BlockPos::new(1, 1, 0), BlockPos::new(2, 1, 0)]);
            }
            PushPlan::Blocked => panic!("expected clear chain"),
        }
    }

    #[test]
    fn obsidian_blocks_the_push() {
        let mut blocks = HashMap::new();
        blocks.insert(BlockPos::new(1, 1, 0), 49u16);

        let plan = plan_push(
            BlockPos::new(0, 1, 0),
            Direction::East,
            |p| blocks.get(&p).copied().unwrap_or(0),
            |p| !blocks.contains_key(&p),
        );
        assert_eq!(plan, PushPlan::Blocked);
    }

    #[test]
    fn chain_longer_than_limit_is_blocked() {
        let mut blocks = HashMap::new();
        for i in 1..=13 {
            blocks.insert(BlockPos::new(i, 1, 0), 1u16);
        }
        let plan = plan_push(
            BlockPos::new(0, 1, 0),
            Direction::East,
            |p| blocks.get(&p).copied().unwrap_or(0),
            |p| !blocks.contains_key(&p),
        );
        assert_eq!(plan, PushPlan::Blocked);
    }
}
