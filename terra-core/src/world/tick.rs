//! The ordered world tick pipeline (§4.1).
//!
//! Each stage sees the state the previous stage left within the same tick.
//! The full block/item interaction registry is an external collaborator
//! (§1); this module calls into it only through the narrow [`BlockAccess`]
//! trait, so the pipeline's ordering and bookkeeping are testable without a
//! real block registry.

use terra_utils::{BlockPos, ChunkPos};
use tracing::{trace_span, warn};

use super::scheduled_tick::ScheduledTick;
use super::{Difficulty, World};
use crate::chunk::SECTION_COUNT;
use crate::entity::GameMode;

/// The nominal tick budget; overruns are logged, not enforced (§4.1
/// "Failure", §5 "Cancellation and timeouts").
pub const TICK_BUDGET_MS: u64 = 50;

/// The block grid query/mutation surface the tick pipeline needs from the
/// external block registry (§1, §6).
pub trait BlockAccess {
    /// The block id currently occupying `pos`, or `None` if unloaded.
    fn block_id_at(&self, pos: BlockPos) -> Option<u16>;
    /// Invokes the scheduled-tick handler for `block_id` at `pos`, only if
    /// the cell still holds that id (§4.1 stage 4).
    fn fire_scheduled_tick(&mut self, pos: BlockPos, block_id: u16);
    /// Invokes the random-tick handler for the block at `pos`, if its
    /// definition has `ticks_randomly` set (§4.1 stage 5).
    fn fire_random_tick(&mut self, pos: BlockPos);
    /// Whether `chunk`'s section at `section_y` (0-15) holds at least one
    /// non-air block. An unloaded chunk or out-of-range section counts as
    /// empty (§4.1 stage 5 "for each non-empty 16³ section").
    fn section_is_non_empty(&self, chunk: ChunkPos, section_y: u8) -> bool;
    /// Attempts to freeze water / place a snow layer at the given column's
    /// precipitation height, depending on local biome temperature (§4.1
    /// stage 5 precipitation rule).
    fn apply_precipitation(&mut self, x: i32, z: i32);
    /// Schedules a lightning strike at the given column (§4.1 stage 5).
    fn schedule_lightning(&mut self, x: i32, z: i32);
}

/// The player roster view the sleep-resolution and entity-suppression
/// stages need (§4.1 stages 2 and 6).
pub trait PlayerRoster {
    /// Every connected player's game mode and whether they are currently in
    /// bed with the tick count they've been there.
    fn players(&self) -> &[(GameMode, bool, i32)];
    fn is_empty(&self) -> bool {
        self.players().is_empty()
    }
}

/// The number of consecutive empty ticks before entity ticking is
/// suppressed (§4.1 stage 6).
const ENTITY_SUPPRESSION_TICKS: u32 = 1200;

/// The ticks-in-bed threshold for sleep resolution (§4.1 stage 2).
const SLEEP_THRESHOLD_TICKS: i32 = 100;

/// One full day, in ticks; sleep resolution advances to the next multiple
/// of this (§4.1 stage 2).
const TICKS_PER_DAY: i64 = 24_000;

/// Runs every stage of the world tick pipeline once, in the mandated order
/// (§4.1, §5 "Ordering guarantees").
pub fn run_tick(world: &mut World, blocks: &mut impl BlockAccess, roster: &impl PlayerRoster) {
    let _span = trace_span!("tick", dimension = world.dimension_id).entered();
    let start = std::time::Instant::now();

    coerce_difficulty(world);
    resolve_sleep(world, roster);
    advance_time(world);
    drain_scheduled_ticks(world, blocks);
    random_block_ticks(world, blocks);
    update_entity_suppression(world, roster);
    let flushed = world.block_events.flush();
    drop(flushed); // external event consumer owns dispatch (§1, §6).

    let elapsed = start.elapsed();
    if elapsed.as_millis() as u64 > TICK_BUDGET_MS {
        warn!(dimension = world.dimension_id, elapsed_ms = elapsed.as_millis() as u64, "tick overran budget");
    }
}

/// Stage 1: if hardcore, force difficulty to hard.
fn coerce_difficulty(world: &mut World) {
    if world.hardcore {
        world.difficulty = Difficulty::Hard;
    }
}

/// Stage 2: if every non-spectator player has slept >= 100 ticks, jump to
/// the next dawn and clear weather.
fn resolve_sleep(world: &mut World, roster: &impl PlayerRoster) {
    let players = roster.players();
    let eligible: Vec<_> = players
        .iter()
        .filter(|(mode, _, _)| *mode != GameMode::Spectator)
        .collect();
    if eligible.is_empty() {
        return;
    }
    let all_slept_enough = eligible
        .iter()
        .all(|(_, in_bed, ticks)| *in_bed && *ticks >= SLEEP_THRESHOLD_TICKS);
    if all_slept_enough {
        world.world_time = ((world.world_time / TICKS_PER_DAY) + 1) * TICKS_PER_DAY;
        world.weather.clear();
    }
}

/// Stage 3: advance the monotonic clocks.
fn advance_time(world: &mut World) {
    world.total_world_time += 1;
    if world.daylight_cycle_enabled() {
        world.world_time += 1;
    }
}

/// Stage 4: drain due scheduled ticks, capped per tick.
fn drain_scheduled_ticks(world: &mut World, blocks: &mut impl BlockAccess) {
    let _span = trace_span!("scheduled_tick_drain").entered();
    let due = world.scheduled_ticks.drain_due(world.total_world_time);
    for ScheduledTick {
        pos,
        block_id,
        scheduled_time: _,
    } in due
    {
        if blocks.block_id_at(pos) == Some(block_id) {
            blocks.fire_scheduled_tick(pos, block_id);
        }
    }
}

/// Stage 5: per-chunk LCG advance, precipitation, and random section ticks.
fn random_block_ticks(world: &mut World, blocks: &mut impl BlockAccess) {
    let _span = trace_span!("random_tick").entered();
    let raining = world.weather.raining;
    let thundering = world.weather.thundering;
    let random_tick_speed = world
        .game_rules
        .get("randomTickSpeed", &world.game_rule_registry)
        .and_then(|v| v.as_int())
        .unwrap_or(3)
        .max(0) as u32;

    let chunks: Vec<_> = world.active_chunks.iter().collect();
    for chunk in chunks {
        let lcg = world.random_tick_lcg.advance();

        if raining && thundering && lcg.rem_euclid(100_000) == 0 {
            blocks.schedule_lightning(chunk.x * 16, chunk.z * 16);
        }
        if lcg & 15 == 0 {
            blocks.apply_precipitation(chunk.x * 16, chunk.z * 16);
        }

        for section_y in 0..SECTION_COUNT as u8 {
            if !blocks.section_is_non_empty(chunk, section_y) {
                continue;
            }
            for _ in 0..random_tick_speed {
                let lcg = world.random_tick_lcg.advance();
                let lx = lcg & 15;
                let ly = (lcg >> 8) & 15;
                let lz = (lcg >> 16) & 15;
                let pos = BlockPos::new(
                    chunk.x * 16 + lx,
                    i32::from(section_y) * 16 + ly,
                    chunk.z * 16 + lz,
                );
                blocks.fire_random_tick(pos);
            }
        }
    }
}

/// Stage 6: suppress entity ticking after 1200 consecutive empty ticks.
fn update_entity_suppression(world: &mut World, roster: &impl PlayerRoster) {
    if roster.is_empty() {
        world.ticks_since_any_player = world.ticks_since_any_player.saturating_add(1);
    } else {
        world.ticks_since_any_player = 0;
    }
}

/// Whether entity ticking is currently suppressed for this world (§4.1
/// stage 6).
#[must_use]
pub fn entities_suppressed(world: &World) -> bool {
    world.ticks_since_any_player >= ENTITY_SUPPRESSION_TICKS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use terra_registry::game_rules::GameRuleRegistry;

    struct NullBlocks;
    impl BlockAccess for NullBlocks {
        fn block_id_at(&self, _pos: BlockPos) -> Option<u16> {
            None
        }
        fn fire_scheduled_tick(&mut self, _pos: BlockPos, _block_id: u16) {}
        fn fire_random_tick(&mut self, _pos: BlockPos) {}
        fn section_is_non_empty(&self, _chunk: ChunkPos, _section_y: u8) -> bool {
            false
        }
        fn apply_precipitation(&mut self, _x: i32, _z: i32) {}
        fn schedule_lightning(&mut self, _x: i32, _z: i32) {}
    }

    struct EmptyRoster;
    impl PlayerRoster for EmptyRoster {
        fn players(&self) -> &[(GameMode, bool, i32)] {
            &[]
        }
    }

    /// §8 scenario 1: "Empty-world tick."
    #[test]
    fn empty_world_tick_advances_time_and_stays_empty() {
        let mut world = World::new(0, 0, Arc::new(GameRuleRegistry::standard()));
        let mut blocks = NullBlocks;
        let roster = EmptyRoster;

        for _ in 0..100 {
            run_tick(&mut world, &mut blocks, &roster);
        }

        assert_eq!(world.total_world_time, 100);
        assert_eq!(world.world_time, 100);
        assert!(world.active_chunks.is_empty());
        assert!(world.entities.is_empty());
    }

    #[test]
    fn total_world_time_is_strictly_monotonic() {
        let mut world = World::new(0, 0, Arc::new(GameRuleRegistry::standard()));
        let mut blocks = NullBlocks;
        let roster = EmptyRoster;
        let mut last = world.total_world_time;
        for _ in 0..10 {
            run_tick(&mut world, &mut blocks, &roster);
            assert!(world.total_world_time > last);
            last = world.total_world_time;
        }
    }

    #[test]
    fn hardcore_coerces_difficulty_to_hard() {
        let mut world = World::new(0, 0, Arc::new(GameRuleRegistry::standard()));
        world.hardcore = true;
        world.difficulty = Difficulty::Peaceful;
        let mut blocks = NullBlocks;
        run_tick(&mut world, &mut blocks, &EmptyRoster);
        assert_eq!(world.difficulty, Difficulty::Hard);
    }

    /// Records every `fire_random_tick` position; every other section is
    /// reported empty.
    struct RecordingBlocks {
        non_empty_sections: Vec<u8>,
        ticked: Vec<BlockPos>,
    }

    impl BlockAccess for RecordingBlocks {
        fn block_id_at(&self, _pos: BlockPos) -> Option<u16> {
            None
        }
        fn fire_scheduled_tick(&mut self, _pos: BlockPos, _block_id: u16) {}
        fn fire_random_tick(&mut self, pos: BlockPos) {
            self.ticked.push(pos);
        }
        fn section_is_non_empty(&self, _chunk: ChunkPos, section_y: u8) -> bool {
            self.non_empty_sections.contains(&section_y)
        }
        fn apply_precipitation(&mut self, _x: i32, _z: i32) {}
        fn schedule_lightning(&mut self, _x: i32, _z: i32) {}
    }

    /// §4.1 stage 5: only non-empty sections receive random ticks, and each
    /// random tick's `(lx, ly, lz)` comes from a single LCG advance, so a
    /// chunk with one non-empty section out of sixteen gets exactly
    /// `random_tick_speed` ticks, all landing inside that section's Y range.
    #[test]
    fn random_ticks_only_hit_non_empty_sections() {
        let mut world = World::new(0, 0, Arc::new(GameRuleRegistry::standard()));
        world.active_chunks.insert(ChunkPos::new(0, 0));
        let mut blocks = RecordingBlocks {
            non_empty_sections: vec![4],
            ticked: Vec::new(),
        };

        random_block_ticks(&mut world, &mut blocks);

        assert_eq!(blocks.ticked.len(), 3);
        for pos in &blocks.ticked {
            assert!((0..16).contains(&pos.x()));
            assert!((0..16).contains(&pos.z()));
            assert!((64..80).contains(&pos.y()));
        }
    }

    #[test]
    fn no_non_empty_sections_means_no_random_ticks() {
        let mut world = World::new(0, 0, Arc::new(GameRuleRegistry::standard()));
        world.active_chunks.insert(ChunkPos::new(0, 0));
        let mut blocks = RecordingBlocks {
            non_empty_sections: Vec::new(),
            ticked: Vec::new(),
        };

        random_block_ticks(&mut world, &mut blocks);

        assert!(blocks.ticked.is_empty());
    }
}
