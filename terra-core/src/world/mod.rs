//! A single dimension's simulation state (§3 "World") and the tick pipeline
//! that advances it (§4.1).

pub mod active_chunks;
pub mod block_event;
pub mod entity_arena;
pub mod scheduled_tick;
pub mod tick;
pub mod weather;

use std::sync::Arc;

use terra_registry::game_rules::{GameRuleRegistry, GameRuleValues};
use terra_utils::random::legacy::LegacyRandom;
use terra_utils::BlockPos;

use crate::entity::tracker::EntityTracker;
use crate::entity::EntityIdAllocator;
use active_chunks::ActiveChunkSet;
use block_event::BlockEventBuffer;
use entity_arena::EntityArena;
use scheduled_tick::ScheduledTickQueue;
use weather::Weather;

/// A world's configured difficulty (§3, §4.1 stage 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Peaceful,
    Easy,
    Normal,
    Hard,
}

/// Advances a 32-bit LCG of the shape `x <- x * 3 + 1013904223` used by
/// random block ticks and lightning rolls (§4.1 stage 5).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTickLcg(pub i32);

impl RandomTickLcg {
    /// Advances the generator and returns the new value.
    pub fn advance(&mut self) -> i32 {
        self.0 = self.0.wrapping_mul(3).wrapping_add(1_013_904_223);
        self.0
    }
}

/// A dimension's full simulation state (§3 "World").
pub struct World {
    pub dimension_id: i32,
    pub seed: i64,
    pub difficulty: Difficulty,
    pub hardcore: bool,
    pub total_world_time: i64,
    pub world_time: i64,
    pub sky_light_subtracted: u8,
    pub weather: Weather,
    pub spawn_point: BlockPos,
    pub persist_unwatched_chunks: bool,

    pub game_rule_registry: Arc<GameRuleRegistry>,
    pub game_rules: GameRuleValues,

    pub active_chunks: ActiveChunkSet,
    pub scheduled_ticks: ScheduledTickQueue,
    pub block_events: BlockEventBuffer,
    pub random_tick_lcg: RandomTickLcg,

    pub entities: EntityArena,
    pub tracker: EntityTracker,

    pub ticks_since_any_player: u32,

    /// Chunk-local RNG source for deterministic per-chunk generation (§5
    /// "scoped per-chunk: each chunk's generation takes a chunk-local RNG
    /// seeded from `world_seed` mixed with `(cx, cz)`"). Not advanced by the
    /// tick pipeline itself; chunk generation derives its own seed from
    /// `seed` and never shares this generator across chunks.
    pub world_gen_rng_seed: i64,
}

impl World {
    /// Creates a new, empty world with no players and default game rules.
    #[must_use]
    pub fn new(dimension_id: i32, seed: i64, registry: Arc<GameRuleRegistry>) -> Self {
        let game_rules = GameRuleValues::new(&registry);
        Self {
            dimension_id,
            seed,
            difficulty: Difficulty::Normal,
            hardcore: false,
            total_world_time: 0,
            world_time: 0,
            sky_light_subtracted: 0,
            weather: Weather::default(),
            spawn_point: BlockPos::new(0, 64, 0),
            persist_unwatched_chunks: false,
            game_rule_registry: registry,
            game_rules,
            active_chunks: ActiveChunkSet::new(),
            scheduled_ticks: ScheduledTickQueue::new(),
            block_events: BlockEventBuffer::new(),
            random_tick_lcg: RandomTickLcg::default(),
            entities: EntityArena::new(),
            tracker: EntityTracker::new(),
            ticks_since_any_player: 0,
            world_gen_rng_seed: seed,
        }
    }

    /// Whether the `doDaylightCycle` game rule is currently on.
    #[must_use]
    pub fn daylight_cycle_enabled(&self) -> bool {
        self.game_rules
            .get("doDaylightCycle", &self.game_rule_registry)
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    /// A chunk-local seeded RNG for generating/ticking a specific chunk (§5).
    #[must_use]
    pub fn chunk_local_rng(&self, cx: i32, cz: i32) -> LegacyRandom {
        let mixed = self
            .world_gen_rng_seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(i64::from(cx).wrapping_mul(341_873_128_712))
            .wrapping_add(i64::from(cz).wrapping_mul(132_897_987_541));
        LegacyRandom::new(mixed)
    }
}

/// The process-wide entity id allocator and region cache own the cross-world
/// state that the reference implementation kept as class-level statics (§9
/// "Globals"); [`crate::region::manager::RegionManager`] and this allocator
/// are constructed once by the top-level server and shared by reference.
#[derive(Debug, Default)]
pub struct WorldRegistry {
    pub entity_ids: EntityIdAllocator,
}
