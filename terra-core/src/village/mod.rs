//! Village mechanics, natural mob spawning, and nether-portal search/build
//! (§4.10 "Village, Spawning, Portals").
//!
//! Grounded in the same composition-over-inheritance approach as
//! [`crate::entity`]: a [`Village`] is a plain spatial record rather than an
//! object with behavior baked in; [`Village::tick`] is the pure state
//! transition the world tick pipeline drives once per village per tick.

pub mod portal;
pub mod spawner;

use rustc_hash::FxHashMap;
use terra_utils::BlockPos;

use crate::entity::EntityId;

/// A door's "inside" normal: which horizontal direction leads into the
/// village interior, used to keep the village centroid biased toward the
/// settlement rather than the wilderness beyond the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsideDirection {
    North,
    South,
    East,
    West,
}

/// A registered village door (§3 "VillageDoor").
#[derive(Debug, Clone, Copy)]
pub struct VillageDoor {
    pub pos: BlockPos,
    pub inside: InsideDirection,
    /// Last world tick this door was confirmed still present; doors not
    /// revalidated within [`DOOR_VALIDITY_TICKS`] are dropped (§4.10 "drop
    /// doors last validated > 1200 ticks ago").
    pub last_validated_tick: i64,
}

/// A player's standing with one village, clamped (§3 "a player-reputation
/// map (`[-30, +10]`, clamped)").
pub const REPUTATION_MIN: i32 = -30;
pub const REPUTATION_MAX: i32 = 10;

/// A recent aggressor against this village's villagers; expires after
/// [`AGGRESSOR_EXPIRY_TICKS`] (§3 "each with a 300-tick expiry").
#[derive(Debug, Clone, Copy)]
pub struct Aggressor {
    pub entity_id: EntityId,
    pub recorded_tick: i64,
}

/// Doors older than this (in ticks) without revalidation are dropped
/// (§4.10).
pub const DOOR_VALIDITY_TICKS: i64 = 1200;
/// An aggressor record expires this many ticks after being recorded (§3).
pub const AGGRESSOR_EXPIRY_TICKS: i64 = 300;
/// Cooldown between a village's breeding "mating seasons" (§3 "a
/// mating-season cooldown of 3600 ticks").
pub const MATING_SEASON_COOLDOWN_TICKS: i64 = 3600;
/// Minimum village radius, even with very close-together doors (§3 "radius
/// `max(32, ceil(sqrt(max_door_dist_sq)))`").
pub const MIN_VILLAGE_RADIUS: f64 = 32.0;
/// One in this many village ticks an iron golem is requested, conditional
/// on the door/villager thresholds (§4.10 "a 1-in-7000 roll succeeds").
const GOLEM_SPAWN_ROLL: u32 = 7000;
/// Minimum doors before golems spawn at all (§4.10 "`num_doors > 20`").
const GOLEM_MIN_DOORS: usize = 20;
/// Golems are capped at one per ten villagers (§4.10 "`num_golems <
/// num_villagers / 10`").
const GOLEM_VILLAGER_RATIO: i32 = 10;

/// Siege world-time window (§4.10 "Sieges: only active 13_000-22_000 world
/// time").
pub const SIEGE_WINDOW: std::ops::Range<i64> = 13_000..22_000;
/// Minimum doors/villagers for a siege to trigger.
const SIEGE_MIN_DOORS: usize = 10;
const SIEGE_MIN_VILLAGERS: i32 = 20;
/// A siege spawns this many zombies, staggered over [`SIEGE_DURATION_TICKS`].
pub const SIEGE_ZOMBIE_COUNT: u32 = 20;
pub const SIEGE_DURATION_TICKS: u32 = 40;

/// A village: the spatial + social record described in §3/§4.10.
#[derive(Debug, Clone)]
pub struct Village {
    pub doors: Vec<VillageDoor>,
    pub center: BlockPos,
    pub radius: f64,
    pub villager_count: i32,
    pub golem_count: i32,
    pub reputation: FxHashMap<EntityId, i32>,
    pub aggressors: Vec<Aggressor>,
    pub last_mating_season_tick: i64,
    /// Whether a siege is currently in progress: `(zombies_spawned,
    /// ticks_elapsed)`, with zombies paced evenly across
    /// [`SIEGE_DURATION_TICKS`] (§4.10 "spawn 20 zombies over 40 ticks").
    pub siege_zombies_spawned: Option<(u32, u32)>,
}

/// A request the village tick emits for the world to act on; placing the
/// actual entity is an external collaborator's job (the entity arena +
/// spawner, §1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VillageSpawnRequest {
    IronGolem { pos: BlockPos },
    SiegeZombie { pos: BlockPos },
}

impl Village {
    /// Creates an empty village with no doors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            doors: Vec::new(),
            center: BlockPos::new(0, 64, 0),
            radius: MIN_VILLAGE_RADIUS,
            villager_count: 0,
            golem_count: 0,
            reputation: FxHashMap::default(),
            aggressors: Vec::new(),
            last_mating_season_tick: i64::MIN,
            siege_zombies_spawned: None,
        }
    }

    /// Recomputes `center` and `radius` from the current door set (§3
    /// "a running sum for centroid, a computed centre, a radius
    /// `max(32, ceil(sqrt(max_door_dist_sq)))`").
    pub fn recompute_centroid(&mut self) {
        if self.doors.is_empty() {
            return;
        }
        let (sum_x, sum_y, sum_z) = self.doors.iter().fold((0i64, 0i64, 0i64), |acc, d| {
            (acc.0 + i64::from(d.pos.x()), acc.1 + i64::from(d.pos.y()), acc.2 + i64::from(d.pos.z()))
        });
        let n = self.doors.len() as i64;
        self.center = BlockPos::new((sum_x / n) as i32, (sum_y / n) as i32, (sum_z / n) as i32);

        let max_dist_sq = self
            .doors
            .iter()
            .map(|d| self.center.distance_squared(&d.pos))
            .fold(0.0_f64, f64::max);
        self.radius = MIN_VILLAGE_RADIUS.max(max_dist_sq.sqrt().ceil());
    }

    /// Clamps a reputation delta into `[-30, +10]` and applies it (§3).
    pub fn adjust_reputation(&mut self, player: EntityId, delta: i32) {
        let entry = self.reputation.entry(player).or_insert(0);
        *entry = (*entry + delta).clamp(REPUTATION_MIN, REPUTATION_MAX);
    }

    /// Records a hostile act against this village by `entity_id` (§3 "a
    /// list of recent aggressors").
    pub fn record_aggressor(&mut self, entity_id: EntityId, current_tick: i64) {
        self.aggressors.push(Aggressor {
            entity_id,
            recorded_tick: current_tick,
        });
    }

    /// Runs one village tick (§4.10 "Per village tick"): drops stale doors,
    /// expires old aggressors, and rolls for an iron-golem spawn.
    ///
    /// `golem_rng_roll` is a caller-supplied draw from `[0, GOLEM_SPAWN_ROLL)`
    /// so the village stays free of its own RNG instance, matching §5's
    /// scoped-RNG discipline used elsewhere in generation.
    pub fn tick(&mut self, current_tick: i64, golem_rng_roll: u32, golem_offset: BlockPos) -> Option<VillageSpawnRequest> {
        self.doors.retain(|d| current_tick - d.last_validated_tick <= DOOR_VALIDITY_TICKS);
        self.aggressors.retain(|a| current_tick - a.recorded_tick <= AGGRESSOR_EXPIRY_TICKS);
        if self.doors.is_empty() {
            return None;
        }
        self.recompute_centroid();

        let golems_wanted = self.golem_count < self.villager_count / GOLEM_VILLAGER_RATIO.max(1);
        if golems_wanted && self.doors.len() > GOLEM_MIN_DOORS && golem_rng_roll % GOLEM_SPAWN_ROLL == 0 {
            return Some(VillageSpawnRequest::IronGolem { pos: golem_offset });
        }
        None
    }

    /// Whether this village currently meets the siege preconditions (§4.10
    /// "Sieges: only active 13_000-22_000 world time, require >= 10 doors
    /// and >= 20 villagers and a nearby player").
    #[must_use]
    pub fn siege_eligible(&self, world_time: i64, player_nearby: bool) -> bool {
        SIEGE_WINDOW.contains(&world_time)
            && self.doors.len() >= SIEGE_MIN_DOORS
            && self.villager_count >= SIEGE_MIN_VILLAGERS
            && player_nearby
            && self.siege_zombies_spawned.is_none()
    }

    /// Starts a siege if not already running.
    pub fn start_siege(&mut self) {
        if self.siege_zombies_spawned.is_none() {
            self.siege_zombies_spawned = Some((0, 0));
        }
    }

    /// Advances an in-progress siege by one tick, returning a zombie spawn
    /// request at the border position when one is due (§4.10 "spawn 20
    /// zombies over 40 ticks along the village border"). Zombies are paced
    /// one every `SIEGE_DURATION_TICKS / SIEGE_ZOMBIE_COUNT` ticks so the
    /// full 20 land by the end of the 40-tick window.
    pub fn siege_tick(&mut self, border_pos: BlockPos) -> Option<VillageSpawnRequest> {
        let (spawned, elapsed) = self.siege_zombies_spawned?;
        if spawned >= SIEGE_ZOMBIE_COUNT {
            self.siege_zombies_spawned = None;
            return None;
        }
        let ticks_per_zombie = (SIEGE_DURATION_TICKS / SIEGE_ZOMBIE_COUNT).max(1);
        let new_elapsed = elapsed + 1;
        if new_elapsed % ticks_per_zombie == 0 || elapsed == 0 {
            self.siege_zombies_spawned = Some((spawned + 1, new_elapsed));
            Some(VillageSpawnRequest::SiegeZombie { pos: border_pos })
        } else {
            self.siege_zombies_spawned = Some((spawned, new_elapsed));
            None
        }
    }

    /// Whether breeding ("mating season") may start now (§3 "a
    /// mating-season cooldown of 3600 ticks").
    #[must_use]
    pub fn mating_season_available(&self, current_tick: i64) -> bool {
        current_tick - self.last_mating_season_tick >= MATING_SEASON_COOLDOWN_TICKS
    }

    /// Marks a mating season as having just started.
    pub fn start_mating_season(&mut self, current_tick: i64) {
        self.last_mating_season_tick = current_tick;
    }
}

impl Default for Village {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door(x: i32, z: i32, tick: i64) -> VillageDoor {
        VillageDoor {
            pos: BlockPos::new(x, 64, z),
            inside: InsideDirection::North,
            last_validated_tick: tick,
        }
    }

    #[test]
    fn centroid_is_the_average_of_door_positions() {
        let mut village = Village::new();
        village.doors.push(door(0, 0, 0));
        village.doors.push(door(10, 0, 0));
        village.recompute_centroid();
        assert_eq!(village.center.x(), 5);
        assert!(village.radius >= MIN_VILLAGE_RADIUS);
    }

    #[test]
    fn stale_doors_are_dropped_after_1200_ticks() {
        let mut village = Village::new();
        village.doors.push(door(0, 0, 0));
        village.doors.push(door(1, 0, 1000));
        village.tick(1201, 1, BlockPos::new(0, 64, 0));
        assert_eq!(village.doors.len(), 1);
        assert_eq!(village.doors[0].pos.z(), 1);
    }

    #[test]
    fn reputation_clamps_to_bounds() {
        let mut village = Village::new();
        village.adjust_reputation(1, -100);
        assert_eq!(village.reputation[&1], REPUTATION_MIN);
        village.adjust_reputation(1, 1000);
        assert_eq!(village.reputation[&1], REPUTATION_MAX);
    }

    #[test]
    fn aggressors_expire_after_300_ticks() {
        let mut village = Village::new();
        village.doors.push(door(0, 0, 0));
        village.record_aggressor(7, 0);
        village.tick(301, 1, BlockPos::new(0, 64, 0));
        assert!(village.aggressors.is_empty());
    }

    #[test]
    fn siege_requires_the_full_precondition_set() {
        let mut village = Village::new();
        for i in 0..11 {
            village.doors.push(door(i, 0, 0));
        }
        village.villager_count = 25;
        assert!(village.siege_eligible(15_000, true));
        assert!(!village.siege_eligible(5_000, true));
        assert!(!village.siege_eligible(15_000, false));
    }

    #[test]
    fn siege_spawns_exactly_twenty_zombies_then_stops() {
        let mut village = Village::new();
        village.start_siege();
        let mut count = 0;
        for _ in 0..SIEGE_DURATION_TICKS * 2 {
            if village.siege_tick(BlockPos::new(0, 64, 0)).is_some() {
                count += 1;
            }
            if village.siege_zombies_spawned.is_none() {
                break;
            }
        }
        assert_eq!(count, SIEGE_ZOMBIE_COUNT);
    }
}
