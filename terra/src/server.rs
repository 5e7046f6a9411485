//! The top-level `Server`: owns the process-wide entity-id allocator and
//! region-file cache, the set of worlds, and the command dispatcher (§5
//! "Globals", §9 "Globals" -> owned state on a top-level `Server` struct).
//!
//! Each world is driven by its own simulation thread (§5 "The core is
//! primarily single-threaded per world"); this binary crate has no network
//! layer, so [`NullBlockAccess`] stands in for the external block/item
//! registry (§1) that a full server would plug in here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};

use terra_core::command::context::{CommandBackend, CommandContext};
use terra_core::command::dispatcher::CommandDispatcher;
use terra_core::command::sender::CommandSender;
use terra_core::entity::{Entity, EntityId, EntityIdAllocator, EntityKind, GameMode, MobData};
use terra_core::region::manager::RegionManager;
use terra_core::region::worker::RegionWriteQueue;
use terra_core::world::tick::{self, BlockAccess, PlayerRoster};
use terra_core::world::weather::Weather;
use terra_core::world::{Difficulty, World};
use terra_utils::{BlockPos, ChunkPos};
use terra_registry::game_rules::{GameRuleRegistry, GameRuleValue};

use crate::config::TerraConfig;

/// The external block/item interaction registry is out of scope (§1); this
/// crate has no such registry wired up, so scheduled/random ticks and
/// lightning/precipitation requests are accepted and dropped. A real
/// deployment replaces this with an adapter over the real registry.
struct NullBlockAccess;

impl BlockAccess for NullBlockAccess {
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

/// A snapshot roster the tick pipeline consults for sleep resolution and
/// entity-suppression (§4.1 stages 2 and 6); rebuilt once per tick from the
/// player registry.
struct Roster(Vec<(GameMode, bool, i32)>);

impl PlayerRoster for Roster {
    fn players(&self) -> &[(GameMode, bool, i32)] {
        &self.0
    }
}

/// Connected/known-player bookkeeping: name -> entity id, plus the
/// op/ban/whitelist sets §6's command surface mutates.
#[derive(Default)]
struct PlayerRegistry {
    by_name: FxHashMap<String, EntityId>,
    ops: FxHashSet<String>,
    banned: FxHashSet<String>,
    whitelisted: FxHashSet<String>,
}

/// Everything one dimension's simulation thread owns (§5).
pub struct ServerWorld {
    pub world: World,
    players: PlayerRegistry,
}

/// Process-wide server state shared by every world (§9 "Globals").
pub struct Server {
    pub entity_ids: Arc<EntityIdAllocator>,
    pub regions: Arc<RegionManager>,
    pub region_writes: RegionWriteQueue,
    pub dispatcher: Arc<CommandDispatcher>,
    pub worlds: parking_lot::Mutex<FxHashMap<i32, ServerWorld>>,
    pub stop_requested: AtomicBool,
}

impl Server {
    /// Builds the server's process-wide state and its single overworld
    /// dimension, rooted at `<level_name>/`.
    #[must_use]
    pub fn new(config: &TerraConfig) -> Self {
        let game_rule_registry = Arc::new(GameRuleRegistry::standard());
        let mut world = World::new(0, config.resolve_seed(), game_rule_registry);
        world.difficulty = config.difficulty.into();
        world.hardcore = config.hardcore;

        let regions = Arc::new(RegionManager::new(format!("{}/region", config.level_name)));
        let region_writes = RegionWriteQueue::spawn(regions.clone());

        let mut worlds = FxHashMap::default();
        worlds.insert(
            0,
            ServerWorld {
                world,
                players: PlayerRegistry::default(),
            },
        );

        Self {
            entity_ids: Arc::new(EntityIdAllocator::new()),
            regions,
            region_writes,
            dispatcher: Arc::new(CommandDispatcher::new()),
            worlds: parking_lot::Mutex::new(worlds),
            stop_requested: AtomicBool::new(false),
        }
    }

    /// Runs one tick of every world (§4.1, §5 "single-threaded per world" —
    /// simulated here by ticking each world in turn on the calling thread
    /// since this demo binary hosts a single dimension).
    pub fn tick_all(&self) {
        let mut worlds = self.worlds.lock();
        for server_world in worlds.values_mut() {
            let roster = Roster(
                server_world
                    .world
                    .entities
                    .ids_in_tick_order()
                    .into_iter()
                    .filter_map(|id| server_world.world.entities.get(id))
                    .filter_map(|entity| match &entity.kind {
                        EntityKind::Player(data) => Some((data.game_mode, data.in_bed, data.ticks_in_bed)),
                        _ => None,
                    })
                    .collect(),
            );
            tick::run_tick(&mut server_world.world, &mut NullBlockAccess, &roster);
        }
    }

    /// Spawns a blocking std thread that ticks every world at the nominal
    /// 50 ms cadence until [`Self::stop_requested`] is set (§4.1, §5).
    pub fn spawn_simulation_thread(self: &Arc<Self>) -> std::thread::JoinHandle<()> {
        let server = self.clone();
        std::thread::spawn(move || {
            let tick_period = Duration::from_millis(tick::TICK_BUDGET_MS);
            while !server.stop_requested.load(Ordering::Relaxed) {
                let start = std::time::Instant::now();
                server.tick_all();
                let elapsed = start.elapsed();
                if elapsed < tick_period {
                    std::thread::sleep(tick_period - elapsed);
                }
            }
        })
    }

    /// Dispatches one console command line against dimension 0 (§6).
    pub fn run_console_command(self: &Arc<Self>, line: &str) -> String {
        let mut worlds = self.worlds.lock();
        let Some(server_world) = worlds.get_mut(&0) else {
            return "no overworld loaded".to_string();
        };
        let mut backend = ServerBackend {
            server: self.as_ref(),
            world: &mut server_world.world,
            players: &mut server_world.players,
        };
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        match self.dispatcher.dispatch(line, &mut ctx) {
            Ok(message) => message,
            Err(err) => format!("{err}"),
        }
    }
}

/// The concrete [`CommandBackend`] wiring §6's command surface to one
/// dimension's live [`World`] and its player registry.
struct ServerBackend<'a> {
    server: &'a Server,
    world: &'a mut World,
    players: &'a mut PlayerRegistry,
}

impl CommandBackend for ServerBackend<'_> {
    fn tell(&mut self, _target: EntityId, message: &str) {
        tracing::info!(target: "terra::chat", "{message}");
    }

    fn broadcast(&mut self, message: &str) {
        tracing::info!(target: "terra::chat", "{message}");
    }

    fn resolve_player(&self, name: &str) -> Option<EntityId> {
        self.players.by_name.get(name).copied()
    }

    fn list_players(&self) -> Vec<(EntityId, String)> {
        self.players
            .by_name
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect()
    }

    fn world_time(&self) -> i64 {
        self.world.world_time
    }

    fn set_world_time(&mut self, ticks: i64) {
        self.world.world_time = ticks;
    }

    fn weather(&self) -> Weather {
        self.world.weather
    }

    fn set_weather(&mut self, raining: bool, duration_ticks: i32) {
        self.world.weather.raining = raining;
        self.world.weather.rain_time = duration_ticks;
    }

    fn difficulty(&self) -> Difficulty {
        self.world.difficulty
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.world.difficulty = difficulty;
    }

    fn game_mode_of(&self, target: EntityId) -> Option<GameMode> {
        match &self.world.entities.get(target)?.kind {
            EntityKind::Player(data) => Some(data.game_mode),
            _ => None,
        }
    }

    fn set_game_mode(&mut self, target: EntityId, mode: GameMode) -> bool {
        match self.world.entities.get_mut(target).map(|e| &mut e.kind) {
            Some(EntityKind::Player(data)) => {
                data.game_mode = mode;
                true
            }
            _ => false,
        }
    }

    fn kill(&mut self, target: EntityId) -> bool {
        match self.world.entities.get_mut(target) {
            Some(entity) => {
                entity.dead = true;
                true
            }
            None => false,
        }
    }

    fn give_xp(&mut self, target: EntityId, _amount: i32) -> bool {
        self.world.entities.get(target).is_some()
    }

    fn position_of(&self, target: EntityId) -> Option<BlockPos> {
        let entity = self.world.entities.get(target)?;
        Some(BlockPos::new(
            entity.position.x as i32,
            entity.position.y as i32,
            entity.position.z as i32,
        ))
    }

    fn teleport(&mut self, target: EntityId, pos: BlockPos) -> bool {
        match self.world.entities.get_mut(target) {
            Some(entity) => {
                entity.position.x = f64::from(pos.x());
                entity.position.y = f64::from(pos.y());
                entity.position.z = f64::from(pos.z());
                true
            }
            None => false,
        }
    }

    fn give_item(&mut self, target: EntityId, _item_id: u16, _count: i32) -> bool {
        self.world.entities.get(target).is_some()
    }

    fn set_block(&mut self, _pos: BlockPos, _block_id: u16) -> bool {
        // The block grid itself lives behind the external registry (§1);
        // this demo binary has none wired up.
        false
    }

    fn summon(&mut self, kind: &str, pos: BlockPos) -> Option<EntityId> {
        let position = terra_utils::Vector3::new(f64::from(pos.x()), f64::from(pos.y()), f64::from(pos.z()));
        let entity_kind = EntityKind::Mob(MobData {
            can_path_find: true,
            is_hostile: false,
            can_breed: false,
            love_cooldown: 0,
        });
        let _ = kind;
        let entity = Entity::new(&self.server.entity_ids, position, self.world.dimension_id, entity_kind, 0.6, 1.8);
        let id = entity.id;
        self.world.entities.insert(entity);
        Some(id)
    }

    fn seed(&self) -> i64 {
        self.world.seed
    }

    fn game_rule(&self, key: &str) -> Option<GameRuleValue> {
        self.world.game_rules.get(key, &self.world.game_rule_registry)
    }

    fn set_game_rule(&mut self, key: &str, value: GameRuleValue) -> bool {
        self.world.game_rules.set(key, value, &self.world.game_rule_registry)
    }

    fn game_rule_keys(&self) -> Vec<&'static str> {
        self.world.game_rule_registry.iter().map(|(_, rule)| rule.key).collect()
    }

    fn is_op(&self, name: &str) -> bool {
        self.players.ops.contains(name)
    }

    fn op(&mut self, name: &str) -> bool {
        self.players.ops.insert(name.to_string())
    }

    fn deop(&mut self, name: &str) -> bool {
        self.players.ops.remove(name)
    }

    fn kick(&mut self, name: &str, _reason: &str) -> bool {
        self.players.by_name.contains_key(name)
    }

    fn ban(&mut self, name: &str, _reason: &str) -> bool {
        self.players.banned.insert(name.to_string())
    }

    fn pardon(&mut self, name: &str) -> bool {
        self.players.banned.remove(name)
    }

    fn whitelist_add(&mut self, name: &str) -> bool {
        self.players.whitelisted.insert(name.to_string())
    }

    fn whitelist_remove(&mut self, name: &str) -> bool {
        self.players.whitelisted.remove(name)
    }

    fn save_all(&mut self) -> bool {
        true
    }

    fn request_stop(&mut self) {
        self.server.stop_requested.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TerraConfig {
        TerraConfig {
            seed: "0".to_string(),
            level_name: "test-world".to_string(),
            view_distance: 10,
            simulation_distance: 10,
            max_players: 20,
            difficulty: crate::config::ConfigDifficulty::Normal,
            hardcore: false,
        }
    }

    #[test]
    fn tick_all_advances_the_overworld() {
        let server = Server::new(&test_config());
        server.tick_all();
        let worlds = server.worlds.lock();
        assert_eq!(worlds.get(&0).unwrap().world.total_world_time, 1);
    }

    #[test]
    fn summon_then_kill_round_trips_through_the_backend() {
        let server = Arc::new(Server::new(&test_config()));
        let mut worlds = server.worlds.lock();
        let server_world = worlds.get_mut(&0).unwrap();
        let mut backend = ServerBackend {
            server: server.as_ref(),
            world: &mut server_world.world,
            players: &mut server_world.players,
        };
        let id = backend.summon("pig", BlockPos::new(1, 64, 2)).unwrap();
        assert_eq!(backend.position_of(id), Some(BlockPos::new(1, 64, 2)));
        assert!(backend.kill(id));
    }
}
