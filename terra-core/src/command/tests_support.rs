//! A minimal in-memory [`CommandBackend`] used only by this module's own
//! unit tests, so individual command handlers can be exercised without a
//! real world/server.

use rustc_hash::{FxHashMap, FxHashSet};
use terra_registry::game_rules::{GameRuleRegistry, GameRuleValue, GameRuleValues};
use terra_utils::BlockPos;

use crate::entity::{EntityId, GameMode};
use crate::world::weather::Weather;
use crate::world::Difficulty;

use super::context::CommandBackend;

pub struct FakeBackend {
    pub players: Vec<(EntityId, String)>,
    pub positions: FxHashMap<EntityId, BlockPos>,
    pub game_modes: FxHashMap<EntityId, GameMode>,
    pub world_time: i64,
    pub weather: Weather,
    pub difficulty: Difficulty,
    pub seed: i64,
    pub game_rule_registry: GameRuleRegistry,
    pub game_rules: GameRuleValues,
    pub ops: FxHashSet<String>,
    pub banned: FxHashSet<String>,
    pub whitelisted: FxHashSet<String>,
    pub stop_requested: bool,
    pub broadcasts: Vec<String>,
    next_entity_id: EntityId,
}

impl Default for FakeBackend {
    fn default() -> Self {
        let game_rule_registry = GameRuleRegistry::standard();
        let game_rules = GameRuleValues::new(&game_rule_registry);
        let mut backend = Self {
            players: Vec::new(),
            positions: FxHashMap::default(),
            game_modes: FxHashMap::default(),
            world_time: 0,
            weather: Weather::default(),
            difficulty: Difficulty::Normal,
            seed: 42,
            game_rule_registry,
            game_rules,
            ops: FxHashSet::default(),
            banned: FxHashSet::default(),
            whitelisted: FxHashSet::default(),
            stop_requested: false,
            broadcasts: Vec::new(),
            next_entity_id: 1,
        };
        backend.add_player("Notch", BlockPos::new(0, 64, 0));
        backend
    }
}

impl FakeBackend {
    pub fn add_player(&mut self, name: &str, pos: BlockPos) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        self.players.push((id, name.to_string()));
        self.positions.insert(id, pos);
        self.game_modes.insert(id, GameMode::Survival);
        id
    }
}

impl CommandBackend for FakeBackend {
    fn tell(&mut self, _target: EntityId, message: &str) {
        self.broadcasts.push(message.to_string());
    }

    fn broadcast(&mut self, message: &str) {
        self.broadcasts.push(message.to_string());
    }

    fn resolve_player(&self, name: &str) -> Option<EntityId> {
        self.players.iter().find(|(_, n)| n == name).map(|(id, _)| *id)
    }

    fn list_players(&self) -> Vec<(EntityId, String)> {
        self.players.clone()
    }

    fn world_time(&self) -> i64 {
        self.world_time
    }

    fn set_world_time(&mut self, ticks: i64) {
        self.world_time = ticks;
    }

    fn weather(&self) -> Weather {
        self.weather
    }

    fn set_weather(&mut self, raining: bool, duration_ticks: i32) {
        self.weather.raining = raining;
        self.weather.rain_time = duration_ticks;
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    fn game_mode_of(&self, target: EntityId) -> Option<GameMode> {
        self.game_modes.get(&target).copied()
    }

    fn set_game_mode(&mut self, target: EntityId, mode: GameMode) -> bool {
        if let Some(slot) = self.game_modes.get_mut(&target) {
            *slot = mode;
            true
        } else {
            false
        }
    }

    fn kill(&mut self, target: EntityId) -> bool {
        self.positions.contains_key(&target)
    }

    fn give_xp(&mut self, target: EntityId, _amount: i32) -> bool {
        self.positions.contains_key(&target)
    }

    fn position_of(&self, target: EntityId) -> Option<BlockPos> {
        self.positions.get(&target).copied()
    }

    fn teleport(&mut self, target: EntityId, pos: BlockPos) -> bool {
        if self.positions.contains_key(&target) {
            self.positions.insert(target, pos);
            true
        } else {
            false
        }
    }

    fn give_item(&mut self, target: EntityId, _item_id: u16, _count: i32) -> bool {
        self.positions.contains_key(&target)
    }

    fn set_block(&mut self, _pos: BlockPos, _block_id: u16) -> bool {
        true
    }

    fn summon(&mut self, _kind: &str, pos: BlockPos) -> Option<EntityId> {
        Some(self.add_player("summoned", pos))
    }

    fn seed(&self) -> i64 {
        self.seed
    }

    fn game_rule(&self, key: &str) -> Option<GameRuleValue> {
        self.game_rules.get(key, &self.game_rule_registry)
    }

    fn set_game_rule(&mut self, key: &str, value: GameRuleValue) -> bool {
        self.game_rules.set(key, value, &self.game_rule_registry)
    }

    fn game_rule_keys(&self) -> Vec<&'static str> {
        self.game_rule_registry.iter().map(|(_, rule)| rule.key).collect()
    }

    fn is_op(&self, name: &str) -> bool {
        self.ops.contains(name)
    }

    fn op(&mut self, name: &str) -> bool {
        self.ops.insert(name.to_string())
    }

    fn deop(&mut self, name: &str) -> bool {
        self.ops.remove(name)
    }

    fn kick(&mut self, name: &str, _reason: &str) -> bool {
        self.resolve_player(name).is_some()
    }

    fn ban(&mut self, name: &str, _reason: &str) -> bool {
        self.banned.insert(name.to_string())
    }

    fn pardon(&mut self, name: &str) -> bool {
        self.banned.remove(name)
    }

    fn whitelist_add(&mut self, name: &str) -> bool {
        self.whitelisted.insert(name.to_string())
    }

    fn whitelist_remove(&mut self, name: &str) -> bool {
        self.whitelisted.remove(name)
    }

    fn save_all(&mut self) -> bool {
        true
    }

    fn request_stop(&mut self) {
        self.stop_requested = true;
    }
}
