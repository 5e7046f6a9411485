//! The command backend seam (§1 "the full block/item registry and their
//! interaction logic ... are external collaborators") and per-invocation
//! context, in the same `BlockAccess`/`PlayerRoster` style the tick
//! pipeline uses to stay decoupled from the concrete world/server types
//! (see [`crate::world::tick`]).

use crate::entity::{EntityId, GameMode};
use crate::world::weather::Weather;
use crate::world::Difficulty;
use terra_registry::game_rules::GameRuleValue;
use terra_utils::BlockPos;

use super::sender::CommandSender;

/// Everything a built-in command needs to act on the world, server, and
/// player roster without this module knowing their concrete types.
pub trait CommandBackend {
    /// Sends a chat-visible message to one entity.
    fn tell(&mut self, target: EntityId, message: &str);
    /// Sends a chat-visible message to every connected player.
    fn broadcast(&mut self, message: &str);

    /// Resolves a player name to its entity id, if connected.
    fn resolve_player(&self, name: &str) -> Option<EntityId>;
    /// Lists every connected player as `(entity_id, name)`.
    fn list_players(&self) -> Vec<(EntityId, String)>;

    fn world_time(&self) -> i64;
    fn set_world_time(&mut self, ticks: i64);

    fn weather(&self) -> Weather;
    fn set_weather(&mut self, raining: bool, duration_ticks: i32);

    fn difficulty(&self) -> Difficulty;
    fn set_difficulty(&mut self, difficulty: Difficulty);

    fn game_mode_of(&self, target: EntityId) -> Option<GameMode>;
    fn set_game_mode(&mut self, target: EntityId, mode: GameMode) -> bool;

    fn kill(&mut self, target: EntityId) -> bool;
    fn give_xp(&mut self, target: EntityId, amount: i32) -> bool;
    fn position_of(&self, target: EntityId) -> Option<BlockPos>;
    fn teleport(&mut self, target: EntityId, pos: BlockPos) -> bool;
    fn give_item(&mut self, target: EntityId, item_id: u16, count: i32) -> bool;
    fn set_block(&mut self, pos: BlockPos, block_id: u16) -> bool;
    fn summon(&mut self, kind: &str, pos: BlockPos) -> Option<EntityId>;

    fn seed(&self) -> i64;

    fn game_rule(&self, key: &str) -> Option<GameRuleValue>;
    fn set_game_rule(&mut self, key: &str, value: GameRuleValue) -> bool;
    fn game_rule_keys(&self) -> Vec<&'static str>;

    fn is_op(&self, name: &str) -> bool;
    fn op(&mut self, name: &str) -> bool;
    fn deop(&mut self, name: &str) -> bool;
    fn kick(&mut self, name: &str, reason: &str) -> bool;
    fn ban(&mut self, name: &str, reason: &str) -> bool;
    fn pardon(&mut self, name: &str) -> bool;
    fn whitelist_add(&mut self, name: &str) -> bool;
    fn whitelist_remove(&mut self, name: &str) -> bool;

    fn save_all(&mut self) -> bool;
    fn request_stop(&mut self);
}

/// Per-invocation context a handler receives: who sent it, at what
/// permission level, and the backend to act through.
pub struct CommandContext<'a> {
    pub sender: CommandSender,
    pub permission_level: u8,
    pub backend: &'a mut dyn CommandBackend,
}

impl<'a> CommandContext<'a> {
    #[must_use]
    pub fn new(sender: CommandSender, permission_level: u8, backend: &'a mut dyn CommandBackend) -> Self {
        Self {
            sender,
            permission_level,
            backend,
        }
    }

    /// The sender's own entity id, if a target argument is omitted and the
    /// command defaults to self (e.g. `/gamemode creative` with no target).
    #[must_use]
    pub fn sender_entity_id(&self) -> Option<EntityId> {
        self.sender.entity_id()
    }
}
