//! Per-player chunk visibility: the add/movement protocols and block-change
//! propagation of §4.3.

use rustc_hash::{FxHashMap, FxHashSet};
use terra_utils::{BlockPos, ChunkPos, Vector3};

use crate::entity::EntityId;

use super::spiral::spiral_order;
use super::watcher::{ChunkUpdate, PlayerInstance};

/// Clamped view-distance bounds (§8 "Boundary behaviours").
pub const MIN_VIEW_DISTANCE: i32 = 3;
pub const MAX_VIEW_DISTANCE: i32 = 20;

/// Squared XZ movement threshold that triggers a view-rectangle recompute
/// (§4.3 "differs ... by >= 8 blocks in the XZ plane").
const MOVEMENT_RECOMPUTE_THRESHOLD_SQ: f64 = 8.0 * 8.0;

/// Ticks between forced full resyncs of every dirty-or-not instance (§4.3
/// "Full resync", "~6 minutes" at 20 ticks/sec).
pub const FULL_RESYNC_INTERVAL_TICKS: u64 = 8000;

/// Clamps a requested view radius into the legal range.
#[must_use]
pub fn clamp_view_distance(requested: i32) -> i32 {
    requested.clamp(MIN_VIEW_DISTANCE, MAX_VIEW_DISTANCE)
}

struct PlayerView {
    chunk_pos: ChunkPos,
    view_radius: i32,
    position: Vector3<f64>,
    watched: FxHashSet<ChunkPos>,
    send_queue: Vec<ChunkPos>,
}

/// The outcome of adding a player: the spiral-ordered send queue and the
/// subset of those chunks that were just created (and so need a generation
/// request).
pub struct AddPlayerResult {
    pub send_queue: Vec<ChunkPos>,
    pub chunk_loads: Vec<ChunkPos>,
}

/// The outcome of a movement update: newly visible chunks (in spiral order)
/// and chunks that fell out of view, some of which may need unloading.
#[derive(Default)]
pub struct MovementUpdateResult {
    pub chunk_loads: Vec<ChunkPos>,
    pub chunk_unloads: Vec<ChunkPos>,
}

/// An emitted flush: the chunk, what changed, and who to send it to.
pub struct FlushedUpdate {
    pub pos: ChunkPos,
    pub update: ChunkUpdate,
    pub watchers: Vec<EntityId>,
}

/// Owns every chunk's watcher instance and every player's view state for one
/// world (§4.3, §5 "owned by the simulation thread").
#[derive(Default)]
pub struct PlayerChunkManager {
    instances: FxHashMap<ChunkPos, PlayerInstance>,
    players: FxHashMap<EntityId, PlayerView>,
    ticks_since_resync: u64,
}

impl PlayerChunkManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn instance_mut(&mut self, pos: ChunkPos) -> &mut PlayerInstance {
        self.instances.entry(pos).or_insert_with(|| PlayerInstance::new(pos))
    }

    /// Adds a player at `position` with the given (pre-clamp) view radius
    /// (§4.3 "Add-player protocol"). Re-adding an already-present player is
    /// a no-op that returns their existing send queue unchanged (§8
    /// "Idempotence").
    pub fn add_player(&mut self, player: EntityId, position: Vector3<f64>, view_radius: i32) -> AddPlayerResult {
        if let Some(existing) = self.players.get(&player) {
            return AddPlayerResult {
                send_queue: existing.send_queue.clone(),
                chunk_loads: Vec::new(),
            };
        }

        let radius = clamp_view_distance(view_radius);
        let chunk_pos = chunk_pos_of(position);
        let send_queue = spiral_order(chunk_pos, radius);
        let mut chunk_loads = Vec::new();
        let mut watched = FxHashSet::default();
        for &pos in &send_queue {
            let created = !self.instances.contains_key(&pos);
            self.instance_mut(pos).add_watcher(player);
            watched.insert(pos);
            if created {
                chunk_loads.push(pos);
            }
        }

        self.players.insert(
            player,
            PlayerView {
                chunk_pos,
                view_radius: radius,
                position,
                watched,
                send_queue: send_queue.clone(),
            },
        );

        AddPlayerResult { send_queue, chunk_loads }
    }

    /// Removes a player from every chunk they were watching, returning the
    /// chunks that lost their last watcher and are eligible for unload
    /// unless the dimension persists unwatched chunks (§3 "Lifecycles").
    pub fn remove_player(&mut self, player: EntityId, persist_unwatched_chunks: bool) -> Vec<ChunkPos> {
        let Some(view) = self.players.remove(&player) else {
            return Vec::new();
        };
        let mut unloads = Vec::new();
        for pos in view.watched {
            if let Some(instance) = self.instances.get_mut(&pos) {
                let now_empty = instance.remove_watcher(player);
                if now_empty {
                    if !persist_unwatched_chunks {
                        self.instances.remove(&pos);
                        unloads.push(pos);
                    }
                }
            }
        }
        unloads
    }

    /// Recomputes a player's view rectangle if they've moved far enough
    /// (§4.3 "Movement update").
    pub fn movement_update(&mut self, player: EntityId, new_position: Vector3<f64>) -> MovementUpdateResult {
        let Some(view) = self.players.get_mut(&player) else {
            return MovementUpdateResult::default();
        };

        let dx = new_position.x - view.position.x;
        let dz = new_position.z - view.position.z;
        if dx * dx + dz * dz < MOVEMENT_RECOMPUTE_THRESHOLD_SQ {
            view.position = new_position;
            return MovementUpdateResult::default();
        }

        let new_chunk_pos = chunk_pos_of(new_position);
        let new_send_queue = spiral_order(new_chunk_pos, view.view_radius);
        let new_watched: FxHashSet<ChunkPos> = new_send_queue.iter().copied().collect();

        let to_remove: Vec<ChunkPos> = view.watched.difference(&new_watched).copied().collect();
        let to_add_ordered: Vec<ChunkPos> = new_send_queue
            .iter()
            .filter(|pos| !view.watched.contains(pos))
            .copied()
            .collect();

        let mut result = MovementUpdateResult::default();
        for pos in &to_add_ordered {
            let created = !self.instances.contains_key(pos);
            self.instance_mut(*pos).add_watcher(player);
            if created {
                result.chunk_loads.push(*pos);
            }
        }
        for pos in to_remove {
            if let Some(instance) = self.instances.get_mut(&pos) {
                let now_empty = instance.remove_watcher(player);
                if now_empty {
                    self.instances.remove(&pos);
                    result.chunk_unloads.push(pos);
                }
            }
        }

        let view = self.players.get_mut(&player).expect("player present, checked above");
        view.chunk_pos = new_chunk_pos;
        view.position = new_position;
        view.watched = new_watched;
        view.send_queue = new_send_queue;

        result
    }

    /// Routes a block change to its owning chunk's watcher instance (§4.3
    /// "Block-change propagation").
    pub fn notify_block_change(&mut self, pos: BlockPos) {
        let chunk = pos.chunk_pos();
        if let Some(instance) = self.instances.get_mut(&chunk) {
            #[allow(clippy::cast_sign_loss)]
            instance.record_change(pos.chunk_local_x() as u8, pos.y() as u8, pos.chunk_local_z() as u8);
        }
    }

    /// Flushes every dirty instance's pending update, forcing a full resync
    /// of every instance once every [`FULL_RESYNC_INTERVAL_TICKS`] ticks
    /// (§4.3 "Full resync").
    pub fn tick(&mut self) -> Vec<FlushedUpdate> {
        self.ticks_since_resync += 1;
        if self.ticks_since_resync >= FULL_RESYNC_INTERVAL_TICKS {
            self.ticks_since_resync = 0;
            for instance in self.instances.values_mut() {
                instance.force_resync();
            }
        }

        let mut out = Vec::new();
        for (&pos, instance) in &mut self.instances {
            if let Some(update) = instance.drain_update() {
                out.push(FlushedUpdate {
                    pos,
                    update,
                    watchers: instance.watchers().iter().copied().collect(),
                });
            }
        }
        out
    }

    /// Whether a player is currently being tracked by this manager.
    #[must_use]
    pub fn contains_player(&self, player: EntityId) -> bool {
        self.players.contains_key(&player)
    }

    /// The instance's watcher set for test/invariant assertions (§8 "For
    /// every player P and every chunk C in P's send queue, C's watcher set
    /// contains P").
    #[must_use]
    pub fn watchers_of(&self, pos: ChunkPos) -> Option<&FxHashSet<EntityId>> {
        self.instances.get(&pos).map(PlayerInstance::watchers)
    }
}

fn chunk_pos_of(position: Vector3<f64>) -> ChunkPos {
    #[allow(clippy::cast_possible_truncation)]
    ChunkPos::new((position.x as i32) >> 4, (position.z as i32) >> 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_distance_clamps_to_bounds() {
        assert_eq!(clamp_view_distance(0), MIN_VIEW_DISTANCE);
        assert_eq!(clamp_view_distance(2), MIN_VIEW_DISTANCE);
        assert_eq!(clamp_view_distance(100), MAX_VIEW_DISTANCE);
        assert_eq!(clamp_view_distance(10), 10);
    }

    #[test]
    fn every_chunk_in_the_send_queue_watches_the_player() {
        let mut manager = PlayerChunkManager::new();
        let result = manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        for pos in &result.send_queue {
            assert!(manager.watchers_of(*pos).unwrap().contains(&1));
        }
    }

    #[test]
    fn readding_a_present_player_is_a_no_op() {
        let mut manager = PlayerChunkManager::new();
        let first = manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        let second = manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 5);
        assert_eq!(first.send_queue, second.send_queue);
        assert!(second.chunk_loads.is_empty());
    }

    #[test]
    fn removing_the_last_watcher_unloads_the_chunk() {
        let mut manager = PlayerChunkManager::new();
        manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        let unloaded = manager.remove_player(1, false);
        assert!(!unloaded.is_empty());
        assert!(manager.watchers_of(ChunkPos::new(0, 0)).is_none());
    }

    #[test]
    fn persisting_unwatched_chunks_keeps_the_instance_alive() {
        let mut manager = PlayerChunkManager::new();
        manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        let unloaded = manager.remove_player(1, true);
        assert!(unloaded.is_empty());
        assert!(manager.watchers_of(ChunkPos::new(0, 0)).is_some());
    }

    #[test]
    fn small_movement_does_not_recompute_view() {
        let mut manager = PlayerChunkManager::new();
        manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        let result = manager.movement_update(1, Vector3::new(2.0, 64.0, 0.0));
        assert!(result.chunk_loads.is_empty());
        assert!(result.chunk_unloads.is_empty());
    }

    #[test]
    fn large_movement_adds_and_removes_chunks() {
        let mut manager = PlayerChunkManager::new();
        manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        let result = manager.movement_update(1, Vector3::new(300.0, 64.0, 0.0));
        assert!(!result.chunk_loads.is_empty());
        assert!(!result.chunk_unloads.is_empty());
        assert!(manager.watchers_of(ChunkPos::new(0, 0)).is_none());
    }

    #[test]
    fn block_change_propagates_to_owning_instance() {
        let mut manager = PlayerChunkManager::new();
        manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        manager.notify_block_change(BlockPos::new(1, 70, 1));
        let updates = manager.tick();
        assert!(updates.iter().any(|u| u.pos == ChunkPos::new(0, 0)));
    }

    #[test]
    fn full_resync_fires_after_the_interval() {
        let mut manager = PlayerChunkManager::new();
        manager.add_player(1, Vector3::new(0.0, 64.0, 0.0), 3);
        manager.tick(); // clears the initial no-op state
        for _ in 0..FULL_RESYNC_INTERVAL_TICKS - 1 {
            manager.tick();
        }
        let updates = manager.tick();
        assert!(updates
            .iter()
            .any(|u| matches!(u.update, ChunkUpdate::FullResend)));
    }
}
