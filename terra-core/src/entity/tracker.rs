//! Per-world entity visibility tracker (§4.4 "Entity Tracker").
//!
//! For each entity, maintains the set of players that can see it, decides
//! entering/leaving events, and emits movement deltas at the entity's
//! configured cadence. A chunk index is kept for the crossing fast path;
//! range/interval/velocity-flag are per-entity-kind parameters rather than a
//! single protocol constant, and the tracker emits plain events instead of
//! building network packets — the wire encoding of those events is an
//! external collaborator (§1).

use rustc_hash::FxHashSet;
use terra_utils::locks::SyncRwLock;
use terra_utils::{ChunkPos, Vector3};

use super::{EntityId, EntityKind};

/// An entity's tracking cadence and range (§4.4 "Per-entity parameters").
#[derive(Debug, Clone, Copy)]
pub struct TrackingParams {
    pub range_blocks: i32,
    pub update_interval_ticks: u32,
    pub send_velocity: bool,
}

impl TrackingParams {
    const fn new(range_blocks: i32, update_interval_ticks: u32, send_velocity: bool) -> Self {
        Self {
            range_blocks,
            update_interval_ticks,
            send_velocity,
        }
    }

    /// Looks up the tracking parameters for an entity kind (§4.4 examples:
    /// "player 512/2/off, arrow 64/20/off, monster 80/3/on, hanging
    /// 160/∞/off, ender-crystal 256/∞/off").
    #[must_use]
    pub const fn for_kind(kind: &EntityKind) -> Self {
        match kind {
            EntityKind::Player(_) => Self::new(512, 2, false),
            EntityKind::Arrow(_) | EntityKind::Throwable(_) => Self::new(64, 20, false),
            EntityKind::Mob(data) if data.is_hostile => Self::new(80, 3, true),
            EntityKind::Mob(_) => Self::new(80, 3, true),
            EntityKind::Minecart(_) | EntityKind::Boat => Self::new(80, 3, true),
            EntityKind::Tnt { .. } | EntityKind::FallingBlock { .. } => Self::new(160, 5, true),
            EntityKind::Item { .. } | EntityKind::XpOrb { .. } => Self::new(160, 20, true),
            EntityKind::LightningBolt { .. } => Self::new(160, u32::MAX, false),
        }
    }
}

/// A position/rotation snapshot used to decide whether a movement delta is
/// owed this interval (§4.4 step 4).
#[derive(Debug, Clone, Copy, Default)]
struct Snapshot {
    position: Vector3<f64>,
    yaw: f32,
    pitch: f32,
}

/// The quantisation step below which a movement delta is not worth sending,
/// matching vanilla's 1/32-block fixed-point resolution (§4.4).
const MOVEMENT_QUANTISATION_STEP: f64 = 1.0 / 32.0;

/// The largest delta (in quantisation steps) that fits the relative-move
/// packet's signed-byte field; beyond this an absolute teleport is emitted.
const MAX_RELATIVE_DELTA_STEPS: f64 = 127.0;

/// An observable change in an entity's visibility or state, consumed by the
/// network layer (§1, §4.4).
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// `entity_id` just entered `player_id`'s view; a full spawn is owed.
    Enter { entity_id: EntityId, player_id: EntityId },
    /// `entity_id` left `player_id`'s view; a despawn is owed.
    Leave { entity_id: EntityId, player_id: EntityId },
    /// A relative move fits in a signed byte per axis, in 1/32-block units.
    RelativeMove {
        entity_id: EntityId,
        dx: i8,
        dy: i8,
        dz: i8,
        yaw: Option<f32>,
        pitch: Option<f32>,
    },
    /// The relative delta didn't fit; send the absolute position instead.
    Teleport {
        entity_id: EntityId,
        position: Vector3<f64>,
        yaw: f32,
        pitch: f32,
    },
    /// `entity_id` was destroyed; despawn for every watcher still tracking it.
    Destroy { entity_id: EntityId, player_id: EntityId },
}

struct TrackedEntity {
    params: TrackingParams,
    counter: u32,
    registered_chunks: FxHashSet<ChunkPos>,
    last_snapshot: Snapshot,
    seen_by: SyncRwLock<FxHashSet<EntityId>>,
}

/// A minimal player view the tracker needs: identity, position, dimension.
#[derive(Debug, Clone, Copy)]
pub struct TrackedPlayer {
    pub player_id: EntityId,
    pub position: Vector3<f64>,
    pub dimension_id: i32,
}

/// Chunk-indexed spatial tracker owned by a single world (§4.4, §5 "Tracker
/// ... owned by the simulation thread").
#[derive(Default)]
pub struct EntityTracker {
    chunks: scc::HashMap<ChunkPos, FxHashSet<EntityId>>,
    entities: scc::HashMap<EntityId, TrackedEntity>,
}

fn chunks_in_range(center: ChunkPos, range_chunks: i32) -> FxHashSet<ChunkPos> {
    let mut set = FxHashSet::default();
    for dx in -range_chunks..=range_chunks {
        for dz in -range_chunks..=range_chunks {
            set.insert(ChunkPos::new(center.x + dx, center.z + dz));
        }
    }
    set
}

impl EntityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entities currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are currently tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Registers an entity, indexing it into every chunk within its
    /// tracking range (expressed in chunks, `range_blocks >> 4` plus a
    /// margin chunk for entities sitting near an edge).
    pub fn add(&self, id: EntityId, kind: &EntityKind, position: Vector3<f64>, yaw: f32, pitch: f32) {
        let params = TrackingParams::for_kind(kind);
        let range_chunks = (params.range_blocks >> 4) + 1;
        let center = ChunkPos::new((position.x as i32) >> 4, (position.z as i32) >> 4);
        let registered_chunks = chunks_in_range(center, range_chunks);
        for &chunk in &registered_chunks {
            self.add_entity_to_chunk(chunk, id);
        }

        let tracked = TrackedEntity {
            params,
            counter: 0,
            registered_chunks,
            last_snapshot: Snapshot {
                position,
                yaw,
                pitch,
            },
            seen_by: SyncRwLock::new(FxHashSet::default()),
        };
        let _ = self.entities.insert_sync(id, tracked);
    }

    /// Removes a destroyed entity, returning the [`TrackerEvent::Destroy`]
    /// events owed to every watcher (§4.4 "Death").
    pub fn remove(&self, id: EntityId) -> Vec<TrackerEvent> {
        let Some((_, tracked)) = self.entities.remove_sync(&id) else {
            return Vec::new();
        };
        for chunk in &tracked.registered_chunks {
            self.remove_entity_from_chunk(*chunk, id);
        }
        tracked
            .seen_by
            .read()
            .iter()
            .map(|&player_id| TrackerEvent::Destroy {
                entity_id: id,
                player_id,
            })
            .collect()
    }

    /// Runs the per-tick update loop for one entity against the full set of
    /// players sharing its dimension (§4.4 "Update loop").
    pub fn tick(&self, id: EntityId, dimension_id: i32, players: &[TrackedPlayer]) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        self.entities.update_sync(&id, |_, tracked| {
            tracked.counter = tracked.counter.wrapping_add(1);
            let range = f64::from(tracked.params.range_blocks);
            let mut seen_by = tracked.seen_by.write();

            for player in players {
                if player.dimension_id != dimension_id {
                    if seen_by.remove(&player.player_id) {
                        events.push(TrackerEvent::Leave {
                            entity_id: id,
                            player_id: player.player_id,
                        });
                    }
                    continue;
                }
                let in_range = (player.position.x - tracked.last_snapshot.position.x).abs() <= range
                    && (player.position.z - tracked.last_snapshot.position.z).abs() <= range;
                let was_tracking = seen_by.contains(&player.player_id);

                if in_range && !was_tracking {
                    seen_by.insert(player.player_id);
                    events.push(TrackerEvent::Enter {
                        entity_id: id,
                        player_id: player.player_id,
                    });
                } else if !in_range && was_tracking {
                    seen_by.remove(&player.player_id);
                    events.push(TrackerEvent::Leave {
                        entity_id: id,
                        player_id: player.player_id,
                    });
                }
            }

        });
        events
    }

    /// Records that an entity moved to `position`/`yaw`/`pitch`, emitting a
    /// relative move or teleport if the interval cadence and quantisation
    /// threshold are satisfied (§4.4 step 4), and re-indexing chunk
    /// registration on a chunk crossing. The caller is expected to invoke
    /// this only on ticks where `(counter mod interval) == 0`, as decided by
    /// [`Self::tick`]'s caller.
    pub fn record_movement(
        &self,
        id: EntityId,
        position: Vector3<f64>,
        yaw: f32,
        pitch: f32,
    ) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        self.entities.update_sync(&id, |_, tracked| {
            let prev = tracked.last_snapshot;
            let dx = (position.x - prev.position.x) / MOVEMENT_QUANTISATION_STEP;
            let dy = (position.y - prev.position.y) / MOVEMENT_QUANTISATION_STEP;
            let dz = (position.z - prev.position.z) / MOVEMENT_QUANTISATION_STEP;
            let rotation_changed = (yaw - prev.yaw).abs() > f32::EPSILON || (pitch - prev.pitch).abs() > f32::EPSILON;
            let moved = dx.abs() > 0.0 || dy.abs() > 0.0 || dz.abs() > 0.0;
            if !moved && !rotation_changed {
                return;
            }

            let seen_by = tracked.seen_by.read();
            if dx.abs() <= MAX_RELATIVE_DELTA_STEPS
                && dy.abs() <= MAX_RELATIVE_DELTA_STEPS
                && dz.abs() <= MAX_RELATIVE_DELTA_STEPS
            {
                #[allow(clippy::cast_possible_truncation)]
                let (dx8, dy8, dz8) = (dx as i8, dy as i8, dz as i8);
                for &player_id in seen_by.iter() {
                    events.push(TrackerEvent::RelativeMove {
                        entity_id: id,
                        dx: dx8,
                        dy: dy8,
                        dz: dz8,
                        yaw: rotation_changed.then_some(yaw),
                        pitch: rotation_changed.then_some(pitch),
                    });
                }
            } else {
                for &player_id in seen_by.iter() {
                    events.push(TrackerEvent::Teleport {
                        entity_id: id,
                        position,
                        yaw,
                        pitch,
                    });
                    let _ = player_id;
                }
            }
            drop(seen_by);
            tracked.last_snapshot = Snapshot {
                position,
                yaw,
                pitch,
            };

            let old_chunk = ChunkPos::new((prev.position.x as i32) >> 4, (prev.position.z as i32) >> 4);
            let new_chunk = ChunkPos::new((position.x as i32) >> 4, (position.z as i32) >> 4);
            if old_chunk != new_chunk {
                self.recompute_registration(id, tracked, new_chunk);
            }
        });
        events
    }

    fn recompute_registration(&self, id: EntityId, tracked: &mut TrackedEntity, new_center: ChunkPos) {
        let range_chunks = (tracked.params.range_blocks >> 4) + 1;
        let new_chunks = chunks_in_range(new_center, range_chunks);

        let to_remove: Vec<ChunkPos> = tracked
            .registered_chunks
            .difference(&new_chunks)
            .copied()
            .collect();
        let to_add: Vec<ChunkPos> = new_chunks
            .difference(&tracked.registered_chunks)
            .copied()
            .collect();

        for chunk in to_remove {
            self.remove_entity_from_chunk(chunk, id);
            tracked.registered_chunks.remove(&chunk);
        }
        for chunk in to_add {
            self.add_entity_to_chunk(chunk, id);
            tracked.registered_chunks.insert(chunk);
        }
    }

    /// Whether this entity's movement-delta interval elapses on the current
    /// tick (§4.4 step 4: `(counter mod interval) == 0`). The world tick
    /// pipeline calls [`Self::tick`] first, then consults this to decide
    /// whether to also call [`Self::record_movement`] this tick.
    #[must_use]
    pub fn movement_due(&self, id: EntityId) -> bool {
        self.entities
            .read_sync(&id, |_, tracked| {
                tracked.params.update_interval_ticks != 0
                    && tracked.counter % tracked.params.update_interval_ticks == 0
            })
            .unwrap_or(false)
    }

    /// The crossing fast path (§4.4 "Chunk crossing"): returns the entity
    /// ids registered in `crossed_chunk`, for a player who just moved into
    /// it, instead of scanning every tracked entity.
    #[must_use]
    pub fn entities_in_chunk(&self, crossed_chunk: ChunkPos) -> Vec<EntityId> {
        self.chunks
            .read_sync(&crossed_chunk, |_, set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Forces a player out of every entity's watcher set, e.g. on
    /// disconnect, returning the [`TrackerEvent::Leave`] events owed.
    pub fn remove_player(&self, player_id: EntityId) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        self.entities.iter_sync(|entity_id, tracked| {
            if tracked.seen_by.write().remove(&player_id) {
                events.push(TrackerEvent::Leave {
                    entity_id: *entity_id,
                    player_id,
                });
            }
            true
        });
        events
    }

    fn add_entity_to_chunk(&self, chunk: ChunkPos, id: EntityId) {
        if self
            .chunks
            .update_sync(&chunk, |_, set| {
                set.insert(id);
            })
            .is_none()
        {
            let mut set = FxHashSet::default();
            set.insert(id);
            let _ = self.chunks.insert_sync(chunk, set);
        }
    }

    fn remove_entity_from_chunk(&self, chunk: ChunkPos, id: EntityId) {
        let now_empty = self
            .chunks
            .update_sync(&chunk, |_, set| {
                set.remove(&id);
                set.is_empty()
            })
            .unwrap_or(false);
        if now_empty {
            let _ = self.chunks.remove_if_sync(&chunk, |set| set.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MobData;

    fn hostile_mob() -> EntityKind {
        EntityKind::Mob(MobData {
            can_path_find: true,
            is_hostile: true,
            can_breed: false,
            love_cooldown: 0,
        })
    }

    #[test]
    fn entering_range_emits_enter_and_leaving_emits_leave() {
        let tracker = EntityTracker::new();
        let kind = hostile_mob();
        tracker.add(1, &kind, Vector3::new(0.0, 64.0, 0.0), 0.0, 0.0);

        let near = TrackedPlayer {
            player_id: 100,
            position: Vector3::new(10.0, 64.0, 0.0),
            dimension_id: 0,
        };
        let events = tracker.tick(1, 0, &[near]);
        assert!(events.contains(&TrackerEvent::Enter {
            entity_id: 1,
            player_id: 100,
        }));

        let far = TrackedPlayer {
            player_id: 100,
            position: Vector3::new(5000.0, 64.0, 0.0),
            dimension_id: 0,
        };
        let events = tracker.tick(1, 0, &[far]);
        assert!(events.contains(&TrackerEvent::Leave {
            entity_id: 1,
            player_id: 100,
        }));
    }

    #[test]
    fn destroying_a_tracked_entity_emits_destroy_for_every_watcher() {
        let tracker = EntityTracker::new();
        let kind = hostile_mob();
        tracker.add(2, &kind, Vector3::new(0.0, 64.0, 0.0), 0.0, 0.0);
        let near = TrackedPlayer {
            player_id: 7,
            position: Vector3::new(1.0, 64.0, 0.0),
            dimension_id: 0,
        };
        tracker.tick(2, 0, &[near]);

        let destroy_events = tracker.remove(2);
        assert_eq!(
            destroy_events,
            vec![TrackerEvent::Destroy {
                entity_id: 2,
                player_id: 7,
            }]
        );
        assert!(tracker.entities_in_chunk(ChunkPos::new(0, 0)).is_empty());
    }

    #[test]
    fn chunk_crossing_fast_path_finds_registered_entities() {
        let tracker = EntityTracker::new();
        let kind = hostile_mob();
        tracker.add(3, &kind, Vector3::new(20.0, 64.0, 20.0), 0.0, 0.0);
        let chunk = ChunkPos::new(1, 1);
        assert!(tracker.entities_in_chunk(chunk).contains(&3));
    }

    #[test]
    fn relative_move_within_byte_range_does_not_teleport() {
        let tracker = EntityTracker::new();
        let kind = hostile_mob();
        tracker.add(4, &kind, Vector3::new(0.0, 64.0, 0.0), 0.0, 0.0);
        let near = TrackedPlayer {
            player_id: 9,
            position: Vector3::new(1.0, 64.0, 0.0),
            dimension_id: 0,
        };
        tracker.tick(4, 0, &[near]);

        let events = tracker.record_movement(4, Vector3::new(0.5, 64.0, 0.0), 0.0, 0.0);
        assert!(events
            .iter()
            .all(|e| matches!(e, TrackerEvent::RelativeMove { .. })));
        assert!(!events.is_empty());
    }

    #[test]
    fn large_jump_emits_teleport() {
        let tracker = EntityTracker::new();
        let kind = hostile_mob();
        tracker.add(5, &kind, Vector3::new(0.0, 64.0, 0.0), 0.0, 0.0);
        let near = TrackedPlayer {
            player_id: 11,
            position: Vector3::new(1.0, 64.0, 0.0),
            dimension_id: 0,
        };
        tracker.tick(5, 0, &[near]);

        let events = tracker.record_movement(5, Vector3::new(100.0, 64.0, 0.0), 0.0, 0.0);
        assert!(matches!(events[0], TrackerEvent::Teleport { .. }));
    }
}
