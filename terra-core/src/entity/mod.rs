//! The entity model (§3 "Entity"), its id allocator, and the per-world
//! tracker (§4.4).
//!
//! The deep `Entity -> LivingBase -> Player|Mob` inheritance chain of the
//! reference implementation is replaced with composition plus a tagged
//! variant (§9 "Deep inheritance"): [`Entity`] carries the fields common to
//! every entity kind, and [`EntityKind`] holds the per-kind payload. Ticking
//! dispatches on the variant rather than through virtual calls.

pub mod data_watcher;
pub mod tracker;

use std::sync::atomic::{AtomicI32, Ordering};

use terra_utils::{Aabb, Vector3};
use uuid::Uuid;

use data_watcher::DataWatcher;

/// Globally unique, strictly monotonic entity id (§3 invariant: "Entity ids
/// are never reused... allocation is strictly monotonic across all
/// threads").
pub type EntityId = i32;

/// Process-wide atomic entity id allocator (§5 "Entity id allocation is an
/// atomic counter shared across worlds", §9 "Globals").
#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: AtomicI32,
}

impl EntityIdAllocator {
    /// Creates an allocator starting at id 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicI32::new(0),
        }
    }

    /// Allocates and returns the next entity id. Thread-safe; never reuses a
    /// value already handed out.
    pub fn allocate(&self) -> EntityId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// The tagged variant replacing the reference implementation's deep
/// inheritance hierarchy (§9). Ticking and behavior dispatch match on this.
#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(PlayerData),
    Mob(MobData),
    Arrow(ProjectileData),
    Throwable(ProjectileData),
    FallingBlock { block_id: u16, metadata: u8 },
    Tnt { fuse: i32 },
    Minecart(MinecartData),
    Boat,
    Item { stack_item_id: u16, count: u8 },
    XpOrb { value: i32 },
    LightningBolt { lifetime: i32 },
}

/// Per-kind data carried by mob entities (§3: `Creature`, `Monster`,
/// `Animal` are orthogonal refinements of `Mob`, distinguished here by
/// flags rather than further variants so pathfinding/AI code doesn't need
/// to match on a deeper enum).
#[derive(Debug, Clone)]
pub struct MobData {
    pub can_path_find: bool,
    pub is_hostile: bool,
    pub can_breed: bool,
    pub love_cooldown: i32,
}

/// Per-kind data for player entities.
#[derive(Debug, Clone)]
pub struct PlayerData {
    pub game_mode: GameMode,
    pub in_bed: bool,
    pub ticks_in_bed: i32,
    pub is_spectator: bool,
}

/// Per-kind data for arrows/throwables.
#[derive(Debug, Clone)]
pub struct ProjectileData {
    pub owner: Option<EntityId>,
    pub in_ground: bool,
}

/// Per-kind data for minecarts (§9 Design Notes, minecart collision gate).
#[derive(Debug, Clone)]
pub struct MinecartData {
    pub on_rail: bool,
}

/// Minecart-minecart collision dot-product gate: two minecarts travelling
/// along nearly the same or nearly opposite line (`|cos θ| >= 0.8`) pass
/// through each other's push resolution rather than bouncing apart.
/// Preserved verbatim from the reference implementation; the underlying
/// rationale isn't recoverable from the source, so the number is kept
/// as-is rather than re-derived (§9 Open Questions).
pub const MINECART_COLLISION_COS_GATE: f64 = 0.8;

/// Whether two minecarts moving along `a` and `b` should skip collision
/// push-apart this tick, per [`MINECART_COLLISION_COS_GATE`].
#[must_use]
pub fn minecart_collision_should_skip(a: Vector3<f64>, b: Vector3<f64>) -> bool {
    let len_a = (a.x * a.x + a.z * a.z).sqrt();
    let len_b = (b.x * b.x + b.z * b.z).sqrt();
    if len_a < f64::EPSILON || len_b < f64::EPSILON {
        return false;
    }
    let cos_theta = (a.x * b.x + a.z * b.z) / (len_a * len_b);
    cos_theta.abs() >= MINECART_COLLISION_COS_GATE
}

/// A player's game mode, consulted by the sleep-resolution tick stage and
/// natural spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

/// The common fields shared by every entity kind (§3 "Entity").
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub uuid: Uuid,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub yaw: f32,
    pub pitch: f32,
    pub bounding_box: Aabb,
    pub on_ground: bool,
    pub fire_ticks: i32,
    pub fall_distance: f32,
    pub dimension_id: i32,
    pub data_watcher: DataWatcher,
    pub dead: bool,
    pub kind: EntityKind,
}

impl Entity {
    /// Creates a new entity at the given position, allocating its id from
    /// the shared allocator.
    #[must_use]
    pub fn new(
        allocator: &EntityIdAllocator,
        position: Vector3<f64>,
        dimension_id: i32,
        kind: EntityKind,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: allocator.allocate(),
            uuid: Uuid::new_v4(),
            position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            bounding_box: Aabb::centered_at(position.x, position.y, position.z, width, height),
            on_ground: false,
            fire_ticks: 0,
            fall_distance: 0.0,
            dimension_id,
            data_watcher: DataWatcher::new(),
            dead: false,
            kind,
        }
    }

    /// The chunk coordinates containing this entity's current position.
    #[must_use]
    pub fn chunk_pos(&self) -> terra_utils::ChunkPos {
        terra_utils::ChunkPos::new((self.position.x as i32) >> 4, (self.position.z as i32) >> 4)
    }

    /// Recomputes the bounding box to follow the current position, keeping
    /// its width/height fixed.
    pub fn sync_bounding_box(&mut self, width: f64, height: f64) {
        self.bounding_box =
            Aabb::centered_at(self.position.x, self.position.y, self.position.z, width, height);
    }

    /// Whether this entity is a player (used by tracker range lookups and
    /// sleep resolution).
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_strictly_monotonic() {
        let allocator = EntityIdAllocator::new();
        let ids: Vec<_> = (0..100).map(|_| allocator.allocate()).collect();
        for window in ids.windows(2) {
            assert!(window[1] > window[0]);
        }
    }

    #[test]
    fn new_entity_has_zero_velocity_and_matching_bounding_box() {
        let allocator = EntityIdAllocator::new();
        let entity = Entity::new(
            &allocator,
            Vector3::new(0.0, 64.0, 0.0),
            0,
            EntityKind::Boat,
            1.0,
            2.0,
        );
        assert!(entity.bounding_box.contains(0.0, 64.0, 0.0));
        assert!(!entity.bounding_box.contains(0.0, 66.1, 0.0));
    }

    #[test]
    fn minecart_collision_gate_skips_parallel_and_opposed_travel() {
        let forward = Vector3::new(1.0, 0.0, 0.0);
        let same_direction = Vector3::new(2.0, 0.0, 0.0);
        let opposite_direction = Vector3::new(-1.0, 0.0, 0.0);
        let perpendicular = Vector3::new(0.0, 0.0, 1.0);

        assert!(minecart_collision_should_skip(forward, same_direction));
        assert!(minecart_collision_should_skip(forward, opposite_direction));
        assert!(!minecart_collision_should_skip(forward, perpendicular));
    }
}
