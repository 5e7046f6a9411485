//! Natural mob spawning (§4.10 "Mob spawner (§natural spawning)").
//!
//! Builds the eligible-chunk map from player positions, then rolls spawn
//! attempts per creature category subject to a world population cap. The
//! actual "is this cell standable / is a mob of this category allowed
//! here" decision is an external collaborator (block registry + entity
//! registry, §1); this module only decides *where attempts happen* and
//! *whether the cap allows another spawn*.

use rustc_hash::FxHashSet;
use terra_utils::random::legacy::LegacyRandom;
use terra_utils::{BlockPos, ChunkPos};

/// The four creature spawning categories and their population caps (§4.10
/// "caps `{70, 10, 5, 15}`").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatureCategory {
    Monster,
    Creature,
    WaterCreature,
    Ambient,
}

impl CreatureCategory {
    #[must_use]
    pub const fn cap(self) -> u32 {
        match self {
            Self::Monster => 70,
            Self::Creature => 10,
            Self::WaterCreature => 5,
            Self::Ambient => 15,
        }
    }
}

/// The half-width of the per-player eligible chunk square (§4.10 "the 17x17
/// chunk square centred on them is eligible").
const ELIGIBLE_SQUARE_HALF: i32 = 8;

/// Builds the set of chunks eligible for natural spawning this tick: the
/// union of each player's centered square, minus each square's own border
/// ring (§4.10 "its border is marked ineligible (we spawn only in interior
/// so mobs appear 'just offscreen')").
#[must_use]
pub fn eligible_chunks(player_chunks: &[ChunkPos]) -> FxHashSet<ChunkPos> {
    let mut eligible = FxHashSet::default();
    for &center in player_chunks {
        for dz in -ELIGIBLE_SQUARE_HALF..=ELIGIBLE_SQUARE_HALF {
            for dx in -ELIGIBLE_SQUARE_HALF..=ELIGIBLE_SQUARE_HALF {
                let on_border = dx.abs() == ELIGIBLE_SQUARE_HALF || dz.abs() == ELIGIBLE_SQUARE_HALF;
                if !on_border {
                    eligible.insert(ChunkPos::new(center.x + dx, center.z + dz));
                }
            }
        }
    }
    eligible
}

/// Minimum distance from any player or from spawn a spawn attempt must
/// clear (§4.10 ">= 24 blocks from any player, >= 24 blocks from spawn").
pub const MIN_DISTANCE_FROM_PLAYER: f64 = 24.0;
pub const MIN_DISTANCE_FROM_SPAWN: f64 = 24.0;

/// Per-pack attempt shape (§4.10 "for up to 3 packs x 4 attempts each,
/// wander by +-6 XZ and +-1 Y").
const PACKS_PER_CHUNK: u32 = 3;
const ATTEMPTS_PER_PACK: u32 = 4;
const WANDER_XZ: i32 = 6;
const WANDER_Y: i32 = 1;

/// One proposed spawn attempt: the category and the candidate block
/// position. The caller checks standability, registry spawn rules, and
/// biome eligibility before actually creating the entity (§1).
#[derive(Debug, Clone, Copy)]
pub struct SpawnAttempt {
    pub category: CreatureCategory,
    pub pos: BlockPos,
}

/// Whether `category`'s current population already exceeds its cap, scaled
/// by how many chunks are eligible this tick (§4.10 "skip if
/// `current_count > cap * eligible_chunks / 256`").
#[must_use]
pub fn category_is_full(category: CreatureCategory, current_count: u32, eligible_chunk_count: usize) -> bool {
    let scaled_cap = u64::from(category.cap()) * eligible_chunk_count as u64 / 256;
    u64::from(current_count) > scaled_cap
}

/// Generates the candidate spawn attempts for one eligible chunk and
/// category, using a per-chunk-per-category RNG so attempts are
/// reproducible given the same world tick and seed.
pub fn attempts_for_chunk(rng: &mut LegacyRandom, category: CreatureCategory, chunk: ChunkPos) -> Vec<SpawnAttempt> {
    let mut attempts = Vec::with_capacity((PACKS_PER_CHUNK * ATTEMPTS_PER_PACK) as usize);
    let base_x = chunk.x * 16 + rng.next_i32_bounded(16);
    let base_z = chunk.z * 16 + rng.next_i32_bounded(16);
    let base_y = rng.next_i32_bounded(256);

    for _ in 0..PACKS_PER_CHUNK {
        let mut x = base_x;
        let mut y = base_y;
        let mut z = base_z;
        for _ in 0..ATTEMPTS_PER_PACK {
            x += rng.next_i32_bounded(WANDER_XZ * 2 + 1) - WANDER_XZ;
            z += rng.next_i32_bounded(WANDER_XZ * 2 + 1) - WANDER_XZ;
            y += rng.next_i32_bounded(WANDER_Y * 2 + 1) - WANDER_Y;
            let y = y.clamp(0, 255);
            attempts.push(SpawnAttempt {
                category,
                pos: BlockPos::new(x, y, z),
            });
        }
    }
    attempts
}

/// Whether a candidate position is far enough from every player and from
/// spawn to host a natural spawn (§4.10).
#[must_use]
pub fn clears_distance_checks(pos: BlockPos, players: &[BlockPos], spawn: BlockPos) -> bool {
    let far_from_players = players
        .iter()
        .all(|p| pos.distance_squared(p) >= MIN_DISTANCE_FROM_PLAYER * MIN_DISTANCE_FROM_PLAYER);
    let far_from_spawn = pos.distance_squared(&spawn) >= MIN_DISTANCE_FROM_SPAWN * MIN_DISTANCE_FROM_SPAWN;
    far_from_players && far_from_spawn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_chunks_excludes_the_square_border() {
        let eligible = eligible_chunks(&[ChunkPos::new(0, 0)]);
        assert!(eligible.contains(&ChunkPos::new(0, 0)));
        assert!(!eligible.contains(&ChunkPos::new(8, 0)));
        assert!(!eligible.contains(&ChunkPos::new(-8, -8)));
        assert!(eligible.contains(&ChunkPos::new(7, 7)));
    }

    #[test]
    fn category_cap_scales_with_eligible_chunks() {
        assert!(!category_is_full(CreatureCategory::Monster, 10, 256));
        assert!(category_is_full(CreatureCategory::Monster, 71, 256));
        assert!(category_is_full(CreatureCategory::Monster, 10, 10));
    }

    #[test]
    fn attempts_produce_twelve_candidates_per_chunk() {
        let mut rng = LegacyRandom::new(1);
        let attempts = attempts_for_chunk(&mut rng, CreatureCategory::Monster, ChunkPos::new(0, 0));
        assert_eq!(attempts.len(), (PACKS_PER_CHUNK * ATTEMPTS_PER_PACK) as usize);
    }

    #[test]
    fn distance_check_rejects_positions_near_players() {
        let pos = BlockPos::new(0, 64, 0);
        let players = [BlockPos::new(1, 64, 0)];
        let spawn = BlockPos::new(1000, 64, 1000);
        assert!(!clears_distance_checks(pos, &players, spawn));
    }

    #[test]
    fn distance_check_accepts_far_positions() {
        let pos = BlockPos::new(0, 64, 0);
        let players = [BlockPos::new(100, 64, 100)];
        let spawn = BlockPos::new(1000, 64, 1000);
        assert!(clears_distance_checks(pos, &players, spawn));
    }
}
