//! Structure placement (§4.9 step 4): per-chunk decisions about whether to
//! anchor a village/temple-style lattice structure, a mineshaft, or one of
//! the world's three strongholds.
//!
//! Grid-lattice structures (villages, temples, ...) and the one-shot
//! stronghold ring are placed purely from `(world_seed, cx, cz)`, so two
//! servers with the same seed agree on every structure's exact chunk
//! without coordinating (§4.9 "Deterministic terrain generation").

use std::f64::consts::PI;

use terra_utils::random::legacy::LegacyRandom;
use terra_utils::ChunkPos;

/// Grid cell size for lattice-placed structures (villages, temples), in
/// chunks (§4.9 "a grid lattice `(cx / 32, cz / 32)`").
pub const LATTICE_CELL_SIZE: i32 = 32;
/// The lattice offset is drawn from `[0, 32 - 8)` (§4.9).
const LATTICE_OFFSET_BOUND: i32 = LATTICE_CELL_SIZE - 8;

/// Per-structure-kind salt mixed into the lattice seed so villages and
/// temples don't collide on the same grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeStructureKind {
    Village,
    Temple,
}

impl LatticeStructureKind {
    const fn salt(self) -> i64 {
        match self {
            Self::Village => 10_387_312,
            Self::Temple => 14_357_617,
        }
    }
}

/// Picks the anchor chunk for the lattice cell containing `pos` and reports
/// whether `pos` itself is that anchor (§4.9 "a chunk hosts the structure
/// iff its coordinates match").
#[must_use]
pub fn lattice_anchor(world_seed: i64, kind: LatticeStructureKind, pos: ChunkPos) -> ChunkPos {
    let cell_x = pos.x.div_euclid(LATTICE_CELL_SIZE);
    let cell_z = pos.z.div_euclid(LATTICE_CELL_SIZE);
    let mut rng = LegacyRandom::new(
        world_seed
            ^ (i64::from(cell_x).wrapping_mul(341_873_128_712))
            ^ (i64::from(cell_z).wrapping_mul(132_897_987_541))
            ^ kind.salt(),
    );
    let offset_x = rng.next_i32_bounded(LATTICE_OFFSET_BOUND);
    let offset_z = rng.next_i32_bounded(LATTICE_OFFSET_BOUND);
    ChunkPos::new(cell_x * LATTICE_CELL_SIZE + offset_x, cell_z * LATTICE_CELL_SIZE + offset_z)
}

/// Whether `pos` is the anchor chunk for its lattice cell.
#[must_use]
pub fn hosts_lattice_structure(world_seed: i64, kind: LatticeStructureKind, pos: ChunkPos) -> bool {
    lattice_anchor(world_seed, kind, pos) == pos
}

/// Mineshafts use an independent 1%-per-chunk trial rather than a lattice
/// (§4.9 "Mineshafts use a per-chunk 1% independent trial").
#[must_use]
pub fn rolls_mineshaft(world_seed: i64, pos: ChunkPos) -> bool {
    let mut rng = LegacyRandom::new(
        world_seed
            ^ (i64::from(pos.x).wrapping_mul(341_873_128_712))
            ^ (i64::from(pos.z).wrapping_mul(132_897_987_541))
            ^ 0x5C_E1_30,
    );
    rng.next_f64() < 0.01
}

/// A stronghold's placement: a block-space center and the angle it sits at
/// on the origin-centered placement ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrongholdPlacement {
    pub x: i32,
    pub z: i32,
    pub angle_radians: f64,
}

/// Inner/outer radius of the stronghold ring, in blocks (§4.9 "placed on a
/// ring at distance 1408-2688 blocks from origin").
pub const STRONGHOLD_MIN_DISTANCE: f64 = 1408.0;
pub const STRONGHOLD_MAX_DISTANCE: f64 = 2688.0;
/// Exactly three strongholds, 120 degrees apart (§4.9).
pub const STRONGHOLD_COUNT: usize = 3;

/// Computes the three world-seed-deterministic stronghold placements
/// (§4.9 "Strongholds are three-per-world... angle seeded from the world
/// seed").
#[must_use]
pub fn stronghold_placements(world_seed: i64) -> [StrongholdPlacement; STRONGHOLD_COUNT] {
    let mut rng = LegacyRandom::new(world_seed);
    let base_angle = rng.next_f64() * PI * 2.0;
    std::array::from_fn(|i| {
        let angle = base_angle + (2.0 * PI / STRONGHOLD_COUNT as f64) * i as f64;
        let distance =
            STRONGHOLD_MIN_DISTANCE + (STRONGHOLD_MAX_DISTANCE - STRONGHOLD_MIN_DISTANCE) * rng.next_f64();
        #[allow(clippy::cast_possible_truncation)]
        let x = (angle.cos() * distance) as i32;
        #[allow(clippy::cast_possible_truncation)]
        let z = (angle.sin() * distance) as i32;
        StrongholdPlacement {
            x,
            z,
            angle_radians: angle,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_anchor_is_deterministic() {
        let pos = ChunkPos::new(5, 5);
        let a = lattice_anchor(1, LatticeStructureKind::Village, pos);
        let b = lattice_anchor(1, LatticeStructureKind::Village, pos);
        assert_eq!(a, b);
    }

    #[test]
    fn only_the_anchor_chunk_hosts_the_structure() {
        let world_seed = 99;
        let anchor = lattice_anchor(world_seed, LatticeStructureKind::Village, ChunkPos::new(0, 0));
        assert!(hosts_lattice_structure(world_seed, LatticeStructureKind::Village, anchor));
        let neighbor = ChunkPos::new(anchor.x + 1, anchor.z);
        if neighbor != anchor {
            assert!(!hosts_lattice_structure(world_seed, LatticeStructureKind::Village, neighbor));
        }
    }

    #[test]
    fn village_and_temple_lattices_diverge() {
        let pos = ChunkPos::new(3, 3);
        let village = lattice_anchor(42, LatticeStructureKind::Village, pos);
        let temple = lattice_anchor(42, LatticeStructureKind::Temple, pos);
        assert_ne!(village, temple);
    }

    #[test]
    fn mineshaft_roll_is_deterministic_per_chunk() {
        let pos = ChunkPos::new(10, 10);
        assert_eq!(rolls_mineshaft(5, pos), rolls_mineshaft(5, pos));
    }

    #[test]
    fn exactly_three_strongholds_120_degrees_apart() {
        let placements = stronghold_placements(123);
        assert_eq!(placements.len(), 3);
        for p in &placements {
            let distance = (f64::from(p.x).powi(2) + f64::from(p.z).powi(2)).sqrt();
            assert!(distance >= STRONGHOLD_MIN_DISTANCE - 1.0 && distance <= STRONGHOLD_MAX_DISTANCE + 1.0);
        }
        let delta = placements[1].angle_radians - placements[0].angle_radians;
        assert!((delta - 2.0 * PI / 3.0).abs() < 1e-9);
    }
}
