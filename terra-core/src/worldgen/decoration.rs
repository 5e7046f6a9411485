//! Chunk decoration (§4.9 step 5): ores, surface patches, vegetation, and
//! fluid springs, generated during neighbour-chunk population the way
//! vanilla decorates from the chunk one diagonal step removed so features
//! may straddle chunk borders.
//!
//! The full block/item registry is an external collaborator (§1); this
//! module computes *what* to place and *where*, deterministically from the
//! per-chunk RNG, and hands placement to the caller through
//! [`DecorationSink`] — it never touches a concrete block grid itself.

use terra_registry::biome::Biome;
use terra_utils::random::legacy::LegacyRandom;
use terra_utils::BlockPos;

/// One ore vein definition: block id, veins attempted per chunk, blocks per
/// vein, and the Y range it may spawn in (§4.9 step 5 "ores (dirt, gravel,
/// coal, iron, gold, redstone, diamond with uniform-Y spawns and lapis with
/// triangular Y distribution around y=16)").
#[derive(Debug, Clone, Copy)]
pub struct OreVein {
    pub block_id: u16,
    pub veins_per_chunk: u32,
    pub vein_size: u32,
    pub min_y: i32,
    pub max_y: i32,
    /// Lapis spawns in a triangular distribution centered on y=16 rather
    /// than uniformly across `[min_y, max_y]`.
    pub triangular: bool,
}

const DIRT_POCKET: u16 = 3;
const GRAVEL_POCKET: u16 = 13;
const COAL_ORE: u16 = 16;
const IRON_ORE: u16 = 15;
const GOLD_ORE: u16 = 14;
const REDSTONE_ORE: u16 = 73;
const DIAMOND_ORE: u16 = 56;
const LAPIS_ORE: u16 = 21;

/// The standard ore table (§4.9 step 5).
pub static ORE_VEINS: &[OreVein] = &[
    OreVein { block_id: DIRT_POCKET, veins_per_chunk: 20, vein_size: 32, min_y: 0, max_y: 256, triangular: false },
    OreVein { block_id: GRAVEL_POCKET, veins_per_chunk: 10, vein_size: 32, min_y: 0, max_y: 256, triangular: false },
    OreVein { block_id: COAL_ORE, veins_per_chunk: 20, vein_size: 16, min_y: 0, max_y: 128, triangular: false },
    OreVein { block_id: IRON_ORE, veins_per_chunk: 20, vein_size: 8, min_y: 0, max_y: 64, triangular: false },
    OreVein { block_id: GOLD_ORE, veins_per_chunk: 2, vein_size: 8, min_y: 0, max_y: 32, triangular: false },
    OreVein { block_id: REDSTONE_ORE, veins_per_chunk: 8, vein_size: 7, min_y: 0, max_y: 16, triangular: false },
    OreVein { block_id: DIAMOND_ORE, veins_per_chunk: 1, vein_size: 7, min_y: 0, max_y: 16, triangular: false },
    OreVein { block_id: LAPIS_ORE, veins_per_chunk: 1, vein_size: 6, min_y: 0, max_y: 32, triangular: true },
];

/// A single planned feature placement: an anchor position and its kind. The
/// caller's [`DecorationSink`] turns this into concrete block writes using
/// the real block registry.
#[derive(Debug, Clone, Copy)]
pub enum DecorationFeature {
    OreVein { anchor: BlockPos, block_id: u16, vein_size: u32 },
    SandPatch { anchor: BlockPos },
    ClayPatch { anchor: BlockPos },
    GravelPatch { anchor: BlockPos },
    Tree { anchor: BlockPos },
    Flower { anchor: BlockPos },
    TallGrass { anchor: BlockPos },
    Mushroom { anchor: BlockPos },
    Reeds { anchor: BlockPos },
    Pumpkin { anchor: BlockPos },
    Cactus { anchor: BlockPos },
    WaterSpring { anchor: BlockPos },
    LavaSpring { anchor: BlockPos },
}

/// Receives the decoration plan and performs the actual block mutation
/// against the real world + registry (§1 "the core's contract toward them
/// is specified, not their implementation").
pub trait DecorationSink {
    fn place(&mut self, feature: DecorationFeature);
}

/// Chance a tree spawns beyond the biome's base count (§4.9 step 5 "trees
/// (biome-dependent count plus 10% bonus chance)").
const TREE_BONUS_CHANCE: f64 = 0.10;
/// Pumpkin per-chunk chance (§4.9 step 5 "pumpkins (1/32)").
const PUMPKIN_CHANCE_DENOM: i32 = 32;
/// Fluid spring attempt counts per chunk (§4.9 step 5 "fluid springs (50
/// water + 20 lava)").
const WATER_SPRINGS_PER_CHUNK: u32 = 50;
const LAVA_SPRINGS_PER_CHUNK: u32 = 20;

/// The biome-dependent base tree count per chunk; denser biomes (forest,
/// taiga, jungle) get more attempts than plains/desert.
fn base_tree_count(biome: &Biome) -> u32 {
    if biome.rainfall > 0.85 {
        10
    } else if biome.rainfall > 0.6 {
        5
    } else if biome.rainfall > 0.2 {
        2
    } else {
        0
    }
}

/// Computes the full decoration plan for one chunk, seeded by the chunk's
/// decoration RNG (distinct from its terrain-shaping RNG so re-rolling
/// decoration doesn't perturb already-placed terrain, matching vanilla's
/// separate `decorate` seed).
#[must_use]
pub fn plan_decoration(world_seed: i64, origin: BlockPos, biome: &Biome, surface_y: i32) -> Vec<DecorationFeature> {
    let mut rng = LegacyRandom::new(
        world_seed
            ^ (i64::from(origin.x()).wrapping_mul(341_873_128_712))
            ^ (i64::from(origin.z()).wrapping_mul(132_897_987_541))
            ^ 0x5DEC_0DE,
    );
    let mut features = Vec::new();

    for vein in ORE_VEINS {
        for _ in 0..vein.veins_per_chunk {
            let x = origin.x() + rng.next_i32_bounded(16);
            let z = origin.z() + rng.next_i32_bounded(16);
            let y = if vein.triangular {
                rng.next_i32_bounded(16) + rng.next_i32_bounded(16)
            } else {
                rng.next_i32_bounded((vein.max_y - vein.min_y).max(1)) + vein.min_y
            };
            features.push(DecorationFeature::OreVein {
                anchor: BlockPos::new(x, y, z),
                block_id: vein.block_id,
                vein_size: vein.vein_size,
            });
        }
    }

    if biome.temperature > 1.5 {
        for _ in 0..3 {
            features.push(DecorationFeature::SandPatch {
                anchor: random_surface_pos(&mut rng, origin, surface_y),
            });
        }
    }
    features.push(DecorationFeature::ClayPatch {
        anchor: random_surface_pos(&mut rng, origin, surface_y),
    });
    for _ in 0..8 {
        features.push(DecorationFeature::GravelPatch {
            anchor: random_surface_pos(&mut rng, origin, surface_y),
        });
    }

    let mut tree_count = base_tree_count(biome);
    if rng.next_f64() < TREE_BONUS_CHANCE {
        tree_count += 1;
    }
    for _ in 0..tree_count {
        features.push(DecorationFeature::Tree {
            anchor: random_surface_pos(&mut rng, origin, surface_y),
        });
    }

    for _ in 0..2 {
        features.push(DecorationFeature::Flower {
            anchor: random_surface_pos(&mut rng, origin, surface_y),
        });
    }
    let grass_count = if biome.is_high_humidity() { 10 } else { 2 };
    for _ in 0..grass_count {
        features.push(DecorationFeature::TallGrass {
            anchor: random_surface_pos(&mut rng, origin, surface_y),
        });
    }

    if biome.rainfall > 0.9 {
        for _ in 0..(1 + rng.next_i32_bounded(2)) {
            features.push(DecorationFeature::Mushroom {
                anchor: random_surface_pos(&mut rng, origin, surface_y),
            });
        }
    }

    for _ in 0..rng.next_i32_bounded(3) {
        features.push(DecorationFeature::Reeds {
            anchor: random_surface_pos(&mut rng, origin, surface_y),
        });
    }

    if rng.next_i32_bounded(PUMPKIN_CHANCE_DENOM) == 0 {
        features.push(DecorationFeature::Pumpkin {
            anchor: random_surface_pos(&mut rng, origin, surface_y),
        });
    }

    if biome.temperature > 1.5 {
        for _ in 0..rng.next_i32_bounded(3) {
            features.push(DecorationFeature::Cactus {
                anchor: random_surface_pos(&mut rng, origin, surface_y),
            });
        }
    }

    for _ in 0..WATER_SPRINGS_PER_CHUNK {
        features.push(DecorationFeature::WaterSpring {
            anchor: random_underground_pos(&mut rng, origin),
        });
    }
    for _ in 0..LAVA_SPRINGS_PER_CHUNK {
        features.push(DecorationFeature::LavaSpring {
            anchor: random_underground_pos(&mut rng, origin),
        });
    }

    features
}

fn random_surface_pos(rng: &mut LegacyRandom, origin: BlockPos, surface_y: i32) -> BlockPos {
    let x = origin.x() + rng.next_i32_bounded(16);
    let z = origin.z() + rng.next_i32_bounded(16);
    BlockPos::new(x, surface_y, z)
}

fn random_underground_pos(rng: &mut LegacyRandom, origin: BlockPos) -> BlockPos {
    let x = origin.x() + rng.next_i32_bounded(16);
    let z = origin.z() + rng.next_i32_bounded(16);
    let y = rng.next_i32_bounded(248) + 8;
    BlockPos::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_registry::biome;

    #[test]
    fn decoration_plan_is_deterministic() {
        let origin = BlockPos::new(0, 0, 0);
        let biome = biome::get(1);
        let a = plan_decoration(42, origin, biome, 64);
        let b = plan_decoration(42, origin, biome, 64);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn ore_veins_are_present_every_chunk() {
        let origin = BlockPos::new(16, 0, 16);
        let biome = biome::get(1);
        let plan = plan_decoration(7, origin, biome, 70);
        let ore_count = plan
            .iter()
            .filter(|f| matches!(f, DecorationFeature::OreVein { .. }))
            .count();
        let expected: u32 = ORE_VEINS.iter().map(|v| v.veins_per_chunk).sum();
        assert_eq!(ore_count as u32, expected);
    }

    #[test]
    fn desert_biome_gets_no_trees() {
        let origin = BlockPos::new(0, 0, 0);
        let desert = biome::get(2);
        let plan = plan_decoration(1, origin, desert, 64);
        let bonus_possible = plan.iter().filter(|f| matches!(f, DecorationFeature::Tree { .. })).count();
        assert!(bonus_possible <= 1);
    }
}
