//! Deterministic terrain generation (§4.9): the pipeline that turns a
//! world seed and chunk coordinates into a populated [`Chunk`].
//!
//! Each stage is pure given `(world_seed, cx, cz)` (§5 "Noise generators are
//! pure after construction; parallel chunk generation is allowed" and "the
//! chunk generator's RNG is scoped per-chunk"), so [`ChunkGenerator::generate`]
//! takes no shared mutable state and may be called concurrently across
//! chunks from a `rayon` pool.

pub mod decoration;
pub mod genlayer;
pub mod octaves;
pub mod perlin;
pub mod simplex;
pub mod structures;

use terra_registry::biome::{self, Biome};
use terra_utils::random::legacy::LegacyRandom;
use terra_utils::ChunkPos;

use crate::chunk::Chunk;
use genlayer::{build_default_stack, GenLayer};
use octaves::OctavePerlinNoise;

/// The coarse density-noise grid's horizontal resolution (§4.9 "a coarse
/// 5x33x5 grid over the chunk").
const NOISE_X: usize = 5;
const NOISE_Y: usize = 33;
const NOISE_Z: usize = 5;

/// Sea level, used by column replacement to decide water vs. air above the
/// terrain surface and by the `Island`/structure-placement seeding.
pub const SEA_LEVEL: i32 = 63;

const STONE: u16 = 1;
const WATER: u16 = 9;
const ICE: u16 = 79;
const AIR: u16 = 0;
const BEDROCK: u16 = 7;
const SNOW_LAYER: u16 = 78;

/// Deterministically produces chunks for one world seed (§4.9).
///
/// Holds the biome `GenLayer` stack and the octave noise generators built
/// once from the world seed; everything after construction is immutable, so
/// the generator can be shared (`Arc`) across worker threads.
pub struct ChunkGenerator {
    world_seed: i64,
    biome_layers: Box<dyn GenLayer>,
    density_noise: OctavePerlinNoise,
    surface_noise: OctavePerlinNoise,
}

impl ChunkGenerator {
    /// Builds a generator for `world_seed`, using the classic exploration
    /// biome set (§4.9 step 1 "Typical stack").
    #[must_use]
    pub fn new(world_seed: i64) -> Self {
        let biome_ids = biome::EXPLORATION_BIOME_IDS.iter().map(|&id| i32::from(id)).collect();
        let biome_layers = build_default_stack(world_seed, biome_ids);

        let mut density_rng = LegacyRandom::new(world_seed);
        let density_noise = OctavePerlinNoise::new(&mut density_rng, 16);

        let mut surface_rng = LegacyRandom::new(world_seed.wrapping_add(8_312_213));
        let surface_noise = OctavePerlinNoise::new(&mut surface_rng, 4);

        Self {
            world_seed,
            biome_layers,
            density_noise,
            surface_noise,
        }
    }

    /// The biome id grid for a chunk, quarter-resolution cells expanded to
    /// full resolution by the `GenLayer` stack (§4.9 step 1).
    #[must_use]
    pub fn biomes_for_chunk(&self, pos: ChunkPos) -> [u8; 256] {
        let ints = self.biome_layers.get_ints(pos.x * 16, pos.z * 16, 16, 16);
        let mut out = [0u8; 256];
        for (i, v) in ints.into_iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                out[i] = v as u8;
            }
        }
        out
    }

    /// Generates the density field (§4.9 step 2), a coarse 5x33x5 grid
    /// biased by each column's biome height parameters, trilinearly
    /// interpolated to a full 16x256x16 buffer of "is this cell solid"
    /// decisions.
    fn density_field(&self, pos: ChunkPos, biomes: &[u8; 256]) -> Vec<f64> {
        let raw = self.density_noise.generate_3d(
            pos.x * NOISE_X as i32,
            0,
            pos.z * NOISE_Z as i32,
            NOISE_X,
            NOISE_Y,
            NOISE_Z,
            // Horizontal frequency chosen so five coarse cells span one
            // chunk's sixteen blocks; vertical frequency spans 256 blocks
            // over 33 samples (§4.9 "sampled at a coarse 5x33x5 grid").
            684.412 / 16.0 * NOISE_X as f64 / 16.0,
            684.412 / 8.0 / 32.0 * NOISE_Y as f64 / 33.0,
            684.412 / 16.0 * NOISE_Z as f64 / 16.0,
        );

        // Bias by the dominant biome's root height/variation (§4.9 "The
        // density at a cell is biased by the biome's root height and
        // variation"), approximated per coarse column rather than per fine
        // block - matching vanilla's biome-weighted height blending at
        // noise resolution. Index order is `(x, z, y)`, matching
        // [`perlin::PerlinNoise::populate_noise_array`]'s iteration order.
        let mut biased = raw;
        for nx in 0..NOISE_X {
            let bx = (nx * 16 / NOISE_X).min(15);
            for nz in 0..NOISE_Z {
                let bz = (nz * 16 / NOISE_Z).min(15);
                let biome = biome::get(biomes[bz * 16 + bx]);
                let height = biome.height;
                for ny in 0..NOISE_Y {
                    let idx = (nx * NOISE_Z + nz) * NOISE_Y + ny;
                    // Fraction of the 33-sample column, 0 at bedrock, 1 at
                    // the world's top; shapes the bias so mid-height
                    // carries the biome's root/variation most strongly.
                    #[allow(clippy::cast_precision_loss)]
                    let y_frac = ny as f64 / (NOISE_Y - 1) as f64;
                    let falloff = 1.0 - (y_frac - f64::from(height.root_height).clamp(-2.0, 2.0) / 2.0 - 0.5).abs();
                    biased[idx] += f64::from(height.root_height) * 4.0
                        + f64::from(height.variation) * falloff.max(0.0) * 8.0
                        - (y_frac * 2.0 - 1.0) * 6.0;
                }
            }
        }
        biased
    }

    /// Trilinearly expands the coarse density grid to a per-block
    /// `is_solid` predicate (§4.9 "trilinearly interpolated to full
    /// 16x256x16").
    fn is_solid_at(density: &[f64], lx: usize, y: usize, lz: usize) -> bool {
        // Map the fine block coordinate into the coarse grid's fractional
        // cell and interpolate across the eight surrounding samples.
        let fx = lx as f64 / 16.0 * (NOISE_X - 1) as f64;
        let fy = y as f64 / 255.0 * (NOISE_Y - 1) as f64;
        let fz = lz as f64 / 16.0 * (NOISE_Z - 1) as f64;

        let x0 = (fx.floor() as usize).min(NOISE_X - 2);
        let y0 = (fy.floor() as usize).min(NOISE_Y - 2);
        let z0 = (fz.floor() as usize).min(NOISE_Z - 2);
        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;
        let tz = fz - z0 as f64;

        let sample = |dx: usize, dy: usize, dz: usize| -> f64 {
            density[((x0 + dx) * NOISE_Z + (z0 + dz)) * NOISE_Y + (y0 + dy)]
        };

        let c00 = sample(0, 0, 0) * (1.0 - tx) + sample(1, 0, 0) * tx;
        let c01 = sample(0, 0, 1) * (1.0 - tx) + sample(1, 0, 1) * tx;
        let c10 = sample(0, 1, 0) * (1.0 - tx) + sample(1, 1, 0) * tx;
        let c11 = sample(0, 1, 1) * (1.0 - tx) + sample(1, 1, 1) * tx;
        let c0 = c00 * (1.0 - tz) + c01 * tz;
        let c1 = c10 * (1.0 - tz) + c11 * tz;
        let value = c0 * (1.0 - ty) + c1 * ty;
        value > 0.0
    }

    /// Generates a fully shaped, surface-replaced, but not yet populated
    /// chunk (§4.9 steps 1-3; structure/decoration are later stages driven
    /// by [`structures`] and the caller's external decoration hook, §4.9
    /// steps 4-5).
    #[must_use]
    pub fn generate(&self, pos: ChunkPos) -> Chunk {
        let biomes = self.biomes_for_chunk(pos);
        let density = self.density_field(pos, &biomes);

        let mut chunk = Chunk::empty(pos);
        *chunk.biomes_mut() = terra_core_biomes(biomes);

        for lz in 0..16usize {
            for lx in 0..16usize {
                let biome = biome::get(biomes[lz * 16 + lx]);
                self.shape_and_replace_column(&mut chunk, &density, lx, lz, biome, pos);
            }
        }

        chunk.terrain_populated = false;
        chunk.is_populated = false;
        chunk.dirty = true;
        chunk
    }

    /// Shapes one `(lx, lz)` column from the density field, then applies
    /// surface replacement and bedrock (§4.9 step 3).
    fn shape_and_replace_column(
        &self,
        chunk: &mut Chunk,
        density: &[f64],
        lx: usize,
        lz: usize,
        biome: &Biome,
        pos: ChunkPos,
    ) {
        let world_x = pos.x * 16 + lx as i32;
        let world_z = pos.z * 16 + lz as i32;
        let mut column_rng = LegacyRandom::new(
            self.world_seed ^ (i64::from(world_x).wrapping_mul(341_873_128_712))
                ^ i64::from(world_z).wrapping_mul(132_897_987_541),
        );

        // Surface-noise-derived filler depth (§4.9 "for the next few
        // (variable from a surface-noise value) place the biome's filler
        // block").
        let surface_val = self.surface_noise.generate_2d(world_x, world_z, 1, 1, 0.0625, 0.0625)[0];
        let filler_depth = ((surface_val / 3.0 + 3.0) + column_rng.next_f64() * 0.25) as i32;
        let filler_depth = filler_depth.clamp(1, 8);

        let mut remaining_filler = -1i32;
        let mut topmost_y = 0i32;

        for y in (0..256usize).rev() {
            let solid = Self::is_solid_at(density, lx, y, lz);
            if !solid {
                remaining_filler = -1;
                if (y as i32) < SEA_LEVEL {
                    let freezing = biome.float_temperature_at(y as i32) < 0.15;
                    chunk.set_block_id(lx, y, lz, if freezing { ICE } else { WATER });
                } else {
                    chunk.set_block_id(lx, y, lz, AIR);
                }
                continue;
            }

            if remaining_filler == -1 {
                // Just transitioned from air/water into solid: this is the
                // top of the column.
                if topmost_y == 0 {
                    topmost_y = y as i32;
                }
                if filler_depth <= 0 {
                    chunk.set_block_id(lx, y, lz, STONE);
                } else if (y as i32) < SEA_LEVEL - 1 && biome.float_temperature_at(y as i32) < 0.15 {
                    // Cold biomes below sea level surface with ice instead
                    // of the ordinary top block.
                    chunk.set_block_id(lx, y, lz, ICE);
                } else {
                    chunk.set_block_id(lx, y, lz, biome.top_block);
                }
                remaining_filler = filler_depth;
            } else if remaining_filler > 0 {
                chunk.set_block_id(lx, y, lz, biome.filler_block);
                remaining_filler -= 1;
            } else {
                chunk.set_block_id(lx, y, lz, STONE);
            }
        }

        // Bedrock: y=0 always, y in 1..5 a random chance decreasing with
        // height (§4.9 step 3 "bedrock layer in the bottom five rows,
        // random but always at y=0").
        for y in 0..5usize {
            if y == 0 || column_rng.next_i32_bounded(5 - y as i32) == 0 {
                chunk.set_block_id(lx, y, lz, BEDROCK);
            }
        }

        // Snow layer above cold biomes' surface (§4.9 step 3 "above, place
        // a snow layer if the biome is cold").
        if biome.enable_snow && topmost_y + 1 < 256 {
            let above = chunk.block_id(lx, (topmost_y + 1) as usize, lz);
            if above == AIR {
                chunk.set_block_id(lx, (topmost_y + 1) as usize, lz, SNOW_LAYER);
            }
        }

        chunk.heightmap_mut().set(lx, lz, topmost_y);
    }
}

fn terra_core_biomes(ids: [u8; 256]) -> crate::chunk::biome::ChunkBiomes {
    crate::chunk::biome::ChunkBiomes::from_array(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let gen_a = ChunkGenerator::new(42);
        let gen_b = ChunkGenerator::new(42);
        let chunk_a = gen_a.generate(ChunkPos::new(0, 0));
        let chunk_b = gen_b.generate(ChunkPos::new(0, 0));
        for y in 0..256 {
            assert_eq!(chunk_a.block_id(3, y, 5), chunk_b.block_id(3, y, 5));
        }
    }

    #[test]
    fn bedrock_is_always_present_at_y_zero() {
        let generator = ChunkGenerator::new(7);
        let chunk = generator.generate(ChunkPos::new(2, -1));
        for lz in 0..16 {
            for lx in 0..16 {
                assert_eq!(chunk.block_id(lx, 0, lz), BEDROCK);
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = ChunkGenerator::new(1).generate(ChunkPos::new(0, 0));
        let b = ChunkGenerator::new(2).generate(ChunkPos::new(0, 0));
        let diff = (0..256).any(|y| a.block_id(8, y, 8) != b.block_id(8, y, 8));
        assert!(diff);
    }

    #[test]
    fn biome_grid_matches_genlayer_stack_output() {
        let generator = ChunkGenerator::new(99);
        let biomes = generator.biomes_for_chunk(ChunkPos::new(0, 0));
        assert_eq!(biomes.len(), 256);
    }
}
