//! The biome `GenLayer` stack (§4.9 step 1): a chain of 2D integer-grid
//! transforms, each seeded by mixing the world seed with a layer-specific
//! salt, each cell further seeded by mixing in `(x, z)`.

use terra_utils::random::seed_for_position;
use terra_utils::LegacyRandom;

/// Ocean biome id, the `Island` layer's default fill and every biome
/// table's fallback (§4.9 "1-in-10 land").
pub const OCEAN_BIOME_ID: i32 = 0;

fn layer_base_seed(world_seed: i64, salt: i64) -> i64 {
    let mut rng = LegacyRandom::new(world_seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15_u64 as i64));
    rng.next_i64()
}

fn cell_rng(base_seed: i64, x: i32, z: i32) -> LegacyRandom {
    LegacyRandom::new(base_seed ^ seed_for_position(x, 0, z))
}

/// A 2D integer grid transform in the biome-generation pipeline
/// (§4.9 "a stack of functions, each taking a 2D integer grid and a
/// per-layer seed and producing a new grid").
pub trait GenLayer: Send + Sync {
    /// Produces a `width x height` grid of values, row-major, anchored at
    /// world cell `(x, z)`.
    fn get_ints(&self, x: i32, z: i32, width: i32, height: i32) -> Vec<i32>;
}

/// The base layer: independently rolls land (1) vs. ocean (0) per cell
/// (§4.9 "Island (1-in-10 land)").
pub struct IslandLayer {
    base_seed: i64,
}

impl IslandLayer {
    #[must_use]
    pub fn new(world_seed: i64) -> Self {
        Self {
            base_seed: layer_base_seed(world_seed, 1),
        }
    }
}

impl GenLayer for IslandLayer {
    fn get_ints(&self, x: i32, z: i32, width: i32, height: i32) -> Vec<i32> {
        let mut out = Vec::with_capacity((width * height) as usize);
        for dz in 0..height {
            for dx in 0..width {
                let mut rng = cell_rng(self.base_seed, x + dx, z + dz);
                let is_land = rng.next_i32_bounded(10) == 0;
                out.push(i32::from(is_land));
            }
        }
        out
    }
}

/// Assigns a climate-bucketed biome id to every land cell, leaving ocean
/// cells at [`OCEAN_BIOME_ID`] (§4.9 "Biome (climate-to-biome
/// assignment)").
pub struct BiomeAssignLayer {
    parent: Box<dyn GenLayer>,
    base_seed: i64,
    biome_ids: Vec<i32>,
}

impl BiomeAssignLayer {
    #[must_use]
    pub fn new(world_seed: i64, parent: Box<dyn GenLayer>, biome_ids: Vec<i32>) -> Self {
        Self {
            parent,
            base_seed: layer_base_seed(world_seed, 2),
            biome_ids,
        }
    }
}

impl GenLayer for BiomeAssignLayer {
    fn get_ints(&self, x: i32, z: i32, width: i32, height: i32) -> Vec<i32> {
        let parent_values = self.parent.get_ints(x, z, width, height);
        parent_values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                if value == OCEAN_BIOME_ID || self.biome_ids.is_empty() {
                    OCEAN_BIOME_ID
                } else {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                    let dx = x + (i as i32 % width);
                    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                    let dz = z + (i as i32 / width);
                    let mut rng = cell_rng(self.base_seed, dx, dz);
                    let choice = rng.next_i32_bounded(
                        i32::try_from(self.biome_ids.len()).unwrap_or(1),
                    );
                    self.biome_ids[choice as usize]
                }
            })
            .collect()
    }
}

/// Doubles the resolution of its parent; each fine cell between four
/// coarse parent cells picks a value by majority, falling back to a random
/// tie-break (§4.9 "A Zoom layer doubles resolution and ... picks a value
/// by a majority / random tie-break").
pub struct ZoomLayer {
    parent: Box<dyn GenLayer>,
    base_seed: i64,
}

impl ZoomLayer {
    #[must_use]
    pub fn new(world_seed: i64, salt: i64, parent: Box<dyn GenLayer>) -> Self {
        Self {
            parent,
            base_seed: layer_base_seed(world_seed, salt),
        }
    }
}

impl GenLayer for ZoomLayer {
    fn get_ints(&self, x: i32, z: i32, width: i32, height: i32) -> Vec<i32> {
        // The parent is sampled at half resolution, offset to cover the
        // requested area plus a one-cell border for interpolation.
        let parent_x = x.div_euclid(2) - 1;
        let parent_z = z.div_euclid(2) - 1;
        let parent_width = (width / 2) + 3;
        let parent_height = (height / 2) + 3;
        let parent_grid = self.parent.get_ints(parent_x, parent_z, parent_width, parent_height);

        let fine_width = (parent_width - 1) * 2;
        let fine_height = (parent_height - 1) * 2;
        let mut fine = vec![0i32; (fine_width * fine_height) as usize];

        let parent_at = |px: i32, pz: i32| -> i32 { parent_grid[(pz * parent_width + px) as usize] };

        for pz in 0..parent_height - 1 {
            for px in 0..parent_width - 1 {
                let top_left = parent_at(px, pz);
                let top_right = parent_at(px + 1, pz);
                let bottom_left = parent_at(px, pz + 1);
                let bottom_right = parent_at(px + 1, pz + 1);

                let fx = px * 2;
                let fz = pz * 2;
                fine[(fz * fine_width + fx) as usize] = top_left;

                let world_x = (parent_x + px) * 2;
                let world_z = (parent_z + pz) * 2;

                fine[(fz * fine_width + fx + 1) as usize] =
                    self.pick(world_x + 1, world_z, top_left, top_right);
                fine[((fz + 1) * fine_width + fx) as usize] =
                    self.pick(world_x, world_z + 1, top_left, bottom_left);
                fine[((fz + 1) * fine_width + fx + 1) as usize] =
                    self.pick_of_four(world_x + 1, world_z + 1, top_left, top_right, bottom_left, bottom_right);
            }
        }

        let out_origin_x = (x - parent_x * 2).rem_euclid(fine_width);
        let out_origin_z = (z - parent_z * 2).rem_euclid(fine_height);
        let mut out = Vec::with_capacity((width * height) as usize);
        for dz in 0..height {
            for dx in 0..width {
                out.push(fine[((out_origin_z + dz) * fine_width + out_origin_x + dx) as usize]);
            }
        }
        out
    }
}

impl ZoomLayer {
    fn pick(&self, x: i32, z: i32, a: i32, b: i32) -> i32 {
        if a == b {
            return a;
        }
        let mut rng = cell_rng(self.base_seed, x, z);
        if rng.next_bool() {
            a
        } else {
            b
        }
    }

    fn pick_of_four(&self, x: i32, z: i32, a: i32, b: i32, c: i32, d: i32) -> i32 {
        if a == b && a == c {
            return a;
        }
        if a == b && a == d {
            return a;
        }
        if a == c && a == d {
            return a;
        }
        if b == c && b == d {
            return b;
        }
        if a == b || a == c || a == d {
            return a;
        }
        if b == c || b == d {
            return b;
        }
        if c == d {
            return c;
        }
        let mut rng = cell_rng(self.base_seed, x, z);
        [a, b, c, d][rng.next_i32_bounded(4) as usize]
    }
}

/// Builds the stack spec.md describes: Island -> Biome -> four Zoom layers
/// -> two more Zoom layers for full resolution (§4.9 "Typical stack").
#[must_use]
pub fn build_default_stack(world_seed: i64, biome_ids: Vec<i32>) -> Box<dyn GenLayer> {
    let island: Box<dyn GenLayer> = Box::new(IslandLayer::new(world_seed));
    let biome: Box<dyn GenLayer> = Box::new(BiomeAssignLayer::new(world_seed, island, biome_ids));

    let mut stack = biome;
    for salt in 10..14 {
        stack = Box::new(ZoomLayer::new(world_seed, salt, stack));
    }
    for salt in 20..22 {
        stack = Box::new(ZoomLayer::new(world_seed, salt, stack));
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn island_layer_is_deterministic() {
        let a = IslandLayer::new(1234);
        let b = IslandLayer::new(1234);
        assert_eq!(a.get_ints(0, 0, 8, 8), b.get_ints(0, 0, 8, 8));
    }

    #[test]
    fn island_layer_differs_by_seed() {
        let a = IslandLayer::new(1);
        let b = IslandLayer::new(2);
        assert_ne!(a.get_ints(0, 0, 16, 16), b.get_ints(0, 0, 16, 16));
    }

    #[test]
    fn full_stack_produces_requested_shape() {
        let stack = build_default_stack(42, vec![1, 2, 3, 4]);
        let grid = stack.get_ints(0, 0, 16, 16);
        assert_eq!(grid.len(), 256);
    }

    #[test]
    fn full_stack_is_deterministic() {
        let a = build_default_stack(42, vec![1, 2, 3, 4]);
        let b = build_default_stack(42, vec![1, 2, 3, 4]);
        assert_eq!(a.get_ints(5, 5, 8, 8), b.get_ints(5, 5, 8, 8));
    }
}
