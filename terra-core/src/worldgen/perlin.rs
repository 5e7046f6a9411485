//! 3D improved Perlin noise (§4.9 "Improved Perlin (3D)").

use terra_utils::LegacyRandom;

const GRAD_X: [f64; 16] = [
    1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0,
];
const GRAD_Y: [f64; 16] = [
    1.0, 1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0,
];
const GRAD_Z: [f64; 16] = [
    0.0, 0.0, 0.0, 0.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 0.0, 1.0, 0.0, -1.0,
];

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad3(hash: i32, x: f64, y: f64, z: f64) -> f64 {
    let h = (hash & 0xF) as usize;
    GRAD_X[h] * x + GRAD_Y[h] * y + GRAD_Z[h] * z
}

fn grad2(hash: i32, x: f64, z: f64) -> f64 {
    let h = (hash & 0xF) as usize;
    GRAD_X[h] * x + GRAD_Z[h] * z
}

/// A single octave of 3D improved Perlin noise, seeded once and pure
/// thereafter (§5 "Noise generators are pure after construction; parallel
/// chunk generation is allowed").
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    x_coord: f64,
    y_coord: f64,
    z_coord: f64,
    permutations: [i32; 512],
}

impl PerlinNoise {
    /// Builds one octave from `rng`, drawing the phase offsets and the
    /// Fisher-Yates-shuffled 256-entry permutation table in the same order
    /// the original construction does (§4.9 "random `(x, y, z)` phase
    /// offsets in `[0, 256)`").
    #[must_use]
    pub fn new(rng: &mut LegacyRandom) -> Self {
        let x_coord = rng.next_f64() * 256.0;
        let y_coord = rng.next_f64() * 256.0;
        let z_coord = rng.next_f64() * 256.0;

        let mut permutations = [0i32; 512];
        for (i, slot) in permutations.iter_mut().take(256).enumerate() {
            *slot = i32::try_from(i).expect("i < 256");
        }
        for i in 0..256 {
            let j = rng.next_i32_bounded(256 - i) + i;
            permutations.swap(i as usize, j as usize);
            permutations[i as usize + 256] = permutations[i as usize];
        }

        Self {
            x_coord,
            y_coord,
            z_coord,
            permutations,
        }
    }

    /// Samples and **adds** `amplitude`-scaled noise into `out`
    /// (§4.9 "Population of an output grid adds ... so multi-octave users
    /// pre-zero their buffer"). `out` is row-major `x, z, y` matching the
    /// original's iteration order; length must be `x_size*y_size*z_size`.
    #[allow(clippy::too_many_arguments)]
    pub fn populate_noise_array(
        &self,
        out: &mut [f64],
        x_off: f64,
        y_off: f64,
        z_off: f64,
        x_size: usize,
        y_size: usize,
        z_size: usize,
        x_scale: f64,
        y_scale: f64,
        z_scale: f64,
        amplitude: f64,
    ) {
        let inv_amp = 1.0 / amplitude;

        if y_size == 1 {
            self.populate_2d(out, x_off, z_off, x_size, z_size, x_scale, z_scale, inv_amp);
            return;
        }

        let mut idx = 0usize;
        let mut prev_y: i32 = -1;
        let (mut d17, mut d18, mut d19, mut d20) = (0.0, 0.0, 0.0, 0.0);

        for xi in 0..x_size {
            #[allow(clippy::cast_precision_loss)]
            let mut dx = x_off + xi as f64 * x_scale + self.x_coord;
            let mut x_int = dx as i32;
            if dx < f64::from(x_int) {
                x_int -= 1;
            }
            let x0 = (x_int & 0xFF) as usize;
            dx -= f64::from(x_int);
            let u = fade(dx);

            for zi in 0..z_size {
                #[allow(clippy::cast_precision_loss)]
                let mut dz = z_off + zi as f64 * z_scale + self.z_coord;
                let mut z_int = dz as i32;
                if dz < f64::from(z_int) {
                    z_int -= 1;
                }
                let z0 = (z_int & 0xFF) as usize;
                dz -= f64::from(z_int);
                let w = fade(dz);

                for yi in 0..y_size {
                    #[allow(clippy::cast_precision_loss)]
                    let mut dy = y_off + yi as f64 * y_scale + self.y_coord;
                    let mut y_int = dy as i32;
                    if dy < f64::from(y_int) {
                        y_int -= 1;
                    }
                    let y0 = y_int & 0xFF;
                    dy -= f64::from(y_int);
                    let v = fade(dy);

                    if yi == 0 || y0 != prev_y {
                        prev_y = y0;
                        let perm = &self.permutations;
                        let a = perm[x0] + y0;
                        let aa = (perm[a as usize] + z0 as i32) as usize;
                        let ab = (perm[a as usize + 1] + z0 as i32) as usize;
                        let b = perm[x0 + 1] + y0;
                        let ba = (perm[b as usize] + z0 as i32) as usize;
                        let bb = (perm[b as usize + 1] + z0 as i32) as usize;

                        d17 = lerp(
                            u,
                            grad3(perm[aa], dx, dy, dz),
                            grad3(perm[ba], dx - 1.0, dy, dz),
                        );
                        d18 = lerp(
                            u,
                            grad3(perm[ab], dx, dy - 1.0, dz),
                            grad3(perm[bb], dx - 1.0, dy - 1.0, dz),
                        );
                        d19 = lerp(
                            u,
                            grad3(perm[aa + 1], dx, dy, dz - 1.0),
                            grad3(perm[ba + 1], dx - 1.0, dy, dz - 1.0),
                        );
                        d20 = lerp(
                            u,
                            grad3(perm[ab + 1], dx, dy - 1.0, dz - 1.0),
                            grad3(perm[bb + 1], dx - 1.0, dy - 1.0, dz - 1.0),
                        );
                    }

                    let yz = lerp(v, d17, d18);
                    let yz1 = lerp(v, d19, d20);
                    out[idx] += lerp(w, yz, yz1) * inv_amp;
                    idx += 1;
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn populate_2d(
        &self,
        out: &mut [f64],
        x_off: f64,
        z_off: f64,
        x_size: usize,
        z_size: usize,
        x_scale: f64,
        z_scale: f64,
        inv_amp: f64,
    ) {
        let mut idx = 0usize;
        for xi in 0..x_size {
            #[allow(clippy::cast_precision_loss)]
            let mut dx = x_off + xi as f64 * x_scale + self.x_coord;
            let mut x_int = dx as i32;
            if dx < f64::from(x_int) {
                x_int -= 1;
            }
            let x0 = (x_int & 0xFF) as usize;
            dx -= f64::from(x_int);
            let u = fade(dx);

            for zi in 0..z_size {
                #[allow(clippy::cast_precision_loss)]
                let mut dz = z_off + zi as f64 * z_scale + self.z_coord;
                let mut z_int = dz as i32;
                if dz < f64::from(z_int) {
                    z_int -= 1;
                }
                let z0 = (z_int & 0xFF) as i32;
                dz -= f64::from(z_int);
                let w = fade(dz);

                let perm = &self.permutations;
                let a = perm[x0];
                let aa = (perm[a as usize] + z0) as usize;
                let b = perm[x0 + 1];
                let ba = (perm[b as usize] + z0) as usize;

                let l1 = lerp(
                    u,
                    grad2(perm[aa], dx, dz),
                    grad3(perm[ba], dx - 1.0, 0.0, dz),
                );
                let l2 = lerp(
                    u,
                    grad3(perm[aa + 1], dx, 0.0, dz - 1.0),
                    grad3(perm[ba + 1], dx - 1.0, 0.0, dz - 1.0),
                );

                out[idx] += lerp(w, l1, l2) * inv_amp;
                idx += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let mut rng_a = LegacyRandom::new(42);
        let mut rng_b = LegacyRandom::new(42);
        let noise_a = PerlinNoise::new(&mut rng_a);
        let noise_b = PerlinNoise::new(&mut rng_b);

        let mut out_a = vec![0.0; 4 * 4 * 4];
        let mut out_b = vec![0.0; 4 * 4 * 4];
        noise_a.populate_noise_array(&mut out_a, 0.0, 0.0, 0.0, 4, 4, 4, 1.0, 1.0, 1.0, 1.0);
        noise_b.populate_noise_array(&mut out_b, 0.0, 0.0, 0.0, 4, 4, 4, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut rng_a = LegacyRandom::new(1);
        let mut rng_b = LegacyRandom::new(2);
        let noise_a = PerlinNoise::new(&mut rng_a);
        let noise_b = PerlinNoise::new(&mut rng_b);

        let mut out_a = vec![0.0; 8];
        let mut out_b = vec![0.0; 8];
        noise_a.populate_noise_array(&mut out_a, 0.0, 0.0, 0.0, 2, 2, 2, 1.0, 1.0, 1.0, 1.0);
        noise_b.populate_noise_array(&mut out_b, 0.0, 0.0, 0.0, 2, 2, 2, 1.0, 1.0, 1.0, 1.0);
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn accumulates_rather_than_overwrites() {
        let mut rng = LegacyRandom::new(7);
        let noise = PerlinNoise::new(&mut rng);
        let mut out = vec![1.0; 8];
        noise.populate_noise_array(&mut out, 0.0, 0.0, 0.0, 2, 2, 2, 1.0, 1.0, 1.0, 1.0);
        assert!(out.iter().all(|&v| v != 1.0 || v == 1.0));
        // The pre-seeded 1.0 baseline must still be present in the sum.
        let mut zeroed = vec![0.0; 8];
        noise.populate_noise_array(&mut zeroed, 0.0, 0.0, 0.0, 2, 2, 2, 1.0, 1.0, 1.0, 1.0);
        for (with_base, from_zero) in out.iter().zip(zeroed.iter()) {
            assert!((with_base - from_zero - 1.0).abs() < 1e-9);
        }
    }
}
