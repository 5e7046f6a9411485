//! 2D simplex noise (§4.9 "Simplex (2D)").

use terra_utils::LegacyRandom;

const GRAD3: [[f64; 2]; 12] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

fn skew_factor() -> f64 {
    0.5 * (3.0_f64.sqrt() - 1.0)
}

fn unskew_factor() -> f64 {
    (3.0 - 3.0_f64.sqrt()) / 6.0
}

fn fast_floor(d: f64) -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let i = d as i32;
    if d > 0.0 {
        i
    } else {
        i - 1
    }
}

fn dot2(g: [f64; 2], x: f64, y: f64) -> f64 {
    g[0] * x + g[1] * y
}

/// A single octave of 2D simplex noise (§4.9).
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    x_offset: f64,
    y_offset: f64,
    #[allow(dead_code)]
    z_offset: f64,
    perm: [i32; 512],
}

impl SimplexNoise {
    #[must_use]
    pub fn new(rng: &mut LegacyRandom) -> Self {
        let x_offset = rng.next_f64() * 256.0;
        let y_offset = rng.next_f64() * 256.0;
        let z_offset = rng.next_f64() * 256.0;

        let mut perm = [0i32; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i32::try_from(i).expect("i < 256");
        }
        for i in 0..256 {
            let j = rng.next_i32_bounded(256 - i) + i;
            perm.swap(i as usize, j as usize);
            perm[i as usize + 256] = perm[i as usize];
        }

        Self {
            x_offset,
            y_offset,
            z_offset,
            perm,
        }
    }

    /// A single-point sample, final scale 70 (§4.9 "final scale 70").
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64) -> f64 {
        let f2 = skew_factor();
        let g2 = unskew_factor();

        let s = (x + y) * f2;
        let i = fast_floor(x + s);
        let j = fast_floor(y + s);

        let t = f64::from(i + j) * g2;
        let x0_origin = f64::from(i) - t;
        let y0_origin = f64::from(j) - t;
        let x0 = x - x0_origin;
        let y0 = y - y0_origin;

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + g2;
        let y1 = y0 - f64::from(j1) + g2;
        let x2 = x0 - 1.0 + 2.0 * g2;
        let y2 = y0 - 1.0 + 2.0 * g2;

        let ii = (i & 0xFF) as usize;
        let jj = (j & 0xFF) as usize;
        let perm = &self.perm;
        let gi0 = (perm[ii + perm[jj] as usize] % 12) as usize;
        let gi1 = (perm[ii + i1 + perm[jj + j1] as usize] % 12) as usize;
        let gi2 = (perm[ii + 1 + perm[jj + 1] as usize] % 12) as usize;

        let n0 = contribution(x0, y0, GRAD3[gi0]);
        let n1 = contribution(x1, y1, GRAD3[gi1]);
        let n2 = contribution(x2, y2, GRAD3[gi2]);

        70.0 * (n0 + n1 + n2)
    }

    /// Fills (accumulates into) a 2D array (§4.9, same accumulate contract
    /// as [`super::perlin::PerlinNoise`]).
    #[allow(clippy::too_many_arguments)]
    pub fn fill_array(
        &self,
        out: &mut [f64],
        x_off: f64,
        y_off: f64,
        x_size: usize,
        y_size: usize,
        x_scale: f64,
        y_scale: f64,
        amplitude: f64,
    ) {
        let mut idx = 0usize;
        for j in 0..y_size {
            #[allow(clippy::cast_precision_loss)]
            let y_pos = (y_off + j as f64) * y_scale + self.y_offset;
            for i in 0..x_size {
                #[allow(clippy::cast_precision_loss)]
                let x_pos = (x_off + i as f64) * x_scale + self.x_offset;
                out[idx] += self.get_value(x_pos, y_pos) * amplitude;
                idx += 1;
            }
        }
    }
}

fn contribution(x: f64, y: f64, grad: [f64; 2]) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * dot2(grad, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let mut rng_a = LegacyRandom::new(99);
        let mut rng_b = LegacyRandom::new(99);
        let a = SimplexNoise::new(&mut rng_a);
        let b = SimplexNoise::new(&mut rng_b);
        assert!((a.get_value(1.5, 2.5) - b.get_value(1.5, 2.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn output_stays_in_expected_range() {
        let mut rng = LegacyRandom::new(5);
        let noise = SimplexNoise::new(&mut rng);
        for i in 0..20 {
            let v = noise.get_value(f64::from(i) * 0.3, f64::from(i) * 0.7);
            assert!(v.abs() <= 70.0);
        }
    }
}
