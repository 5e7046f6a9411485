//! Multi-octave wrappers over [`PerlinNoise`] and [`SimplexNoise`]
//! (§4.9 "Multi-octave wrappers").

use terra_utils::LegacyRandom;

use super::perlin::PerlinNoise;
use super::simplex::SimplexNoise;

/// Coordinates wrap at this bound to prevent floating-point drift at
/// extreme world coordinates (§4.9 "coordinate wrap at 2^24").
const COORDINATE_WRAP: i64 = 1 << 24;

/// Multi-octave 3D improved-Perlin noise (§4.9 "`NoiseGeneratorOctaves`").
#[derive(Debug, Clone)]
pub struct OctavePerlinNoise {
    octaves: Vec<PerlinNoise>,
}

impl OctavePerlinNoise {
    #[must_use]
    pub fn new(rng: &mut LegacyRandom, octave_count: usize) -> Self {
        let octaves = (0..octave_count).map(|_| PerlinNoise::new(rng)).collect();
        Self { octaves }
    }

    /// Generates a fresh 3D noise volume. `persistence` halves amplitude
    /// per octave by default (§4.9).
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn generate_3d(
        &self,
        x_off: i32,
        y_off: i32,
        z_off: i32,
        x_size: usize,
        y_size: usize,
        z_size: usize,
        x_scale: f64,
        y_scale: f64,
        z_scale: f64,
    ) -> Vec<f64> {
        let mut out = vec![0.0; x_size * y_size * z_size];
        let mut amplitude = 1.0;

        for octave in &self.octaves {
            let dx = f64::from(x_off) * amplitude * x_scale;
            let dy = f64::from(y_off) * amplitude * y_scale;
            let dz = f64::from(z_off) * amplitude * z_scale;

            // `floor_long` (Java `MathHelper.floor_double_long`): floors
            // toward negative infinity, unlike a plain cast.
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let lx = {
                let truncated = dx as i64;
                if dx < truncated as f64 {
                    truncated - 1
                } else {
                    truncated
                }
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let lz = {
                let truncated = dz as i64;
                if dz < truncated as f64 {
                    truncated - 1
                } else {
                    truncated
                }
            };
            // `%`, not `rem_euclid`: Java/C++ truncate toward zero here.
            #[allow(clippy::cast_precision_loss)]
            let dx = dx - (lx % COORDINATE_WRAP) as f64;
            #[allow(clippy::cast_precision_loss)]
            let dz = dz - (lz % COORDINATE_WRAP) as f64;

            octave.populate_noise_array(
                &mut out,
                dx,
                dy,
                dz,
                x_size,
                y_size,
                z_size,
                x_scale * amplitude,
                y_scale * amplitude,
                z_scale * amplitude,
                amplitude,
            );
            amplitude /= 2.0;
        }
        out
    }

    /// The 2D specialisation: a single Y-layer at `y_off = 10`
    /// (§4.9, matching the original's `generateNoiseOctaves2D` shim).
    #[must_use]
    pub fn generate_2d(
        &self,
        x_off: i32,
        z_off: i32,
        x_size: usize,
        z_size: usize,
        x_scale: f64,
        z_scale: f64,
    ) -> Vec<f64> {
        self.generate_3d(x_off, 10, z_off, x_size, 1, z_size, x_scale, 1.0, z_scale)
    }
}

/// Multi-octave 2D simplex noise (§4.9 "`NoiseGeneratorPerlin`"). Named
/// `OctaveSimplexNoise` rather than keeping the original's misleading
/// "Perlin" name for a simplex wrapper.
#[derive(Debug, Clone)]
pub struct OctaveSimplexNoise {
    octaves: Vec<SimplexNoise>,
}

impl OctaveSimplexNoise {
    #[must_use]
    pub fn new(rng: &mut LegacyRandom, octave_count: usize) -> Self {
        let octaves = (0..octave_count).map(|_| SimplexNoise::new(rng)).collect();
        Self { octaves }
    }

    #[must_use]
    pub fn get_value(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut freq = 1.0;
        for octave in &self.octaves {
            total += octave.get_value(x * freq, y * freq) / freq;
            freq /= 2.0;
        }
        total
    }

    /// `lacunarity` multiplies frequency per octave, `persistence` (default
    /// `0.5`) multiplies amplitude (§4.9).
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn fill_array(
        &self,
        x_off: f64,
        y_off: f64,
        x_size: usize,
        y_size: usize,
        x_scale: f64,
        y_scale: f64,
        lacunarity: f64,
        persistence: f64,
    ) -> Vec<f64> {
        let mut out = vec![0.0; x_size * y_size];
        let mut freq = 1.0;
        let mut amp = 1.0;
        for octave in &self.octaves {
            octave.fill_array(
                &mut out,
                x_off,
                y_off,
                x_size,
                y_size,
                x_scale * freq,
                y_scale * freq,
                0.55 / amp,
            );
            freq *= lacunarity;
            amp *= persistence;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_perlin_is_deterministic() {
        let mut rng_a = LegacyRandom::new(10);
        let mut rng_b = LegacyRandom::new(10);
        let a = OctavePerlinNoise::new(&mut rng_a, 4);
        let b = OctavePerlinNoise::new(&mut rng_b, 4);
        let out_a = a.generate_3d(0, 0, 0, 4, 4, 4, 1.0, 1.0, 1.0);
        let out_b = b.generate_3d(0, 0, 0, 4, 4, 4, 1.0, 1.0, 1.0);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn octave_simplex_sums_decaying_amplitudes() {
        let mut rng = LegacyRandom::new(11);
        let noise = OctaveSimplexNoise::new(&mut rng, 3);
        let v = noise.get_value(1.0, 1.0);
        assert!(v.is_finite());
    }
}
