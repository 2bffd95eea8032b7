/*
 * Terrain Module
 *
 * The simulation only ever asks the terrain one question: how high is the
 * ground under this horizontal point? That question is the HeightOracle
 * trait. The host decides what the ground looks like; the flock only needs
 * the answer to be a finite number for every (x, z).
 */

use nannou::noise::{NoiseFn, Perlin, Seedable};

/// Terrain elevation lookup injected into the simulation at construction.
pub trait HeightOracle {
    /// Elevation (world Y) of the ground at horizontal position `(x, z)`.
    fn elevation_at(&self, x: f32, z: f32) -> f32;
}

impl<T: HeightOracle + ?Sized> HeightOracle for &T {
    fn elevation_at(&self, x: f32, z: f32) -> f32 {
        (**self).elevation_at(x, z)
    }
}

// Level ground at a fixed height
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Default for FlatTerrain {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl HeightOracle for FlatTerrain {
    fn elevation_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// Hills built from a few octaves of seeded Perlin noise.
///
/// Defined everywhere, so agents that wander past the edge of the drawn
/// terrain still get a sensible floor.
#[derive(Clone, Debug)]
pub struct RollingTerrain {
    noise: Perlin,
    pub base_height: f32,
    pub amplitude: f32,
    pub wavelength: f32,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

impl Default for RollingTerrain {
    fn default() -> Self {
        Self::new(7)
    }
}

impl RollingTerrain {
    pub fn new(seed: u64) -> Self {
        Self {
            noise: Perlin::new().set_seed(fold_seed(seed)),
            base_height: -20.0,
            amplitude: 60.0,
            wavelength: 180.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    pub fn seed(&self) -> u32 {
        self.noise.seed()
    }

    // Octave sum normalised back into [-1, 1]
    fn fractal(&self, x: f64, z: f64) -> f64 {
        let (total, norm, _, _): (f64, f64, f64, f64) = (0..self.octaves.max(1)).fold(
            (0.0, 0.0, 1.0, 1.0),
            |(total, norm, amp, freq), octave| {
                // Shift each octave off the integer lattice, where Perlin is zero
                let offset = f64::from(octave) * 17.31 + 0.5;
                let n = self.noise.get([x * freq + offset, z * freq + offset]);
                (
                    total + n * amp,
                    norm + amp,
                    amp * self.persistence,
                    freq * self.lacunarity,
                )
            },
        );
        if norm > 0.0 {
            (total / norm).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

impl HeightOracle for RollingTerrain {
    fn elevation_at(&self, x: f32, z: f32) -> f32 {
        if !x.is_finite() || !z.is_finite() || self.wavelength <= 0.0 {
            return self.base_height;
        }

        let scale = 1.0 / f64::from(self.wavelength);
        let n = self.fractal(f64::from(x) * scale, f64::from(z) * scale);
        self.base_height + self.amplitude * n as f32
    }
}

// Perlin takes a 32-bit seed
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}
