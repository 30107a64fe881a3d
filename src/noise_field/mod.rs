//! Deterministic 2D noise fields.
//!
//! A [`NoiseField`] maps `(x, z)` to a smooth value in `[-1, 1]`. It drives
//! both the density mask of scatter placement and the phase offset of the
//! wind displacement. [`Simplex2`] is the reference lattice and matches the
//! `simplex2d` WGSL function spliced into shaders, so CPU-side wind and
//! placement agree with the GPU.

pub mod simplex;
pub mod seeded;

pub use simplex::Simplex2;
pub use seeded::SeededNoise;

use serde::{Deserialize, Serialize};

/// A pure, continuous 2D scalar field with output in `[-1, 1]`.
pub trait NoiseField: Send + Sync {
    /// Sample the field.
    fn evaluate(&self, x: f32, z: f32) -> f32;

    /// Sample remapped to `[0, 1]`, as used for density masks.
    fn density(&self, x: f32, z: f32) -> f32 {
        0.5 + 0.5 * self.evaluate(x, z)
    }
}

impl<T: NoiseField + ?Sized> NoiseField for &T {
    fn evaluate(&self, x: f32, z: f32) -> f32 {
        (**self).evaluate(x, z)
    }
}

impl<T: NoiseField + ?Sized> NoiseField for Box<T> {
    fn evaluate(&self, x: f32, z: f32) -> f32 {
        (**self).evaluate(x, z)
    }
}

/// Serializable selection of a noise field implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseSource {
    /// Fixed-lattice simplex noise shared with the shaders.
    #[default]
    Reference,
    /// Seeded Perlin noise from the `noise` crate.
    Perlin { seed: u32 },
    /// Seeded OpenSimplex noise from the `noise` crate.
    OpenSimplex { seed: u32 },
}

impl NoiseSource {
    /// Instantiate the selected field.
    pub fn build(self) -> Box<dyn NoiseField> {
        match self {
            Self::Reference => Box::new(Simplex2),
            Self::Perlin { seed } => Box::new(SeededNoise::new(noise::Perlin::new(seed))),
            Self::OpenSimplex { seed } => Box::new(SeededNoise::new(noise::OpenSimplex::new(seed))),
        }
    }
}
