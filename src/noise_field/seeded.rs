//! Adapter exposing `noise` crate generators as a [`NoiseField`].

use noise::NoiseFn;

use super::NoiseField;

/// Wraps any 2D `noise` crate generator; output is clamped to `[-1, 1]`
/// since gradient generators can overshoot slightly.
#[derive(Clone, Debug)]
pub struct SeededNoise<N> {
    inner: N,
}

impl<N> SeededNoise<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: NoiseFn<f64, 2> + Send + Sync> NoiseField for SeededNoise<N> {
    fn evaluate(&self, x: f32, z: f32) -> f32 {
        let v = self.inner.get([x as f64, z as f64]) as f32;
        if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Perlin;

    #[test]
    fn test_perlin_bounded_and_pure() {
        let field = SeededNoise::new(Perlin::new(42));
        for i in 0..500 {
            let x = (i as f32) * 0.731 - 100.0;
            let z = (i as f32) * -1.117 + 55.0;
            let v = field.evaluate(x, z);
            assert!((-1.0..=1.0).contains(&v));
            assert_eq!(v, field.evaluate(x, z));
        }
    }

    #[test]
    fn test_seed_changes_field() {
        let a = SeededNoise::new(Perlin::new(1));
        let b = SeededNoise::new(Perlin::new(2));
        let differs = (0..50).any(|i| {
            let x = i as f32 * 0.43 + 0.1;
            a.evaluate(x, 0.7) != b.evaluate(x, 0.7)
        });
        assert!(differs);
    }
}
