//! Fixed-lattice 2D simplex noise.
//!
//! Hash via the `mod 289` permutation polynomial and gradients from a
//! 41-point ring mapped onto a rotated square. The WGSL twin lives in
//! `shaders/simplex2d.wgsl`; keep the constants in sync.

use glam::Vec2;

use super::NoiseField;

/// (3 - sqrt(3)) / 6
const SKEW_UNIT: f32 = 0.211_324_87;
/// 0.5 * (sqrt(3) - 1)
const SKEW_IN: f32 = 0.366_025_4;
/// -1 + 2 * SKEW_UNIT
const CORNER2: f32 = -0.577_350_26;
/// 1 / 41
const RING: f32 = 0.024_390_243;
/// Normalization so the output spans roughly [-1, 1].
const OUTPUT_SCALE: f32 = 130.0;

/// Reference gradient noise. Stateless; every instance is the same field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Simplex2;

impl Simplex2 {
    /// Raw sample, before clamping.
    pub fn sample(x: f32, z: f32) -> f32 {
        let v = Vec2::new(x, z);

        // Skew to find the simplex cell, unskew back to the cell origin
        let i = (v + Vec2::splat(v.dot(Vec2::splat(SKEW_IN)))).floor();
        let x0 = v - i + Vec2::splat(i.dot(Vec2::splat(SKEW_UNIT)));

        let i1 = if x0.x > x0.y { Vec2::new(1.0, 0.0) } else { Vec2::new(0.0, 1.0) };
        let x1 = x0 + Vec2::splat(SKEW_UNIT) - i1;
        let x2 = x0 + Vec2::splat(CORNER2);

        let ix = mod289(i.x);
        let iz = mod289(i.y);
        let hashes = [
            permute(permute(iz) + ix),
            permute(permute(iz + i1.y) + ix + i1.x),
            permute(permute(iz + 1.0) + ix + 1.0),
        ];

        let total: f32 = [x0, x1, x2]
            .into_iter()
            .zip(hashes)
            .map(|(offset, hash)| corner(offset, hash))
            .sum();

        OUTPUT_SCALE * total
    }
}

impl NoiseField for Simplex2 {
    fn evaluate(&self, x: f32, z: f32) -> f32 {
        let v = Self::sample(x, z);
        if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
    }
}

fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289((x * 34.0 + 1.0) * x)
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Contribution of one simplex corner.
fn corner(offset: Vec2, hash: f32) -> f32 {
    let t = (0.5 - offset.dot(offset)).max(0.0);
    if t == 0.0 {
        return 0.0;
    }
    let mut m = t * t;
    m *= m;

    let gx = 2.0 * fract(hash * RING) - 1.0;
    let h = gx.abs() - 0.5;
    let a0 = gx - (gx + 0.5).floor();

    // Approximate gradient normalization
    m *= 1.792_842_9 - 0.853_734_7 * (a0 * a0 + h * h);

    m * (a0 * offset.x + h * offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_stable() {
        let a = Simplex2.evaluate(0.0, 0.0);
        for _ in 0..10 {
            assert_eq!(Simplex2.evaluate(0.0, 0.0), a);
        }
        assert!((-1.0..=1.0).contains(&a));
    }

    #[test]
    fn test_bounded_over_wide_domain() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for ix in -60..60 {
            for iz in -60..60 {
                let x = ix as f32 * 0.173 + 0.01;
                let z = iz as f32 * 0.219 - 0.02;
                let v = Simplex2.evaluate(x, z);
                assert!((-1.0..=1.0).contains(&v), "out of range at ({x}, {z}): {v}");
                min = min.min(v);
                max = max.max(v);
            }
        }
        // Not a constant field
        assert!(max - min > 0.5);
    }

    #[test]
    fn test_large_coordinates_finite() {
        for &(x, z) in &[(1.0e4_f32, -3.0e4_f32), (-2.5e5, 7.0e5), (123456.7, 0.5)] {
            let v = Simplex2.evaluate(x, z);
            assert!(v.is_finite());
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_continuity() {
        let step = 1.0e-3;
        for i in 0..400 {
            let x = i as f32 * 0.057 - 7.0;
            let z = i as f32 * 0.031 + 3.0;
            let a = Simplex2.evaluate(x, z);
            let b = Simplex2.evaluate(x + step, z);
            assert!((a - b).abs() < 0.05, "jump at ({x}, {z})");
        }
    }
}
