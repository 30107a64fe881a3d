//! Scatter placement: noise-masked rejection sampling of instance transforms.
//!
//! Candidates are drawn from a [`Domain`], filtered by an optional
//! [`DensityMask`], and given a random yaw and per-axis scale. The candidate
//! budget equals the requested count, so `count` is a soft target: fewer
//! instances come back whenever the mask rejects some.

pub mod options;
pub mod instance;

pub use options::{DensityMask, Domain, PlacementOptions, ScaleMode};
pub use instance::PlacementInstance;

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::core::Result;
use crate::noise_field::NoiseField;

/// Run placement for `options`, returning between 0 and `options.count` instances.
pub fn scatter<N, R>(options: &PlacementOptions, noise: &N, rng: &mut R) -> Result<Vec<PlacementInstance>>
where
    N: NoiseField + ?Sized,
    R: Rng + ?Sized,
{
    options.validate()?;

    let mut out = Vec::with_capacity(options.count);
    for _ in 0..options.count {
        let position = sample_position(&options.domain, options.ground_y, rng);

        if let Some(mask) = &options.mask {
            let density = noise.density(position.x / mask.noise_scale, position.z / mask.noise_scale);
            // Draw unconditionally so the random stream does not depend on the field
            let roll: f32 = rng.r#gen();
            if mask.rejects(density, roll) {
                continue;
            }
        }

        let rotation_y = rng.gen_range(0.0..TAU);
        let scale = sample_scale(options, rng);
        out.push(PlacementInstance { position, rotation_y, scale });
    }

    if out.is_empty() && options.count > 0 {
        log::debug!("scatter: no candidates accepted out of {}", options.count);
    }

    Ok(out)
}

fn sample_position<R: Rng + ?Sized>(domain: &Domain, ground_y: f32, rng: &mut R) -> Vec3 {
    match *domain {
        Domain::Annulus { radius_min, radius_max } => {
            let r = if radius_max > radius_min {
                rng.gen_range(radius_min..=radius_max)
            } else {
                radius_min
            };
            let theta = rng.gen_range(0.0..TAU);
            Vec3::new(r * theta.cos(), ground_y, r * theta.sin())
        }
        Domain::Square { half_extent } => {
            if half_extent > 0.0 {
                Vec3::new(
                    rng.gen_range(-half_extent..=half_extent),
                    ground_y,
                    rng.gen_range(-half_extent..=half_extent),
                )
            } else {
                Vec3::new(0.0, ground_y, 0.0)
            }
        }
    }
}

fn sample_scale<R: Rng + ?Sized>(options: &PlacementOptions, rng: &mut R) -> Vec3 {
    let base = options.scale_base;
    let var = options.scale_variation;
    match options.scale_mode {
        ScaleMode::PerAxis => Vec3::new(
            var.x * rng.r#gen::<f32>() + base.x,
            var.y * rng.r#gen::<f32>() + base.y,
            var.z * rng.r#gen::<f32>() + base.z,
        ),
        ScaleMode::Uniform => Vec3::splat(var.x * rng.r#gen::<f32>() + base.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::Simplex2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f32 = 1e-3;

    /// Field that is always at its maximum, so every masked candidate is at risk.
    struct Saturated;

    impl NoiseField for Saturated {
        fn evaluate(&self, _x: f32, _z: f32) -> f32 {
            1.0
        }
    }

    fn grass_like(count: usize) -> PlacementOptions {
        PlacementOptions::annulus(count, 10.0, 500.0)
            .with_scale(Vec3::new(5.0, 4.0, 5.0), Vec3::new(1.0, 2.0, 1.0))
            .with_mask(DensityMask::foliage(100.0, 0.7))
    }

    #[test]
    fn test_scenario_annulus_patchy() {
        let mut rng = StdRng::seed_from_u64(1);
        let opts = grass_like(1000);
        let out = scatter(&opts, &Simplex2, &mut rng).unwrap();
        assert!(out.len() <= 1000);
        for inst in &out {
            let r = inst.radius_xz();
            assert!(r >= 10.0 - EPS && r <= 500.0 + EPS, "radius {r} out of band");
            assert_eq!(inst.position.y, 0.0);
        }
    }

    #[test]
    fn test_never_overshoots() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let count = 1 + seed as usize * 13;
            let out = scatter(&grass_like(count), &Simplex2, &mut rng).unwrap();
            assert!(out.len() <= count);
        }
    }

    #[test]
    fn test_scale_within_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let opts = grass_like(500);
        for inst in scatter(&opts, &Simplex2, &mut rng).unwrap() {
            for axis in 0..3 {
                let lo = opts.scale_base[axis];
                let hi = lo + opts.scale_variation[axis];
                assert!(inst.scale[axis] >= lo && inst.scale[axis] <= hi + EPS);
            }
            assert!(inst.rotation_y >= 0.0 && inst.rotation_y < TAU);
        }
    }

    #[test]
    fn test_unmasked_places_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = scatter(&PlacementOptions::annulus(64, 175.0, 675.0), &Simplex2, &mut rng).unwrap();
        assert_eq!(out.len(), 64);
    }

    #[test]
    fn test_zero_patchiness_with_saturated_field_rejects_all() {
        // density 1.0 > 0 and roll + 0.6 > 0 always: nothing survives
        let mut rng = StdRng::seed_from_u64(5);
        let opts = PlacementOptions::annulus(200, 10.0, 20.0)
            .with_mask(DensityMask::foliage(10.0, 0.0));
        let out = scatter(&opts, &Saturated, &mut rng).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_full_patchiness_keeps_all() {
        let mut rng = StdRng::seed_from_u64(5);
        let opts = PlacementOptions::annulus(200, 10.0, 20.0)
            .with_mask(DensityMask::flowers(10.0, 1.0));
        let out = scatter(&opts, &Saturated, &mut rng).unwrap();
        assert_eq!(out.len(), 200);
    }

    #[test]
    fn test_zero_count() {
        let mut rng = StdRng::seed_from_u64(0);
        let out = scatter(&grass_like(0), &Simplex2, &mut rng).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_square_domain_and_ground_height() {
        let mut rng = StdRng::seed_from_u64(11);
        let opts = PlacementOptions::square(50, 250.0)
            .with_ground_y(0.3)
            .with_scale(Vec3::splat(2.0), Vec3::splat(5.0));
        let out = scatter(&opts, &Simplex2, &mut rng).unwrap();
        assert_eq!(out.len(), 50);
        for inst in out {
            assert!(inst.position.x.abs() <= 250.0 && inst.position.z.abs() <= 250.0);
            assert_eq!(inst.position.y, 0.3);
        }
    }

    #[test]
    fn test_uniform_scale_mode() {
        let mut rng = StdRng::seed_from_u64(21);
        let opts = PlacementOptions::annulus(30, 10.0, 210.0).with_uniform_scale(0.02, 0.03);
        for inst in scatter(&opts, &Simplex2, &mut rng).unwrap() {
            assert_eq!(inst.scale.x, inst.scale.y);
            assert_eq!(inst.scale.y, inst.scale.z);
            assert!(inst.scale.x >= 0.02 && inst.scale.x <= 0.05 + EPS);
        }
    }

    #[test]
    fn test_degenerate_annulus() {
        let mut rng = StdRng::seed_from_u64(2);
        let out = scatter(&PlacementOptions::annulus(10, 42.0, 42.0), &Simplex2, &mut rng).unwrap();
        for inst in out {
            assert!((inst.radius_xz() - 42.0).abs() < EPS);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let opts = grass_like(300);
        let a = scatter(&opts, &Simplex2, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = scatter(&opts, &Simplex2, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_options_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let opts = PlacementOptions::annulus(10, 20.0, 10.0);
        assert!(scatter(&opts, &Simplex2, &mut rng).is_err());
    }

    #[test]
    fn test_unbounded_domain_errors_instead_of_sampling() {
        let mut rng = StdRng::seed_from_u64(0);
        let wide = PlacementOptions::square(10, 3.0e38);
        assert!(matches!(scatter(&wide, &Simplex2, &mut rng), Err(crate::core::error::Error::Config(_))));
        let open = PlacementOptions::annulus(10, 0.0, f32::INFINITY);
        assert!(scatter(&open, &Simplex2, &mut rng).is_err());
    }
}
