//! Placement options: spatial domain, density mask, scale ranges.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Region of the ground plane candidates are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    /// Ring around the origin; radius sampled uniformly in `[radius_min, radius_max]`.
    Annulus { radius_min: f32, radius_max: f32 },
    /// Axis-aligned square `[-half_extent, half_extent]` on X and Z.
    Square { half_extent: f32 },
}

impl Default for Domain {
    fn default() -> Self {
        Self::Annulus { radius_min: 10.0, radius_max: 510.0 }
    }
}

/// How per-instance scale is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Independent sample per axis.
    #[default]
    PerAxis,
    /// One sample from the X components, applied to all axes.
    Uniform,
}

/// Noise-based rejection mask producing patchy clusters.
///
/// A candidate is rejected when both the smooth density
/// `0.5 + 0.5 * noise(x / noise_scale, z / noise_scale)` and an independent
/// `random01 + bias` exceed `patchiness`. Higher patchiness keeps more.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityMask {
    /// World units per noise lattice cell.
    pub noise_scale: f32,
    /// Threshold in `[0, 1]`.
    pub patchiness: f32,
    /// Added to the random draw; larger values sharpen patch edges.
    pub bias: f32,
}

impl DensityMask {
    /// Bias for dense instanced foliage (grass).
    pub const FOLIAGE_BIAS: f32 = 0.6;
    /// Bias for sparse decorations (flowers).
    pub const FLOWER_BIAS: f32 = 0.8;

    pub fn foliage(noise_scale: f32, patchiness: f32) -> Self {
        Self { noise_scale, patchiness, bias: Self::FOLIAGE_BIAS }
    }

    pub fn flowers(noise_scale: f32, patchiness: f32) -> Self {
        Self { noise_scale, patchiness, bias: Self::FLOWER_BIAS }
    }

    /// Whether a candidate with noise density `density` and random draw
    /// `roll` in `[0, 1)` is rejected.
    pub fn rejects(&self, density: f32, roll: f32) -> bool {
        density > self.patchiness && roll + self.bias > self.patchiness
    }
}

/// Largest radius or half extent a domain may use; sampling spans stay finite below it.
pub const MAX_COORDINATE: f32 = f32::MAX / 4.0;

/// Everything scatter placement needs for one group of instances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    /// Candidate budget; also the upper bound on emitted instances.
    pub count: usize,
    pub domain: Domain,
    /// Height of every emitted position.
    pub ground_y: f32,
    pub scale_base: Vec3,
    pub scale_variation: Vec3,
    pub scale_mode: ScaleMode,
    /// `None` accepts every candidate.
    pub mask: Option<DensityMask>,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            count: 0,
            domain: Domain::default(),
            ground_y: 0.0,
            scale_base: Vec3::ONE,
            scale_variation: Vec3::ZERO,
            scale_mode: ScaleMode::PerAxis,
            mask: None,
        }
    }
}

impl PlacementOptions {
    /// Annulus placement with unit scale and no mask.
    pub fn annulus(count: usize, radius_min: f32, radius_max: f32) -> Self {
        Self {
            count,
            domain: Domain::Annulus { radius_min, radius_max },
            ..Default::default()
        }
    }

    /// Square placement with unit scale and no mask.
    pub fn square(count: usize, half_extent: f32) -> Self {
        Self {
            count,
            domain: Domain::Square { half_extent },
            ..Default::default()
        }
    }

    pub fn with_ground_y(mut self, ground_y: f32) -> Self {
        self.ground_y = ground_y;
        self
    }

    pub fn with_scale(mut self, base: Vec3, variation: Vec3) -> Self {
        self.scale_base = base;
        self.scale_variation = variation;
        self
    }

    pub fn with_uniform_scale(mut self, base: f32, variation: f32) -> Self {
        self.scale_base = Vec3::splat(base);
        self.scale_variation = Vec3::splat(variation);
        self.scale_mode = ScaleMode::Uniform;
        self
    }

    pub fn with_mask(mut self, mask: DensityMask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Check the invariants placement relies on.
    pub fn validate(&self) -> Result<()> {
        match self.domain {
            Domain::Annulus { radius_min, radius_max } => {
                if !(radius_min >= 0.0) || !(radius_max <= MAX_COORDINATE) {
                    return Err(Error::Config(format!(
                        "annulus radii must be in [0, {MAX_COORDINATE:e}], got [{radius_min}, {radius_max}]"
                    )));
                }
                if !(radius_max >= radius_min) {
                    return Err(Error::Config(format!(
                        "radius_max ({radius_max}) must be >= radius_min ({radius_min})"
                    )));
                }
            }
            Domain::Square { half_extent } => {
                if !(half_extent >= 0.0 && half_extent <= MAX_COORDINATE) {
                    return Err(Error::Config(format!(
                        "half_extent must be in [0, {MAX_COORDINATE:e}], got {half_extent}"
                    )));
                }
            }
        }

        if !self.ground_y.is_finite() {
            return Err(Error::Config(format!("ground_y must be finite, got {}", self.ground_y)));
        }

        if !self.scale_base.is_finite() || !self.scale_variation.is_finite() {
            return Err(Error::Config("scale base and variation must be finite".into()));
        }
        if self.scale_base.min_element() < 0.0 || self.scale_variation.min_element() < 0.0 {
            return Err(Error::Config("scale base and variation must be non-negative".into()));
        }

        if let Some(mask) = &self.mask {
            if !(mask.noise_scale > 0.0) || !mask.noise_scale.is_finite() {
                return Err(Error::Config(format!("noise_scale must be > 0, got {}", mask.noise_scale)));
            }
            if !(0.0..=1.0).contains(&mask.patchiness) {
                return Err(Error::Config(format!("patchiness must be in [0, 1], got {}", mask.patchiness)));
            }
            if !mask.bias.is_finite() {
                return Err(Error::Config(format!("mask bias must be finite, got {}", mask.bias)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_defaults() {
        assert!(PlacementOptions::default().validate().is_ok());
        assert!(PlacementOptions::annulus(10, 10.0, 500.0).validate().is_ok());
        assert!(PlacementOptions::annulus(10, 5.0, 5.0).validate().is_ok());
        assert!(PlacementOptions::square(10, 250.0).validate().is_ok());
    }

    #[test]
    fn test_inverted_radii_rejected() {
        let err = PlacementOptions::annulus(10, 50.0, 10.0).validate();
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_negative_scale_rejected() {
        let opts = PlacementOptions::annulus(1, 0.0, 1.0)
            .with_scale(Vec3::new(1.0, -1.0, 1.0), Vec3::ZERO);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_mask_bounds() {
        let base = PlacementOptions::annulus(1, 0.0, 1.0);
        assert!(base.clone().with_mask(DensityMask::foliage(0.0, 0.5)).validate().is_err());
        assert!(base.clone().with_mask(DensityMask::foliage(10.0, 1.5)).validate().is_err());
        assert!(base.with_mask(DensityMask::flowers(10.0, 1.0)).validate().is_ok());
    }

    #[test]
    fn test_unbounded_domains_rejected() {
        assert!(PlacementOptions::annulus(10, 0.0, f32::INFINITY).validate().is_err());
        assert!(PlacementOptions::annulus(10, f32::NAN, 5.0).validate().is_err());
        assert!(PlacementOptions::square(10, 3.0e38).validate().is_err());
        assert!(PlacementOptions::square(10, f32::INFINITY).validate().is_err());
        assert!(PlacementOptions::square(10, f32::MAX / 2.0).validate().is_err());
        assert!(PlacementOptions::square(10, MAX_COORDINATE).validate().is_ok());
        assert!(PlacementOptions::annulus(10, 0.0, MAX_COORDINATE).validate().is_ok());
    }

    #[test]
    fn test_non_finite_scale_and_mask_rejected() {
        let base = PlacementOptions::annulus(1, 0.0, 1.0);
        assert!(base.clone().with_scale(Vec3::splat(f32::INFINITY), Vec3::ZERO).validate().is_err());
        assert!(base.clone().with_scale(Vec3::ONE, Vec3::new(0.0, f32::NAN, 0.0)).validate().is_err());
        assert!(base.clone().with_mask(DensityMask::foliage(f32::INFINITY, 0.5)).validate().is_err());
        assert!(base.with_ground_y(f32::NEG_INFINITY).validate().is_err());
    }

    #[test]
    fn test_mask_rejection_rule() {
        let mask = DensityMask::foliage(100.0, 0.7);
        // Low density always kept
        assert!(!mask.rejects(0.5, 0.99));
        // High density but the random draw rescues it
        assert!(!mask.rejects(0.9, 0.05));
        // Both exceed
        assert!(mask.rejects(0.9, 0.5));
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: PlacementOptions = serde_json::from_str(
            r#"{"count": 12, "domain": {"kind": "square", "half_extent": 4.0}}"#,
        )
        .unwrap();
        assert_eq!(opts.count, 12);
        assert_eq!(opts.domain, Domain::Square { half_extent: 4.0 });
        assert_eq!(opts.scale_base, Vec3::ONE);
        assert!(opts.mask.is_none());
    }
}
