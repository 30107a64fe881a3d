//! Wind displacement.
//!
//! The displacement is a pure per-vertex function of the vertex's local
//! height, its world position and the current time:
//!
//! ```text
//! phase = 2π · noise(world.x / scale, world.z / scale)
//! sway  = height_factor · local_y · strength · sin(t·f + phase) · cos(1.4·t·f + phase)
//! ```
//!
//! The same formula is spliced into vertex programs by
//! [`crate::shader::WindInjector`]; this module is the CPU rendition used for
//! tests, picking and bounds.

pub mod uniform;

pub use uniform::{GpuWindUniform, TimeUniform, WindUniforms};

use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::noise_field::NoiseField;

/// Ratio between the sine and cosine frequencies of the sway.
pub const SECONDARY_RATIO: f32 = 1.4;

/// Wind parameters owned by the group that creates a material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindParams {
    pub strength: Vec3,
    /// Angular frequency multiplier applied to time.
    pub frequency: f32,
    /// World units per noise cell for the phase offset.
    pub spatial_scale: f32,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            strength: Vec3::new(0.3, 0.0, 0.3),
            frequency: 1.0,
            spatial_scale: 400.0,
        }
    }
}

impl WindParams {
    pub fn new(strength: Vec3, frequency: f32, spatial_scale: f32) -> Self {
        Self { strength, frequency, spatial_scale }
    }

    /// Time after which the sway repeats for a fixed position.
    ///
    /// sin at `f` and cos at `1.4 f` share the period `10π / f`.
    pub fn period(&self) -> Option<f32> {
        (self.frequency != 0.0).then(|| 5.0 * TAU / self.frequency.abs())
    }
}

/// Which vertex path the displacement runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindStage {
    /// Many small instanced meshes (grass blades).
    Instanced,
    /// One large mesh (flowers, tree foliage); swings damped.
    Single,
}

impl WindStage {
    pub fn height_factor(self) -> f32 {
        match self {
            Self::Instanced => 1.0,
            Self::Single => 0.2,
        }
    }

    pub fn is_instanced(self) -> bool {
        self == Self::Instanced
    }
}

/// Phase offset for a world XZ position.
pub fn phase<N: NoiseField + ?Sized>(world_xz: Vec2, params: &WindParams, noise: &N) -> f32 {
    TAU * noise.evaluate(world_xz.x / params.spatial_scale, world_xz.y / params.spatial_scale)
}

/// Sway offset for a vertex at `local_y` whose world position projects to `world_xz`.
pub fn sway<N: NoiseField + ?Sized>(
    local_y: f32,
    world_xz: Vec2,
    time: f32,
    params: &WindParams,
    stage: WindStage,
    noise: &N,
) -> Vec3 {
    let phase = phase(world_xz, params, noise);
    let f = params.frequency;
    let wave = (time * f + phase).sin() * (time * SECONDARY_RATIO * f + phase).cos();
    params.strength * (stage.height_factor() * local_y * wave)
}

/// Displaced position of a vertex, in the mesh's model space.
///
/// With an instance transform the vertex is first moved into instance space;
/// the world position used for the phase lookup is `model · base`. The sway is
/// scaled by the untransformed local height so roots stay planted.
pub fn displace_vertex<N: NoiseField + ?Sized>(
    local: Vec3,
    instance: Option<&Mat4>,
    model: &Mat4,
    time: f32,
    params: &WindParams,
    noise: &N,
) -> Vec3 {
    let (base, stage) = match instance {
        Some(m) => (m.transform_point3(local), WindStage::Instanced),
        None => (local, WindStage::Single),
    };
    let world = model.transform_point3(base);
    base + sway(local.y, Vec2::new(world.x, world.z), time, params, stage, noise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::Simplex2;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_root_never_moves() {
        let params = WindParams::default();
        for i in 0..100 {
            let t = i as f32 * 0.37;
            let xz = Vec2::new(i as f32 * 13.0 - 400.0, i as f32 * -7.0);
            for stage in [WindStage::Instanced, WindStage::Single] {
                assert_eq!(sway(0.0, xz, t, &params, stage, &Simplex2), Vec3::ZERO);
            }
        }
    }

    #[test]
    fn test_zero_strength_is_a_gate() {
        let params = WindParams::new(Vec3::ZERO, 1.0, 400.0);
        for i in 0..100 {
            let t = i as f32 * 0.91;
            let xz = Vec2::new(i as f32 * 3.0, 50.0 - i as f32);
            let s = sway(i as f32 * 0.1 + 1.0, xz, t, &params, WindStage::Instanced, &Simplex2);
            assert_eq!(s, Vec3::ZERO);
        }
    }

    #[test]
    fn test_periodic_in_time() {
        let params = WindParams::new(Vec3::new(0.3, 0.0, 0.3), 1.0, 400.0);
        let period = params.period().unwrap();
        assert!((period - 10.0 * std::f32::consts::PI).abs() < EPS);
        let xz = Vec2::new(120.0, -35.0);
        for i in 0..20 {
            let t = i as f32 * 0.25;
            let a = sway(4.0, xz, t, &params, WindStage::Instanced, &Simplex2);
            let b = sway(4.0, xz, t + period, &params, WindStage::Instanced, &Simplex2);
            assert!((a - b).length() < 1e-3, "t={t}: {a} vs {b}");
        }
    }

    #[test]
    fn test_zero_frequency_has_no_period() {
        let params = WindParams::new(Vec3::ONE, 0.0, 1.0);
        assert!(params.period().is_none());
    }

    #[test]
    fn test_single_stage_damped() {
        let params = WindParams::default();
        let xz = Vec2::new(10.0, 20.0);
        let full = sway(2.0, xz, 1.3, &params, WindStage::Instanced, &Simplex2);
        let damped = sway(2.0, xz, 1.3, &params, WindStage::Single, &Simplex2);
        assert!((damped - full * 0.2).length() < EPS);
    }

    #[test]
    fn test_sway_follows_strength_direction() {
        let params = WindParams::new(Vec3::new(1.0, 0.0, 0.0), 1.0, 400.0);
        let s = sway(1.0, Vec2::new(5.0, 5.0), 0.8, &params, WindStage::Instanced, &Simplex2);
        assert_eq!(s.y, 0.0);
        assert_eq!(s.z, 0.0);
        assert!(s.x.abs() <= 1.0);
    }

    #[test]
    fn test_matches_formula() {
        let params = WindParams::new(Vec3::new(0.1, 0.0, 0.1), 0.1, 80.0);
        let xz = Vec2::new(33.0, -12.0);
        let t = 7.5;
        let ph = TAU * Simplex2.evaluate(33.0 / 80.0, -12.0 / 80.0);
        let expected = 0.2 * 3.0 * (t * 0.1 + ph).sin() * (t * 1.4 * 0.1 + ph).cos();
        let s = sway(3.0, xz, t, &params, WindStage::Single, &Simplex2);
        assert!((s.x - 0.1 * expected).abs() < EPS);
    }

    #[test]
    fn test_displace_instanced_uses_instance_space() {
        let params = WindParams::new(Vec3::ZERO, 1.0, 400.0);
        let instance = Mat4::from_translation(Vec3::new(50.0, 0.0, 0.0));
        let p = displace_vertex(Vec3::new(0.0, 1.0, 0.0), Some(&instance), &Mat4::IDENTITY, 2.0, &params, &Simplex2);
        assert_eq!(p, Vec3::new(50.0, 1.0, 0.0));
    }

    #[test]
    fn test_displace_root_fixed() {
        let params = WindParams::default();
        let instance = Mat4::from_scale(Vec3::splat(5.0));
        let p = displace_vertex(Vec3::new(0.3, 0.0, 0.1), Some(&instance), &Mat4::IDENTITY, 9.0, &params, &Simplex2);
        assert!((p - Vec3::new(1.5, 0.0, 0.5)).length() < EPS);
    }

    #[test]
    fn test_displace_single_moves_tip() {
        let params = WindParams::new(Vec3::new(1.0, 0.0, 1.0), 1.0, 400.0);
        let model = Mat4::from_translation(Vec3::new(7.0, 0.0, 3.0));
        let tip = Vec3::new(0.0, 10.0, 0.0);
        let moved = (0..50)
            .map(|i| displace_vertex(tip, None, &model, i as f32 * 0.2, &params, &Simplex2))
            .any(|p| (p - tip).length() > 1e-3);
        assert!(moved);
    }
}
