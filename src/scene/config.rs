//! Scene configuration.
//!
//! Every field has a default reproducing the stock scene, so an empty JSON
//! object is a valid config.

use std::path::Path;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{CentralTreeOptions, CloudOptions, ForestOptions, GrassOptions, GroundOptions, RockOptions};
use crate::core::{rgb_from_hex, Error, Result};
use crate::noise_field::NoiseSource;

/// Sky colour and exponential fog.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub background: u32,
    pub fog_color: u32,
    pub fog_density: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            background: 0x87ceeb,
            fog_color: 0x87ceeb,
            fog_density: 0.0005,
        }
    }
}

impl SkyConfig {
    pub fn background_rgb(&self) -> Vec3 {
        Vec3::from(rgb_from_hex(self.background))
    }

    pub fn fog_rgb(&self) -> Vec3 {
        Vec3::from(rgb_from_hex(self.fog_color))
    }
}

/// Directional sun placed by azimuth and elevation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    /// Degrees, measured from +Z towards +X.
    pub azimuth: f32,
    /// Degrees above the horizon.
    pub elevation: f32,
    pub distance: f32,
    pub color: u32,
    pub intensity: f32,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            azimuth: 90.0,
            elevation: 45.0,
            distance: 100.0,
            color: 0xffe5b0,
            intensity: 5.0,
        }
    }
}

impl SunConfig {
    pub fn position(&self) -> Vec3 {
        let el = self.elevation.to_radians();
        let az = self.azimuth.to_radians();
        self.distance * Vec3::new(el.cos() * az.sin(), el.sin(), el.cos() * az.cos())
    }

    /// Direction the light travels (sun towards origin).
    pub fn direction(&self) -> Vec3 {
        (-self.position()).normalize_or(Vec3::NEG_Y)
    }

    pub fn color_rgb(&self) -> Vec3 {
        Vec3::from(rgb_from_hex(self.color))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self { color: 0xffffff, intensity: 0.4 }
    }
}

/// Top-level configuration for [`super::TreeScene`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed seed for every random draw; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Field used for density masks and CPU-side wind phase.
    pub noise: NoiseSource,
    pub sky: SkyConfig,
    pub sun: SunConfig,
    pub ambient: AmbientConfig,
    pub grass: GrassOptions,
    pub rocks: RockOptions,
    pub forest: ForestOptions,
    pub central_tree: CentralTreeOptions,
    pub ground: GroundOptions,
    pub clouds: CloudOptions,
}

impl SceneConfig {
    /// Read and validate a JSON config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.grass.grass_placement().validate()?;
        self.grass.flower_placement().validate()?;
        self.rocks.placement().validate()?;
        self.forest.placement().validate()?;
        self.ground.validate()?;
        if self.grass.instance_count > self.grass.max_instance_count {
            return Err(Error::Config(format!(
                "grass instance_count ({}) exceeds max_instance_count ({})",
                self.grass.instance_count, self.grass.max_instance_count
            )));
        }
        if !(self.sky.fog_density >= 0.0) || !self.sky.fog_density.is_finite() {
            return Err(Error::Config(format!("fog_density must be finite and >= 0, got {}", self.sky.fog_density)));
        }
        Ok(())
    }

    /// Random source for placement.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn sun_position(&self) -> Vec3 {
        self.sun.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_sun_position_default() {
        let p = SceneConfig::default().sun_position();
        // azimuth 90 puts the sun on +X at 45 degrees elevation
        let h = 100.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert!((p.x - h).abs() < 1e-3);
        assert!((p.y - h).abs() < 1e-3);
        assert!(p.z.abs() < 1e-3);
        assert!((p.length() - 100.0).abs() < 1e-3);
        assert!(SunConfig::default().direction().y < 0.0);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: SceneConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json() {
        let config: SceneConfig =
            serde_json::from_str(r#"{"seed": 7, "grass": {"instance_count": 100}, "noise": {"kind": "perlin", "seed": 3}}"#)
                .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.grass.instance_count, 100);
        assert_eq!(config.grass.max_instance_count, 25000);
        assert_eq!(config.noise, NoiseSource::Perlin { seed: 3 });
    }

    #[test]
    fn test_load_file_and_reject_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("scene.json");
        std::fs::write(&good, r#"{"seed": 1}"#).unwrap();
        assert_eq!(SceneConfig::load(&good).unwrap().seed, Some(1));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"grass": {"instance_count": 30000}}"#).unwrap();
        assert!(matches!(SceneConfig::load(&bad), Err(Error::Config(_))));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(SceneConfig::load(&garbage), Err(Error::Json(_))));
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let config = SceneConfig { seed: Some(99), ..Default::default() };
        let a: u64 = config.rng().r#gen();
        let b: u64 = config.rng().r#gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sky_colours() {
        let sky = SkyConfig::default();
        assert_eq!(sky.background_rgb(), sky.fog_rgb());
        assert!((sky.fog_rgb().z - 235.0 / 255.0).abs() < 1e-6);

        let foggy = SceneConfig { sky: SkyConfig { fog_density: f32::INFINITY, ..sky }, ..Default::default() };
        assert!(foggy.validate().is_err());
    }
}
