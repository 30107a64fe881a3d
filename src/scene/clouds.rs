//! High cloud layer drifting with time.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::material::{Material, ShaderRegistry};
use crate::wind::TimeUniform;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudOptions {
    pub altitude: f32,
    /// Texture-space drift per second.
    pub drift: Vec2,
    pub size: f32,
    pub opacity: f32,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            altitude: 200.0,
            drift: Vec2::new(0.002, 0.001),
            size: 2000.0,
            opacity: 0.8,
        }
    }
}

#[derive(Debug)]
pub struct Clouds {
    options: CloudOptions,
    material: Material,
    time: TimeUniform,
    registry: ShaderRegistry,
}

impl Clouds {
    pub fn new(options: CloudOptions) -> Self {
        let mut material = Material::unprogrammed("clouds").double_sided();
        material.transparent = true;
        let time = TimeUniform::new();
        let mut registry = ShaderRegistry::new();
        registry.register("clouds", &time);
        Self { options, material, time, registry }
    }

    /// Layer transform: a plane lifted to the cloud altitude facing down.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(self.options.size, self.options.size, 1.0),
            Quat::from_rotation_x(FRAC_PI_2),
            Vec3::new(0.0, self.options.altitude, 0.0),
        )
    }

    /// Texture offset at `elapsed` seconds, wrapped to `[0, 1)`.
    pub fn drift_offset(&self, elapsed: f32) -> Vec2 {
        (self.options.drift * elapsed).fract_gl()
    }

    /// Offset for the last time written by `update`.
    pub fn current_offset(&self) -> Vec2 {
        self.drift_offset(self.time.get())
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn options(&self) -> &CloudOptions {
        &self.options
    }

    pub fn update(&self, elapsed: f32) {
        self.registry.update(elapsed);
    }
}
