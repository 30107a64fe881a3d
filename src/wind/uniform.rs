//! Shader uniforms carried by wind-shaded materials.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::{WindParams, WindStage};

/// Shared handle to a material's `time` uniform, in seconds.
///
/// Clones refer to the same value. Starts at zero.
#[derive(Clone, Debug, Default)]
pub struct TimeUniform(Arc<AtomicU32>);

impl TimeUniform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, seconds: f32) {
        self.0.store(seconds.to_bits(), Ordering::Relaxed);
    }

    /// Whether two handles drive the same uniform.
    pub fn same_as(&self, other: &TimeUniform) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Wind uniform set attached to one material. Only `time` changes after creation.
#[derive(Clone, Debug)]
pub struct WindUniforms {
    pub time: TimeUniform,
    pub strength: Vec3,
    pub frequency: f32,
    pub scale: f32,
    pub height_factor: f32,
}

impl WindUniforms {
    pub fn new(params: &WindParams, stage: WindStage) -> Self {
        Self {
            time: TimeUniform::new(),
            strength: params.strength,
            frequency: params.frequency,
            scale: params.spatial_scale,
            height_factor: stage.height_factor(),
        }
    }

    /// Snapshot for upload.
    pub fn gpu(&self) -> GpuWindUniform {
        GpuWindUniform {
            strength: self.strength.to_array(),
            time: self.time.get(),
            frequency: self.frequency,
            scale: self.scale,
            height_factor: self.height_factor,
            _pad: 0.0,
        }
    }
}

/// GPU uniform for wind (32 bytes, 16-byte aligned). Must match `WindUniforms` in wind_uniforms.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuWindUniform {
    pub strength: [f32; 3],
    pub time: f32,
    // -- 16 bytes --
    pub frequency: f32,
    pub scale: f32,
    pub height_factor: f32,
    pub _pad: f32,
    // -- 16 bytes --
}
