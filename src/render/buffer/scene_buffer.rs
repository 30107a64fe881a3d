//! Per-frame camera, light and fog uniforms (bind group 0).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::scene::SceneConfig;

/// Camera uniform data for GPU (must match `Camera` in lit.vert.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix (64 bytes, offset 0)
    pub view_proj: [[f32; 4]; 4],
    /// View matrix (64 bytes, offset 64)
    pub view: [[f32; 4]; 4],
    /// Camera position in world space (12 bytes, offset 128)
    pub position: [f32; 3],
    pub _pad: f32,
}

impl CameraUniform {
    /// Perspective camera at `eye` looking at `target`.
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, 0.1, 1000.0);
        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            position: eye.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        // Stock viewpoint: 50 m back, 20 m up, looking at the tree
        Self::look_at(Vec3::new(0.0, 20.0, 50.0), Vec3::new(0.0, 20.0, 0.0), 75.0, 16.0 / 9.0)
    }
}

/// Sun and ambient light (must match `Light` in lit.vert.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightUniform {
    pub direction: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub ambient: f32,
}

impl LightUniform {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            direction: config.sun.direction().to_array(),
            intensity: config.sun.intensity,
            color: config.sun.color_rgb().to_array(),
            ambient: config.ambient.intensity,
        }
    }
}

/// Exponential-squared fog (must match `Fog` in lit.vert.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FogUniform {
    pub color: [f32; 3],
    pub density: f32,
}

impl FogUniform {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            color: config.sky.fog_rgb().to_array(),
            density: config.sky.fog_density,
        }
    }
}

/// Camera, light and fog uniform buffers and their bind group
pub struct SceneBuffer {
    camera: wgpu::Buffer,
    light: wgpu::Buffer,
    fog: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl SceneBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = |label: &str, size: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: size as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let camera = uniform("camera_uniform", std::mem::size_of::<CameraUniform>());
        let light = uniform("light_uniform", std::mem::size_of::<LightUniform>());
        let fog = uniform("fog_uniform", std::mem::size_of::<FogUniform>());

        let entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[entry(0), entry(1), entry(2)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: fog.as_entire_binding(),
                },
            ],
        });

        Self {
            camera,
            light,
            fog,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, camera: &CameraUniform, light: &LightUniform, fog: &FogUniform) {
        queue.write_buffer(&self.camera, 0, bytemuck::bytes_of(camera));
        queue.write_buffer(&self.light, 0, bytemuck::bytes_of(light));
        queue.write_buffer(&self.fog, 0, bytemuck::bytes_of(fog));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes() {
        // Sizes must match the WGSL struct layouts
        assert_eq!(std::mem::size_of::<CameraUniform>(), 144);
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
        assert_eq!(std::mem::size_of::<FogUniform>(), 16);
    }

    #[test]
    fn test_light_from_default_config() {
        let light = LightUniform::from_config(&SceneConfig::default());
        assert_eq!(light.intensity, 5.0);
        assert_eq!(light.ambient, 0.4);
        assert!(light.direction[1] < 0.0);
    }

    #[test]
    fn test_fog_from_config() {
        let config = SceneConfig::default();
        let fog = FogUniform::from_config(&config);
        assert_eq!(fog.density, 0.0005);
        assert_eq!(fog.color, config.sky.fog_rgb().to_array());

        let clear = SceneConfig {
            sky: crate::scene::config::SkyConfig { fog_density: 0.0, ..Default::default() },
            ..Default::default()
        };
        assert_eq!(FogUniform::from_config(&clear).density, 0.0);
    }
}
