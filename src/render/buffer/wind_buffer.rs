//! Wind uniform buffer (bind group 2 of wind-shaded programs)

use crate::shader::injector::WIND_GROUP;
use crate::wind::{GpuWindUniform, WindUniforms};

/// One material's wind uniforms on the GPU. Rewritten every frame from the
/// CPU-side [`WindUniforms`], whose `time` the group registry advances.
pub struct WindUniformBuffer {
    uniforms: WindUniforms,
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl WindUniformBuffer {
    pub fn new(device: &wgpu::Device, label: &str, uniforms: &WindUniforms) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}_wind_uniform")),
            size: std::mem::size_of::<GpuWindUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = Self::layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}_wind_bind_group")),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            uniforms: uniforms.clone(),
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Layout for the wind group
    pub fn layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("wind_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<GpuWindUniform>() as u64),
                },
                count: None,
            }],
        })
    }

    /// Upload the current uniform values
    pub fn write(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&self.uniforms.gpu()));
    }

    pub fn group_index(&self) -> u32 {
        WIND_GROUP
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
