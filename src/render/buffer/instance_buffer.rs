//! Instance vertex buffer (locations 4..=8 of the lit program)

use crate::instancing::{GpuInstance, InstanceBuffer};

/// GPU copy of an [`InstanceBuffer`], sized to its full capacity so the
/// active count can change without reallocating.
pub struct InstanceGpuBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl InstanceGpuBuffer {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4
    ];

    pub fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}_instances")),
            size: (capacity * std::mem::size_of::<GpuInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity, count: 0 }
    }

    /// Vertex layout for the per-instance step
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Upload the active slots; returns the instance count to draw
    pub fn upload(&mut self, queue: &wgpu::Queue, instances: &InstanceBuffer) -> u32 {
        let data = instances.gpu_data();
        let n = data.len().min(self.capacity);
        if n > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&data[..n]));
        }
        self.count = n as u32;
        self.count
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_gpu_instance() {
        let layout = InstanceGpuBuffer::layout();
        assert_eq!(layout.array_stride, 80);
        assert_eq!(layout.attributes.len(), 5);
        assert_eq!(layout.attributes[0].shader_location, 4);
        assert_eq!(layout.attributes[4].offset, 64);
    }
}
