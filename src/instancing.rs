//! Instanced-geometry buffers.
//!
//! One mesh drawn many times: a fixed number of transform slots, an optional
//! colour per slot, a cursor of how many slots were written, and an active
//! count of how many are drawn. Generating into the full capacity once and
//! varying only the active count lets the visible density change without
//! regenerating transforms.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::scatter::PlacementInstance;

/// GPU-side instance record (80 bytes). Must match `InstanceInput` in lit.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuInstance {
    pub model: [[f32; 4]; 4],
    // -- 64 bytes --
    pub color: [f32; 4],
    // -- 16 bytes --
}

/// Fixed-capacity instance storage for one mesh.
#[derive(Clone, Debug)]
pub struct InstanceBuffer {
    matrices: Vec<Mat4>,
    colors: Option<Vec<Vec3>>,
    capacity: usize,
    written: usize,
    active: usize,
}

impl InstanceBuffer {
    /// Buffer with `capacity` identity slots and no colours.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; capacity],
            colors: None,
            capacity,
            written: 0,
            active: 0,
        }
    }

    /// Buffer that also carries a colour per slot (white until set).
    pub fn with_colors(capacity: usize) -> Self {
        Self {
            colors: Some(vec![Vec3::ONE; capacity]),
            ..Self::with_capacity(capacity)
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots holding generated transforms.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Slots drawn.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Write a transform into `index`. Returns false when out of capacity.
    pub fn set_matrix_at(&mut self, index: usize, matrix: Mat4) -> bool {
        match self.matrices.get_mut(index) {
            Some(slot) => {
                *slot = matrix;
                self.written = self.written.max(index + 1);
                true
            }
            None => false,
        }
    }

    /// Write a colour into `index`. No-op without a colour channel.
    pub fn set_color_at(&mut self, index: usize, color: Vec3) -> bool {
        match self.colors.as_mut().and_then(|c| c.get_mut(index)) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }

    pub fn matrix_at(&self, index: usize) -> Option<Mat4> {
        (index < self.written).then(|| self.matrices[index])
    }

    pub fn color_at(&self, index: usize) -> Option<Vec3> {
        if index >= self.written {
            return None;
        }
        self.colors.as_ref().map(|c| c[index])
    }

    /// Write `instances` into consecutive slots from zero and set the active
    /// count to `min(written, visible)`. Instances beyond capacity are dropped.
    ///
    /// `color_of` is consulted once per written slot when the buffer has a
    /// colour channel.
    pub fn fill<F>(&mut self, instances: &[PlacementInstance], visible: usize, mut color_of: F) -> usize
    where
        F: FnMut(usize) -> Vec3,
    {
        self.written = 0;
        for (i, inst) in instances.iter().take(self.capacity).enumerate() {
            self.set_matrix_at(i, inst.matrix());
            if self.colors.is_some() {
                let color = color_of(i);
                self.set_color_at(i, color);
            }
        }
        if instances.len() > self.capacity {
            log::warn!(
                "instance buffer full: {} instances, capacity {}",
                instances.len(),
                self.capacity
            );
        }
        self.active = self.written.min(visible);
        self.written
    }

    /// Change the drawn count; clamped to the written slots.
    pub fn set_active(&mut self, count: usize) -> usize {
        self.active = count.min(self.written);
        self.active
    }

    /// Active slots in GPU layout.
    pub fn gpu_data(&self) -> Vec<GpuInstance> {
        (0..self.active)
            .map(|i| {
                let c = self.colors.as_ref().map_or(Vec3::ONE, |c| c[i]);
                GpuInstance {
                    model: self.matrices[i].to_cols_array_2d(),
                    color: [c.x, c.y, c.z, 1.0],
                }
            })
            .collect()
    }
}
