//! A single placed instance.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform produced by scatter placement. Immutable once emitted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementInstance {
    pub position: Vec3,
    /// Rotation about +Y in radians, `[0, 2π)`.
    pub rotation_y: f32,
    pub scale: Vec3,
}

impl PlacementInstance {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation_y)
    }

    /// Model matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.position)
    }

    /// Horizontal distance from the origin.
    pub fn radius_xz(&self) -> f32 {
        self.position.x.hypot(self.position.z)
    }
}
