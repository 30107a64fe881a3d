//! GPU buffer management

pub mod scene_buffer;
pub mod wind_buffer;
pub mod instance_buffer;

pub use scene_buffer::{CameraUniform, FogUniform, LightUniform, SceneBuffer};
pub use wind_buffer::WindUniformBuffer;
pub use instance_buffer::InstanceGpuBuffer;
