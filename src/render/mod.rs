//! wgpu adapter for scene programs and buffers

pub mod context;
pub mod buffer;
pub mod pipeline;

pub use context::GpuContext;
pub use buffer::{InstanceGpuBuffer, SceneBuffer, WindUniformBuffer};
pub use pipeline::{compile_program, LitPipeline};
