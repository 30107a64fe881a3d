//! Render pipelines

pub mod lit;

pub use lit::{compile_program, group_bindings, LitPipeline, MeshVertex};
