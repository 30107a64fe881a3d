//! Grove - a procedurally scattered, wind-animated outdoor scene

pub mod core;
pub mod noise_field;
pub mod scatter;
pub mod instancing;
pub mod wind;
pub mod shader;
pub mod material;
pub mod assets;
pub mod scene;
pub mod render;
