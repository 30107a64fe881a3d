//! Scene groups and the top-level scene.
//!
//! Each group owns its placements, its materials and a [`ShaderRegistry`]
//! of the time uniforms it must advance. Asset-backed groups are built after
//! their assets resolve; a failed fetch leaves the group empty.

pub mod config;
pub mod grass;
pub mod rocks;
pub mod forest;
pub mod central_tree;
pub mod ground;
pub mod clouds;
pub mod environment;
pub mod tree_scene;

pub use config::SceneConfig;
pub use grass::{FlowerKind, GrassField, GrassOptions};
pub use rocks::{RockOptions, Rocks};
pub use forest::{Forest, ForestOptions, ForestTree, TreePreset};
pub use central_tree::{CentralTree, CentralTreeOptions};
pub use ground::{Ground, GroundOptions};
pub use clouds::{CloudOptions, Clouds};
pub use environment::Environment;
pub use tree_scene::{PlacementDump, SceneStats, TreeScene};

use crate::assets::MeshHandle;
use crate::instancing::InstanceBuffer;
use crate::material::SceneMaterial;
use crate::scatter::PlacementInstance;

/// One mesh drawn many times through an instance buffer.
#[derive(Clone, Debug)]
pub struct InstancedMesh {
    pub label: String,
    pub mesh: MeshHandle,
    pub material: SceneMaterial,
    pub instances: InstanceBuffer,
    /// Placements as generated, before any capacity truncation.
    pub placements: Vec<PlacementInstance>,
}

/// Copies of one mesh, each drawn with its own model transform.
#[derive(Clone, Debug)]
pub struct PlacedMesh {
    pub label: String,
    pub mesh: MeshHandle,
    pub material: SceneMaterial,
    pub placements: Vec<PlacementInstance>,
}
