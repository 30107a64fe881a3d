//! Scattered rocks: three meshes, each drawn instanced.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::InstancedMesh;
use crate::assets::{AssetCache, AssetLoader, MeshHandle};
use crate::core::Result;
use crate::instancing::InstanceBuffer;
use crate::material::{MapSource, Material, SceneMaterial};
use crate::noise_field::NoiseField;
use crate::scatter::{scatter, PlacementOptions};

pub const ROCK_MESHES: [&str; 3] = ["models/rock1.glb", "models/rock2.glb", "models/rock3.glb"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockOptions {
    pub size: Vec3,
    /// Maximum extra size added per axis.
    pub size_variation: Vec3,
    pub count_per_mesh: usize,
    /// Instance slots allocated per mesh.
    pub capacity: usize,
    pub half_extent: f32,
    /// Rocks sit slightly sunk into the ground.
    pub ground_y: f32,
}

impl Default for RockOptions {
    fn default() -> Self {
        Self {
            size: Vec3::splat(2.0),
            size_variation: Vec3::splat(5.0),
            count_per_mesh: 50,
            capacity: 200,
            half_extent: 250.0,
            ground_y: 0.3,
        }
    }
}

impl RockOptions {
    pub fn placement(&self) -> PlacementOptions {
        PlacementOptions::square(self.count_per_mesh, self.half_extent)
            .with_ground_y(self.ground_y)
            .with_scale(self.size, self.size_variation)
    }
}

#[derive(Debug, Default)]
pub struct Rocks {
    meshes: Vec<InstancedMesh>,
}

impl Rocks {
    /// Load all rock meshes; if any is missing no rocks are placed.
    pub async fn build<L, N, R>(options: &RockOptions, cache: &mut AssetCache<L>, noise: &N, rng: &mut R) -> Self
    where
        L: AssetLoader,
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        let mut meshes = Vec::with_capacity(ROCK_MESHES.len());
        for path in ROCK_MESHES {
            match cache.mesh(path).await {
                Ok(mesh) => meshes.push((path, mesh)),
                Err(e) => {
                    log::error!("Error loading rock assets: {}", e);
                    return Self::default();
                }
            }
        }

        let mut rocks = Self::default();
        for (path, mesh) in meshes {
            match Self::generate(path, mesh, options, noise, rng) {
                Ok(instanced) => rocks.meshes.push(instanced),
                Err(e) => {
                    log::error!("Rock placement failed: {}", e);
                    return Self::default();
                }
            }
        }
        rocks
    }

    fn generate<N, R>(path: &str, mesh: MeshHandle, options: &RockOptions, noise: &N, rng: &mut R) -> Result<InstancedMesh>
    where
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        let placements = scatter(&options.placement(), noise, rng)?;
        let mut instances = InstanceBuffer::with_capacity(options.capacity);
        instances.fill(&placements, placements.len(), |_| Vec3::ONE);

        let label = path
            .rsplit('/')
            .next()
            .and_then(|f| f.strip_suffix(".glb"))
            .unwrap_or(path)
            .to_string();
        let material = Material::phong(label.clone()).with_map(MapSource::Embedded(mesh.clone()));

        Ok(InstancedMesh {
            label,
            mesh,
            material: SceneMaterial::Plain(material),
            instances,
            placements,
        })
    }

    pub fn meshes(&self) -> &[InstancedMesh] {
        &self.meshes
    }

    pub fn total_instances(&self) -> usize {
        self.meshes.iter().map(|m| m.instances.active()).sum()
    }
}
