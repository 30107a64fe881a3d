//! Grass blades and flower patches.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{InstancedMesh, PlacedMesh};
use crate::assets::{AssetCache, AssetLoader, MeshHandle};
use crate::core::{rgb_from_hex, Result};
use crate::instancing::InstanceBuffer;
use crate::material::{MapSource, Material, ShaderRegistry};
use crate::noise_field::NoiseField;
use crate::scatter::{scatter, DensityMask, PlacementOptions};
use crate::shader::WindInjector;
use crate::wind::{WindParams, WindStage};

pub const GRASS_MESH: &str = "models/grass.glb";

/// Grass grows in a ring around the central tree.
pub const GRASS_RADIUS: (f32, f32) = (10.0, 510.0);
/// Flowers stay closer in.
pub const FLOWER_RADIUS: (f32, f32) = (10.0, 210.0);

const GRASS_EMISSIVE: u32 = 0x308040;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassOptions {
    /// Blades drawn initially.
    pub instance_count: usize,
    /// Instance buffer capacity and candidate budget.
    pub max_instance_count: usize,
    /// Candidate budget per flower kind.
    pub flower_count: usize,
    /// Noise scale of the density mask.
    pub scale: f32,
    pub patchiness: f32,
    pub size: Vec3,
    pub size_variation: Vec3,
    pub wind: WindParams,
}

impl Default for GrassOptions {
    fn default() -> Self {
        Self {
            instance_count: 5000,
            max_instance_count: 25000,
            flower_count: 50,
            scale: 100.0,
            patchiness: 0.7,
            size: Vec3::new(5.0, 4.0, 5.0),
            size_variation: Vec3::new(1.0, 2.0, 1.0),
            wind: WindParams::default(),
        }
    }
}

impl GrassOptions {
    pub fn grass_placement(&self) -> PlacementOptions {
        PlacementOptions::annulus(self.max_instance_count, GRASS_RADIUS.0, GRASS_RADIUS.1)
            .with_scale(self.size, self.size_variation)
            .with_mask(DensityMask::foliage(self.scale, self.patchiness))
    }

    pub fn flower_placement(&self) -> PlacementOptions {
        PlacementOptions::annulus(self.flower_count, FLOWER_RADIUS.0, FLOWER_RADIUS.1)
            .with_uniform_scale(0.02, 0.03)
            .with_mask(DensityMask::flowers(self.scale, self.patchiness))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowerKind {
    White,
    Blue,
    Yellow,
}

impl FlowerKind {
    pub const ALL: [FlowerKind; 3] = [Self::White, Self::Blue, Self::Yellow];

    pub fn label(self) -> &'static str {
        match self {
            Self::White => "flower_white",
            Self::Blue => "flower_blue",
            Self::Yellow => "flower_yellow",
        }
    }

    pub fn mesh_path(self) -> String {
        format!("models/{}.glb", self.label())
    }
}

/// Random blade tint: mostly green with a little red variation.
pub fn blade_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(0.25 + 0.1 * rng.r#gen::<f32>(), 0.3 + 0.3 * rng.r#gen::<f32>(), 0.1)
}

/// Instanced grass plus three kinds of flowers, all wind-shaded.
#[derive(Debug)]
pub struct GrassField {
    options: GrassOptions,
    blades: Option<InstancedMesh>,
    flowers: Vec<(FlowerKind, PlacedMesh)>,
    registry: ShaderRegistry,
}

impl GrassField {
    /// Empty field; nothing drawn until assets arrive.
    pub fn new(options: GrassOptions) -> Self {
        Self {
            options,
            blades: None,
            flowers: Vec::new(),
            registry: ShaderRegistry::new(),
        }
    }

    /// Fetch the grass and flower meshes, then generate. Any fetch failure
    /// leaves the field empty.
    pub async fn build<L, N, R>(options: GrassOptions, cache: &mut AssetCache<L>, noise: &N, rng: &mut R) -> Self
    where
        L: AssetLoader,
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        let mut field = Self::new(options);
        match Self::fetch(cache).await {
            Ok((grass, flowers)) => {
                log::info!("Grass assets loaded ({} flower kinds)", flowers.len());
                if let Err(e) = field.generate(grass, flowers, noise, rng) {
                    log::error!("Grass generation failed: {}", e);
                    field = Self::new(field.options);
                }
            }
            Err(e) => log::error!("Error loading grass assets: {}", e),
        }
        field
    }

    async fn fetch<L: AssetLoader>(cache: &mut AssetCache<L>) -> Result<(MeshHandle, Vec<(FlowerKind, MeshHandle)>)> {
        let grass = cache.mesh(GRASS_MESH).await?;
        let mut flowers = Vec::with_capacity(FlowerKind::ALL.len());
        for kind in FlowerKind::ALL {
            let mesh = cache.mesh(kind.mesh_path()).await?;
            flowers.push((kind, mesh));
        }
        Ok((grass, flowers))
    }

    /// Place blades and flowers on already loaded meshes.
    pub fn generate<N, R>(
        &mut self,
        grass: MeshHandle,
        flowers: Vec<(FlowerKind, MeshHandle)>,
        noise: &N,
        rng: &mut R,
    ) -> Result<()>
    where
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        let injector = WindInjector::new(self.options.wind);

        let placements = scatter(&self.options.grass_placement(), noise, rng)?;
        let mut instances = InstanceBuffer::with_colors(self.options.max_instance_count);
        let written = instances.fill(&placements, self.options.instance_count, |_| blade_color(&mut *rng));
        log::info!(
            "Generated {} grass instances ({} visible)",
            written,
            instances.active()
        );

        let material = Material::phong("grass")
            .with_map(MapSource::Embedded(grass.clone()))
            .with_color(Vec3::splat(0.6))
            .with_emissive(Vec3::from(rgb_from_hex(GRASS_EMISSIVE)), 0.05)
            .with_alpha_test(0.5)
            .double_sided();
        let material = injector.apply(material, WindStage::Instanced, &mut self.registry);

        self.blades = Some(InstancedMesh {
            label: "grass".to_string(),
            mesh: grass,
            material,
            instances,
            placements,
        });

        self.flowers.clear();
        for (kind, mesh) in flowers {
            let placements = scatter(&self.options.flower_placement(), noise, rng)?;
            let material = Material::phong(kind.label()).with_map(MapSource::Embedded(mesh.clone()));
            let material = injector.apply(material, WindStage::Single, &mut self.registry);
            log::debug!("Placed {} {} flowers", placements.len(), kind.label());
            self.flowers.push((
                kind,
                PlacedMesh {
                    label: kind.label().to_string(),
                    mesh,
                    material,
                    placements,
                },
            ));
        }
        Ok(())
    }

    pub fn options(&self) -> &GrassOptions {
        &self.options
    }

    pub fn blades(&self) -> Option<&InstancedMesh> {
        self.blades.as_ref()
    }

    pub fn flowers(&self) -> impl Iterator<Item = (FlowerKind, &PlacedMesh)> {
        self.flowers.iter().map(|(k, m)| (*k, m))
    }

    /// Blades drawn. Before generation this is the configured count.
    pub fn instance_count(&self) -> usize {
        self.blades
            .as_ref()
            .map_or(self.options.instance_count, |b| b.instances.active())
    }

    /// Change the drawn blade count, clamped to the generated blades.
    /// Ignored until the grass exists.
    pub fn set_instance_count(&mut self, count: usize) {
        if let Some(blades) = &mut self.blades {
            blades.instances.set_active(count);
        }
    }

    pub fn registry(&self) -> &ShaderRegistry {
        &self.registry
    }

    pub fn update(&self, elapsed: f32) {
        self.registry.update(elapsed);
    }
}
