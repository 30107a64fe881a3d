//! Ground plane blending grass and dirt textures by world-space noise.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetCache, AssetLoader, ColorSpace, TextureHandle};
use crate::core::{Error, Result};
use crate::material::{MapSource, Material};
use crate::noise_field::NoiseField;
use crate::shader::{patch, ShaderProgram, ShaderStage, UniformKind, UniformSlot, SIMPLEX2D};

const GROUND_UNIFORMS: &str = include_str!("../../shaders/ground_uniforms.wgsl");
const GROUND_MAP: &str = include_str!("../../shaders/ground_map.wgsl");
const GROUND_NORMAL: &str = include_str!("../../shaders/ground_normal.wgsl");

/// Half-width of the grass/dirt transition around the patchiness threshold.
pub const BLEND_EDGE: f32 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundOptions {
    pub noise_scale: f32,
    pub patchiness: f32,
    /// Side length of the square plane.
    pub size: f32,
    /// World units per texture tile.
    pub texture_repeat: f32,
    pub grass_texture: String,
    pub dirt_texture: String,
    pub dirt_normal: String,
}

impl Default for GroundOptions {
    fn default() -> Self {
        Self {
            noise_scale: 50.0,
            patchiness: 0.5,
            size: 2000.0,
            texture_repeat: 30.0,
            grass_texture: "textures/ground/grass.jpg".to_string(),
            dirt_texture: "textures/ground/dirt_color.jpg".to_string(),
            dirt_normal: "textures/ground/dirt_normal.jpg".to_string(),
        }
    }
}

impl GroundOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.noise_scale > 0.0) || !(self.texture_repeat > 0.0) || !(self.size > 0.0) {
            return Err(Error::Config(
                "ground noise_scale, texture_repeat and size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn uniforms(&self) -> GpuGroundUniform {
        GpuGroundUniform {
            noise_scale: self.noise_scale,
            patchiness: self.patchiness,
            texture_repeat: self.texture_repeat,
            _pad: 0.0,
        }
    }
}

/// Must match `GroundUniforms` in ground_uniforms.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuGroundUniform {
    pub noise_scale: f32,
    pub patchiness: f32,
    pub texture_repeat: f32,
    pub _pad: f32,
}

/// Dirt weight at a world position: 0 is pure grass, 1 pure dirt.
pub fn blend_factor<N: NoiseField + ?Sized>(x: f32, z: f32, options: &GroundOptions, noise: &N) -> f32 {
    let n = noise.density(x / options.noise_scale, z / options.noise_scale);
    smoothstep(options.patchiness - BLEND_EDGE, options.patchiness + BLEND_EDGE, n)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Swap the fragment map and normal chunks for the grass/dirt blend.
pub fn patch_ground(program: &mut ShaderProgram) -> Result<()> {
    program.patch_stage(ShaderStage::Fragment, |src| {
        let src = patch::insert_after(src, patch::PRELUDE, GROUND_UNIFORMS)?;
        let src = patch::replace_chunk(&src, "map_fragment", GROUND_MAP)?;
        patch::replace_chunk(&src, "normal_fragment_maps", GROUND_NORMAL)
    })?;
    program.ensure_function(ShaderStage::Fragment, "simplex2d", SIMPLEX2D)?;

    let slots = [
        ("noise_scale", UniformKind::Float, 0),
        ("patchiness", UniformKind::Float, 0),
        ("texture_repeat", UniformKind::Float, 0),
        ("grass_texture", UniformKind::Texture2d, 1),
        ("dirt_texture", UniformKind::Texture2d, 2),
        ("ground_sampler", UniformKind::Sampler, 3),
    ];
    for (name, kind, binding) in slots {
        program.declare_uniform(name, UniformSlot { kind, group: 2, binding })?;
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct GroundTextures {
    pub grass: TextureHandle,
    pub dirt: TextureHandle,
    pub dirt_normal: TextureHandle,
}

#[derive(Debug)]
pub struct Ground {
    options: GroundOptions,
    textures: Option<GroundTextures>,
    material: Option<Material>,
}

impl Ground {
    pub fn new(options: GroundOptions) -> Self {
        Self { options, textures: None, material: None }
    }

    /// Fetch the three textures, then build the blend material. Without
    /// textures the ground has no material.
    pub async fn build<L: AssetLoader>(options: GroundOptions, cache: &mut AssetCache<L>) -> Self {
        let mut ground = Self::new(options);
        match ground.fetch(cache).await {
            Ok(textures) => {
                ground.material = Some(ground.create_material(&textures));
                ground.textures = Some(textures);
            }
            Err(e) => log::error!("Failed to load ground textures: {}", e),
        }
        ground
    }

    async fn fetch<L: AssetLoader>(&self, cache: &mut AssetCache<L>) -> Result<GroundTextures> {
        Ok(GroundTextures {
            grass: cache.texture(&self.options.grass_texture, ColorSpace::Srgb).await?,
            dirt: cache.texture(&self.options.dirt_texture, ColorSpace::Srgb).await?,
            dirt_normal: cache.texture(&self.options.dirt_normal, ColorSpace::Linear).await?,
        })
    }

    fn create_material(&self, textures: &GroundTextures) -> Material {
        let mut material = Material::phong("ground").with_emissive(Vec3::ONE, 0.01);
        material.shininess = 0.1;
        material.normal_map = Some(textures.dirt_normal.clone());
        material.map = MapSource::Texture(textures.grass.clone());

        if let Some(program) = material.program.as_mut() {
            let mut patched = program.clone();
            match patch_ground(&mut patched) {
                Ok(()) => *program = patched,
                Err(e) => log::error!("Ground shader patch failed: {}", e),
            }
        }
        material
    }

    pub fn options(&self) -> &GroundOptions {
        &self.options
    }

    pub fn textures(&self) -> Option<&GroundTextures> {
        self.textures.as_ref()
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.material.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::cache::tests::MemoryLoader;
    use crate::noise_field::Simplex2;

    #[test]
    fn test_patch_ground_program() {
        let mut program = ShaderProgram::lit("ground");
        patch_ground(&mut program).unwrap();
        let fs = program.source(ShaderStage::Fragment).unwrap();
        assert!(!fs.contains("//#include <map_fragment>"));
        assert!(!fs.contains("//#include <normal_fragment_maps>"));
        assert!(fs.contains("var<uniform> ground: GroundUniforms"));
        assert!(fs.contains("fn simplex2d("));
        assert!(fs.contains("ground.patchiness - 0.1"));
        assert_eq!(program.uniform("dirt_texture").unwrap().binding, 2);

        let wgsl = program.resolve().unwrap();
        assert!(wgsl.contains("out.world_position"));
        assert!(!wgsl.contains("//#include"));
    }

    #[test]
    fn test_blend_factor_bounds() {
        let opts = GroundOptions::default();
        let mut saw_grass = false;
        let mut saw_dirt = false;
        for i in 0..400 {
            let x = i as f32 * 9.3 - 1000.0;
            let z = i as f32 * -4.1 + 300.0;
            let s = blend_factor(x, z, &opts, &Simplex2);
            assert!((0.0..=1.0).contains(&s));
            saw_grass |= s == 0.0;
            saw_dirt |= s == 1.0;
        }
        assert!(saw_grass && saw_dirt);
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.4, 0.6, 0.3), 0.0);
        assert_eq!(smoothstep(0.4, 0.6, 0.7), 1.0);
        assert!((smoothstep(0.4, 0.6, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<GpuGroundUniform>(), 16);
        let u = GroundOptions::default().uniforms();
        assert_eq!((u.noise_scale, u.patchiness, u.texture_repeat), (50.0, 0.5, 30.0));
    }

    #[tokio::test]
    async fn test_build_loads_textures() {
        let mut cache = AssetCache::new(MemoryLoader::default());
        let ground = Ground::build(GroundOptions::default(), &mut cache).await;
        assert!(ground.is_ready());
        let textures = ground.textures().unwrap();
        assert_eq!(textures.dirt_normal.color_space, ColorSpace::Linear);
        let material = ground.material().unwrap();
        assert!(material.normal_map.is_some());
        assert!(material.program.as_ref().unwrap().uniform("grass_texture").is_some());
    }

    #[tokio::test]
    async fn test_missing_texture_no_material() {
        let mut cache = AssetCache::new(MemoryLoader::failing(&["textures/ground/dirt_normal.jpg"]));
        let ground = Ground::build(GroundOptions::default(), &mut cache).await;
        assert!(!ground.is_ready());
        assert!(ground.textures().is_none());
    }
}
