//! The large tree at the origin, its foliage swaying in the wind.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::forest::TreePreset;
use crate::assets::{AssetCache, AssetLoader, ColorSpace, TextureHandle};
use crate::core::Result;
use crate::material::{MapSource, Material, SceneMaterial, ShaderRegistry};
use crate::shader::WindInjector;
use crate::wind::{WindParams, WindStage};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralTreeOptions {
    pub preset: TreePreset,
    pub wind: WindParams,
}

impl Default for CentralTreeOptions {
    fn default() -> Self {
        Self {
            preset: TreePreset::AshLarge,
            wind: WindParams::new(Vec3::new(0.1, 0.0, 0.1), 0.1, 80.0),
        }
    }
}

#[derive(Debug)]
pub struct CentralTree {
    options: CentralTreeOptions,
    parts: Vec<SceneMaterial>,
    registry: ShaderRegistry,
}

impl CentralTree {
    pub fn new(options: CentralTreeOptions) -> Self {
        Self {
            options,
            parts: Vec::new(),
            registry: ShaderRegistry::new(),
        }
    }

    /// Load the preset's textures and shade every part. A failed fetch
    /// leaves the tree without parts.
    pub async fn build<L: AssetLoader>(options: CentralTreeOptions, cache: &mut AssetCache<L>) -> Self {
        let mut tree = Self::new(options);
        match Self::fetch(tree.options.preset, cache).await {
            Ok((bark, leaves)) => tree.shade(bark, leaves),
            Err(e) => log::error!("Error loading tree textures: {}", e),
        }
        tree
    }

    async fn fetch<L: AssetLoader>(
        preset: TreePreset,
        cache: &mut AssetCache<L>,
    ) -> Result<(TextureHandle, TextureHandle)> {
        let bark = cache.texture(preset.bark_texture(), ColorSpace::Srgb).await?;
        let leaves = cache.texture(preset.leaf_texture(), ColorSpace::Srgb).await?;
        Ok((bark, leaves))
    }

    /// Replace the part materials with Phong copies carrying the wind stage.
    pub fn shade(&mut self, bark: TextureHandle, leaves: TextureHandle) {
        let injector = WindInjector::new(self.options.wind);
        let branches = Material::phong("tree_branches").with_map(MapSource::Texture(bark));
        let foliage = Material::phong("tree_leaves")
            .with_map(MapSource::Texture(leaves))
            .with_alpha_test(0.5)
            .double_sided();

        self.parts = [branches, foliage]
            .into_iter()
            .map(|m| injector.apply(m, WindStage::Single, &mut self.registry))
            .collect();
        log::info!(
            "Central tree '{}': {} shaded parts",
            self.options.preset.name(),
            self.registry.len()
        );
    }

    pub fn preset(&self) -> TreePreset {
        self.options.preset
    }

    pub fn parts(&self) -> &[SceneMaterial] {
        &self.parts
    }

    pub fn registry(&self) -> &ShaderRegistry {
        &self.registry
    }

    pub fn update(&self, elapsed: f32) {
        self.registry.update(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::cache::tests::MemoryLoader;

    #[tokio::test]
    async fn test_parts_shaded_single_stage() {
        let mut cache = AssetCache::new(MemoryLoader::default());
        let tree = CentralTree::build(CentralTreeOptions::default(), &mut cache).await;
        assert_eq!(tree.preset(), TreePreset::AshLarge);
        assert_eq!(tree.parts().len(), 2);
        for part in tree.parts() {
            let wind = part.wind().unwrap();
            assert_eq!(wind.height_factor, 0.2);
            assert_eq!(wind.frequency, 0.1);
            assert_eq!(wind.scale, 80.0);
            assert_eq!(wind.strength, Vec3::new(0.1, 0.0, 0.1));
        }
        tree.update(3.0);
        assert!(tree.parts().iter().all(|p| p.wind().unwrap().time.get() == 3.0));
    }

    #[tokio::test]
    async fn test_missing_texture() {
        let preset = TreePreset::AshLarge;
        let mut cache = AssetCache::new(MemoryLoader::failing(&[preset.leaf_texture()]));
        let tree = CentralTree::build(CentralTreeOptions::default(), &mut cache).await;
        assert!(tree.parts().is_empty());
        assert!(tree.registry().is_empty());
        tree.update(1.0);
    }
}
