//! Fetch-once cache shared by every group during scene construction.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{AssetHandle, AssetKey, AssetLoader, ColorSpace, MeshHandle, TextureHandle};
use crate::core::{Error, Result};

/// Caches loaded assets by key. Failed loads are not cached.
pub struct AssetCache<L> {
    loader: L,
    entries: HashMap<AssetKey, AssetHandle>,
    loads: usize,
}

impl<L: AssetLoader> AssetCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
            loads: 0,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Number of loader round trips performed so far, successful or not.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the cached asset for `key`, loading it on first request.
    pub async fn get_or_load(&mut self, key: AssetKey) -> Result<AssetHandle> {
        if let Some(handle) = self.entries.get(&key) {
            return Ok(handle.clone());
        }

        self.loads += 1;
        let handle = match &key {
            AssetKey::Mesh(path) => AssetHandle::Mesh(Arc::new(self.loader.load_mesh(path).await?)),
            AssetKey::Texture(path, cs) => {
                AssetHandle::Texture(Arc::new(self.loader.load_texture(path, *cs).await?))
            }
        };
        self.entries.insert(key, handle.clone());
        Ok(handle)
    }

    pub async fn mesh(&mut self, path: impl AsRef<Path>) -> Result<MeshHandle> {
        let path = path.as_ref();
        match self.get_or_load(AssetKey::mesh(path)).await? {
            AssetHandle::Mesh(mesh) => Ok(mesh),
            AssetHandle::Texture(_) => Err(Error::asset(path, "cached as a texture")),
        }
    }

    pub async fn texture(
        &mut self,
        path: impl AsRef<Path>,
        color_space: ColorSpace,
    ) -> Result<TextureHandle> {
        let path = path.as_ref();
        match self.get_or_load(AssetKey::texture(path, color_space)).await? {
            AssetHandle::Texture(tex) => Ok(tex),
            AssetHandle::Mesh(_) => Err(Error::asset(path, "cached as a mesh")),
        }
    }
}
