//! Asset loading from the filesystem.

use std::future::Future;
use std::path::{Path, PathBuf};

use super::{ColorSpace, MeshAsset, TextureAsset};
use crate::core::{Error, Result};

/// Source of meshes and textures. Each call is a one-shot future.
pub trait AssetLoader {
    fn load_mesh(&self, path: &Path) -> impl Future<Output = Result<MeshAsset>> + Send;

    fn load_texture(
        &self,
        path: &Path,
        color_space: ColorSpace,
    ) -> impl Future<Output = Result<TextureAsset>> + Send;
}

/// Loads assets relative to a root directory using tokio's async fs.
#[derive(Clone, Debug)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        // Asset paths are written web-style ("/models/grass.glb")
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.root.join(relative)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let full = self.resolve(path);
        tokio::fs::read(&full)
            .await
            .map_err(|e| Error::asset(&full, e.to_string()))
    }
}

impl AssetLoader for FsAssetLoader {
    async fn load_mesh(&self, path: &Path) -> Result<MeshAsset> {
        let bytes = self.read(path).await?;
        let mesh = MeshAsset::new(path, bytes);
        if !mesh.is_glb() {
            return Err(Error::asset(path, "not a binary glTF container"));
        }
        log::debug!("Loaded mesh {} ({} bytes)", path.display(), mesh.bytes.len());
        Ok(mesh)
    }

    async fn load_texture(&self, path: &Path, color_space: ColorSpace) -> Result<TextureAsset> {
        let bytes = self.read(path).await?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| Error::asset(path, e.to_string()))?
            .to_rgba8();
        log::debug!("Loaded texture {} ({}x{})", path.display(), image.width(), image.height());
        Ok(TextureAsset {
            path: path.to_path_buf(),
            image,
            color_space,
        })
    }
}
