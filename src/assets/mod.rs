//! Asset handles, the loader seam and the shared asset cache.
//!
//! Meshes are fetched as opaque binary glTF blobs; decoding them is the
//! rendering backend's job. Textures are decoded to RGBA8 here.

pub mod loader;
pub mod cache;

pub use loader::{AssetLoader, FsAssetLoader};
pub use cache::AssetCache;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Magic bytes opening every binary glTF container.
pub const GLB_MAGIC: &[u8; 4] = b"glTF";

/// How a texture's colour channels are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// Colour data (albedo).
    #[default]
    Srgb,
    /// Non-colour data (normal maps).
    Linear,
}

/// Binary glTF mesh, undecoded.
#[derive(Debug)]
pub struct MeshAsset {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl MeshAsset {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self { path: path.into(), bytes }
    }

    /// Whether the blob starts with the binary glTF header.
    pub fn is_glb(&self) -> bool {
        self.bytes.starts_with(GLB_MAGIC)
    }

    /// Container version from the header, if present.
    pub fn glb_version(&self) -> Option<u32> {
        if !self.is_glb() || self.bytes.len() < 8 {
            return None;
        }
        let raw: [u8; 4] = self.bytes[4..8].try_into().ok()?;
        Some(u32::from_le_bytes(raw))
    }
}

/// Decoded texture, repeat-wrapped.
#[derive(Debug)]
pub struct TextureAsset {
    pub path: PathBuf,
    pub image: image::RgbaImage,
    pub color_space: ColorSpace,
}

impl TextureAsset {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

pub type MeshHandle = Arc<MeshAsset>;
pub type TextureHandle = Arc<TextureAsset>;

/// Cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Mesh(PathBuf),
    Texture(PathBuf, ColorSpace),
}

impl AssetKey {
    pub fn mesh(path: impl AsRef<Path>) -> Self {
        Self::Mesh(path.as_ref().to_path_buf())
    }

    pub fn texture(path: impl AsRef<Path>, color_space: ColorSpace) -> Self {
        Self::Texture(path.as_ref().to_path_buf(), color_space)
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Mesh(p) | Self::Texture(p, _) => p,
        }
    }
}

/// A loaded asset of either kind.
#[derive(Clone, Debug)]
pub enum AssetHandle {
    Mesh(MeshHandle),
    Texture(TextureHandle),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glb_header() {
        let mut bytes = GLB_MAGIC.to_vec();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&12u32.to_le_bytes());
        let mesh = MeshAsset::new("models/grass.glb", bytes);
        assert!(mesh.is_glb());
        assert_eq!(mesh.glb_version(), Some(2));

        let not = MeshAsset::new("x.glb", b"{\"asset\":{}}".to_vec());
        assert!(!not.is_glb());
        assert_eq!(not.glb_version(), None);
    }

    #[test]
    fn test_key_path() {
        let k = AssetKey::texture("textures/ground/grass.jpg", ColorSpace::Srgb);
        assert_eq!(k.path(), Path::new("textures/ground/grass.jpg"));
        assert_ne!(k, AssetKey::texture("textures/ground/grass.jpg", ColorSpace::Linear));
    }
}
