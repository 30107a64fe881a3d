//! Scene materials.
//!
//! A [`Material`] is the backend-neutral description the renderer turns into
//! pipeline state: colour terms, texture maps, blending flags and an optional
//! [`ShaderProgram`]. Wind injection turns it into a [`ShadedMaterial`].

pub mod registry;

pub use registry::ShaderRegistry;

use glam::Vec3;

use crate::assets::{MeshHandle, TextureHandle};
use crate::shader::ShaderProgram;
use crate::wind::WindUniforms;

/// Where a material's colour map comes from.
#[derive(Clone, Debug, Default)]
pub enum MapSource {
    #[default]
    None,
    /// Standalone texture.
    Texture(TextureHandle),
    /// Texture embedded in a mesh container; resolved by the mesh decoder.
    Embedded(MeshHandle),
}

impl MapSource {
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub color: Vec3,
    pub map: MapSource,
    pub normal_map: Option<TextureHandle>,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub shininess: f32,
    /// Fragments with alpha below this are discarded. 0 disables the test.
    pub alpha_test: f32,
    pub transparent: bool,
    pub double_sided: bool,
    pub program: Option<ShaderProgram>,
}

impl Material {
    /// Lit material with the base program and neutral terms.
    pub fn phong(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            program: Some(ShaderProgram::lit(name.clone())),
            name,
            color: Vec3::ONE,
            map: MapSource::None,
            normal_map: None,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
            shininess: 30.0,
            alpha_test: 0.0,
            transparent: false,
            double_sided: false,
        }
    }

    /// Same material with no shading program (drawn by a fixed backend path).
    pub fn unprogrammed(name: impl Into<String>) -> Self {
        Self {
            program: None,
            ..Self::phong(name)
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_map(mut self, map: MapSource) -> Self {
        self.map = map;
        self
    }

    pub fn with_emissive(mut self, emissive: Vec3, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_alpha_test(mut self, alpha_test: f32) -> Self {
        self.alpha_test = alpha_test;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

/// A material whose vertex program carries the wind stage.
#[derive(Clone, Debug)]
pub struct ShadedMaterial {
    pub material: Material,
    pub wind: WindUniforms,
}

/// A group's material after the injection attempt.
#[derive(Clone, Debug)]
pub enum SceneMaterial {
    Plain(Material),
    Shaded(ShadedMaterial),
}

impl SceneMaterial {
    pub fn material(&self) -> &Material {
        match self {
            Self::Plain(m) => m,
            Self::Shaded(s) => &s.material,
        }
    }

    pub fn wind(&self) -> Option<&WindUniforms> {
        match self {
            Self::Plain(_) => None,
            Self::Shaded(s) => Some(&s.wind),
        }
    }

    pub fn is_shaded(&self) -> bool {
        matches!(self, Self::Shaded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let m = Material::phong("grass")
            .with_color(Vec3::splat(0.6))
            .with_emissive(Vec3::new(0.19, 0.5, 0.25), 0.05)
            .with_alpha_test(0.5)
            .double_sided();
        assert_eq!(m.name, "grass");
        assert!(m.double_sided);
        assert_eq!(m.alpha_test, 0.5);
        assert!(!m.map.is_some());
        assert_eq!(m.program.as_ref().map(|p| p.label()), Some("grass"));
    }

    #[test]
    fn test_unprogrammed() {
        assert!(Material::unprogrammed("rock").program.is_none());
    }

    #[test]
    fn test_scene_material_accessors() {
        let plain = SceneMaterial::Plain(Material::phong("a"));
        assert!(!plain.is_shaded());
        assert!(plain.wind().is_none());
        assert_eq!(plain.material().name, "a");
    }
}
