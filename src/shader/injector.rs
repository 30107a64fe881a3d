//! Wind stage injection into material programs.

use super::{patch, ShaderProgram, ShaderStage, UniformKind, UniformSlot, SIMPLEX2D};
use crate::core::{Error, Result};
use crate::material::{Material, SceneMaterial, ShadedMaterial, ShaderRegistry};
use crate::wind::{WindParams, WindStage, WindUniforms};

const WIND_UNIFORMS: &str = include_str!("../../shaders/wind_uniforms.wgsl");
const WIND_PROJECT: &str = include_str!("../../shaders/wind_project.wgsl");
const WIND_PROJECT_INSTANCED: &str = include_str!("../../shaders/wind_project_instanced.wgsl");

/// Bind group holding the wind uniform block.
pub const WIND_GROUP: u32 = 2;

/// Uniform names a wind-shaded program exposes, in declaration order.
pub const WIND_UNIFORM_NAMES: [&str; 5] =
    ["time", "wind_strength", "wind_frequency", "wind_scale", "height_factor"];

/// Splice the wind stage into `program`'s vertex half and declare its uniforms.
pub fn patch_wind(program: &mut ShaderProgram, stage: WindStage) -> Result<()> {
    let projection = if stage.is_instanced() {
        WIND_PROJECT_INSTANCED
    } else {
        WIND_PROJECT
    };

    program.patch_stage(ShaderStage::Vertex, |src| {
        let src = patch::insert_after(src, patch::PRELUDE, WIND_UNIFORMS)?;
        patch::replace_chunk(&src, "project_vertex", projection)
    })?;
    program.ensure_function(ShaderStage::Vertex, "simplex2d", SIMPLEX2D)?;

    for name in WIND_UNIFORM_NAMES {
        let kind = if name == "wind_strength" {
            UniformKind::Vec3
        } else {
            UniformKind::Float
        };
        program.declare_uniform(name, UniformSlot { kind, group: WIND_GROUP, binding: 0 })?;
    }
    Ok(())
}

/// Attaches wind to materials for one group's parameters.
#[derive(Clone, Copy, Debug)]
pub struct WindInjector {
    params: WindParams,
}

impl WindInjector {
    pub fn new(params: WindParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &WindParams {
        &self.params
    }

    /// Shaded copy of `material`. The input is never modified.
    pub fn inject(&self, material: &Material, stage: WindStage) -> Result<ShadedMaterial> {
        let mut program = material
            .program
            .clone()
            .ok_or_else(|| Error::Shader(format!("material '{}' has no shading program", material.name)))?;
        patch_wind(&mut program, stage)?;

        let mut material = material.clone();
        material.program = Some(program);
        Ok(ShadedMaterial {
            material,
            wind: WindUniforms::new(&self.params, stage),
        })
    }

    /// Inject and register the time uniform; on failure log and keep the
    /// material as it was.
    pub fn apply(&self, material: Material, stage: WindStage, registry: &mut ShaderRegistry) -> SceneMaterial {
        match self.inject(&material, stage) {
            Ok(shaded) => {
                registry.register(shaded.material.name.clone(), &shaded.wind.time);
                SceneMaterial::Shaded(shaded)
            }
            Err(e) => {
                log::error!("Wind injection failed for '{}': {}", material.name, e);
                SceneMaterial::Plain(material)
            }
        }
    }
}
