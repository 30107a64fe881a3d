//! Shading programs and their extension points.
//!
//! A [`ShaderProgram`] is a WGSL source split into a vertex half and a
//! fragment half, each carrying hook markers (see [`patch`]). Patches add
//! stages and uniforms without hand-writing the whole program; [`ShaderProgram::resolve`]
//! expands the remaining chunk includes and produces the final module source.

pub mod chunks;
pub mod patch;
pub mod injector;

pub use injector::WindInjector;

use std::collections::BTreeMap;

use crate::core::{Error, Result};

const LIT_VERTEX: &str = include_str!("../../shaders/lit.vert.wgsl");
const LIT_FRAGMENT: &str = include_str!("../../shaders/lit.frag.wgsl");
pub(crate) const SIMPLEX2D: &str = include_str!("../../shaders/simplex2d.wgsl");

/// Program stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Kind of a named uniform added by a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec3,
    Texture2d,
    Sampler,
}

/// A named uniform and where it is bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformSlot {
    pub kind: UniformKind,
    pub group: u32,
    pub binding: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShaderProgram {
    label: String,
    vertex: Option<String>,
    fragment: Option<String>,
    uniforms: BTreeMap<String, UniformSlot>,
}

impl ShaderProgram {
    /// The lit (Phong-style) base program.
    pub fn lit(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            vertex: Some(LIT_VERTEX.to_string()),
            fragment: Some(LIT_FRAGMENT.to_string()),
            uniforms: BTreeMap::new(),
        }
    }

    /// Program from explicit halves; either may be absent.
    pub fn from_sources(label: impl Into<String>, vertex: Option<String>, fragment: Option<String>) -> Self {
        Self {
            label: label.into(),
            vertex,
            fragment,
            uniforms: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self, stage: ShaderStage) -> Option<&str> {
        match stage {
            ShaderStage::Vertex => self.vertex.as_deref(),
            ShaderStage::Fragment => self.fragment.as_deref(),
        }
    }

    /// Rewrite one stage through `f`. Errors when the stage is absent.
    pub fn patch_stage<F>(&mut self, stage: ShaderStage, f: F) -> Result<()>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let label = &self.label;
        let slot = match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        };
        let source = slot
            .as_deref()
            .ok_or_else(|| Error::Shader(format!("program '{label}' has no {stage:?} stage")))?;
        *slot = Some(f(source)?);
        Ok(())
    }

    /// Insert `source` at the functions hook of `stage` unless the program
    /// already defines `name` in either stage.
    pub fn ensure_function(&mut self, stage: ShaderStage, name: &str, source: &str) -> Result<()> {
        let present = [ShaderStage::Vertex, ShaderStage::Fragment]
            .into_iter()
            .filter_map(|s| self.source(s))
            .any(|src| patch::defines_function(src, name));
        if present {
            return Ok(());
        }
        self.patch_stage(stage, |src| patch::insert_after(src, patch::FUNCTIONS, source))
    }

    /// Record a named uniform. Re-declaring with a different slot is an error.
    pub fn declare_uniform(&mut self, name: &str, slot: UniformSlot) -> Result<()> {
        match self.uniforms.get(name) {
            Some(existing) if *existing != slot => Err(Error::Shader(format!(
                "uniform '{name}' already declared as {existing:?}"
            ))),
            _ => {
                self.uniforms.insert(name.to_string(), slot);
                Ok(())
            }
        }
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformSlot> {
        self.uniforms.get(name)
    }

    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.keys().map(String::as_str)
    }

    /// Final WGSL module: both halves with every include expanded.
    pub fn resolve(&self) -> Result<String> {
        let vertex = self
            .vertex
            .as_deref()
            .ok_or_else(|| Error::Shader(format!("program '{}' has no vertex stage", self.label)))?;
        let mut out = chunks::expand_includes(vertex)?;
        if let Some(fragment) = &self.fragment {
            out.push('\n');
            out.push_str(&chunks::expand_includes(fragment)?);
        }
        Ok(out)
    }
}
