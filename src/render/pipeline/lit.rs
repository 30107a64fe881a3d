//! Lit material pipeline built from a (possibly patched) shader program

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};

use crate::core::{Error, Result};
use crate::material::Material;
use crate::render::buffer::InstanceGpuBuffer;
use crate::shader::{ShaderProgram, UniformKind};

/// Bind group holding patch-declared uniforms.
const EXTRA_GROUP: u32 = 2;

/// Mesh vertex (must match `VertexInput` in lit.vert.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 4],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Resolve `program` and hand it to the device
pub fn compile_program(device: &wgpu::Device, program: &ShaderProgram) -> Result<wgpu::ShaderModule> {
    let source = program.resolve()?;
    log::debug!("Compiling program '{}' ({} bytes)", program.label(), source.len());
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(program.label()),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

/// Bindings of `group` declared by the program's patches, one entry per binding.
///
/// Scalar and vector uniforms sharing a binding live in one uniform block.
pub fn group_bindings(program: &ShaderProgram, group: u32) -> Result<Vec<(u32, UniformKind)>> {
    let mut bindings: BTreeMap<u32, UniformKind> = BTreeMap::new();
    for name in program.uniform_names() {
        let Some(slot) = program.uniform(name) else { continue };
        if slot.group != group {
            continue;
        }
        match bindings.get(&slot.binding) {
            None => {
                bindings.insert(slot.binding, slot.kind);
            }
            Some(existing) if is_block(*existing) && is_block(slot.kind) => {}
            Some(existing) if *existing == slot.kind => {}
            Some(existing) => {
                return Err(Error::Shader(format!(
                    "'{}': binding {} of group {} is both {:?} and {:?}",
                    program.label(),
                    slot.binding,
                    group,
                    existing,
                    slot.kind
                )));
            }
        }
    }
    Ok(bindings.into_iter().collect())
}

fn is_block(kind: UniformKind) -> bool {
    matches!(kind, UniformKind::Float | UniformKind::Vec3)
}

fn layout_entry(binding: u32, kind: UniformKind) -> wgpu::BindGroupLayoutEntry {
    let ty = match kind {
        UniformKind::Float | UniformKind::Vec3 => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        UniformKind::Texture2d => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        UniformKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    };
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty,
        count: None,
    }
}

/// Render pipeline for one material
pub struct LitPipeline {
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    extra_layout: Option<wgpu::BindGroupLayout>,
}

impl LitPipeline {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        scene_layout: &wgpu::BindGroupLayout,
        material: &Material,
    ) -> Result<Self> {
        let program = material
            .program
            .as_ref()
            .ok_or_else(|| Error::Shader(format!("material '{}' has no shading program", material.name)))?;
        let shader = compile_program(device, program)?;

        // Group 1: model matrix, material, diffuse map, normal map, sampler
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lit_material_layout"),
            entries: &[
                layout_entry(0, UniformKind::Float),
                layout_entry(1, UniformKind::Float),
                layout_entry(2, UniformKind::Texture2d),
                layout_entry(3, UniformKind::Texture2d),
                layout_entry(4, UniformKind::Sampler),
            ],
        });

        // Group 2: whatever the patches declared
        let extra = group_bindings(program, EXTRA_GROUP)?;
        let extra_layout = (!extra.is_empty()).then(|| {
            let entries: Vec<_> = extra.iter().map(|&(b, k)| layout_entry(b, k)).collect();
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lit_extra_layout"),
                entries: &entries,
            })
        });

        let mut layouts = vec![scene_layout, &material_layout];
        if let Some(extra) = &extra_layout {
            layouts.push(extra);
        }
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit_pipeline_layout"),
            bind_group_layouts: &layouts,
            immediate_size: 0,
        });

        let blend = if material.transparent {
            Some(wgpu::BlendState::ALPHA_BLENDING)
        } else {
            None
        };
        let cull_mode = if material.double_sided {
            None
        } else {
            Some(wgpu::Face::Back)
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout(), InstanceGpuBuffer::layout()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Self::DEPTH_FORMAT,
                depth_write_enabled: !material.transparent,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            material_layout,
            extra_layout,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }

    pub fn extra_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.extra_layout.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ground::patch_ground;
    use crate::shader::injector::patch_wind;
    use crate::wind::WindStage;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 48);
        assert_eq!(MeshVertex::layout().attributes[3].offset, 32);
    }

    #[test]
    fn test_wind_bindings_collapse_to_one_block() {
        let mut program = ShaderProgram::lit("grass");
        patch_wind(&mut program, WindStage::Instanced).unwrap();
        let bindings = group_bindings(&program, 2).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].0, 0);
        assert!(group_bindings(&program, 3).unwrap().is_empty());
    }

    #[test]
    fn test_ground_bindings() {
        let mut program = ShaderProgram::lit("ground");
        patch_ground(&mut program).unwrap();
        let kinds: Vec<_> = group_bindings(&program, 2).unwrap().into_iter().map(|(_, k)| k).collect();
        assert_eq!(
            kinds,
            [UniformKind::Float, UniformKind::Texture2d, UniformKind::Texture2d, UniformKind::Sampler]
        );
    }

    #[test]
    fn test_every_program_is_fogged() {
        let mut ground = ShaderProgram::lit("ground");
        patch_ground(&mut ground).unwrap();
        let mut grass = ShaderProgram::lit("grass");
        patch_wind(&mut grass, WindStage::Instanced).unwrap();
        for program in [ShaderProgram::lit("plain"), ground, grass] {
            let source = program.resolve().unwrap();
            assert!(source.contains("@group(0) @binding(2) var<uniform> fog: Fog;"));
            assert!(source.contains("mix(fog.color, lit + emissive, fog_factor)"));
        }
    }
}
