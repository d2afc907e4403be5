//! The three scene programs and their render pipelines.
//!
//! All programs share one pipeline layout:
//!
//! - group 0: camera (binding 0) and frame lighting/time (binding 1)
//! - group 1: material constants (0), colour texture (1), sampler (2)
//! - group 2: per-draw model matrices behind a dynamic offset

use std::collections::HashMap;
use std::num::NonZeroU64;

use driftfield_sim::{Culling, Shading};

use crate::buffer::VertexPositionNormalUv;
use crate::depth::DepthBuffer;
use crate::shader::{ShaderError, ShaderLibrary};
use crate::uniforms::{CameraUniform, FrameUniform, MaterialUniform, ModelUniform};

pub const ASTEROID_SHADER_SOURCE: &str = include_str!("shaders/asteroid.wgsl");
pub const SPACESHIP_SHADER_SOURCE: &str = include_str!("shaders/spaceship.wgsl");
pub const STARFIELD_SHADER_SOURCE: &str = include_str!("shaders/starfield.wgsl");

/// Which shader program draws a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    Asteroid,
    Spaceship,
    Starfield,
}

impl Program {
    pub const ALL: [Program; 3] = [Program::Asteroid, Program::Spaceship, Program::Starfield];

    pub fn for_shading(shading: &Shading) -> Self {
        match shading {
            Shading::Asteroid { .. } => Program::Asteroid,
            Shading::Spaceship { .. } => Program::Spaceship,
            Shading::Unlit => Program::Starfield,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Program::Asteroid => "asteroid",
            Program::Spaceship => "spaceship",
            Program::Starfield => "starfield",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            Program::Asteroid => ASTEROID_SHADER_SOURCE,
            Program::Spaceship => SPACESHIP_SHADER_SOURCE,
            Program::Starfield => STARFIELD_SHADER_SOURCE,
        }
    }
}

fn cull_face(culling: Culling) -> wgpu::Face {
    match culling {
        Culling::Back => wgpu::Face::Back,
        Culling::Front => wgpu::Face::Front,
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    size: usize,
    dynamic: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// Bind group layouts shared by every program.
pub struct SceneLayouts {
    pub globals: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
    pub model: wgpu::BindGroupLayout,
    pub pipeline_layout: wgpu::PipelineLayout,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let stages = wgpu::ShaderStages::VERTEX_FRAGMENT;
        let globals = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene-globals-bgl"),
            entries: &[
                uniform_entry(0, stages, size_of::<CameraUniform>(), false),
                uniform_entry(1, stages, size_of::<FrameUniform>(), false),
            ],
        });
        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene-material-bgl"),
            entries: &[
                uniform_entry(0, stages, size_of::<MaterialUniform>(), false),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let model = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene-model-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX,
                size_of::<ModelUniform>(),
                true,
            )],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&globals, &material, &model],
            immediate_size: 0,
        });
        Self {
            globals,
            material,
            model,
            pipeline_layout,
        }
    }
}

/// Render pipelines keyed by program and cull mode, built on demand.
pub struct ScenePipelines {
    surface_format: wgpu::TextureFormat,
    pipelines: HashMap<(Program, Culling), wgpu::RenderPipeline>,
}

impl ScenePipelines {
    /// Validate and compile every program up front so a broken shader fails
    /// scene start rather than the first frame that uses it.
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderLibrary,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        for program in Program::ALL {
            shaders.load_from_source(device, program.name(), program.source())?;
        }
        Ok(Self {
            surface_format,
            pipelines: HashMap::new(),
        })
    }

    /// Pipeline for `program` with `culling`, creating it if needed.
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        shaders: &ShaderLibrary,
        layouts: &SceneLayouts,
        program: Program,
        culling: Culling,
    ) -> Result<(), ShaderError> {
        if self.pipelines.contains_key(&(program, culling)) {
            return Ok(());
        }
        let module = shaders.get(program.name())?;
        let label = format!("{}-pipeline", program.name());
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&layouts.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(cull_face(culling)),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::stencil_state(program != Program::Starfield)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
        log::debug!("Created {label} (cull {culling:?})");
        self.pipelines.insert((program, culling), pipeline);
        Ok(())
    }

    pub fn get(&self, program: Program, culling: Culling) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(program, culling))
    }
}
