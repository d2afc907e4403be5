//! The wgpu implementation of [`driftfield_sim::Renderer`].
//!
//! `prepare` uploads every mesh, texture and material a scene references;
//! `draw` writes the frame uniforms and records one pass over the snapshot's
//! draw list. Per-draw model matrices live in a single uniform buffer
//! addressed with dynamic offsets.

use std::collections::HashMap;
use std::num::NonZeroU64;

use driftfield_sim::{
    Culling, FrameSnapshot, MaterialId, MeshId, Renderer, Scene, TextureBinding, TextureId,
};
use wgpu::util::DeviceExt;

use crate::buffer::GpuMesh;
use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{Program, SceneLayouts, ScenePipelines};
use crate::shader::{ShaderError, ShaderLibrary};
use crate::texture::{GpuTexture, TextureError, TextureImage, create_sampler};
use crate::uniforms::{FrameUniform, MaterialUniform, ModelUniform};

/// Draw slots allocated up front; the buffer doubles when a frame needs more.
const INITIAL_MODEL_SLOTS: usize = 128;

/// Camera and clear settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: [f64; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("draw references unknown material {0:?}")]
    UnknownMaterial(MaterialId),

    #[error("draw references mesh {0:?}, which was never uploaded")]
    UnknownMesh(MeshId),

    #[error("material {material:?} has no bind group for texture {texture:?}")]
    UnboundTexture {
        material: MaterialId,
        texture: TextureId,
    },

    #[error("material {0:?} cycles ship textures but the frame carries none")]
    NoShipTexture(MaterialId),
}

/// Byte distance between consecutive model slots.
fn model_stride(min_alignment: u32) -> u64 {
    let size = size_of::<ModelUniform>() as u64;
    let align = u64::from(min_alignment.max(1));
    size.div_ceil(align) * align
}

/// Lay the model uniforms out at `stride`-byte intervals.
fn pack_models(models: impl Iterator<Item = ModelUniform>, stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = Vec::new();
    for (i, model) in models.enumerate() {
        bytes.resize(i * stride, 0);
        bytes.extend_from_slice(bytemuck::bytes_of(&model));
    }
    bytes
}

struct ModelSlots {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
}

impl ModelSlots {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, stride: u64, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model-slots"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model-slots-bg"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(size_of::<ModelUniform>() as u64),
                }),
            }],
        });
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }
}

struct PreparedMaterial {
    program: Program,
    culling: Culling,
    texture: TextureBinding,
    // Kept alive for the bind groups that reference it.
    _uniform: wgpu::Buffer,
}

pub struct SceneRenderer {
    ctx: RenderContext,
    depth: DepthBuffer,
    shaders: ShaderLibrary,
    layouts: SceneLayouts,
    pipelines: ScenePipelines,
    sampler: wgpu::Sampler,
    camera: Camera,
    camera_buffer: wgpu::Buffer,
    frame_buffer: wgpu::Buffer,
    globals: wgpu::BindGroup,
    models: ModelSlots,
    meshes: HashMap<MeshId, GpuMesh>,
    textures: HashMap<TextureId, GpuTexture>,
    materials: HashMap<MaterialId, PreparedMaterial>,
    material_bind_groups: HashMap<(MaterialId, TextureId), wgpu::BindGroup>,
    pass: RenderPassBuilder,
}

impl SceneRenderer {
    /// Validate the shader programs and allocate the per-frame resources.
    ///
    /// # Errors
    /// [`RenderError::Shader`] when a program fails validation.
    pub fn new(ctx: RenderContext, settings: RenderSettings) -> Result<Self, RenderError> {
        let device = &ctx.device;
        let (width, height) = ctx.size();

        let mut shaders = ShaderLibrary::new();
        let pipelines = ScenePipelines::new(device, &mut shaders, ctx.surface_format)?;
        let layouts = SceneLayouts::new(device);

        let mut camera = Camera::new(settings.fov_degrees, settings.near, settings.far);
        camera.set_aspect_ratio(width, height);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera-uniform"),
            contents: bytemuck::bytes_of(&camera.to_uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene-globals-bg"),
            layout: &layouts.globals,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: frame_buffer.as_entire_binding(),
                },
            ],
        });

        let stride = model_stride(device.limits().min_uniform_buffer_offset_alignment);
        let models = ModelSlots::new(device, &layouts.model, stride, INITIAL_MODEL_SLOTS);

        let [r, g, b, a] = settings.clear_color;
        let pass = RenderPassBuilder::new()
            .clear_color(wgpu::Color { r, g, b, a })
            .depth(DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");

        Ok(Self {
            depth: DepthBuffer::new(device, width, height),
            sampler: create_sampler(device),
            shaders,
            layouts,
            pipelines,
            camera,
            camera_buffer,
            frame_buffer,
            globals,
            models,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
            material_bind_groups: HashMap::new(),
            pass,
            ctx,
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    fn upload_texture(&self, id: TextureId, path: &std::path::Path) -> Result<GpuTexture, TextureError> {
        let label = format!("texture-{}", id.0);
        let image = TextureImage::load_or_placeholder(path);
        match GpuTexture::upload(&self.ctx.device, &self.ctx.queue, &label, &image) {
            Ok(texture) => Ok(texture),
            Err(err) => {
                log::warn!("{err}; using placeholder for {path:?}");
                GpuTexture::upload(&self.ctx.device, &self.ctx.queue, &label, &TextureImage::placeholder())
            }
        }
    }

    fn material_bind_group(
        &self,
        uniform: &wgpu::Buffer,
        texture: &GpuTexture,
        label: &str,
    ) -> wgpu::BindGroup {
        self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn ensure_model_capacity(&mut self, draws: usize) {
        if draws <= self.models.capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("Growing model slots {} -> {capacity}", self.models.capacity);
        self.models = ModelSlots::new(&self.ctx.device, &self.layouts.model, self.models.stride, capacity);
    }
}

impl Renderer for SceneRenderer {
    type Error = RenderError;

    fn prepare(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.meshes.clear();
        self.textures.clear();
        self.materials.clear();
        self.material_bind_groups.clear();

        for (id, mesh) in scene.all_meshes() {
            let gpu = GpuMesh::upload(&self.ctx.device, &format!("{id:?}"), mesh);
            self.meshes.insert(id, gpu);
        }

        for (id, path) in scene.textures.iter() {
            let texture = self.upload_texture(id, path)?;
            self.textures.insert(id, texture);
        }

        for (id, material) in scene.materials.iter() {
            let program = Program::for_shading(&material.shading);
            self.pipelines.ensure(
                &self.ctx.device,
                &self.shaders,
                &self.layouts,
                program,
                material.culling,
            )?;

            let uniform = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}-material", material.name)),
                contents: bytemuck::bytes_of(&MaterialUniform::new(&material.shading)),
                usage: wgpu::BufferUsages::UNIFORM,
            });

            let texture_ids: Vec<TextureId> = match material.texture {
                TextureBinding::Fixed(texture) => vec![texture],
                TextureBinding::ShipCycle => scene
                    .ship_textures
                    .iter()
                    .flat_map(|set| set.iter().copied())
                    .collect(),
            };
            for texture_id in texture_ids {
                let Some(texture) = self.textures.get(&texture_id) else {
                    return Err(RenderError::UnboundTexture {
                        material: id,
                        texture: texture_id,
                    });
                };
                let label = format!("{}-{}-bg", material.name, texture_id.0);
                let bind_group = self.material_bind_group(&uniform, texture, &label);
                self.material_bind_groups.insert((id, texture_id), bind_group);
            }

            self.materials.insert(
                id,
                PreparedMaterial {
                    program,
                    culling: material.culling,
                    texture: material.texture,
                    _uniform: uniform,
                },
            );
        }

        log::info!(
            "Prepared scene: {} meshes, {} textures, {} materials",
            self.meshes.len(),
            self.textures.len(),
            self.materials.len()
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        let (width, height) = self.ctx.size();
        self.depth.resize(&self.ctx.device, width, height);
        self.camera.set_aspect_ratio(width, height);
    }

    fn draw(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
        let surface_texture = match self.ctx.get_current_texture() {
            Ok(texture) => texture,
            Err(err) if err.is_recoverable() => {
                log::warn!("Skipping frame: {err}");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        self.camera.set_pose(&frame.camera);
        let queue = &self.ctx.queue;
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&self.camera.to_uniform()));
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform::new(&frame.lighting, frame.time)),
        );

        self.ensure_model_capacity(frame.draws.len());
        let packed = pack_models(
            frame.draws.iter().map(|d| ModelUniform::new(d.transform)),
            self.models.stride,
        );
        if !packed.is_empty() {
            self.ctx.queue.write_buffer(&self.models.buffer, 0, &packed);
        }

        let mut encoder = FrameEncoder::new(&self.ctx.device, surface_texture);
        {
            let mut pass = encoder.begin_render_pass(&self.pass, Some(&self.depth.view));
            pass.set_bind_group(0, &self.globals, &[]);

            for (slot, draw) in frame.draws.iter().enumerate() {
                let material = self
                    .materials
                    .get(&draw.material)
                    .ok_or(RenderError::UnknownMaterial(draw.material))?;
                let texture = match material.texture {
                    TextureBinding::Fixed(texture) => texture,
                    TextureBinding::ShipCycle => frame
                        .ship_texture
                        .ok_or(RenderError::NoShipTexture(draw.material))?,
                };
                let bind_group = self
                    .material_bind_groups
                    .get(&(draw.material, texture))
                    .ok_or(RenderError::UnboundTexture {
                        material: draw.material,
                        texture,
                    })?;
                let mesh = self
                    .meshes
                    .get(&draw.mesh)
                    .ok_or(RenderError::UnknownMesh(draw.mesh))?;
                let Some(pipeline) = self.pipelines.get(material.program, material.culling) else {
                    return Err(ShaderError::NotLoaded {
                        name: material.program.name().to_string(),
                    }
                    .into());
                };

                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, bind_group, &[]);
                let offset = slot as u64 * self.models.stride;
                pass.set_bind_group(2, &self.models.bind_group, &[offset as u32]);
                mesh.draw(&mut pass);
            }
        }
        encoder.finish(&self.ctx.queue);
        Ok(())
    }
}
