//! wgpu renderer for driftfield scenes: GPU context, depth buffer, naga-validated
//! WGSL programs, texture upload and the [`SceneRenderer`] that draws
//! [`driftfield_sim::FrameSnapshot`]s.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod scene_renderer;
pub mod shader;
pub mod texture;
pub mod uniforms;

pub use buffer::{GpuMesh, VertexPositionNormalUv};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use pipeline::{Program, SceneLayouts, ScenePipelines};
pub use scene_renderer::{RenderError, RenderSettings, SceneRenderer};
pub use shader::{ShaderError, ShaderLibrary, validate_wgsl};
pub use texture::{GpuTexture, PLACEHOLDER_RGBA, TextureError, TextureImage};
pub use uniforms::{CameraUniform, FrameUniform, MaterialUniform, ModelUniform};
