//! GPU device and window surface.
//!
//! [`RenderContext`] owns the wgpu instance, adapter, device, queue and the
//! configured surface of the game window.

use std::sync::Arc;
use winit::window::Window;

/// Failures while bringing up the GPU.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    /// No adapter can present to the window.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
}

/// Failures while acquiring a frame.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Lost even after reconfiguring; skip the frame.
    #[error("surface lost")]
    Lost,

    /// Fatal.
    #[error("out of memory")]
    OutOfMemory,

    /// Skip the frame.
    #[error("timeout")]
    Timeout,
}

impl SurfaceError {
    /// Whether the frame can simply be dropped.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SurfaceError::OutOfMemory)
    }
}

pub struct RenderContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
}

impl RenderContext {
    /// Bring up the GPU for `window`. `vsync` picks FIFO presentation when the
    /// surface supports it.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("driftfield-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = select_preferred_srgb_format(&caps.formats);
        let present_mode = select_present_mode(&caps.present_modes, vsync);
        log::debug!("Surface format {surface_format:?}, present mode {present_mode:?}");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            surface_format,
        })
    }

    /// Reconfigure after a window resize. Zero sizes clamp to 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Acquire the next frame, reconfiguring once if the surface was lost or
    /// outdated.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|_| SurfaceError::Lost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(SurfaceError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => Err(SurfaceError::Timeout),
            Err(wgpu::SurfaceError::Other) => {
                log::error!("Unknown surface error");
                Err(SurfaceError::Lost)
            }
        }
    }
}

/// [`RenderContext::new`] driven to completion with `pollster`.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

/// Prefer `Bgra8UnormSrgb`, then `Rgba8UnormSrgb`, then any sRGB format, then
/// whatever comes first.
fn select_preferred_srgb_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ]
    .into_iter()
    .find(|f| formats.contains(f))
    .or_else(|| formats.iter().copied().find(|f| f.is_srgb()))
    .unwrap_or(formats[0])
}

fn select_present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    let preferred: &[wgpu::PresentMode] = if vsync {
        &[wgpu::PresentMode::Fifo]
    } else {
        &[wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
    };
    preferred
        .iter()
        .copied()
        .find(|m| modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

/// Headless device for GPU tests. `None` when the machine has no adapter.
#[cfg(test)]
pub(crate) fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}
