//! Top-level error for the `driftfield` binary.

use driftfield_config::ConfigError;
use driftfield_render::{RenderContextError, RenderError};
use driftfield_sim::SceneError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("scene setup failed: {0}")]
    Scene(#[from] SceneError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
