//! Scene construction errors.

/// Errors raised while building a scene. Ticking a built scene cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A texture cycle needs at least one texture.
    #[error("texture set must contain at least one texture")]
    EmptyTextureSet,

    /// Asteroid field parameters are out of range.
    #[error("invalid asteroid field parameters: {0}")]
    InvalidField(String),
}
