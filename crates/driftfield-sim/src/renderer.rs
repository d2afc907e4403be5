//! The seam between the simulation and whatever draws it.

use crate::frame::FrameSnapshot;
use crate::scene::Scene;

/// Draws frames of a scene.
///
/// `prepare` runs once after the scene is built and uploads its meshes,
/// materials and textures. `draw` runs once per displayed frame.
pub trait Renderer {
    type Error: std::error::Error;

    /// Upload everything `scene` references.
    fn prepare(&mut self, scene: &Scene) -> Result<(), Self::Error>;

    /// The output surface changed size.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn draw(&mut self, frame: &FrameSnapshot) -> Result<(), Self::Error>;
}
