//! What the renderer receives each frame.

use glam::{Mat4, Vec3};

use crate::actor::{Actor, MeshId};
use crate::camera_rig::{CameraPose, PointLight};
use crate::material::{MaterialId, TextureId};

/// Direction towards the key light every lit program shades against.
pub fn key_light_direction() -> Vec3 {
    Vec3::ONE.normalize()
}

/// Lights for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLighting {
    /// Unit vector towards the key light.
    pub key_direction: Vec3,
    pub point: Option<PointLight>,
}

/// One mesh to draw with one material at one transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub transform: Mat4,
}

/// Immutable view of the scene after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub camera: CameraPose,
    pub lighting: FrameLighting,
    /// Shared shader time, in seconds.
    pub time: f32,
    pub draws: Vec<DrawItem>,
    /// Texture the ship material currently resolves to.
    pub ship_texture: Option<TextureId>,
}

impl FrameSnapshot {
    pub(crate) fn push_actor(&mut self, actor: &Actor) {
        self.draws
            .extend(actor.part_transforms().map(|(part, transform)| DrawItem {
                mesh: part.mesh,
                material: part.material,
                transform,
            }));
    }
}
