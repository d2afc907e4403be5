//! Camera placement and the engine glow that follows the ship.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    /// Camera at `position` looking down -Z.
    pub fn looking_forward(position: Vec3) -> Self {
        Self {
            position,
            target: position + Vec3::NEG_Z,
        }
    }
}

/// Trailing camera orbiting the player, steered by the pointer.
///
/// Pointer X swings the camera around the player (a full half turn either
/// way); pointer Y raises or lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub radius: f32,
    pub base_height: f32,
    pub pointer_height: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            radius: 12.0,
            base_height: 8.0,
            pointer_height: 6.0,
        }
    }
}

impl CameraRig {
    pub fn offset(&self, pointer: Vec2) -> Vec3 {
        Vec3::new(
            self.radius * (PI * pointer.x).sin(),
            self.base_height + self.pointer_height * pointer.y,
            self.radius * (PI * pointer.x).cos(),
        )
    }

    pub fn pose(&self, player: Vec3, pointer: Vec2) -> CameraPose {
        CameraPose {
            position: player + self.offset(pointer),
            target: player,
        }
    }
}

/// How a scene's camera moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraMode {
    Follow(CameraRig),
    Fixed(CameraPose),
}

impl CameraMode {
    pub fn pose(&self, player: Vec3, pointer: Vec2) -> CameraPose {
        match self {
            CameraMode::Follow(rig) => rig.pose(player, pointer),
            CameraMode::Fixed(pose) => *pose,
        }
    }
}

/// A point light with linear falloff to zero at `range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

impl PointLight {
    /// Blue engine glow.
    pub fn engine_glow() -> Self {
        Self {
            position: Vec3::ZERO,
            color: rgb_hex(0x4488ff),
            intensity: 2.0,
            range: 100.0,
        }
    }

    /// Scalar weight at distance `d`.
    pub fn attenuation(&self, d: f32) -> f32 {
        (1.0 - d / self.range).max(0.0)
    }
}

/// `0xRRGGBB` to components in `[0, 1]`.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
