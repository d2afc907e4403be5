//! Actors: pose, typed animation state, and the renderable body kept beside it.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::material::MaterialId;

/// Position plus orientation as XYZ Euler angles (radians).
///
/// Angles are never wrapped; asteroids spin forever and their angles grow
/// without bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
}

impl Pose {
    /// A pose at `position` with no rotation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Builder-style rotation setter.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Orientation as a quaternion.
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Set the orientation from a quaternion.
    pub fn set_quat(&mut self, q: Quat) {
        let (x, y, z) = q.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Object-to-world transform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.quat(), self.position)
    }
}

/// Identifies one mesh in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeshId {
    /// The `n`th asteroid's deformed geometry.
    Asteroid(u32),
    /// The `n`th part of the spaceship.
    ShipPart(u32),
    /// The inward-facing starfield sphere.
    Starfield,
}

/// One rigid piece of an actor's body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Geometry to draw.
    pub mesh: MeshId,
    /// Shared material to draw it with.
    pub material: MaterialId,
    /// Fixed transform relative to the actor.
    pub offset: Pose,
}

/// What gets drawn for an actor. Never changes after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Rigid parts, all moving with the actor.
    pub parts: Vec<Part>,
}

impl Body {
    /// A body made of one part at the actor's origin.
    pub fn single(mesh: MeshId, material: MaterialId) -> Self {
        Self {
            parts: vec![Part {
                mesh,
                material,
                offset: Pose::default(),
            }],
        }
    }
}

/// Per-asteroid motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidState {
    /// Radius of the base dodecahedron.
    pub size: f32,
    /// Added to the Euler angles every tick. Constant.
    pub rotation_speed: Vec3,
    /// Added to the position every tick. Components flip on bounce.
    pub move_speed: Vec3,
}

/// How the spaceship moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShipMotion {
    /// Flown with the keyboard.
    Piloted,
    /// Spins about Y by `rate` radians per tick, ignoring input.
    Turntable { rate: f32 },
}

/// Spaceship state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// How input drives the pose.
    pub motion: ShipMotion,
    /// Velocity applied on the most recent tick. Rebuilt from input every tick.
    pub last_velocity: Vec3,
}

/// Starfield shell state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackdropState {
    /// Yaw added per tick, in radians.
    pub spin: f32,
}

/// Animation state, one variant per kind of actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationState {
    Asteroid(AsteroidState),
    Player(PlayerState),
    Backdrop(BackdropState),
}

/// A simulated entity: where it is, how it animates, and what it looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pose: Pose,
    pub animation: AnimationState,
    pub body: Body,
}

impl Actor {
    /// World transforms for every part of the body.
    pub fn part_transforms(&self) -> impl Iterator<Item = (&Part, Mat4)> + '_ {
        let root = self.pose.matrix();
        self.body
            .parts
            .iter()
            .map(move |part| (part, root * part.offset.matrix()))
    }
}
