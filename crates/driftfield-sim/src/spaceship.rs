//! The player's spaceship: its part layout and the per-tick controller.

use std::f32::consts::FRAC_PI_2;

use driftfield_input::{Action, InputState};
use driftfield_mesh::{Mesh, Primitive};
use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, AnimationState, Body, MeshId, Part, PlayerState, Pose, ShipMotion};
use crate::material::MaterialId;

/// Units per tick for each held direction.
pub const DEFAULT_SPEED: f32 = 0.3;

/// One rigid piece of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartSpec {
    pub primitive: Primitive,
    pub offset: Pose,
}

/// Layout of a composite ship, built once at scene start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipBlueprint {
    pub parts: Vec<PartSpec>,
}

/// Cylinder lying along X.
fn lying_cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32, x: f32) -> PartSpec {
    PartSpec {
        primitive: Primitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments: segments,
        },
        offset: Pose::at(Vec3::new(x, 0.0, 0.0)).with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2)),
    }
}

fn wing(depth: f32, y: f32) -> PartSpec {
    PartSpec {
        primitive: Primitive::Cuboid {
            width: 2.0,
            height: 0.2,
            depth,
        },
        offset: Pose::at(Vec3::new(0.0, y, 0.0)),
    }
}

impl ShipBlueprint {
    /// Fighter flown in the combat field: long hull, two wings and an engine.
    pub fn long_hull() -> Self {
        Self {
            parts: vec![
                lying_cylinder(0.4, 0.6, 5.0, 8, 0.0),
                wing(1.0, 0.8),
                wing(1.0, -0.8),
                lying_cylinder(0.25, 0.35, 0.8, 6, -1.8),
            ],
        }
    }

    /// Display model for the viewer: short hull and narrower wings.
    pub fn short_hull() -> Self {
        Self {
            parts: vec![
                lying_cylinder(0.4, 0.6, 3.0, 8, 0.0),
                wing(0.8, 0.8),
                wing(0.8, -0.8),
            ],
        }
    }

    /// Build the body (every part sharing `material`) and one mesh per part.
    /// Part `i` draws `MeshId::ShipPart(i)`.
    pub fn build(&self, material: MaterialId) -> (Body, Vec<(MeshId, Mesh)>) {
        let mut parts = Vec::with_capacity(self.parts.len());
        let mut meshes = Vec::with_capacity(self.parts.len());
        for (i, spec) in self.parts.iter().enumerate() {
            let mesh = MeshId::ShipPart(i as u32);
            parts.push(Part {
                mesh,
                material,
                offset: spec.offset,
            });
            meshes.push((mesh, spec.primitive.build()));
        }
        (Body { parts }, meshes)
    }
}

/// Turns held directions into motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceshipController {
    pub speed: f32,
}

impl Default for SpaceshipController {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
        }
    }
}

const DIRECTIONS: [(Action, Vec3); 6] = [
    (Action::Forward, Vec3::NEG_Z),
    (Action::Back, Vec3::Z),
    (Action::Left, Vec3::NEG_X),
    (Action::Right, Vec3::X),
    (Action::Up, Vec3::Y),
    (Action::Down, Vec3::NEG_Y),
];

impl SpaceshipController {
    /// This tick's velocity. Starts from zero every call; opposing directions
    /// cancel.
    pub fn velocity(&self, input: &InputState) -> Vec3 {
        DIRECTIONS
            .iter()
            .filter(|(action, _)| input.is_active(*action))
            .fold(Vec3::ZERO, |v, (_, dir)| v + *dir * self.speed)
    }

    /// Advance the player one tick and return the velocity applied.
    ///
    /// Piloted ships move by the input velocity and turn to face along it;
    /// with no input they keep their orientation. Turntable ships only spin.
    /// Actors that are not players are left alone.
    pub fn update(&self, actor: &mut Actor, input: &InputState) -> Vec3 {
        let AnimationState::Player(state) = &mut actor.animation else {
            return Vec3::ZERO;
        };
        let velocity = match state.motion {
            ShipMotion::Piloted => {
                let velocity = self.velocity(input);
                actor.pose.position += velocity;
                if velocity != Vec3::ZERO {
                    actor.pose.set_quat(facing(velocity));
                }
                velocity
            }
            ShipMotion::Turntable { rate } => {
                actor.pose.rotation.y += rate;
                Vec3::ZERO
            }
        };
        state.last_velocity = velocity;
        velocity
    }
}

/// A new player actor at the origin.
pub fn player_actor(motion: ShipMotion, body: Body) -> Actor {
    Actor {
        pose: Pose::default(),
        animation: AnimationState::Player(PlayerState {
            motion,
            last_velocity: Vec3::ZERO,
        }),
        body,
    }
}

/// Orientation whose local +Z points along `direction`, with world +Y as up.
///
/// When `direction` is vertical the up vector is degenerate; the direction is
/// nudged slightly towards +Z to pick a heading.
pub fn facing(direction: Vec3) -> Quat {
    let mut z = direction.normalize();
    let mut x = Vec3::Y.cross(z);
    if x.length_squared() == 0.0 {
        z.z += 0.0001;
        z = z.normalize();
        x = Vec3::Y.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pilot() -> Actor {
        let (body, _) = ShipBlueprint::long_hull().build(MaterialId(0));
        player_actor(ShipMotion::Piloted, body)
    }

    fn held(actions: &[Action]) -> InputState {
        actions
            .iter()
            .fold(InputState::new(), |s, a| s.with_action(*a))
    }

    #[test]
    fn test_idle_tick_changes_nothing() {
        let mut actor = pilot();
        actor.pose = Pose::at(Vec3::new(1.0, 2.0, 3.0)).with_rotation(Vec3::new(0.1, 0.2, 0.3));
        let before = actor.pose;
        let v = SpaceshipController::default().update(&mut actor, &InputState::new());
        assert_eq!(v, Vec3::ZERO);
        assert_eq!(actor.pose, before);
    }

    #[test]
    fn test_forward_moves_and_faces_neg_z() {
        let mut actor = pilot();
        SpaceshipController::default().update(&mut actor, &held(&[Action::Forward]));
        assert_eq!(actor.pose.position, Vec3::new(0.0, 0.0, -0.3));
        let heading = actor.pose.quat() * Vec3::Z;
        assert!((heading - Vec3::NEG_Z).length() < 1e-5, "heading {heading}");
        let up = actor.pose.quat() * Vec3::Y;
        assert!((up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_each_direction() {
        let c = SpaceshipController::default();
        let cases = [
            (Action::Back, Vec3::new(0.0, 0.0, 0.3)),
            (Action::Left, Vec3::new(-0.3, 0.0, 0.0)),
            (Action::Right, Vec3::new(0.3, 0.0, 0.0)),
            (Action::Up, Vec3::new(0.0, 0.3, 0.0)),
            (Action::Down, Vec3::new(0.0, -0.3, 0.0)),
        ];
        for (action, expected) in cases {
            assert_eq!(c.velocity(&held(&[action])), expected, "{action:?}");
        }
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut actor = pilot();
        actor.pose.rotation = Vec3::new(0.0, 1.0, 0.0);
        let before = actor.pose;
        let v = SpaceshipController::default()
            .update(&mut actor, &held(&[Action::Left, Action::Right]));
        assert_eq!(v, Vec3::ZERO);
        assert_eq!(actor.pose, before);
    }

    #[test]
    fn test_diagonal_is_not_normalized() {
        let v = SpaceshipController::default().velocity(&held(&[Action::Forward, Action::Right]));
        assert_eq!(v, Vec3::new(0.3, 0.0, -0.3));
    }

    #[test]
    fn test_no_inertia() {
        let c = SpaceshipController::default();
        let mut actor = pilot();
        c.update(&mut actor, &held(&[Action::Right]));
        let after_move = actor.pose;
        c.update(&mut actor, &InputState::new());
        assert_eq!(actor.pose, after_move);
        let AnimationState::Player(state) = actor.animation else {
            panic!("not a player");
        };
        assert_eq!(state.last_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_vertical_motion_gets_valid_heading() {
        let q = facing(Vec3::Y);
        assert!(q.is_finite());
        assert!((q * Vec3::Z - Vec3::Y).length() < 1e-3);
        let q = facing(Vec3::NEG_Y);
        assert!((q * Vec3::Z - Vec3::NEG_Y).length() < 1e-3);
    }

    #[test]
    fn test_facing_points_plus_z_along_direction() {
        for dir in [Vec3::X, Vec3::NEG_X, Vec3::new(1.0, 1.0, -1.0)] {
            let q = facing(dir);
            assert!((q * Vec3::Z - dir.normalize()).length() < 1e-5, "{dir}");
        }
    }

    #[test]
    fn test_turntable_ignores_input() {
        let (body, _) = ShipBlueprint::short_hull().build(MaterialId(0));
        let mut actor = player_actor(ShipMotion::Turntable { rate: 0.01 }, body);
        let c = SpaceshipController::default();
        for _ in 0..10 {
            c.update(&mut actor, &held(&[Action::Forward]));
        }
        assert_eq!(actor.pose.position, Vec3::ZERO);
        assert!((actor.pose.rotation.y - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_blueprints() {
        let (body, meshes) = ShipBlueprint::long_hull().build(MaterialId(3));
        assert_eq!(body.parts.len(), 4);
        assert_eq!(meshes.len(), 4);
        assert!(body.parts.iter().all(|p| p.material == MaterialId(3)));
        assert_eq!(body.parts[3].offset.position, Vec3::new(-1.8, 0.0, 0.0));

        let (body, _) = ShipBlueprint::short_hull().build(MaterialId(0));
        assert_eq!(body.parts.len(), 3);
    }

    #[test]
    fn test_hull_lies_along_x() {
        let (body, meshes) = ShipBlueprint::long_hull().build(MaterialId(0));
        let hull = &meshes[0].1;
        let m = body.parts[0].offset.matrix();
        let max_x = hull
            .positions
            .iter()
            .map(|p| m.transform_point3(*p).x.abs())
            .fold(0.0, f32::max);
        assert!((max_x - 2.5).abs() < 1e-4);
    }
}
