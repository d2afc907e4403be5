//! Procedural asteroid field: generation and per-tick drift.
//!
//! Generation draws from an injected RNG in a fixed order, so a seed plus
//! [`FieldParams`] fully determines the field. Each asteroid is a
//! once-subdivided dodecahedron, optionally roughened per vertex, placed by a
//! [`Placement`] policy and given a constant spin and (optionally) a drift.
//!
//! Drift is kept near the player by a reflecting boundary: once an asteroid is
//! further than the bound from the player on some axis, its speed on that axis
//! flips sign. The check runs after the move, so an asteroid can overshoot the
//! bound by at most one tick of drift.

use std::f32::consts::{PI, TAU};

use driftfield_mesh::{Mesh, dodecahedron};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, AnimationState, AsteroidState, Body, MeshId, Pose};
use crate::error::SceneError;
use crate::material::MaterialId;

/// Smallest asteroid radius.
pub const SIZE_MIN: f32 = 0.8;
/// Radius range above [`SIZE_MIN`].
pub const SIZE_SPAN: f32 = 1.5;
/// Subdivision level of the base dodecahedron.
pub const DODECAHEDRON_DETAIL: u32 = 1;
/// Largest absolute spin per axis, radians per tick.
pub const MAX_ROTATION_SPEED: f32 = 0.015;
/// Largest absolute drift per axis, units per tick.
pub const MAX_DRIFT_SPEED: f32 = 0.025;

/// How much each vertex is jittered, as a fraction of the asteroid's size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeformationProfile {
    /// Smooth polyhedra.
    None,
    /// Up to ±5% of the size along X, ±0.05% along Y and Z.
    Light,
    /// Per-axis jitter spans (offset is uniform in ±span/2 × size).
    Custom { x: f32, y: f32, z: f32 },
}

impl DeformationProfile {
    /// Per-axis jitter span as a multiple of size.
    pub fn spans(&self) -> Vec3 {
        match *self {
            DeformationProfile::None => Vec3::ZERO,
            DeformationProfile::Light => Vec3::new(0.1, 0.001, 0.001),
            DeformationProfile::Custom { x, y, z } => Vec3::new(x, y, z),
        }
    }
}

/// Where asteroids start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Spherical coordinates with θ ∈ [0, 2π), φ ∈ [0, π), r ∈ [min, max).
    Spherical { min_radius: f32, max_radius: f32 },
    /// Uniform in the cube `[-half_extent, half_extent)³`.
    Cube { half_extent: f32 },
}

impl Placement {
    fn sample<R: Rng>(&self, rng: &mut R) -> Vec3 {
        match *self {
            Placement::Spherical {
                min_radius,
                max_radius,
            } => {
                let theta = rng.random::<f32>() * TAU;
                let phi = rng.random::<f32>() * PI;
                let radius = rng.random::<f32>() * (max_radius - min_radius) + min_radius;
                Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                )
            }
            Placement::Cube { half_extent } => Vec3::new(
                (rng.random::<f32>() - 0.5) * 2.0 * half_extent,
                (rng.random::<f32>() - 0.5) * 2.0 * half_extent,
                (rng.random::<f32>() - 0.5) * 2.0 * half_extent,
            ),
        }
    }
}

/// Everything that shapes a generated field, besides the seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldParams {
    /// Number of asteroids.
    pub count: u32,
    pub deformation: DeformationProfile,
    pub placement: Placement,
    /// Whether asteroids drift. Without drift `move_speed` is zero.
    pub drift: bool,
    /// Per-axis distance from the player beyond which drift reflects.
    /// `None` disables the boundary.
    pub bounce_bound: Option<f32>,
}

impl FieldParams {
    /// Drifting, lightly deformed asteroids around the player.
    pub fn combat() -> Self {
        Self {
            count: 70,
            deformation: DeformationProfile::Light,
            placement: Placement::Spherical {
                min_radius: 25.0,
                max_radius: 85.0,
            },
            drift: true,
            bounce_bound: Some(80.0),
        }
    }

    /// Smooth asteroids tumbling in place.
    pub fn standalone() -> Self {
        Self {
            count: 30,
            deformation: DeformationProfile::None,
            placement: Placement::Cube { half_extent: 25.0 },
            drift: false,
            bounce_bound: None,
        }
    }

    /// Reject parameter sets that would produce NaNs or an empty sampling range.
    pub fn validate(&self) -> Result<(), SceneError> {
        match self.placement {
            Placement::Spherical {
                min_radius,
                max_radius,
            } if !(min_radius >= 0.0 && max_radius > min_radius) => {
                return Err(SceneError::InvalidField(format!(
                    "spherical placement needs 0 <= min_radius < max_radius, got {min_radius}..{max_radius}"
                )));
            }
            Placement::Cube { half_extent } if !(half_extent > 0.0) => {
                return Err(SceneError::InvalidField(format!(
                    "cube placement needs a positive half extent, got {half_extent}"
                )));
            }
            _ => {}
        }
        if let Some(bound) = self.bounce_bound
            && !(bound > 0.0)
        {
            return Err(SceneError::InvalidField(format!(
                "bounce bound must be positive, got {bound}"
            )));
        }
        let spans = self.deformation.spans();
        if !spans.is_finite() || spans.min_element() < 0.0 {
            return Err(SceneError::InvalidField(format!(
                "deformation spans must be finite and non-negative, got {spans}"
            )));
        }
        Ok(())
    }
}

/// One generated asteroid before it is placed in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAsteroid {
    pub geometry: Mesh,
    pub pose: Pose,
    pub state: AsteroidState,
}

/// Produces asteroids from an injected random source.
pub struct AsteroidFieldGenerator<R: Rng = ChaCha8Rng> {
    rng: R,
    params: FieldParams,
}

impl AsteroidFieldGenerator<ChaCha8Rng> {
    /// Generator seeded with `seed`.
    pub fn from_seed(seed: u64, params: FieldParams) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed), params)
    }
}

impl<R: Rng> AsteroidFieldGenerator<R> {
    /// Generator drawing from `rng`.
    pub fn new(rng: R, params: FieldParams) -> Self {
        Self { rng, params }
    }

    /// Generate `params.count` asteroids.
    pub fn generate(&mut self) -> Vec<GeneratedAsteroid> {
        (0..self.params.count).map(|_| self.next_asteroid()).collect()
    }

    /// Draw one asteroid. Sampling order: size, vertex jitter, position,
    /// orientation, spin, drift.
    fn next_asteroid(&mut self) -> GeneratedAsteroid {
        let rng = &mut self.rng;
        let size = SIZE_MIN + rng.random::<f32>() * SIZE_SPAN;

        let mut geometry = dodecahedron(size, DODECAHEDRON_DETAIL);
        let spans = self.params.deformation.spans();
        if spans != Vec3::ZERO {
            geometry.displace_vertices(|_, p| {
                let jitter = Vec3::new(
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() - 0.5,
                );
                p + jitter * spans * size
            });
            geometry.compute_vertex_normals();
        }

        let position = self.params.placement.sample(rng);
        let rotation = Vec3::new(
            rng.random::<f32>() * PI,
            rng.random::<f32>() * PI,
            rng.random::<f32>() * PI,
        );
        let rotation_speed = symmetric_vec3(rng, MAX_ROTATION_SPEED);
        let move_speed = if self.params.drift {
            symmetric_vec3(rng, MAX_DRIFT_SPEED)
        } else {
            Vec3::ZERO
        };

        GeneratedAsteroid {
            geometry,
            pose: Pose { position, rotation },
            state: AsteroidState {
                size,
                rotation_speed,
                move_speed,
            },
        }
    }
}

/// Three independent values uniform in `[-max, max)`.
fn symmetric_vec3<R: Rng>(rng: &mut R, max: f32) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0 * max,
        (rng.random::<f32>() - 0.5) * 2.0 * max,
        (rng.random::<f32>() - 0.5) * 2.0 * max,
    )
}

/// Axes whose drift reflected during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BounceMask(pub [bool; 3]);

impl BounceMask {
    pub fn any(&self) -> bool {
        self.0.iter().any(|b| *b)
    }
}

impl AsteroidState {
    /// Advance one tick: spin, drift, then reflect drift on every axis where
    /// the asteroid is further than `bound` from `player`.
    pub fn step(&mut self, pose: &mut Pose, player: Vec3, bound: Option<f32>) -> BounceMask {
        pose.rotation += self.rotation_speed;
        pose.position += self.move_speed;

        let mut mask = BounceMask::default();
        if let Some(bound) = bound {
            for axis in 0..3 {
                if (pose.position[axis] - player[axis]).abs() > bound {
                    self.move_speed[axis] = -self.move_speed[axis];
                    mask.0[axis] = true;
                }
            }
        }
        mask
    }
}

/// A generated field: its asteroids as scene actors plus their geometry.
///
/// Serializes to RON; together with `seed` and `params` the field can also be
/// regenerated from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidField {
    pub seed: u64,
    pub params: FieldParams,
    /// Material shared by every asteroid.
    pub material: MaterialId,
    /// Asteroid actors; actor `i` draws `MeshId::Asteroid(i)`.
    pub actors: Vec<Actor>,
    /// Geometry, indexed like `actors`.
    pub meshes: Vec<Mesh>,
    /// Shader time shared by every asteroid.
    pub time: f32,
}

impl AsteroidField {
    /// Generate a field from `seed`.
    ///
    /// # Errors
    /// [`SceneError::InvalidField`] if `params` fail validation.
    pub fn generate(
        seed: u64,
        params: FieldParams,
        material: MaterialId,
    ) -> Result<Self, SceneError> {
        params.validate()?;
        let asteroids = AsteroidFieldGenerator::from_seed(seed, params).generate();
        tracing::debug!(seed, count = asteroids.len(), "generated asteroid field");
        Ok(Self::from_generated(seed, params, material, asteroids))
    }

    fn from_generated(
        seed: u64,
        params: FieldParams,
        material: MaterialId,
        asteroids: Vec<GeneratedAsteroid>,
    ) -> Self {
        let mut actors = Vec::with_capacity(asteroids.len());
        let mut meshes = Vec::with_capacity(asteroids.len());
        for (i, asteroid) in asteroids.into_iter().enumerate() {
            actors.push(Actor {
                pose: asteroid.pose,
                animation: AnimationState::Asteroid(asteroid.state),
                body: Body::single(MeshId::Asteroid(i as u32), material),
            });
            meshes.push(asteroid.geometry);
        }
        Self {
            seed,
            params,
            material,
            actors,
            meshes,
            time: 0.0,
        }
    }

    /// Advance every asteroid one tick and publish `elapsed` as the shared
    /// shader time. Returns how many asteroids bounced.
    pub fn update(&mut self, player: Vec3, elapsed: f32) -> usize {
        let bound = self.params.bounce_bound;
        let mut bounced = 0;
        for actor in &mut self.actors {
            if let AnimationState::Asteroid(state) = &mut actor.animation
                && state.step(&mut actor.pose, player, bound).any()
            {
                bounced += 1;
            }
        }
        self.time = elapsed;
        bounced
    }

    /// Asteroid states, in actor order.
    pub fn states(&self) -> impl Iterator<Item = &AsteroidState> {
        self.actors.iter().filter_map(|a| match &a.animation {
            AnimationState::Asteroid(s) => Some(s),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(params: FieldParams, count: u32) -> FieldParams {
        FieldParams { count, ..params }
    }

    fn field(seed: u64, params: FieldParams) -> AsteroidField {
        AsteroidField::generate(seed, params, MaterialId(0)).unwrap()
    }

    #[test]
    fn test_sizes_in_range() {
        let f = field(1, FieldParams::combat());
        assert_eq!(f.len(), 70);
        for s in f.states() {
            assert!(
                (SIZE_MIN..=SIZE_MIN + SIZE_SPAN).contains(&s.size),
                "size {}",
                s.size
            );
        }
    }

    #[test]
    fn test_spherical_placement_radius() {
        let f = field(2, FieldParams::combat());
        for a in &f.actors {
            let r = a.pose.position.length();
            assert!((25.0 - 1e-3..85.0 + 1e-3).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn test_cube_placement_bounds() {
        let f = field(3, FieldParams::standalone());
        assert_eq!(f.len(), 30);
        for a in &f.actors {
            assert!(a.pose.position.abs().max_element() <= 25.0);
        }
    }

    #[test]
    fn test_orientation_and_speed_ranges() {
        let f = field(4, FieldParams::combat());
        for (a, s) in f.actors.iter().zip(f.states()) {
            assert!(a.pose.rotation.min_element() >= 0.0);
            assert!(a.pose.rotation.max_element() < PI);
            assert!(s.rotation_speed.abs().max_element() <= MAX_ROTATION_SPEED);
            assert!(s.move_speed.abs().max_element() <= MAX_DRIFT_SPEED);
        }
    }

    #[test]
    fn test_standalone_has_no_drift() {
        let f = field(5, FieldParams::standalone());
        assert!(f.states().all(|s| s.move_speed == Vec3::ZERO));
    }

    #[test]
    fn test_undeformed_vertices_on_sphere() {
        let f = field(6, small(FieldParams::standalone(), 4));
        for (mesh, s) in f.meshes.iter().zip(f.states()) {
            for p in &mesh.positions {
                assert!((p.length() - s.size).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_light_deformation_is_bounded() {
        let f = field(7, small(FieldParams::combat(), 8));
        let reference = dodecahedron(1.0, DODECAHEDRON_DETAIL);
        for (mesh, s) in f.meshes.iter().zip(f.states()) {
            let mut moved = false;
            for (p, unit) in mesh.positions.iter().zip(&reference.positions) {
                let offset = *p - *unit * s.size;
                assert!(offset.x.abs() <= 0.05 * s.size + 1e-4);
                assert!(offset.y.abs() <= 0.0005 * s.size + 1e-4);
                assert!(offset.z.abs() <= 0.0005 * s.size + 1e-4);
                moved |= offset.x.abs() > 1e-4;
            }
            assert!(moved, "light deformation should move some vertices");
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let params = small(FieldParams::combat(), 10);
        assert_eq!(field(99, params), field(99, params));
        assert_ne!(field(99, params), field(100, params));
    }

    #[test]
    fn test_injected_rng_matches_seeded() {
        let params = small(FieldParams::combat(), 5);
        let injected =
            AsteroidFieldGenerator::new(ChaCha8Rng::seed_from_u64(11), params).generate();
        let seeded = AsteroidFieldGenerator::from_seed(11, params).generate();
        assert_eq!(injected, seeded);
    }

    #[test]
    fn test_ron_roundtrip_and_regenerate() {
        let params = small(FieldParams::combat(), 3);
        let original = field(42, params);
        let text = ron::to_string(&original).unwrap();
        let restored: AsteroidField = ron::from_str(&text).unwrap();
        assert_eq!(restored, original);

        let regenerated = field(restored.seed, restored.params);
        assert_eq!(regenerated, original);
    }

    #[test]
    fn test_rotation_accumulates_unbounded() {
        let mut state = AsteroidState {
            size: 1.0,
            rotation_speed: Vec3::splat(0.015),
            move_speed: Vec3::ZERO,
        };
        let mut pose = Pose::default();
        for _ in 0..1000 {
            state.step(&mut pose, Vec3::ZERO, Some(80.0));
        }
        assert!((pose.rotation.x - 15.0).abs() < 1e-2);
    }

    #[test]
    fn test_bounce_flips_only_offending_axis() {
        let mut state = AsteroidState {
            size: 1.0,
            rotation_speed: Vec3::ZERO,
            move_speed: Vec3::new(0.02, 0.02, -0.02),
        };
        let mut pose = Pose::at(Vec3::new(79.99, 10.0, -10.0));
        let mask = state.step(&mut pose, Vec3::ZERO, Some(80.0));
        assert_eq!(mask, BounceMask([true, false, false]));
        assert_eq!(state.move_speed, Vec3::new(-0.02, 0.02, -0.02));
        // Overshoot is at most one tick of drift.
        assert!(pose.position.x - 80.0 <= 0.02 + 1e-4);
    }

    #[test]
    fn test_bound_is_relative_to_player() {
        let mut state = AsteroidState {
            size: 1.0,
            rotation_speed: Vec3::ZERO,
            move_speed: Vec3::new(0.0, 0.0, 0.02),
        };
        let mut pose = Pose::at(Vec3::new(0.0, 0.0, 85.0));
        let player = Vec3::new(0.0, 0.0, 10.0);
        assert!(!state.step(&mut pose, player, Some(80.0)).any());
        let far_player = Vec3::new(0.0, 0.0, -10.0);
        assert!(state.step(&mut pose, far_player, Some(80.0)).any());
        assert!(state.move_speed.z < 0.0);
    }

    #[test]
    fn test_no_bound_never_bounces() {
        let mut state = AsteroidState {
            size: 1.0,
            rotation_speed: Vec3::ZERO,
            move_speed: Vec3::X,
        };
        let mut pose = Pose::at(Vec3::new(1000.0, 0.0, 0.0));
        assert!(!state.step(&mut pose, Vec3::ZERO, None).any());
        assert_eq!(state.move_speed, Vec3::X);
    }

    #[test]
    fn test_every_tick_bounce_property() {
        // Whenever an asteroid ends a tick beyond the bound, its drift on that
        // axis has just flipped.
        let mut f = field(8, small(FieldParams::combat(), 20));
        let player = Vec3::new(3.0, -2.0, 1.0);
        for tick in 0..4000 {
            let before: Vec<Vec3> = f.states().map(|s| s.move_speed).collect();
            f.update(player, tick as f32 / 60.0);
            for ((actor, state), prev) in f.actors.iter().zip(f.states()).zip(&before) {
                for axis in 0..3 {
                    let outside = (actor.pose.position[axis] - player[axis]).abs() > 80.0;
                    if outside {
                        assert_eq!(state.move_speed[axis], -prev[axis]);
                    } else {
                        assert_eq!(state.move_speed[axis], prev[axis]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_update_sets_shared_time() {
        let mut f = field(9, small(FieldParams::standalone(), 2));
        f.update(Vec3::ZERO, 1.25);
        assert_eq!(f.time, 1.25);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = FieldParams::combat();
        params.placement = Placement::Spherical {
            min_radius: 50.0,
            max_radius: 10.0,
        };
        assert!(params.validate().is_err());

        let mut params = FieldParams::standalone();
        params.bounce_bound = Some(0.0);
        assert!(params.validate().is_err());

        let mut params = FieldParams::combat();
        params.deformation = DeformationProfile::Custom {
            x: -1.0,
            y: 0.0,
            z: 0.0,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_empty_field_allowed() {
        let f = field(10, small(FieldParams::combat(), 0));
        assert!(f.is_empty());
    }
}
