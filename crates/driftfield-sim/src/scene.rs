//! Scene presets and scene construction.
//!
//! A [`ScenePreset`] is plain data describing one of the three scenes. A
//! [`Scene`] is what you get after resolving a preset against a seed and a set
//! of texture paths: generated asteroids, the assembled ship, the starfield
//! shell, their meshes, the shared materials and the textures those materials
//! reference.

use std::path::PathBuf;

use driftfield_mesh::{Mesh, uv_sphere};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, AnimationState, BackdropState, Body, MeshId, Pose, ShipMotion};
use crate::asteroid_field::{AsteroidField, DeformationProfile, FieldParams};
use crate::camera_rig::{CameraMode, CameraPose, CameraRig, PointLight};
use crate::error::SceneError;
use crate::material::{
    Culling, Material, MaterialTable, Shading, TextureBinding, TextureId, TextureList,
};
use crate::spaceship::{ShipBlueprint, player_actor};
use crate::texture_set::TextureSet;

/// Yaw added to the starfield shell every tick in the combat scene.
pub const STARFIELD_SPIN: f32 = 0.0005;

/// The player's ship in a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub blueprint: ShipBlueprint,
    pub motion: ShipMotion,
    pub shading: Shading,
    /// Use only the first `n` ship textures. `None` uses all of them.
    pub texture_limit: Option<usize>,
}

/// The inward-facing sky sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarfieldSpec {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Yaw per tick.
    pub spin: f32,
}

/// Asteroids in a preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub params: FieldParams,
    pub shading: Shading,
}

/// One configuration of the shared scene core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePreset {
    /// Short name used in logs.
    pub name: String,
    pub field: Option<FieldSpec>,
    pub ship: Option<ShipSpec>,
    pub starfield: Option<StarfieldSpec>,
    pub camera: CameraMode,
    /// Camera pose shown before the first tick.
    pub initial_camera: CameraPose,
    /// Light that rides along with the ship.
    pub engine_glow: Option<PointLight>,
}

impl ScenePreset {
    /// Piloted ship in a drifting asteroid field under a starfield.
    pub fn combat() -> Self {
        Self {
            name: "combat".into(),
            field: Some(FieldSpec {
                params: FieldParams::combat(),
                shading: Shading::Asteroid {
                    displacement: 0.005,
                    ambient: 0.4,
                    diffuse: 0.8,
                },
            }),
            ship: Some(ShipSpec {
                blueprint: ShipBlueprint::long_hull(),
                motion: ShipMotion::Piloted,
                shading: Shading::Spaceship {
                    ambient: 0.3,
                    diffuse: 1.0,
                    metallic: 0.8,
                },
                texture_limit: None,
            }),
            starfield: Some(StarfieldSpec {
                radius: 500.0,
                width_segments: 32,
                height_segments: 32,
                spin: STARFIELD_SPIN,
            }),
            camera: CameraMode::Follow(CameraRig::default()),
            initial_camera: CameraPose {
                position: Vec3::new(12.0, 10.0, 10.0),
                target: Vec3::new(0.0, 1.5, 0.0),
            },
            engine_glow: Some(PointLight::engine_glow()),
        }
    }

    /// Tumbling asteroids seen from a fixed camera.
    pub fn field() -> Self {
        let camera = CameraPose::looking_forward(Vec3::new(0.0, 5.0, 10.0));
        Self {
            name: "field".into(),
            field: Some(FieldSpec {
                params: FieldParams::standalone(),
                shading: Shading::Asteroid {
                    displacement: 0.05,
                    ambient: 0.2,
                    diffuse: 1.0,
                },
            }),
            ship: None,
            starfield: None,
            camera: CameraMode::Fixed(camera),
            initial_camera: camera,
            engine_glow: None,
        }
    }

    /// The ship on a turntable.
    pub fn viewer() -> Self {
        let camera = CameraPose::looking_forward(Vec3::new(0.0, 2.0, 8.0));
        Self {
            name: "viewer".into(),
            field: None,
            ship: Some(ShipSpec {
                blueprint: ShipBlueprint::short_hull(),
                motion: ShipMotion::Turntable { rate: 0.01 },
                shading: Shading::Spaceship {
                    ambient: 0.3,
                    diffuse: 1.0,
                    metallic: 0.8,
                },
                texture_limit: Some(3),
            }),
            starfield: None,
            camera: CameraMode::Fixed(camera),
            initial_camera: camera,
            engine_glow: None,
        }
    }

    /// Replace the asteroid count. No-op for presets without asteroids.
    pub fn with_asteroid_count(mut self, count: u32) -> Self {
        if let Some(field) = &mut self.field {
            field.params.count = count;
        }
        self
    }

    /// Replace the bounce distance. No-op for presets without asteroids.
    pub fn with_bounce_bound(mut self, bound: f32) -> Self {
        if let Some(field) = &mut self.field {
            field.params.bounce_bound = Some(bound);
        }
        self
    }

    /// Replace the vertex jitter. No-op for presets without asteroids.
    pub fn with_deformation(mut self, deformation: DeformationProfile) -> Self {
        if let Some(field) = &mut self.field {
            field.params.deformation = deformation;
        }
        self
    }

    /// Replace the starfield spin. No-op for presets without a starfield.
    pub fn with_starfield_spin(mut self, spin: f32) -> Self {
        if let Some(starfield) = &mut self.starfield {
            starfield.spin = spin;
        }
        self
    }
}

/// Texture files a scene can draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTextures {
    /// Spaceship texture cycle, in click order.
    pub ship: Vec<PathBuf>,
    pub asteroid: PathBuf,
    pub starfield: PathBuf,
}

/// A built scene, ready to tick.
#[derive(Debug, Clone)]
pub struct Scene {
    pub preset: ScenePreset,
    pub seed: u64,
    pub materials: MaterialTable,
    pub textures: TextureList,
    pub field: Option<AsteroidField>,
    pub player: Option<Actor>,
    pub backdrop: Option<Actor>,
    /// Ship texture cycle; present whenever the scene has a ship.
    pub ship_textures: Option<TextureSet<TextureId>>,
    /// Geometry for the ship parts and the starfield. Asteroid geometry lives
    /// in the field.
    pub meshes: Vec<(MeshId, Mesh)>,
}

impl Scene {
    /// Resolve `preset` into actors, meshes, materials and textures.
    ///
    /// # Errors
    /// - [`SceneError::InvalidField`] for bad asteroid parameters.
    /// - [`SceneError::EmptyTextureSet`] if the preset has a ship but no ship
    ///   textures are available.
    pub fn build(preset: ScenePreset, seed: u64, textures: &SceneTextures) -> Result<Self, SceneError> {
        let mut materials = MaterialTable::default();
        let mut texture_list = TextureList::default();
        let mut meshes = Vec::new();

        let field = match &preset.field {
            Some(spec) => {
                let texture = texture_list.insert(textures.asteroid.clone());
                let material = materials.insert(Material {
                    name: "asteroid".into(),
                    shading: spec.shading,
                    texture: TextureBinding::Fixed(texture),
                    culling: Culling::Back,
                });
                Some(AsteroidField::generate(seed, spec.params, material)?)
            }
            None => None,
        };

        let (player, ship_textures) = match &preset.ship {
            Some(spec) => {
                let limit = spec.texture_limit.unwrap_or(usize::MAX);
                let ids: Vec<TextureId> = textures
                    .ship
                    .iter()
                    .take(limit)
                    .map(|p| texture_list.insert(p.clone()))
                    .collect();
                let cycle = TextureSet::new(ids)?;
                let material = materials.insert(Material {
                    name: "spaceship".into(),
                    shading: spec.shading,
                    texture: TextureBinding::ShipCycle,
                    culling: Culling::Back,
                });
                let (body, parts) = spec.blueprint.build(material);
                meshes.extend(parts);
                (Some(player_actor(spec.motion, body)), Some(cycle))
            }
            None => (None, None),
        };

        let backdrop = preset.starfield.map(|spec| {
            let texture = texture_list.insert(textures.starfield.clone());
            let material = materials.insert(Material {
                name: "starfield".into(),
                shading: Shading::Unlit,
                texture: TextureBinding::Fixed(texture),
                culling: Culling::Front,
            });
            meshes.push((
                MeshId::Starfield,
                uv_sphere(spec.radius, spec.width_segments, spec.height_segments),
            ));
            Actor {
                pose: Pose::default(),
                animation: AnimationState::Backdrop(BackdropState { spin: spec.spin }),
                body: Body::single(MeshId::Starfield, material),
            }
        });

        tracing::info!(
            preset = %preset.name,
            seed,
            asteroids = field.as_ref().map_or(0, AsteroidField::len),
            ship = player.is_some(),
            textures = texture_list.len(),
            "scene built"
        );

        Ok(Self {
            preset,
            seed,
            materials,
            textures: texture_list,
            field,
            player,
            backdrop,
            ship_textures,
            meshes,
        })
    }

    /// Every mesh in the scene with its id.
    pub fn all_meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        let asteroids = self
            .field
            .iter()
            .flat_map(|f| f.meshes.iter().enumerate())
            .map(|(i, m)| (MeshId::Asteroid(i as u32), m));
        asteroids.chain(self.meshes.iter().map(|(id, m)| (*id, m)))
    }

    /// Every actor, asteroids first.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.field
            .iter()
            .flat_map(|f| f.actors.iter())
            .chain(self.player.iter())
            .chain(self.backdrop.iter())
    }

    /// The player's position, or the origin when there is no ship.
    pub fn player_position(&self) -> Vec3 {
        self.player
            .as_ref()
            .map_or(Vec3::ZERO, |p| p.pose.position)
    }
}
