//! Runs one scene tick at a time in a fixed order.

use driftfield_input::InputState;

use crate::actor::AnimationState;
use crate::camera_rig::{CameraPose, PointLight};
use crate::clock::SimulationClock;
use crate::frame::{FrameLighting, FrameSnapshot, key_light_direction};
use crate::material::TextureId;
use crate::scene::Scene;
use crate::spaceship::SpaceshipController;

/// Lifecycle of a [`TickDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Built, no tick yet.
    Uninitialized,
    /// Ticking. There is no way back.
    Running,
}

/// Owns a scene and steps it.
///
/// Each tick: advance the clock, move the ship, place the camera and the
/// engine glow, move the asteroids, spin the starfield.
#[derive(Debug)]
pub struct TickDriver {
    scene: Scene,
    clock: SimulationClock,
    controller: SpaceshipController,
    camera: CameraPose,
    glow: Option<PointLight>,
    state: DriverState,
}

impl TickDriver {
    pub fn new(scene: Scene, clock: SimulationClock) -> Self {
        let camera = scene.preset.initial_camera;
        let glow = scene.preset.engine_glow.map(|mut light| {
            light.position = scene.player_position();
            light
        });
        Self {
            scene,
            clock,
            controller: SpaceshipController::default(),
            camera,
            glow,
            state: DriverState::Uninitialized,
        }
    }

    /// Enter `Running`. Later calls do nothing.
    pub fn start(&mut self) {
        if self.state == DriverState::Uninitialized {
            self.state = DriverState::Running;
            tracing::info!(preset = %self.scene.preset.name, "simulation running");
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    /// Run one tick against a frozen input snapshot.
    pub fn tick(&mut self, input: &InputState) {
        self.start();
        let elapsed = self.clock.advance();

        if let Some(player) = &mut self.scene.player {
            self.controller.update(player, input);
        }
        let player_position = self.scene.player_position();

        self.camera = self.scene.preset.camera.pose(player_position, input.pointer());
        if let Some(glow) = &mut self.glow {
            glow.position = player_position;
        }

        if let Some(field) = &mut self.scene.field {
            let bounced = field.update(player_position, elapsed);
            if bounced > 0 {
                tracing::trace!(bounced, "asteroids reflected");
            }
        }

        if let Some(backdrop) = &mut self.scene.backdrop
            && let AnimationState::Backdrop(state) = backdrop.animation
        {
            backdrop.pose.rotation.y += state.spin;
        }
    }

    /// Advance the ship texture cycle. Returns the new texture, or `None`
    /// when the scene has no ship.
    pub fn on_click(&mut self) -> Option<TextureId> {
        let cycle = self.scene.ship_textures.as_mut()?;
        let next = *cycle.advance();
        tracing::debug!(cursor = cycle.cursor(), texture = next.0, "ship texture changed");
        Some(next)
    }

    /// Everything the renderer needs for the current state.
    pub fn snapshot(&self) -> FrameSnapshot {
        let mut frame = FrameSnapshot {
            camera: self.camera,
            lighting: FrameLighting {
                key_direction: key_light_direction(),
                point: self.glow,
            },
            time: self.scene.field.as_ref().map_or(self.clock.elapsed(), |f| f.time),
            draws: Vec::new(),
            ship_texture: self.scene.ship_textures.as_ref().map(|c| *c.current()),
        };
        for actor in self.scene.actors() {
            frame.push_actor(actor);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use driftfield_input::Action;
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::actor::MeshId;
    use crate::scene::{ScenePreset, SceneTextures};

    fn textures() -> SceneTextures {
        SceneTextures {
            ship: vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg"), PathBuf::from("c.jpg")],
            asteroid: PathBuf::from("rock.jpg"),
            starfield: PathBuf::from("dust.jpg"),
        }
    }

    fn driver(preset: ScenePreset) -> TickDriver {
        let scene = Scene::build(preset, 7, &textures()).unwrap();
        TickDriver::new(scene, SimulationClock::default())
    }

    #[test]
    fn test_starts_uninitialized_then_runs() {
        let mut d = driver(ScenePreset::viewer());
        assert_eq!(d.state(), DriverState::Uninitialized);
        d.tick(&InputState::new());
        assert_eq!(d.state(), DriverState::Running);
        d.start();
        assert_eq!(d.state(), DriverState::Running);
    }

    #[test]
    fn test_initial_camera_until_first_tick() {
        let mut d = driver(ScenePreset::combat().with_asteroid_count(3));
        assert_eq!(d.camera().position, Vec3::new(12.0, 10.0, 10.0));
        d.tick(&InputState::new());
        assert_eq!(d.camera().position, Vec3::new(0.0, 8.0, 12.0));
        assert_eq!(d.camera().target, Vec3::ZERO);
    }

    #[test]
    fn test_camera_and_glow_follow_moved_player() {
        let mut d = driver(ScenePreset::combat().with_asteroid_count(3));
        let input = InputState::with_pointer(Vec2::ZERO).with_action(Action::Back);
        d.tick(&input);
        let player = d.scene().player_position();
        assert_eq!(player, Vec3::new(0.0, 0.0, 0.3));
        assert_eq!(d.camera().position, player + Vec3::new(0.0, 8.0, 12.0));
        let frame = d.snapshot();
        assert_eq!(frame.lighting.point.map(|l| l.position), Some(player));
    }

    #[test]
    fn test_asteroids_bounce_against_moved_player() {
        let mut d = driver(ScenePreset::combat().with_asteroid_count(10).with_bounce_bound(30.0));
        let input = InputState::new().with_action(Action::Forward);
        for _ in 0..600 {
            let before: Vec<Vec3> = d
                .scene()
                .field
                .as_ref()
                .unwrap()
                .states()
                .map(|s| s.move_speed)
                .collect();
            d.tick(&input);
            let player = d.scene().player_position();
            let field = d.scene().field.as_ref().unwrap();
            for ((actor, state), prev) in field.actors.iter().zip(field.states()).zip(&before) {
                for axis in 0..3 {
                    let outside = (actor.pose.position[axis] - player[axis]).abs() > 30.0;
                    assert_eq!(state.move_speed[axis] == -prev[axis] && prev[axis] != 0.0, outside);
                }
            }
        }
    }

    #[test]
    fn test_starfield_spins() {
        let mut d = driver(ScenePreset::combat().with_asteroid_count(0));
        for _ in 0..100 {
            d.tick(&InputState::new());
        }
        let backdrop = d.scene().backdrop.as_ref().unwrap();
        assert!((backdrop.pose.rotation.y - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_time_uniform_is_clock() {
        let mut d = driver(ScenePreset::field());
        for _ in 0..30 {
            d.tick(&InputState::new());
        }
        let frame = d.snapshot();
        assert!((frame.time - 0.5).abs() < 1e-6);
        assert_eq!(frame.time, d.clock().elapsed());
    }

    #[test]
    fn test_click_cycles_and_wraps() {
        let mut d = driver(ScenePreset::combat().with_asteroid_count(0));
        let first = d.snapshot().ship_texture;
        let len = d.scene().ship_textures.as_ref().unwrap().len();
        let mut seen = Vec::new();
        for _ in 0..len {
            seen.push(d.on_click());
        }
        assert_eq!(d.snapshot().ship_texture, first);
        assert_eq!(seen.last().copied().flatten(), first);
        assert_ne!(seen[0], first);
    }

    #[test]
    fn test_click_without_ship() {
        let mut d = driver(ScenePreset::field());
        assert_eq!(d.on_click(), None);
        assert_eq!(d.snapshot().ship_texture, None);
    }

    #[test]
    fn test_snapshot_draws_every_part() {
        let d = driver(ScenePreset::combat().with_asteroid_count(5));
        let frame = d.snapshot();
        assert_eq!(frame.draws.len(), 5 + 4 + 1);
        assert!(frame.draws.iter().any(|i| i.mesh == MeshId::Starfield));
        assert!(frame.lighting.key_direction.is_normalized());
    }

    #[test]
    fn test_field_camera_is_fixed() {
        let mut d = driver(ScenePreset::field());
        d.tick(&InputState::with_pointer(Vec2::new(0.9, -0.4)));
        assert_eq!(d.camera().position, Vec3::new(0.0, 5.0, 10.0));
    }

    #[test]
    fn test_viewer_turntable() {
        let mut d = driver(ScenePreset::viewer());
        for _ in 0..50 {
            d.tick(&InputState::new().with_action(Action::Left));
        }
        let ship = d.scene().player.as_ref().unwrap();
        assert_eq!(ship.pose.position, Vec3::ZERO);
        assert!((ship.pose.rotation.y - 0.5).abs() < 1e-4);
    }
}
