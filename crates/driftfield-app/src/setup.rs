//! Turning a loaded [`Config`] into a built [`Scene`].

use driftfield_config::{Config, SceneKind};
use driftfield_render::RenderSettings;
use driftfield_sim::{DeformationProfile, Scene, SceneError, ScenePreset, SceneTextures};

/// The preset for `config.scene.kind` with the config's overrides applied.
pub fn preset_from_config(config: &Config) -> ScenePreset {
    let scene = &config.scene;
    let mut preset = match scene.kind {
        SceneKind::Combat => ScenePreset::combat(),
        SceneKind::Field => ScenePreset::field(),
        SceneKind::Viewer => ScenePreset::viewer(),
    };
    if let Some(count) = scene.asteroid_count {
        preset = preset.with_asteroid_count(count);
    }
    if let Some(bound) = scene.bounce_bound {
        preset = preset.with_bounce_bound(bound);
    }
    if let Some([x, y, z]) = scene.deformation {
        preset = preset.with_deformation(DeformationProfile::Custom { x, y, z });
    }
    if let Some(spin) = scene.starfield_spin {
        preset = preset.with_starfield_spin(spin);
    }
    preset
}

/// Texture paths resolved against the asset root.
pub fn scene_textures(config: &Config) -> SceneTextures {
    let assets = &config.assets;
    SceneTextures {
        ship: assets
            .spaceship_textures
            .iter()
            .map(|t| assets.resolve(t))
            .collect(),
        asteroid: assets.resolve(&assets.asteroid_texture),
        starfield: assets.resolve(&assets.starfield_texture),
    }
}

/// The configured seed, or a fresh random one.
pub fn choose_seed(config: &Config) -> u64 {
    config.scene.seed.unwrap_or_else(rand::random)
}

pub fn build_scene(config: &Config, seed: u64) -> Result<Scene, SceneError> {
    Scene::build(preset_from_config(config), seed, &scene_textures(config))
}

pub fn render_settings(config: &Config) -> RenderSettings {
    let render = &config.render;
    RenderSettings {
        fov_degrees: render.fov_degrees,
        near: render.near,
        far: render.far,
        clear_color: render.clear_color,
    }
}
