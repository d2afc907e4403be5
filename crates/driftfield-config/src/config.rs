//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Which scene to run and how to generate it.
    pub scene: SceneConfig,
    /// Texture asset locations.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Background clear color (linear RGBA).
    pub clear_color: [f64; 4],
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name), e.g. `"Forward": "KeyI"`.
    pub keybindings: HashMap<String, String>,
}

/// The three scene layouts the binary can run.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum,
)]
pub enum SceneKind {
    /// Piloted spaceship inside a drifting asteroid field.
    #[default]
    Combat,
    /// Standalone field of slowly tumbling asteroids.
    Field,
    /// Spaceship on a turntable.
    Viewer,
}

/// Scene generation settings.
///
/// `None` fields fall back to the defaults of the chosen [`SceneKind`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene layout to run.
    pub kind: SceneKind,
    /// Seed for asteroid generation. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Number of asteroids to generate.
    pub asteroid_count: Option<u32>,
    /// Per-axis distance from the player at which asteroid drift reflects.
    pub bounce_bound: Option<f32>,
    /// Per-axis vertex jitter spans for asteroid deformation, `[x, y, z]`.
    pub deformation: Option<[f32; 3]>,
    /// Starfield yaw increment per tick, in radians.
    pub starfield_spin: Option<f32>,
}

/// Texture asset locations, relative to `root`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory all other asset paths are resolved against.
    pub root: PathBuf,
    /// Spaceship textures, cycled by clicking.
    pub spaceship_textures: Vec<String>,
    /// Texture shared by every asteroid.
    pub asteroid_texture: String,
    /// Texture painted on the inside of the starfield shell.
    pub starfield_texture: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "driftfield".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            spaceship_textures: vec![
                "model/texture/random.jpg".to_string(),
                "model/texture/spaceship-yellow.jpg".to_string(),
                "model/texture/spaceship-blue2.jpg".to_string(),
                "model/texture/random1.jpg".to_string(),
            ],
            asteroid_texture: "model/texture/spaceship-yellow.jpg".to_string(),
            starfield_texture: "texture/space-dust.jpg".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl AssetConfig {
    /// Resolve an asset-relative path against [`AssetConfig::root`].
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file: returns `Some(new_config)` if it changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
