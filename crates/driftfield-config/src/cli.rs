//! Command-line argument parsing for driftfield.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, SceneKind};

/// driftfield command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "driftfield", about = "Fly a spaceship through a procedural asteroid field")]
pub struct CliArgs {
    /// Scene to run.
    #[arg(long, value_enum)]
    pub scene: Option<SceneKind>,

    /// Seed for asteroid generation.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of asteroids.
    #[arg(long)]
    pub asteroids: Option<u32>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Directory texture paths are resolved against.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory holding `config.ron` (overrides the platform default).
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(kind) = args.scene {
            self.scene.kind = kind;
        }
        if let Some(seed) = args.seed {
            self.scene.seed = Some(seed);
        }
        if let Some(count) = args.asteroids {
            self.scene.asteroid_count = Some(count);
        }
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref root) = args.assets {
            self.assets.root = root.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            scene: Some(SceneKind::Field),
            seed: Some(7),
            width: Some(1920),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.scene.kind, SceneKind::Field);
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.window.width, 1920);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.scene.asteroid_count, None);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_scene_value() {
        let args =
            CliArgs::try_parse_from(["driftfield", "--scene", "viewer", "--asteroids", "5"])
                .unwrap();
        assert_eq!(args.scene, Some(SceneKind::Viewer));
        assert_eq!(args.asteroids, Some(5));
    }

    #[test]
    fn test_cli_rejects_unknown_scene() {
        let result = CliArgs::try_parse_from(["driftfield", "--scene", "planet"]);
        assert!(result.is_err());
    }
}
