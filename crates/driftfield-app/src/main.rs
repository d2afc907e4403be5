//! `driftfield`: fly a spaceship through a procedural asteroid field.

use clap::Parser;
use driftfield_app::{AppError, PlatformDirs, run, setup};
use driftfield_config::{CliArgs, Config};
use driftfield_sim::{SimulationClock, TickDriver};
use tracing::info;

fn main() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let mut dirs = PlatformDirs::resolve()?;
    if let Some(config_dir) = args.config_dir.clone() {
        dirs = dirs.with_config_dir(config_dir);
    }
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args);

    driftfield_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "driftfield starting");

    let seed = setup::choose_seed(&config);
    info!(seed, scene = ?config.scene.kind, "building scene");
    let scene = setup::build_scene(&config, seed)?;
    let driver = TickDriver::new(scene, SimulationClock::default());

    run(config, driver)
}
