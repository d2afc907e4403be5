//! Configuration system for driftfield.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and tolerate missing or unknown fields so older config files
//! keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, Config, DebugConfig, InputConfig, RenderConfig, SceneConfig, SceneKind,
    WindowConfig,
};
pub use error::ConfigError;
