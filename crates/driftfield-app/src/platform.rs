//! Per-user directories for the config file and logs.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

const APP_NAME: &str = "driftfield";

/// Where `config.ron` and `driftfield.log` live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// `dirs::config_dir()/driftfield`, with logs in a `logs` subdirectory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::with_root(&base))
    }

    /// Lay the directories out under `root` instead of the OS location.
    pub fn with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            log_dir: app_dir.join("logs"),
            config_dir: app_dir,
        }
    }

    /// Keep the log directory but read config from `config_dir`.
    pub fn with_config_dir(mut self, config_dir: PathBuf) -> Self {
        self.config_dir = config_dir;
        self
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}
