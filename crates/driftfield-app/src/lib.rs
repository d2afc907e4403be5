//! The driftfield application shell: window, event loop, fixed-step game loop
//! and the glue from config to a running scene.

pub mod error;
pub mod game_loop;
pub mod platform;
pub mod setup;
pub mod window;

pub use error::AppError;
pub use game_loop::{FIXED_DT, GameLoop, MAX_FRAME_TIME};
pub use platform::{PlatformDirs, PlatformError};
pub use window::{AppState, run};
