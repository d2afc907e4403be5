//! Input handling: keyboard and pointer trackers fed by winit events, an
//! action map binding physical inputs to flight actions, and the per-tick
//! [`InputState`] snapshot the simulation reads.

pub mod action_map;
pub mod input_state;
pub mod keyboard;
pub mod pointer;

pub use action_map::{Action, ActionResolver, InputBinding, InputMap, MouseButtonBinding};
pub use input_state::InputState;
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use pointer::{PointerState, normalize_pointer};
