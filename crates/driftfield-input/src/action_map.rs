//! Action mapping: binds flight actions to physical keys and mouse buttons.
//!
//! [`InputMap`] holds the binding table and can be edited from the config
//! file's `keybindings` section. [`ActionResolver`] reads the keyboard and
//! pointer trackers and produces the [`InputState`] snapshot for a tick.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::input_state::InputState;
use crate::keyboard::KeyboardState;
use crate::pointer::PointerState;

/// Serde helper module for [`KeyCode`] which doesn't implement serde natively.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    /// Serialize a [`KeyCode`] as its debug string (e.g., `"KeyW"`).
    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    /// Deserialize a [`KeyCode`] from its debug string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::parse_key_code(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Parse a key name as written in config files (the `KeyCode` variant name).
#[must_use]
pub fn parse_key_code(s: &str) -> Option<KeyCode> {
    Some(match s {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ControlLeft" => KeyCode::ControlLeft,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        _ => return None,
    })
}

/// Things the player can do.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Fly towards -Z.
    Forward,
    /// Fly towards +Z.
    Back,
    /// Fly towards -X.
    Left,
    /// Fly towards +X.
    Right,
    /// Climb (+Y).
    Up,
    /// Descend (-Y).
    Down,
    /// Switch the spaceship to its next texture.
    CycleTexture,
    /// Close the window.
    Quit,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 8] = [
        Action::Forward,
        Action::Back,
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::CycleTexture,
        Action::Quit,
    ];

    /// Parse the action name used in config files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| format!("{a:?}") == name)
    }
}

/// Wrapper for [`winit::event::MouseButton`] that supports serde.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MouseButtonBinding {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

impl MouseButtonBinding {
    /// The bindable button for a winit button; `None` for back/forward/other.
    #[must_use]
    pub fn from_winit(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::Left),
            MouseButton::Right => Some(Self::Right),
            MouseButton::Middle => Some(Self::Middle),
            _ => None,
        }
    }

    /// Convert to the winit [`MouseButton`] type.
    #[must_use]
    pub fn to_winit(self) -> MouseButton {
        match self {
            Self::Left => MouseButton::Left,
            Self::Right => MouseButton::Right,
            Self::Middle => MouseButton::Middle,
        }
    }
}

/// A physical input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputBinding {
    /// A keyboard key (physical scan code).
    Key(#[serde(with = "keycode_serde")] KeyCode),
    /// A mouse button.
    MouseButton(MouseButtonBinding),
}

impl InputBinding {
    /// Parse a binding name: a key code name or `MouseLeft`/`MouseRight`/`MouseMiddle`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "MouseLeft" => Some(Self::MouseButton(MouseButtonBinding::Left)),
            "MouseRight" => Some(Self::MouseButton(MouseButtonBinding::Right)),
            "MouseMiddle" => Some(Self::MouseButton(MouseButtonBinding::Middle)),
            other => parse_key_code(other).map(Self::Key),
        }
    }
}

/// Maps [`Action`]s to lists of [`InputBinding`]s.
///
/// Any binding being held activates the action. Serializable to RON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputMap {
    /// The binding table.
    pub bindings: HashMap<Action, Vec<InputBinding>>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::default_flight()
    }
}

impl InputMap {
    /// Create an empty input map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Flight bindings: WASD or arrows on the horizontal plane, Q/E vertical,
    /// left click cycles textures, Escape quits.
    #[must_use]
    pub fn default_flight() -> Self {
        use InputBinding::Key;

        let mut bindings = HashMap::new();
        bindings.insert(Action::Forward, vec![Key(KeyCode::KeyW), Key(KeyCode::ArrowUp)]);
        bindings.insert(Action::Back, vec![Key(KeyCode::KeyS), Key(KeyCode::ArrowDown)]);
        bindings.insert(Action::Left, vec![Key(KeyCode::KeyA), Key(KeyCode::ArrowLeft)]);
        bindings.insert(Action::Right, vec![Key(KeyCode::KeyD), Key(KeyCode::ArrowRight)]);
        bindings.insert(Action::Up, vec![Key(KeyCode::KeyQ)]);
        bindings.insert(Action::Down, vec![Key(KeyCode::KeyE)]);
        bindings.insert(
            Action::CycleTexture,
            vec![InputBinding::MouseButton(MouseButtonBinding::Left)],
        );
        bindings.insert(Action::Quit, vec![Key(KeyCode::Escape)]);

        Self { bindings }
    }

    /// Set the bindings for an action, replacing any existing ones.
    pub fn set_bindings(&mut self, action: Action, bindings: Vec<InputBinding>) {
        self.bindings.insert(action, bindings);
    }

    /// Get the bindings for an action.
    #[must_use]
    pub fn get_bindings(&self, action: Action) -> &[InputBinding] {
        self.bindings.get(&action).map_or(&[], |v| v.as_slice())
    }

    /// Whether `binding` triggers `action`.
    #[must_use]
    pub fn binds(&self, action: Action, binding: InputBinding) -> bool {
        self.get_bindings(action).contains(&binding)
    }

    /// Apply `action name -> binding name` overrides from the config file.
    ///
    /// Each recognised entry replaces that action's bindings with the single
    /// named binding. Unknown actions or keys are skipped with a warning and
    /// returned so callers can report them.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut rejected = Vec::new();
        for (action_name, binding_name) in overrides {
            match (
                Action::from_name(action_name),
                InputBinding::parse(binding_name),
            ) {
                (Some(action), Some(binding)) => self.set_bindings(action, vec![binding]),
                _ => {
                    tracing::warn!(
                        action = %action_name,
                        binding = %binding_name,
                        "ignoring unrecognised keybinding override"
                    );
                    rejected.push(action_name.clone());
                }
            }
        }
        rejected.sort();
        rejected
    }

    /// Serialize to RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON string.
    ///
    /// # Errors
    /// Returns an error if the RON string is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

/// Reads the trackers and builds the per-tick [`InputState`].
pub struct ActionResolver;

impl ActionResolver {
    /// Snapshot the currently active actions and the pointer.
    #[must_use]
    pub fn resolve(
        input_map: &InputMap,
        keyboard: &KeyboardState,
        pointer: &PointerState,
    ) -> InputState {
        let mut state = InputState::with_pointer(pointer.normalized());
        for (action, bindings) in &input_map.bindings {
            if bindings
                .iter()
                .any(|b| Self::is_binding_held(*b, keyboard, pointer))
            {
                state.set_active(*action, true);
            }
        }
        state
    }

    fn is_binding_held(
        binding: InputBinding,
        keyboard: &KeyboardState,
        pointer: &PointerState,
    ) -> bool {
        match binding {
            InputBinding::Key(code) => keyboard.is_pressed(code),
            InputBinding::MouseButton(btn) => pointer.is_button_pressed(btn.to_winit()),
        }
    }
}
