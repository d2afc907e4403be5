//! Keyboard state tracker.
//!
//! [`KeyboardState`] accumulates winit [`KeyEvent`]s as they arrive and answers
//! whether a physical key is held. Physical key codes are used so the flight
//! keys sit in the same place on every keyboard layout.
//!
//! Keys winit cannot identify are dropped on arrival; they can never be bound
//! to an action, so tracking them would only grow the pressed set.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is a repeat event.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// A non-repeat press of `code`.
    #[must_use]
    pub fn press(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    /// A release of `code`.
    #[must_use]
    pub fn release(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Tracks held keys using physical key codes.
///
/// Forward every [`KeyEvent`] to [`process_event`](Self::process_event) and
/// query with [`is_pressed`](Self::is_pressed). Nothing is cleared between
/// ticks: a key stays pressed until its release event arrives.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`].
    ///
    /// Returns the key code if the event was a fresh (non-repeat) press, so
    /// callers can react to discrete presses immediately.
    pub fn process_event(&mut self, event: &KeyEvent) -> Option<KeyCode> {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        })
    }

    /// Processes a [`RawKeyEvent`] (platform-independent, test-friendly).
    pub fn process_raw(&mut self, event: RawKeyEvent) -> Option<KeyCode> {
        let PhysicalKey::Code(code) = event.key else {
            tracing::trace!(key = ?event.key, "ignoring unidentified key");
            return None;
        };
        if event.repeat {
            return None;
        }
        match event.state {
            ElementState::Pressed => self.pressed.insert(code).then_some(code),
            ElementState::Released => {
                self.pressed.remove(&code);
                None
            }
        }
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    /// Forget every held key. Used when the window loses focus, since the
    /// matching release events will be delivered elsewhere.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn test_initial_state_no_keys_pressed() {
        let kb = KeyboardState::new();
        for k in [KeyCode::KeyW, KeyCode::ArrowUp, KeyCode::KeyQ, KeyCode::Escape] {
            assert!(!kb.is_pressed(k));
        }
        assert_eq!(kb.pressed_count(), 0);
    }

    #[test]
    fn test_press_event_sets_pressed() {
        let mut kb = KeyboardState::new();
        let fresh = kb.process_raw(RawKeyEvent::press(KeyCode::KeyW));
        assert_eq!(fresh, Some(KeyCode::KeyW));
        assert!(kb.is_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_release_clears_pressed() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyW));
        let fresh = kb.process_raw(RawKeyEvent::release(KeyCode::KeyW));
        assert_eq!(fresh, None);
        assert!(!kb.is_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_multiple_keys_tracked_independently() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyW));
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyD));
        kb.process_raw(RawKeyEvent::release(KeyCode::KeyW));

        assert!(!kb.is_pressed(KeyCode::KeyW));
        assert!(kb.is_pressed(KeyCode::KeyD));
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyA));
        let repeat = kb.process_raw(RawKeyEvent {
            repeat: true,
            ..RawKeyEvent::press(KeyCode::KeyA)
        });
        assert_eq!(repeat, None);
        assert!(kb.is_pressed(KeyCode::KeyA));
    }

    #[test]
    fn test_second_press_without_release_is_not_fresh() {
        let mut kb = KeyboardState::new();
        assert!(kb.process_raw(RawKeyEvent::press(KeyCode::KeyT)).is_some());
        assert!(kb.process_raw(RawKeyEvent::press(KeyCode::KeyT)).is_none());
    }

    #[test]
    fn test_unidentified_key_ignored() {
        let mut kb = KeyboardState::new();
        let result = kb.process_raw(RawKeyEvent {
            key: PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
            state: ElementState::Pressed,
            repeat: false,
        });
        assert_eq!(result, None);
        assert_eq!(kb.pressed_count(), 0);
    }

    #[test]
    fn test_release_all_clears_everything() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::KeyW));
        kb.process_raw(RawKeyEvent::press(KeyCode::ArrowLeft));
        kb.release_all();
        assert_eq!(kb.pressed_count(), 0);
    }
}
