//! The per-tick input snapshot handed to the simulation.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::action_map::Action;

/// Which actions are held and where the pointer is, frozen for one tick.
///
/// The simulation only ever reads this; the event handlers own the trackers
/// it is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    active: BTreeSet<Action>,
    pointer: Vec2,
}

impl InputState {
    /// No actions held, pointer centred.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No actions held, pointer at `pointer` (clamped to `[-1, 1]²`).
    #[must_use]
    pub fn with_pointer(pointer: Vec2) -> Self {
        Self {
            active: BTreeSet::new(),
            pointer: pointer.clamp(Vec2::NEG_ONE, Vec2::ONE),
        }
    }

    /// Builder-style helper for tests and scripted input.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.active.insert(action);
        self
    }

    /// Mark an action held or released.
    pub fn set_active(&mut self, action: Action, active: bool) {
        if active {
            self.active.insert(action);
        } else {
            self.active.remove(&action);
        }
    }

    /// Whether `action` is held.
    #[must_use]
    pub fn is_active(&self, action: Action) -> bool {
        self.active.contains(&action)
    }

    /// Normalized pointer position.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state = InputState::new();
        assert_eq!(state.pointer(), Vec2::ZERO);
        assert!(!state.is_active(Action::Forward));
    }

    #[test]
    fn test_pointer_clamped() {
        let state = InputState::with_pointer(Vec2::new(3.0, -2.0));
        assert_eq!(state.pointer(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_set_and_clear_action() {
        let mut state = InputState::new().with_action(Action::Up);
        assert!(state.is_active(Action::Up));
        state.set_active(Action::Up, false);
        assert!(!state.is_active(Action::Up));
    }
}
