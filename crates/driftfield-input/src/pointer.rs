//! Pointer (mouse cursor) state.
//!
//! winit reports the cursor in physical pixels. The camera rig wants a
//! normalized coordinate with x growing right and y growing up, both in
//! `[-1, 1]`, so the pixel position is converted as soon as it arrives.

use glam::Vec2;
use winit::event::{ElementState, MouseButton};

/// Convert a pixel position into normalized pointer coordinates.
///
/// `(0, 0)` is the window centre, `(-1, 1)` the top-left corner and `(1, -1)`
/// the bottom-right corner. Positions outside the window (winit reports them
/// while a button is held) are clamped. Returns `None` for a zero-sized window.
#[must_use]
pub fn normalize_pointer(px: f64, py: f64, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 {
        return None;
    }
    let x = (px / f64::from(width)) * 2.0 - 1.0;
    let y = -(py / f64::from(height)) * 2.0 + 1.0;
    Some(Vec2::new(x as f32, y as f32).clamp(Vec2::NEG_ONE, Vec2::ONE))
}

/// Cursor position and button state for one window.
#[derive(Debug, Clone)]
pub struct PointerState {
    pixel: Vec2,
    window_size: (u32, u32),
    normalized: Vec2,
    buttons: [bool; 3],
    clicks: u32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl PointerState {
    /// Creates a pointer centred in a window of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixel: Vec2::new(width as f32 * 0.5, height as f32 * 0.5),
            window_size: (width, height),
            normalized: Vec2::ZERO,
            buttons: [false; 3],
            clicks: 0,
        }
    }

    /// Process a `CursorMoved` event.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.pixel = Vec2::new(x as f32, y as f32);
        self.renormalize();
    }

    /// Process a `Resized` event. The pixel position is kept and reinterpreted
    /// against the new size.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        self.renormalize();
    }

    /// Process a `MouseInput` event.
    ///
    /// Returns `true` when the event is a press, i.e. a discrete click.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        let Some(idx) = button_index(button) else {
            return false;
        };
        let pressed = state == ElementState::Pressed;
        self.buttons[idx] = pressed;
        if pressed {
            self.clicks = self.clicks.saturating_add(1);
        }
        pressed
    }

    fn renormalize(&mut self) {
        let (w, h) = self.window_size;
        if let Some(n) = normalize_pointer(f64::from(self.pixel.x), f64::from(self.pixel.y), w, h)
        {
            self.normalized = n;
        }
    }

    /// Normalized pointer position in `[-1, 1]²`.
    #[must_use]
    pub fn normalized(&self) -> Vec2 {
        self.normalized
    }

    /// Last cursor position in physical pixels.
    #[must_use]
    pub fn pixel(&self) -> Vec2 {
        self.pixel
    }

    /// Whether a mouse button is currently held.
    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|idx| self.buttons[idx])
    }

    /// Total number of presses seen so far.
    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.clicks
    }
}

fn button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}
