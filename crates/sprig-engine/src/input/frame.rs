use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{Key, MouseButton};

/// Per-frame input transitions.
///
/// `InputState` holds what is down right now; `InputFrame` holds what changed
/// since the last frame. The runtime clears it after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys that went down this frame (key-repeat excluded).
    pub keys_pressed: HashSet<Key>,

    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,

    pub buttons_released: HashSet<MouseButton>,

    /// Relative pointer motion accumulated over the frame, in logical pixels.
    pub pointer_delta: Vec2,
}

impl InputFrame {
    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    #[inline]
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_delta = Vec2::ZERO;
    }
}
