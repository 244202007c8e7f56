use std::collections::HashSet;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Current input state for the game window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Absolute pointer position in logical pixels; `None` outside the window.
    pub pointer_pos: Option<Vec2>,

    /// Keys currently held.
    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies `ev` to the held state and records transitions into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Release events are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(pos) => {
                if let Some(prev) = self.pointer_pos {
                    frame.pointer_delta += pos - prev;
                }
                self.pointer_pos = Some(pos);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, repeat } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(key) && !repeat {
                        frame.keys_pressed.insert(key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        frame.buttons_released.insert(button);
                    }
                }
            },
        }
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True when any of `keys` is held.
    pub fn any_down(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn press_is_reported_once_while_held() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::Space, ButtonState::Pressed));
        assert!(f.key_pressed(Key::Space));
        assert!(s.key_down(Key::Space));

        f.clear();
        s.apply_event(&mut f, InputEvent::Key { key: Key::Space, state: ButtonState::Pressed, repeat: true });
        assert!(!f.key_pressed(Key::Space));
        assert!(s.key_down(Key::Space));
    }

    #[test]
    fn release_clears_held_and_reports() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::A, ButtonState::Pressed));
        f.clear();
        s.apply_event(&mut f, key(Key::A, ButtonState::Released));

        assert!(!s.key_down(Key::A));
        assert!(f.key_released(Key::A));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::ArrowLeft, ButtonState::Pressed));
        s.apply_event(&mut f, InputEvent::PointerButton { button: MouseButton::Left, state: ButtonState::Pressed });
        s.apply_event(&mut f, InputEvent::Focused(false));

        assert!(!s.any_down(&[Key::ArrowLeft]));
        assert!(!s.button_down(MouseButton::Left));
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_motion_accumulates_relative_delta() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::PointerMoved(Vec2::new(10.0, 10.0)));
        assert_eq!(f.pointer_delta, Vec2::ZERO);

        s.apply_event(&mut f, InputEvent::PointerMoved(Vec2::new(13.0, 8.0)));
        s.apply_event(&mut f, InputEvent::PointerMoved(Vec2::new(14.0, 9.0)));
        assert_eq!(f.pointer_delta, Vec2::new(4.0, -1.0));
        assert_eq!(s.pointer_pos, Some(Vec2::new(14.0, 9.0)));

        f.clear();
        assert_eq!(f.pointer_delta, Vec2::ZERO);
    }

    #[test]
    fn reentering_pointer_has_no_jump() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::PointerMoved(Vec2::new(0.0, 0.0)));
        s.apply_event(&mut f, InputEvent::PointerLeft);
        s.apply_event(&mut f, InputEvent::PointerMoved(Vec2::new(100.0, 50.0)));

        assert_eq!(f.pointer_delta, Vec2::ZERO);
    }
}
