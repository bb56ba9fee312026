use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Whether a key or button event reaches `InputState`. Presses the UI took
/// are dropped; releases always go through so nothing stays held.
pub fn forwards_button(state: ElementState, consumed_by_ui: bool) -> bool {
    state == ElementState::Released || !consumed_by_ui
}

/// Keyboard and mouse state accumulated between two updates.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    mouse_delta: Vec2,
    look_held: bool,
}

impl InputState {
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                if !repeat && self.held.insert(key) {
                    self.pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Right {
            self.look_held = state == ElementState::Pressed;
        }
    }

    pub fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta += Vec2::new(dx as f32, dy as f32);
    }

    /// Drop everything held, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.look_held = false;
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// True only on the update right after the key went down.
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn look_held(&self) -> bool {
        self.look_held
    }

    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once() {
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyT, ElementState::Pressed, false);
        assert!(input.was_pressed(KeyCode::KeyT));
        assert!(input.is_held(KeyCode::KeyT));

        input.end_frame();
        assert!(!input.was_pressed(KeyCode::KeyT));
        assert!(input.is_held(KeyCode::KeyT));

        input.handle_key(KeyCode::KeyT, ElementState::Released, false);
        assert!(!input.is_held(KeyCode::KeyT));
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyF, ElementState::Pressed, false);
        input.end_frame();
        input.handle_key(KeyCode::KeyF, ElementState::Pressed, true);
        assert!(!input.was_pressed(KeyCode::KeyF));
    }

    #[test]
    fn mouse_delta_accumulates_until_end_frame() {
        let mut input = InputState::default();
        input.handle_mouse_motion(2.0, 1.0);
        input.handle_mouse_motion(3.0, -4.0);
        assert_eq!(input.mouse_delta(), Vec2::new(5.0, -3.0));
        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn right_button_drives_look() {
        let mut input = InputState::default();
        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(!input.look_held());
        input.handle_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(input.look_held());
        input.release_all();
        assert!(!input.look_held());
    }

    #[test]
    fn releases_pass_even_when_the_ui_took_them() {
        assert!(forwards_button(ElementState::Pressed, false));
        assert!(!forwards_button(ElementState::Pressed, true));
        assert!(forwards_button(ElementState::Released, true));

        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed, false);
        input.handle_mouse_button(MouseButton::Right, ElementState::Pressed);
        input.handle_key(KeyCode::KeyW, ElementState::Released, false);
        input.handle_mouse_button(MouseButton::Right, ElementState::Released);
        assert!(!input.is_held(KeyCode::KeyW));
        assert!(!input.look_held());
    }
}
