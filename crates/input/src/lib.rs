#![warn(missing_docs)]
//! Input handling: raw window events, action bindings and the per-frame
//! [`FrameInput`] snapshot the interaction systems poll.

mod bindings;
mod processor;

use std::collections::HashSet;
use std::hash::Hash;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

pub use bindings::{parse_action, parse_binding, Action, Bindings, InputBinding, SELECT_SLOTS};
pub use processor::{FrameInput, InputProcessor, ManipulationKeys};

/// Held buttons plus the edges seen since the last [`InputState::begin_frame`].
#[derive(Debug, Clone)]
struct ButtonSet<T> {
    held: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T> Default for ButtonSet<T> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> ButtonSet<T> {
    /// OS auto-repeat re-sends presses for held buttons; only the first counts.
    fn press(&mut self, button: T) {
        if self.held.insert(button) {
            self.pressed.insert(button);
        }
    }

    fn release(&mut self, button: T) {
        if self.held.remove(&button) {
            self.released.insert(button);
        }
    }

    fn set(&mut self, button: T, state: ElementState) {
        match state {
            ElementState::Pressed => self.press(button),
            ElementState::Released => self.release(button),
        }
    }

    fn clear_edges(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

/// Raw device state accumulated between frames.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys: ButtonSet<KeyCode>,
    mouse: ButtonSet<MouseButton>,
    /// Cursor position in window pixels, (0, 0) top-left.
    pub cursor: (f32, f32),
    /// Accumulated raw mouse motion.
    pub mouse_delta: (f64, f64),
    /// Accumulated wheel movement in lines.
    pub mouse_wheel_delta: f32,
}

impl InputState {
    /// Empty state: nothing held, cursor at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a window event into the state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.keys.set(*code, *state),
            WindowEvent::MouseInput { state, button, .. } => self.mouse.set(*button, *state),
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse_wheel_delta += match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    // Roughly one line per 100 px on touchpads.
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
            }
            _ => {}
        }
    }

    /// Fold raw mouse motion into `mouse_delta`.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.mouse_delta.0 += dx;
            self.mouse_delta.1 += dy;
        }
    }

    /// Register a key press.
    pub fn press_key(&mut self, key: KeyCode) {
        self.keys.press(key);
    }

    /// Register a key release.
    pub fn release_key(&mut self, key: KeyCode) {
        self.keys.release(key);
    }

    /// Register a mouse button press.
    pub fn press_mouse(&mut self, button: MouseButton) {
        self.mouse.press(button);
    }

    /// Register a mouse button release.
    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse.release(button);
    }

    /// Drop edges and deltas once the frame has consumed them.
    pub fn begin_frame(&mut self) {
        self.keys.clear_edges();
        self.mouse.clear_edges();
        self.mouse_delta = (0.0, 0.0);
        self.mouse_wheel_delta = 0.0;
    }

    /// Whether `key` is held.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys.held.contains(&key)
    }

    /// Whether `key` went down since the last `begin_frame`.
    pub fn key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed.contains(&key)
    }

    /// Whether `key` came up since the last `begin_frame`.
    pub fn key_just_released(&self, key: KeyCode) -> bool {
        self.keys.released.contains(&key)
    }

    /// Whether `button` is held.
    pub fn mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse.held.contains(&button)
    }

    /// Whether `button` went down since the last `begin_frame`.
    pub fn mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse.pressed.contains(&button)
    }

    /// Whether `button` came up since the last `begin_frame`.
    pub fn mouse_button_just_released(&self, button: MouseButton) -> bool {
        self.mouse.released.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_in_one_frame_report_both_edges() {
        let mut input = InputState::new();
        input.press_mouse(MouseButton::Left);
        input.release_mouse(MouseButton::Left);
        assert!(input.mouse_button_just_pressed(MouseButton::Left));
        assert!(input.mouse_button_just_released(MouseButton::Left));
        assert!(!input.mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn key_edges_fire_once() {
        let mut input = InputState::new();
        input.press_key(KeyCode::KeyI);
        assert!(input.key_just_pressed(KeyCode::KeyI));

        input.begin_frame();
        input.press_key(KeyCode::KeyI); // auto-repeat
        assert!(input.key_pressed(KeyCode::KeyI));
        assert!(!input.key_just_pressed(KeyCode::KeyI));

        input.release_key(KeyCode::KeyI);
        assert!(input.key_just_released(KeyCode::KeyI));
        assert!(!input.key_pressed(KeyCode::KeyI));
    }

    #[test]
    fn releasing_unpressed_button_is_not_an_edge() {
        let mut input = InputState::new();
        input.release_mouse(MouseButton::Left);
        assert!(!input.mouse_button_just_released(MouseButton::Left));
    }

    #[test]
    fn begin_frame_resets_deltas() {
        let mut input = InputState::new();
        input.mouse_delta = (10.0, 20.0);
        input.mouse_wheel_delta = 5.0;
        input.press_mouse(MouseButton::Right);

        input.begin_frame();

        assert_eq!(input.mouse_delta, (0.0, 0.0));
        assert_eq!(input.mouse_wheel_delta, 0.0);
        assert!(!input.mouse_button_just_pressed(MouseButton::Right));
        assert!(input.mouse_button_pressed(MouseButton::Right));
    }
}
