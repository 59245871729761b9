use std::collections::HashMap;

use tracing::warn;
use winit::{event::MouseButton, keyboard::KeyCode};

/// Highest numeric selection slot (`Select1` .. `Select9`).
pub const SELECT_SLOTS: u8 = 9;

/// Logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Use the object under the reticle.
    Interact,
    /// Confirm a pending placement.
    Confirm,
    /// Abort a pending placement.
    Cancel,
    /// Grab the object under the cursor (press) and drop it (release).
    Grab,
    /// Pick a placeable prefab by slot (0-based).
    Select(u8),
    /// Spin a held object about its up axis (positive).
    RotateLeft,
    /// Spin a held object about its up axis (negative).
    RotateRight,
    /// Tilt a held object about its right axis (positive).
    RotateUp,
    /// Tilt a held object about its right axis (negative).
    RotateDown,
    /// Pull a held object toward the viewer.
    HoldCloser,
    /// Push a held object away from the viewer.
    HoldFarther,
    /// Walk forward.
    MoveForward,
    /// Walk backward.
    MoveBackward,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
}

/// Physical input bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key.
    Key(KeyCode),
    /// Mouse button.
    Mouse(MouseButton),
}

/// Action-to-input map.
#[derive(Debug, Clone)]
pub struct Bindings {
    map: HashMap<Action, Vec<InputBinding>>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            map: default_bindings().into_iter().collect(),
        }
    }
}

impl Bindings {
    /// Defaults with the given overrides applied.
    ///
    /// Keys are action names (`"Interact"`, `"Select3"`, ...), values are
    /// binding tokens (`"KeyI"`, `"MouseLeft"`, ...). Unknown names are
    /// logged and skipped.
    pub fn with_overrides(overrides: &HashMap<String, Vec<String>>) -> Self {
        let mut bindings = Self::default();
        for (action_name, tokens) in overrides {
            if let Some(action) = parse_action(action_name) {
                bindings.map.insert(action, parse_bindings(tokens));
            } else {
                warn!("Unknown action '{}' in bindings", action_name);
            }
        }
        bindings
    }

    /// Inputs bound to `action`.
    pub fn bindings_for(&self, action: Action) -> &[InputBinding] {
        self.map.get(&action).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

fn default_bindings() -> Vec<(Action, Vec<InputBinding>)> {
    use InputBinding::{Key, Mouse};
    let mut binds = vec![
        (Action::Interact, vec![Key(KeyCode::KeyI)]),
        (Action::Confirm, vec![Mouse(MouseButton::Left)]),
        (
            Action::Cancel,
            vec![Mouse(MouseButton::Right), Key(KeyCode::Escape)],
        ),
        (Action::Grab, vec![Mouse(MouseButton::Left)]),
        (Action::RotateLeft, vec![Key(KeyCode::ArrowLeft)]),
        (Action::RotateRight, vec![Key(KeyCode::ArrowRight)]),
        (Action::RotateUp, vec![Key(KeyCode::ArrowUp)]),
        (Action::RotateDown, vec![Key(KeyCode::ArrowDown)]),
        (Action::HoldCloser, vec![Key(KeyCode::Comma)]),
        (Action::HoldFarther, vec![Key(KeyCode::Period)]),
        (Action::MoveForward, vec![Key(KeyCode::KeyW)]),
        (Action::MoveBackward, vec![Key(KeyCode::KeyS)]),
        (Action::MoveLeft, vec![Key(KeyCode::KeyA)]),
        (Action::MoveRight, vec![Key(KeyCode::KeyD)]),
    ];
    for slot in 0..SELECT_SLOTS {
        if let Some(key) = digit_key(slot + 1) {
            binds.push((Action::Select(slot), vec![Key(key)]));
        }
    }
    binds
}

fn digit_key(digit: u8) -> Option<KeyCode> {
    Some(match digit {
        1 => KeyCode::Digit1,
        2 => KeyCode::Digit2,
        3 => KeyCode::Digit3,
        4 => KeyCode::Digit4,
        5 => KeyCode::Digit5,
        6 => KeyCode::Digit6,
        7 => KeyCode::Digit7,
        8 => KeyCode::Digit8,
        9 => KeyCode::Digit9,
        _ => return None,
    })
}

fn parse_bindings(tokens: &[String]) -> Vec<InputBinding> {
    tokens
        .iter()
        .filter_map(|token| {
            parse_binding(token).or_else(|| {
                warn!("Unknown binding token '{}'; ignoring", token);
                None
            })
        })
        .collect()
}

/// Parse one binding token such as `"KeyE"` or `"MouseRight"`.
pub fn parse_binding(token: &str) -> Option<InputBinding> {
    if let Some(key) = parse_key_code(token) {
        return Some(InputBinding::Key(key));
    }
    match token {
        "MouseLeft" => Some(InputBinding::Mouse(MouseButton::Left)),
        "MouseRight" => Some(InputBinding::Mouse(MouseButton::Right)),
        "MouseMiddle" => Some(InputBinding::Mouse(MouseButton::Middle)),
        _ => None,
    }
}

fn parse_key_code(name: &str) -> Option<KeyCode> {
    if let Some(digit) = name.strip_prefix("Digit") {
        return digit.parse::<u8>().ok().and_then(digit_key);
    }
    Some(match name {
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "KeyQ" => KeyCode::KeyQ,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyI" => KeyCode::KeyI,
        "KeyR" => KeyCode::KeyR,
        "KeyX" => KeyCode::KeyX,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ControlLeft" => KeyCode::ControlLeft,
        "Comma" => KeyCode::Comma,
        "Period" => KeyCode::Period,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        _ => return None,
    })
}

/// Parse an action name such as `"Interact"` or `"Select2"`.
pub fn parse_action(name: &str) -> Option<Action> {
    Some(match name {
        "Interact" => Action::Interact,
        "Confirm" => Action::Confirm,
        "Cancel" => Action::Cancel,
        "Grab" => Action::Grab,
        "RotateLeft" => Action::RotateLeft,
        "RotateRight" => Action::RotateRight,
        "RotateUp" => Action::RotateUp,
        "RotateDown" => Action::RotateDown,
        "HoldCloser" => Action::HoldCloser,
        "HoldFarther" => Action::HoldFarther,
        "MoveForward" => Action::MoveForward,
        "MoveBackward" => Action::MoveBackward,
        "MoveLeft" => Action::MoveLeft,
        "MoveRight" => Action::MoveRight,
        _ => {
            let idx = name.strip_prefix("Select")?.parse::<u8>().ok()?;
            if (1..=SELECT_SLOTS).contains(&idx) {
                Action::Select(idx - 1)
            } else {
                return None;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_interact_to_i() {
        let bindings = Bindings::default();
        assert_eq!(
            bindings.bindings_for(Action::Interact),
            &[InputBinding::Key(KeyCode::KeyI)]
        );
        assert_eq!(
            bindings.bindings_for(Action::Select(1)),
            &[InputBinding::Key(KeyCode::Digit2)]
        );
    }

    #[test]
    fn overrides_replace_defaults_and_skip_unknowns() {
        let mut overrides = HashMap::new();
        overrides.insert("Interact".to_string(), vec!["KeyE".to_string(), "Bogus".to_string()]);
        overrides.insert("Teleport".to_string(), vec!["KeyT".to_string()]);
        let bindings = Bindings::with_overrides(&overrides);
        assert_eq!(
            bindings.bindings_for(Action::Interact),
            &[InputBinding::Key(KeyCode::KeyE)]
        );
    }

    #[test]
    fn select_names_are_one_based() {
        assert_eq!(parse_action("Select1"), Some(Action::Select(0)));
        assert_eq!(parse_action("Select9"), Some(Action::Select(8)));
        assert_eq!(parse_action("Select0"), None);
        assert_eq!(parse_action("Select10"), None);
    }

    #[test]
    fn digit_tokens_parse() {
        assert_eq!(parse_binding("Digit3"), Some(InputBinding::Key(KeyCode::Digit3)));
        assert_eq!(parse_binding("Digit0"), None);
    }
}
