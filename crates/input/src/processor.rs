use crate::bindings::{Action, Bindings, InputBinding, SELECT_SLOTS};
use crate::InputState;

/// Signals for held-object manipulation, one flag per key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManipulationKeys {
    /// Yaw, positive direction.
    pub rotate_left: bool,
    /// Yaw, negative direction.
    pub rotate_right: bool,
    /// Pitch, positive direction.
    pub rotate_up: bool,
    /// Pitch, negative direction.
    pub rotate_down: bool,
    /// Shorten the hold distance.
    pub closer: bool,
    /// Lengthen the hold distance.
    pub farther: bool,
}

impl ManipulationKeys {
    /// Whether any flag is set.
    pub fn any(&self) -> bool {
        self.rotate_left
            || self.rotate_right
            || self.rotate_up
            || self.rotate_down
            || self.closer
            || self.farther
    }
}

/// Everything the interaction systems read from input for one frame.
///
/// Edge signals are true only on the frame the transition happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Interact pressed this frame.
    pub interact: bool,
    /// Confirm pressed this frame.
    pub confirm: bool,
    /// Cancel pressed this frame.
    pub cancel: bool,
    /// Selection slot pressed this frame (lowest slot wins).
    pub select: Option<usize>,
    /// Grab pressed this frame.
    pub grab_pressed: bool,
    /// Grab released this frame.
    pub grab_released: bool,
    /// Manipulation keys pressed this frame.
    pub pressed: ManipulationKeys,
    /// Manipulation keys released this frame.
    pub released: ManipulationKeys,
    /// Cursor position in window pixels.
    pub cursor: (f32, f32),
    /// Scroll wheel delta this frame.
    pub scroll: f32,
    /// Movement axis (right, forward), each in [-1, 1].
    pub move_axis: (f32, f32),
    /// Mouse look delta this frame.
    pub look_delta: (f32, f32),
}

/// Turns raw [`InputState`] into [`FrameInput`] through [`Bindings`].
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: Bindings,
}

impl InputProcessor {
    /// Processor using `bindings`.
    pub fn new(bindings: Bindings) -> Self {
        Self { bindings }
    }

    /// Sample the current frame.
    pub fn process(&self, state: &InputState) -> FrameInput {
        FrameInput {
            interact: self.triggered(Action::Interact, state),
            confirm: self.triggered(Action::Confirm, state),
            cancel: self.triggered(Action::Cancel, state),
            select: (0..SELECT_SLOTS)
                .find(|&slot| self.triggered(Action::Select(slot), state))
                .map(usize::from),
            grab_pressed: self.triggered(Action::Grab, state),
            grab_released: self.released(Action::Grab, state),
            pressed: self.manipulation(state, Self::triggered),
            released: self.manipulation(state, Self::released),
            cursor: state.cursor,
            scroll: state.mouse_wheel_delta,
            move_axis: (
                self.axis(Action::MoveRight, Action::MoveLeft, state),
                self.axis(Action::MoveForward, Action::MoveBackward, state),
            ),
            look_delta: (state.mouse_delta.0 as f32, state.mouse_delta.1 as f32),
        }
    }

    fn manipulation(
        &self,
        state: &InputState,
        edge: fn(&Self, Action, &InputState) -> bool,
    ) -> ManipulationKeys {
        ManipulationKeys {
            rotate_left: edge(self, Action::RotateLeft, state),
            rotate_right: edge(self, Action::RotateRight, state),
            rotate_up: edge(self, Action::RotateUp, state),
            rotate_down: edge(self, Action::RotateDown, state),
            closer: edge(self, Action::HoldCloser, state),
            farther: edge(self, Action::HoldFarther, state),
        }
    }

    fn axis(&self, positive: Action, negative: Action, state: &InputState) -> f32 {
        (self.active(positive, state) as i32 - self.active(negative, state) as i32) as f32
    }

    fn active(&self, action: Action, state: &InputState) -> bool {
        self.bindings
            .bindings_for(action)
            .iter()
            .any(|binding| match binding {
                InputBinding::Key(code) => state.key_pressed(*code),
                InputBinding::Mouse(btn) => state.mouse_button_pressed(*btn),
            })
    }

    fn triggered(&self, action: Action, state: &InputState) -> bool {
        self.bindings
            .bindings_for(action)
            .iter()
            .any(|binding| match binding {
                InputBinding::Key(code) => state.key_just_pressed(*code),
                InputBinding::Mouse(btn) => state.mouse_button_just_pressed(*btn),
            })
    }

    fn released(&self, action: Action, state: &InputState) -> bool {
        self.bindings
            .bindings_for(action)
            .iter()
            .any(|binding| match binding {
                InputBinding::Key(code) => state.key_just_released(*code),
                InputBinding::Mouse(btn) => state.mouse_button_just_released(*btn),
            })
    }
}
