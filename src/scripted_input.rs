use anyhow::Context;
use glam::Vec3;
use roomkit_input::{parse_binding, InputBinding, InputState};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::warn;

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptedStep {
    duration: f32,
    /// Binding tokens pressed when the step begins.
    #[serde(default)]
    press: Vec<String>,
    /// Binding tokens released when the step begins.
    #[serde(default)]
    release: Vec<String>,
    #[serde(default)]
    cursor: Option<[f32; 2]>,
    /// Wheel delta applied every frame of the step.
    #[serde(default)]
    scroll: f32,
    /// Point the camera turns to when the step begins.
    #[serde(default)]
    look_at: Option<[f32; 3]>,
    /// Yaw/pitch rates in radians per second.
    #[serde(default)]
    look_x: f32,
    #[serde(default)]
    look_y: f32,
}

/// Camera changes requested by the script for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScriptedView {
    pub look_at: Option<Vec3>,
    /// Yaw and pitch deltas for this frame, radians.
    pub look_delta: (f32, f32),
}

pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f32,
    started: bool,
    finished: bool,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse input script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
            started: false,
            finished: false,
        })
    }

    /// Whether the last step has run its full duration.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt`, applying the edges of every step entered to `input`.
    pub fn advance(&mut self, dt: f32, input: &mut InputState) -> ScriptedView {
        let mut view = ScriptedView::default();
        if self.steps.is_empty() {
            return view;
        }

        if !self.started {
            self.started = true;
            self.enter(0, input, &mut view);
        } else if !self.finished {
            self.time_in_step += dt;
            while self.time_in_step >= self.steps[self.index].duration {
                self.time_in_step -= self.steps[self.index].duration;
                if self.index + 1 < self.steps.len() {
                    self.index += 1;
                    self.enter(self.index, input, &mut view);
                } else {
                    self.time_in_step = 0.0;
                    self.finished = true;
                    break;
                }
            }
        }

        if let Some(step) = self.steps.get(self.index).filter(|_| !self.finished) {
            input.mouse_wheel_delta += step.scroll;
            view.look_delta = (step.look_x * dt, step.look_y * dt);
        }
        view
    }

    fn enter(&self, index: usize, input: &mut InputState, view: &mut ScriptedView) {
        let Some(step) = self.steps.get(index) else {
            return;
        };
        for token in &step.press {
            match parse_binding(token) {
                Some(InputBinding::Key(key)) => input.press_key(key),
                Some(InputBinding::Mouse(button)) => input.press_mouse(button),
                None => warn!(token = %token, step = index, "unknown binding in input script"),
            }
        }
        for token in &step.release {
            match parse_binding(token) {
                Some(InputBinding::Key(key)) => input.release_key(key),
                Some(InputBinding::Mouse(button)) => input.release_mouse(button),
                None => warn!(token = %token, step = index, "unknown binding in input script"),
            }
        }
        if let Some([x, y]) = step.cursor {
            input.cursor = (x, y);
        }
        if let Some([x, y, z]) = step.look_at {
            view.look_at = Some(Vec3::new(x, y, z));
        }
    }
}
