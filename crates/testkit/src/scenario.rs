//! Frame-by-frame traces of a small scenario.
//!
//! A scenario steps some state a fixed number of frames and captures a
//! serializable snapshot after each one, starting with the initial state.
//! The canonical JSON form (sorted keys) makes traces comparable across runs.

use anyhow::{Context, Result};
use roomkit_core::FrameTick;
use serde::Serialize;
use serde_json::Value;

/// Single snapshot captured at a given frame.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioFrame<S> {
    /// Frame number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Every frame of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioTrace<S> {
    /// Scenario name.
    pub name: String,
    /// Captured frames; `frames[0]` is the initial state.
    pub frames: Vec<ScenarioFrame<S>>,
}

impl<S> ScenarioTrace<S> {
    /// Snapshot after the last frame.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|f| &f.snapshot)
    }
}

impl<S: Serialize> ScenarioTrace<S> {
    /// Pretty JSON with object keys sorted, ending in a newline.
    pub fn to_canonical_json(&self) -> Result<String> {
        canonical_json(self)
    }
}

/// Run `frames` steps over `state`, snapshotting before the first and after each.
pub fn run_scenario<State, Snapshot, StepFn, SnapFn>(
    name: impl Into<String>,
    frames: u64,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> ScenarioTrace<Snapshot>
where
    StepFn: FnMut(FrameTick, &mut State),
    SnapFn: FnMut(FrameTick, &State) -> Snapshot,
{
    let mut captured = Vec::with_capacity(frames as usize + 1);

    let mut tick = FrameTick::ZERO;
    captured.push(ScenarioFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..frames {
        step(tick, &mut state);
        tick = tick.advance(1);
        captured.push(ScenarioFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    ScenarioTrace {
        name: name.into(),
        frames: captured,
    }
}

fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize scenario trace")?;
    let value = canonicalize_value(value);
    let mut s = serde_json::to_string_pretty(&value).context("Failed to format scenario JSON")?;
    s.push('\n');
    Ok(s)
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, canonicalize_value(v));
            }
            Value::Object(out)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}
