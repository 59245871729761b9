#![warn(missing_docs)]
//! Headless testing surfaces: JSONL event logs and frame-by-frame scenario traces.

mod scenario;

use anyhow::{Context, Result};
use roomkit_core::FrameTick;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use scenario::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Frame when the event occurred.
    pub tick: FrameTick,
    /// Short kind label (`"interact"`, `"placed"`, ...).
    pub kind: &'a str,
    /// Free-form payload.
    pub payload: &'a str,
}

/// Owned form of [`EventRecord`], as read back from a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Frame when the event occurred.
    pub tick: FrameTick,
    /// Short kind label.
    pub kind: String,
    /// Free-form payload.
    pub payload: String,
}

impl From<&EventRecord<'_>> for RecordedEvent {
    fn from(event: &EventRecord<'_>) -> Self {
        Self {
            tick: event.tick,
            kind: event.kind.to_string(),
            payload: event.payload.to_string(),
        }
    }
}

/// Anything that accepts event records.
pub trait EventSink {
    /// Append an event.
    fn write(&mut self, event: &EventRecord<'_>) -> Result<()>;
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        tracing::debug!(path = %path.display(), "opened event log");
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

impl EventSink for JsonlSink {
    fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// A sink that keeps events in memory, for assertions.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<RecordedEvent>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Kinds of the recorded events, in order.
    pub fn kinds(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.kind.as_str()).collect()
    }
}

impl EventSink for MemorySink {
    fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        self.events.push(event.into());
        Ok(())
    }
}

/// Parse a JSONL event log back into records.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedEvent>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event log {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Bad event on line {} of {}", index + 1, path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "roomkit-{name}-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn jsonl_sink_round_trips_through_reader() {
        let path = temp_path("events").join("log.jsonl");
        {
            let mut sink = JsonlSink::create(&path).expect("sink create");
            sink.write(&EventRecord {
                tick: FrameTick(3),
                kind: "interact",
                payload: "#4",
            })
            .unwrap();
            sink.write(&EventRecord {
                tick: FrameTick(9),
                kind: "placed",
                payload: "Chair",
            })
            .unwrap();
            sink.flush().unwrap();
        }

        let events = read_jsonl(&path).expect("log readable");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tick, FrameTick(3));
        assert_eq!(events[1].kind, "placed");
        assert_eq!(events[1].payload, "Chair");
    }

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        for kind in ["grab", "release"] {
            sink.write(&EventRecord {
                tick: FrameTick::ZERO,
                kind,
                payload: "",
            })
            .unwrap();
        }
        assert_eq!(sink.kinds(), vec!["grab", "release"]);
    }
}
