//! # Result Recorder
//!
//! Persists computed events: one `(category, input, output)` row per completed
//! sub-calculation. The log is append-only. Rows are never updated or
//! deleted, and there is no read path in the engine.
//!
//! Recording is best-effort. A failed append is reported back as a
//! [`StorageError`], but the emissions figure it was recording stays valid.
//!
//! ## Implementations
//!
//! - [`NoopRecorder`] - discards every event (the default)
//! - [`MemoryRecorder`] - keeps events in memory, for tests and embedding
//! - [`EventLog`] - JSON Lines file, one event per line
//!
//! ## File Format
//!
//! ```text
//! {"id":"...","category":"air_travel_emissions","input_data":1000.0,"output_emissions":440.0,"recorded_at":"..."}
//! {"id":"...","category":"train_travel_emissions","input_data":0.0,"output_emissions":0.0,"recorded_at":"..."}
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use footprint_core::recorder::{EventLog, ResultRecorder};
//! use std::path::Path;
//!
//! let log = EventLog::open(Path::new("computed_events.jsonl"))?;
//! log.record("air_travel_emissions", 1000.0, 440.0)?;
//! # Ok::<(), footprint_core::errors::StorageError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{StorageError, StorageResult};

/// One persisted sub-calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedEvent {
    pub id: Uuid,

    /// Event category, e.g. `air_travel_emissions`
    pub category: String,

    /// The quantity the calculation consumed (distance, weight, calories)
    #[serde(rename = "input_data", alias = "input_value")]
    pub input_value: f64,

    /// Resulting kg CO2e
    pub output_emissions: f64,

    pub recorded_at: DateTime<Utc>,
}

impl ComputedEvent {
    pub fn new(category: impl Into<String>, input_value: f64, output_emissions: f64) -> Self {
        ComputedEvent {
            id: Uuid::new_v4(),
            category: category.into(),
            input_value,
            output_emissions,
            recorded_at: Utc::now(),
        }
    }
}

/// Sink for computed events.
///
/// Each call is an independent, immediately committed append.
pub trait ResultRecorder: Send + Sync {
    fn record(&self, category: &str, input_value: f64, output_emissions: f64) -> StorageResult<()>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl ResultRecorder for NoopRecorder {
    fn record(&self, _category: &str, _input_value: f64, _output_emissions: f64) -> StorageResult<()> {
        Ok(())
    }
}

/// Keeps events in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    events: Mutex<Vec<ComputedEvent>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far
    pub fn events(&self) -> Vec<ComputedEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.events.lock() {
            Ok(events) => events.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultRecorder for MemoryRecorder {
    fn record(&self, category: &str, input_value: f64, output_emissions: f64) -> StorageResult<()> {
        let mut events = self.events.lock().map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        events.push(ComputedEvent::new(category, input_value, output_emissions));
        Ok(())
    }
}

/// Append-only JSON Lines event log.
///
/// Every append opens the file in append mode, takes an exclusive OS lock
/// (via fs2) so concurrent writers cannot interleave lines, writes one line,
/// syncs, and unlocks.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Open (creating if needed) an event log at `path`.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::file_error("create directory", parent.display().to_string(), e.to_string())
                })?;
            }
        }

        open_for_append(path)?;
        debug!("Event log ready at {}", path.display());

        Ok(EventLog {
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &ComputedEvent) -> StorageResult<()> {
        let mut line = serde_json::to_string(event).map_err(|e| StorageError::SerializationError {
            reason: e.to_string(),
        })?;
        line.push('\n');

        let mut file = open_for_append(&self.path)?;

        file.lock_exclusive().map_err(|e| {
            StorageError::file_error("lock", self.path.display().to_string(), e.to_string())
        })?;

        let written = file
            .write_all(line.as_bytes())
            .and_then(|_| file.sync_data())
            .map_err(|e| StorageError::file_error("append", self.path.display().to_string(), e.to_string()));

        // Also released on close
        if let Err(e) = file.unlock() {
            debug!("Failed to unlock {}: {}", self.path.display(), e);
        }

        written
    }
}

impl ResultRecorder for EventLog {
    fn record(&self, category: &str, input_value: f64, output_emissions: f64) -> StorageResult<()> {
        let event = ComputedEvent::new(category, input_value, output_emissions);
        self.append(&event)?;
        info!(
            "Recorded {} event: input={} output={}",
            event.category, event.input_value, event.output_emissions
        );
        Ok(())
    }
}

fn open_for_append(path: &Path) -> StorageResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::file_error("open", path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::sync::Arc;
    use std::thread;

    fn temp_log_path(name: &str) -> PathBuf {
        temp_dir().join(format!("footprint_test_{}_{}.jsonl", name, std::process::id()))
    }

    fn read_events(path: &Path) -> Vec<ComputedEvent> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_serialization_uses_storage_column_names() {
        let event = ComputedEvent::new("air_travel_emissions", 1000.0, 440.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"input_data\":1000.0"));
        assert!(json.contains("\"output_emissions\":440.0"));

        let roundtrip: ComputedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, roundtrip);
    }

    #[test]
    fn test_memory_recorder_keeps_order() {
        let recorder = MemoryRecorder::new();
        recorder.record("air_travel_emissions", 10.0, 4.4).unwrap();
        recorder.record("train_travel_emissions", 0.0, 0.0).unwrap();

        let categories: Vec<_> = recorder.events().into_iter().map(|e| e.category).collect();
        assert_eq!(categories, ["air_travel_emissions", "train_travel_emissions"]);
        assert_eq!(recorder.len(), 2);
        assert!(!recorder.is_empty());
    }

    #[test]
    fn test_event_log_appends_lines() {
        let path = temp_log_path("append");
        let _ = fs::remove_file(&path);

        let log = EventLog::open(&path).unwrap();
        log.record("air_travel_emissions", 1000.0, 440.0).unwrap();
        log.record("car_travel_emissions", 0.0, 0.0).unwrap();

        let events = read_events(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].category, "air_travel_emissions");
        assert_eq!(events[0].input_value, 1000.0);
        assert_eq!(events[1].output_emissions, 0.0);
        assert_ne!(events[0].id, events[1].id);

        // Reopening never truncates
        let reopened = EventLog::open(&path).unwrap();
        reopened.record("train_travel_emissions", 5.0, 0.36).unwrap();
        assert_eq!(read_events(&path).len(), 3);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_event_log_creates_parent_directory() {
        let dir = temp_dir().join(format!("footprint_test_dir_{}", std::process::id()));
        let path = dir.join("events.jsonl");
        let _ = fs::remove_dir_all(&dir);

        let log = EventLog::open(&path).unwrap();
        assert!(log.path().exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let path = temp_log_path("concurrent");
        let _ = fs::remove_file(&path);
        let log = Arc::new(EventLog::open(&path).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for j in 0..10 {
                        log.record("car_travel_emissions", (i * 10 + j) as f64, 1.0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(read_events(&path).len(), 40);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_open_fails_on_directory() {
        let err = EventLog::open(&temp_dir()).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
