//! JSONL transcript writer for workflow runs.
//!
//! A transcript file may hold several runs. Each logger opens the file in
//! append mode and frames its run with a `run_start` header and a `run_end`
//! trailer. Every [`RunEvent`] in between becomes one JSON line carrying the
//! run id and the milliseconds elapsed since the run started.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use swarm_application::{RunEvent, RunLogger};
use tracing::{debug, warn};

static RUN_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// JSONL run logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Writes the `run_end` trailer
/// and flushes on `Drop`.
pub struct JsonlRunLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    run_id: String,
    started_at: DateTime<Utc>,
    events: AtomicUsize,
}

impl JsonlRunLogger {
    /// Start a new run in the transcript at the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist and
    /// appends otherwise. Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        let started_at = Utc::now();
        let run_id = format!(
            "run-{}-{}",
            started_at.format("%Y%m%dT%H%M%S%3fZ"),
            RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        );
        let logger = Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            run_id,
            started_at,
            events: AtomicUsize::new(0),
        };
        logger.write_line(&json!({
            "type": "run_start",
            "run_id": logger.run_id,
            "timestamp": rfc3339(started_at),
            "pid": std::process::id(),
        }));
        debug!("Transcript {} started {}", path.display(), logger.run_id);
        Some(logger)
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier stamped on every record of this run.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn write_line(&self, record: &Value) {
        let Ok(line) = serde_json::to_string(record) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // A crashed run still leaves a readable transcript.
            let _ = writer.flush();
        }
    }

    /// Merge `type`, `run_id`, `timestamp` and `elapsed_ms` into an object
    /// payload; wrap anything else under `data`.
    fn to_record(&self, event: RunEvent) -> Value {
        let elapsed_ms = (event.timestamp - self.started_at).num_milliseconds().max(0);
        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), json!(event.event_type));
        map.insert("run_id".to_string(), json!(self.run_id));
        map.insert("timestamp".to_string(), json!(rfc3339(event.timestamp)));
        map.insert("elapsed_ms".to_string(), json!(elapsed_ms));
        Value::Object(map)
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl RunLogger for JsonlRunLogger {
    fn log(&self, event: RunEvent) {
        self.events.fetch_add(1, Ordering::Relaxed);
        self.write_line(&self.to_record(event));
    }
}

impl Drop for JsonlRunLogger {
    fn drop(&mut self) {
        let finished_at = Utc::now();
        self.write_line(&json!({
            "type": "run_end",
            "run_id": self.run_id,
            "timestamp": rfc3339(finished_at),
            "duration_ms": (finished_at - self.started_at).num_milliseconds().max(0),
            "events": self.events.load(Ordering::Relaxed),
        }));
    }
}
