//! Event store.
//!
//! The log is persisted as a whole on every write. There is no locking:
//! two processes appending at once can lose an update.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::model::{Event, EventLog};

/// Load/save of the full event sequence.
pub trait EventStore {
    /// Return the full log, creating an empty one if none exists yet.
    fn load(&self) -> Result<Vec<Event>>;

    /// Replace the persisted log with `events`.
    fn save(&self, events: &[Event]) -> Result<()>;

    /// Read-modify-write: load, push `event`, save.
    fn append(&self, event: Event) -> Result<()> {
        let mut events = self.load()?;
        events.push(event);
        self.save(&events)
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// Event store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the log with `.tmp` appended to the full file name.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_log(&self, log: &EventLog) -> Result<()> {
        let temp_path = self.temp_path();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(&temp_path)?;
        serde_json::to_writer(&mut file, log)?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl EventStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Event>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "event log missing, creating empty log");
            self.write_log(&EventLog::default())?;
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let log: EventLog = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), events = log.events.len(), "event log loaded");
        Ok(log.events)
    }

    fn save(&self, events: &[Event]) -> Result<()> {
        self.write_log(&EventLog::new(events.to_vec()))?;
        debug!(path = %self.path.display(), events = events.len(), "event log saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory (for testing)
// ---------------------------------------------------------------------------

/// Event store that lives only as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RefCell<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RefCell::new(events),
        }
    }
}

impl EventStore for MemoryStore {
    fn load(&self) -> Result<Vec<Event>> {
        Ok(self.events.borrow().clone())
    }

    fn save(&self, events: &[Event]) -> Result<()> {
        *self.events.borrow_mut() = events.to_vec();
        Ok(())
    }
}
