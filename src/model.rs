//! Core data model.
//!
//! An event records one status the connection entered and when. The event
//! log is the ordered sequence of those events; insertion order is the only
//! ordering the log keeps.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Status of the simulated connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// `up` accepted, outcome pending.
    Starting,
    /// Connection established.
    Up,
    /// `down` accepted, outcome pending.
    Stopping,
    /// Connection torn down.
    Down,
    /// The last transition did not reach its target.
    Failed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Starting,
        Status::Up,
        Status::Stopping,
        Status::Down,
        Status::Failed,
    ];

    /// Upper-case name, as stored and printed.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Starting => "STARTING",
            Status::Up => "UP",
            Status::Stopping => "STOPPING",
            Status::Down => "DOWN",
            Status::Failed => "FAILED",
        }
    }

    /// UP or DOWN: the states a FAILED outcome falls back to.
    pub fn is_stable(self) -> bool {
        matches!(self, Status::Up | Status::Down)
    }

    /// STARTING or STOPPING.
    pub fn is_transient(self) -> bool {
        matches!(self, Status::Starting | Status::Stopping)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A single entry in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub status: Status,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Event {
    pub fn new(status: Status, timestamp: i64) -> Self {
        Self { status, timestamp }
    }

    /// UTC date-time at second precision, e.g. `2024-05-01T12:30:45`.
    pub fn formatted_timestamp(&self) -> String {
        match DateTime::from_timestamp(self.timestamp.div_euclid(1000), 0) {
            Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            None => self.timestamp.to_string(),
        }
    }
}

/// History line: `Status: UP, Timestamp: 2024-05-01T12:30:45`.
impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Status: {}, Timestamp: {}",
            self.status,
            self.formatted_timestamp()
        )
    }
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// On-disk container: `{"events": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}
