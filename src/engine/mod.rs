//! Transition engine.
//!
//! Executes `up`, `down` and `status` against an event store. Each
//! non-idempotent `up`/`down` appends exactly two events: the transient
//! STARTING/STOPPING event, then the drawn terminal outcome.

pub mod outcome;
pub mod resolve;

use std::io::Write;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::history::HistoryQuery;
use crate::model::{Event, Status};
use crate::storage::EventStore;
use crate::telemetry::transition::{record_state_transition, start_transition_span};

pub use outcome::{
    Clock, FixedOutcome, ManualClock, OutcomeSource, RandomOutcome, ScriptedOutcome, SystemClock,
};
pub use resolve::latest_not_failed;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a transition goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Status reached on success.
    pub fn target(self) -> Status {
        match self {
            Direction::Up => Status::Up,
            Direction::Down => Status::Down,
        }
    }

    /// Transient status written before the outcome.
    pub fn intermediate(self) -> Status {
        match self {
            Direction::Up => Status::Starting,
            Direction::Down => Status::Stopping,
        }
    }

    pub fn command(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    fn progress_message(self) -> &'static str {
        match self {
            Direction::Up => "Starting...",
            Direction::Down => "Stopping...",
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Result of an `up`/`down` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReport {
    /// Resolved status was already the target; nothing was written.
    AlreadyInState(Status),
    /// Two events were appended.
    Transitioned {
        direction: Direction,
        outcome: Status,
    },
}

impl TransitionReport {
    /// User-facing lines, in the order they describe the writes.
    pub fn lines(&self) -> Vec<String> {
        match self {
            TransitionReport::AlreadyInState(status) => vec![format!("Already {status}")],
            TransitionReport::Transitioned { direction, outcome } => vec![
                direction.progress_message().to_string(),
                format!("Status: {outcome}"),
            ],
        }
    }
}

impl std::fmt::Display for TransitionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Result of a `status` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReport {
    NoEvents,
    Current {
        status: Status,
        /// Whole seconds since the resolved UP event; `None` unless UP.
        uptime_secs: Option<i64>,
    },
}

impl StatusReport {
    pub fn lines(&self) -> Vec<String> {
        match self {
            StatusReport::NoEvents => vec!["No events found".to_string()],
            StatusReport::Current {
                status,
                uptime_secs,
            } => {
                let mut lines = vec![format!("Status: {status}")];
                if let Some(secs) = uptime_secs {
                    lines.push(format!("Uptime: {secs} seconds"));
                }
                lines
            }
        }
    }
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the store plus the clock and outcome source transitions draw from.
pub struct Engine {
    store: Box<dyn EventStore>,
    clock: Box<dyn Clock>,
    outcomes: Box<dyn OutcomeSource>,
}

impl Engine {
    /// Engine on the system clock with coin-flip outcomes.
    pub fn new(store: impl EventStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            clock: Box::new(SystemClock),
            outcomes: Box::new(RandomOutcome),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_outcomes(mut self, outcomes: impl OutcomeSource + 'static) -> Self {
        self.outcomes = Box::new(outcomes);
        self
    }

    /// The full log, in insertion order.
    pub fn events(&self) -> Result<Vec<Event>> {
        self.store.load()
    }

    /// The latest not-failed event.
    pub fn current(&self) -> Result<Option<Event>> {
        let events = self.store.load()?;
        let current = latest_not_failed(&events).copied();
        if let Some(event) = current.filter(|event| event.status.is_transient()) {
            warn!(
                status = %event.status,
                timestamp = event.timestamp,
                "last transition was interrupted before reaching an outcome"
            );
        }
        Ok(current)
    }

    pub fn status(&self) -> Result<StatusReport> {
        let Some(event) = self.current()? else {
            return Ok(StatusReport::NoEvents);
        };

        let uptime_secs = (event.status == Status::Up)
            .then(|| (self.clock.now_ms() - event.timestamp).max(0) / 1000);

        Ok(StatusReport::Current {
            status: event.status,
            uptime_secs,
        })
    }

    /// `up` without echoing progress.
    pub fn up(&mut self) -> Result<TransitionReport> {
        self.transition(Direction::Up, &mut std::io::sink())
    }

    /// `down` without echoing progress.
    pub fn down(&mut self) -> Result<TransitionReport> {
        self.transition(Direction::Down, &mut std::io::sink())
    }

    /// Move toward `direction`'s target unless already there.
    ///
    /// Each message is written to `out` right after the event it
    /// describes has been persisted.
    pub fn transition(
        &mut self,
        direction: Direction,
        out: &mut dyn Write,
    ) -> Result<TransitionReport> {
        let span = start_transition_span(direction.command());
        let target = direction.target();

        let current = self.current()?;
        if current.is_some_and(|event| event.status == target) {
            span.in_scope(|| debug!(status = %target, "already in target state"));
            let report = TransitionReport::AlreadyInState(target);
            writeln!(out, "{report}")?;
            return Ok(report);
        }

        let outcome = if self.outcomes.transition_succeeds() {
            target
        } else {
            Status::Failed
        };

        let intermediate = direction.intermediate();
        self.store.append(Event::new(intermediate, self.clock.now_ms()))?;
        writeln!(out, "{}", direction.progress_message())?;
        self.store.append(Event::new(outcome, self.clock.now_ms()))?;
        writeln!(out, "Status: {outcome}")?;

        let from = current.map_or("NONE", |event| event.status.as_str());
        record_state_transition(&span, from, outcome.as_str());
        if outcome == Status::Failed {
            span.in_scope(|| info!(command = direction.command(), "transition failed"));
        }

        Ok(TransitionReport::Transitioned { direction, outcome })
    }

    /// Run a history query against the current log.
    pub fn history(&self, query: &HistoryQuery) -> Result<Vec<Event>> {
        let filter = query.parse()?;
        let events = self.store.load()?;
        Ok(filter.apply(&events))
    }
}
