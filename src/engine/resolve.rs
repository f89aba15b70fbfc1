//! Effective-status resolution.
//!
//! A FAILED outcome masks itself: the effective status falls back to the
//! last UP or DOWN before it. `status` and the idempotency checks in
//! `up`/`down` both go through [`latest_not_failed`].

use crate::model::{Event, Status};

/// The event that determines the current status, if any.
///
/// - empty log: `None`
/// - last event FAILED: the last UP/DOWN event, or `None` if there is none
/// - otherwise: the last event, transient states included
pub fn latest_not_failed(events: &[Event]) -> Option<&Event> {
    let latest = events.last()?;
    if latest.status != Status::Failed {
        return Some(latest);
    }
    events.iter().rev().find(|event| event.status.is_stable())
}
