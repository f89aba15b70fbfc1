//! Injectable sources of randomness and time.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::Rng;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Decides whether a transition reaches its target or ends FAILED.
pub trait OutcomeSource {
    fn transition_succeeds(&mut self) -> bool;
}

/// Coin flip on the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOutcome;

impl OutcomeSource for RandomOutcome {
    fn transition_succeeds(&mut self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Always the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub bool);

impl FixedOutcome {
    pub fn success() -> Self {
        Self(true)
    }

    pub fn failure() -> Self {
        Self(false)
    }
}

impl OutcomeSource for FixedOutcome {
    fn transition_succeeds(&mut self) -> bool {
        self.0
    }
}

/// Replays a fixed sequence of answers, then keeps succeeding.
#[derive(Debug, Default, Clone)]
pub struct ScriptedOutcome {
    script: VecDeque<bool>,
}

impl ScriptedOutcome {
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl OutcomeSource for ScriptedOutcome {
    fn transition_succeeds(&mut self) -> bool {
        self.script.pop_front().unwrap_or(true)
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Wall clock in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_outcome_replays_then_succeeds() {
        let mut outcomes = ScriptedOutcome::new([false, true, false]);
        let drawn: Vec<bool> = (0..5).map(|_| outcomes.transition_succeeds()).collect();
        assert_eq!(drawn, vec![false, true, false, true, true]);
    }

    #[test]
    fn random_outcome_produces_both_answers() {
        let mut outcomes = RandomOutcome;
        let drawn: Vec<bool> = (0..200).map(|_| outcomes.transition_succeeds()).collect();
        assert!(drawn.contains(&true));
        assert!(drawn.contains(&false));
    }
}
