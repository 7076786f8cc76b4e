//! # Timer state, exclusively owned by the controller.
//!
//! One [`TimerState`] exists per binding. Nothing outside the controller
//! mutates it; the host only observes [`Phase`] through accessors.

use std::time::Duration;

use crate::scheduler::TimerHandle;
use crate::subscriptions::SubHandle;

/// Where the timer currently is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// No record bound, or firing disabled.
    Idle,
    /// Waiting out the first-interval (or one-shot) delay.
    ArmedDelay,
    /// Steady-state recurring timer active.
    ArmedRecurring,
    /// Explicitly halted; record still bound.
    Stopped,
}

impl Phase {
    /// True in the armed phases.
    pub fn is_running(&self) -> bool {
        matches!(self, Phase::ArmedDelay | Phase::ArmedRecurring)
    }
}

/// Mutable state of one bound timer.
pub(crate) struct TimerState<R> {
    /// Bound record, `None` when idle.
    pub record: Option<R>,
    pub phase: Phase,
    /// At most one outstanding one-shot delay.
    pub delay: Option<TimerHandle>,
    /// At most one outstanding recurring timer.
    pub repeating: Option<TimerHandle>,
    /// Active change subscriptions for the current binding (0..=3).
    pub subs: Vec<SubHandle>,
    /// Current effective period; starts at the configured interval.
    pub interval: Duration,
    /// Binding generation; bumped when the record identity changes and at
    /// teardown. Stale action results are detected against this.
    pub epoch: u64,
    pub torn_down: bool,
}

impl<R> TimerState<R> {
    pub fn new(interval: Duration) -> Self {
        Self {
            record: None,
            phase: Phase::Idle,
            delay: None,
            repeating: None,
            subs: Vec::new(),
            interval,
            epoch: 0,
            torn_down: false,
        }
    }
}
