//! # Lifecycle events published by the controller.
//!
//! Every state transition of the timer produces an [`Event`] on the
//! [`Bus`](crate::Bus). Events are observational only; nothing in the
//! controller depends on anyone listening.

use std::time::{Duration, SystemTime};

use crate::record::RecordId;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The timer entered an armed state (delay or recurring phase).
    TimerArmed,
    /// The timer was halted; both pending handles were cancelled.
    TimerDisarmed,
    /// An action invocation was dispatched.
    ActionInvoked,
    /// An action invocation failed; the timer keeps its schedule.
    ActionFailed,
    /// An action returned `false`, stopping the timer.
    ActionHalted,
    /// The effective interval changed via the bound interval attribute.
    IntervalChanged,
    /// A stale timer firing or action result was discarded.
    StaleDropped,
    /// The controller was bound to a different record.
    Rebound,
    /// The controller reached end of life.
    TornDown,
}

/// A single lifecycle event with optional context fields.
#[derive(Debug, Clone)]
pub struct Event {
    /// Kind of transition.
    pub kind: EventKind,
    /// Wall-clock time the event was created.
    pub at: SystemTime,
    /// Action name, where one is involved.
    pub action: Option<String>,
    /// Bound record, where one is involved.
    pub record: Option<RecordId>,
    /// Delay or period associated with the transition.
    pub delay: Option<Duration>,
    /// Error message, for failure events.
    pub error: Option<String>,
}

impl Event {
    /// Creates an event of the given kind stamped with the current time.
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            at: SystemTime::now(),
            action: None,
            record: None,
            delay: None,
            error: None,
        }
    }

    pub fn with_action(mut self, name: impl Into<String>) -> Self {
        self.action = Some(name.into());
        self
    }

    pub fn with_record(mut self, id: RecordId) -> Self {
        self.record = Some(id);
        self
    }

    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }
}
