//! # Timer controller: the state machine at the heart of the crate.
//!
//! One [`TimerController`] owns one logical repeating-or-one-shot timer bound
//! to a single external record, and keeps the timer's running state and
//! period synchronized with that record's attributes.
//!
//! ```text
//!            bind(Some)                 delay elapses
//!   Idle ───────────────► ArmedDelay ───────────────► ArmedRecurring
//!    ▲                        │    \ (once)                 │
//!    │ bind(None)/teardown    │     ▼                       │ status=false /
//!    │                        │   Stopped ◄─────────────────┘ action → false
//!    │                        │      │
//!    └────────────────────────┴──────┘ status=true → arm() from the top
//! ```
//!
//! Every operation here is synchronous: timers and action completions are
//! scheduled, never awaited. The host (or the crate's
//! [`TimerDriver`](crate::TimerDriver)) delivers elapsed timers, change
//! notifications, and action results back in, strictly one at a time.
//!
//! Stale callbacks are detected rather than assumed away: timer firings must
//! match a pending [`TimerHandle`](crate::TimerHandle), action results must
//! carry the current binding epoch. Everything else is dropped with a
//! [`EventKind::StaleDropped`] event.

use crate::bus::Bus;
use crate::config::TimerConfig;
use crate::error::ActionError;
use crate::event::{Event, EventKind};
use crate::invoker::{ActionInvoker, ActionTicket};
use crate::record::{Record, RecordId};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::state::{Phase, TimerState};
use crate::subscriptions::{Notification, SubTarget, Subscriptions};

/// Sequences timer firings into action invocations for one bound record.
///
/// All collaborators are constructor-injected so the controller runs
/// identically against a host platform, the tokio driver, or a virtual clock
/// in tests.
pub struct TimerController<R, S, U, A> {
    cfg: TimerConfig,
    state: TimerState<R>,
    scheduler: S,
    subs: U,
    invoker: A,
    bus: Bus,
    seq: u64,
}

impl<R, S, U, A> TimerController<R, S, U, A>
where
    R: Record,
    S: Scheduler,
    U: Subscriptions,
    A: ActionInvoker,
{
    /// Creates an idle controller with no record bound.
    pub fn new(cfg: TimerConfig, scheduler: S, subscriptions: U, invoker: A, bus: Bus) -> Self {
        let interval = cfg.interval;
        Self {
            cfg,
            state: TimerState::new(interval),
            scheduler,
            subs: subscriptions,
            invoker,
            bus,
            seq: 0,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// True while a firing is pending (delay or recurring phase).
    pub fn running(&self) -> bool {
        self.state.phase.is_running()
    }

    /// Current effective period.
    pub fn interval(&self) -> std::time::Duration {
        self.state.interval
    }

    /// Binds the controller to a (possibly absent) context record.
    ///
    /// Subscriptions are always rebuilt. When the record *identity* changes,
    /// pending timers are cancelled and the binding epoch advances, which
    /// invalidates in-flight action results of the old binding. An
    /// interval-override attribute, when configured, replaces the effective
    /// period. If the timer is not running afterwards the arming sequence
    /// runs. `done` is called exactly once, synchronously; a `None` record is
    /// not an error — the controller simply stays idle.
    pub fn bind(&mut self, record: Option<R>, done: impl FnOnce()) {
        if self.state.torn_down {
            done();
            return;
        }

        self.release_subscriptions();

        let new_id = record.as_ref().map(Record::id);
        let old_id = self.state.record.as_ref().map(Record::id);
        if new_id != old_id {
            self.cancel_handles();
            self.state.phase = Phase::Idle;
            self.state.epoch += 1;
            let mut ev = Event::now(EventKind::Rebound);
            if let Some(id) = new_id {
                ev = ev.with_record(id);
            }
            self.bus.publish(ev);
        }
        self.state.record = record;

        if let Some(attr) = self.cfg.interval_attr.clone() {
            let value = self
                .state
                .record
                .as_ref()
                .and_then(|rec| rec.get(&attr))
                .and_then(|v| v.as_millis());
            if let Some(ms) = value {
                self.state.interval = ms;
            }
        }

        self.resubscribe();

        if !self.running() {
            self.arm();
        }

        done();
    }

    /// Transitions into an active waiting-to-fire state.
    ///
    /// No-op unless an action is configured and a record is bound. The
    /// branch order mirrors the configuration precedence:
    ///
    /// 1. first-interval attribute present and readable — `once` fires a
    ///    single shot after that value; otherwise an optional immediate fire
    ///    is followed by the first-interval delay, one more fire, and only
    ///    then the steady recurring period.
    /// 2. no first interval — `once` fires a single shot after the period;
    ///    otherwise an optional immediate fire and the recurring timer.
    ///
    /// The phase is armed *before* anything is scheduled, so reentrant
    /// reconciliations observe the timer as running.
    pub fn arm(&mut self) {
        if self.state.torn_down {
            return;
        }
        let Some((target, first)) = self.state.record.as_ref().map(|rec| {
            let first = self
                .cfg
                .first_interval_attr
                .as_ref()
                .and_then(|attr| rec.get(attr))
                .and_then(|v| v.as_millis());
            (rec.id(), first)
        }) else {
            return;
        };
        if self.cfg.action.is_empty() {
            return;
        }

        match first {
            Some(first) => {
                self.state.phase = Phase::ArmedDelay;
                // once + first interval fires exactly once, never recurring
                if !self.cfg.once && self.cfg.start_at_once {
                    self.fire(target);
                }
                let handle = self.scheduler.schedule_once(first);
                self.state.delay = Some(handle);
                self.publish_armed(target, first);
            }
            None => {
                if self.cfg.once {
                    self.state.phase = Phase::ArmedDelay;
                    let handle = self.scheduler.schedule_once(self.state.interval);
                    self.state.delay = Some(handle);
                } else {
                    self.state.phase = Phase::ArmedRecurring;
                    if self.cfg.start_at_once {
                        self.fire(target);
                    }
                    let handle = self.scheduler.schedule_repeating(self.state.interval);
                    self.state.repeating = Some(handle);
                }
                let period = self.state.interval;
                self.publish_armed(target, period);
            }
        }
    }

    /// Halts the timer: cancels both pending handles and clears them.
    ///
    /// Cancelling an absent handle is a no-op, so this is idempotent and
    /// safe to call at any time.
    pub fn disarm(&mut self) {
        if self.state.torn_down {
            return;
        }
        self.cancel_handles();
        self.state.phase = match self.state.record {
            Some(_) => Phase::Stopped,
            None => Phase::Idle,
        };
        self.bus.publish(Event::now(EventKind::TimerDisarmed));
    }

    /// Routes a delivered change notification.
    ///
    /// Record-level and attribute-level notifications both re-derive the
    /// running/interval state from current attribute values; a replacement
    /// record arrives through [`TimerController::bind`] instead.
    pub fn on_notification(&mut self, notification: Notification) {
        match notification {
            Notification::Record | Notification::Attribute(_) => self.reconcile(),
        }
    }

    /// Re-derives running state and period from the override attributes.
    ///
    /// When both attributes are configured the interval is applied first
    /// (re-arming immediately if running — the partially elapsed period is
    /// intentionally lost), then the status transition. With only one
    /// attribute configured, just that half applies.
    pub fn reconcile(&mut self) {
        if self.state.torn_down {
            return;
        }
        let Some(rec) = self.state.record.as_ref() else {
            return;
        };

        let wanted = self
            .cfg
            .status_attr
            .as_ref()
            .and_then(|attr| rec.get(attr))
            .and_then(|v| v.as_bool());
        let new_interval = self
            .cfg
            .interval_attr
            .as_ref()
            .and_then(|attr| rec.get(attr))
            .and_then(|v| v.as_millis());

        if self.cfg.interval_attr.is_some() {
            if let Some(interval) = new_interval {
                self.apply_interval(interval);
            }
        }
        if self.cfg.status_attr.is_some() {
            if let Some(wanted) = wanted {
                self.apply_status(wanted);
            }
        }
    }

    /// Handles an elapsed timer delivered by the host.
    ///
    /// A handle matching neither pending timer belonged to an earlier arming
    /// cycle and is dropped.
    pub fn on_elapsed(&mut self, handle: TimerHandle) {
        if self.state.torn_down {
            return;
        }
        let Some(target) = self.state.record.as_ref().map(Record::id) else {
            return;
        };

        if self.state.delay == Some(handle) {
            self.state.delay = None;
            self.fire(target);
            if self.cfg.once {
                // the single shot is spent; running drops without a disarm
                self.state.phase = Phase::Stopped;
                self.bus.publish(Event::now(EventKind::TimerDisarmed));
            } else {
                self.state.phase = Phase::ArmedRecurring;
                let repeating = self.scheduler.schedule_repeating(self.state.interval);
                self.state.repeating = Some(repeating);
            }
        } else if self.state.repeating == Some(handle) {
            self.fire(target);
        } else {
            self.bus.publish(Event::now(EventKind::StaleDropped));
        }
    }

    /// Applies the asynchronous outcome of a fired action.
    ///
    /// A falsy result stops the timer — that is the platform's way of saying
    /// "enough". An invocation error is published and otherwise ignored; the
    /// next scheduled firing proceeds normally. Results whose ticket carries
    /// a stale epoch are discarded.
    pub fn on_action_result(&mut self, ticket: ActionTicket, result: Result<bool, ActionError>) {
        if self.state.torn_down || ticket.epoch != self.state.epoch {
            self.bus.publish(Event::now(EventKind::StaleDropped));
            return;
        }
        match result {
            Ok(true) => {}
            Ok(false) => {
                self.bus.publish(
                    Event::now(EventKind::ActionHalted).with_action(self.cfg.action.clone()),
                );
                self.disarm();
            }
            Err(err) => {
                self.bus.publish(
                    Event::now(EventKind::ActionFailed)
                        .with_action(self.cfg.action.clone())
                        .with_error(err.to_string()),
                );
            }
        }
    }

    /// Releases every subscription, cancels pending timers, and retires the
    /// controller. All later operations are no-ops.
    pub fn teardown(&mut self) {
        if self.state.torn_down {
            return;
        }
        self.release_subscriptions();
        self.cancel_handles();
        self.state.record = None;
        self.state.phase = Phase::Idle;
        self.state.epoch += 1;
        self.state.torn_down = true;
        self.bus.publish(Event::now(EventKind::TornDown));
    }

    fn fire(&mut self, target: RecordId) {
        self.seq += 1;
        let ticket = ActionTicket {
            epoch: self.state.epoch,
            seq: self.seq,
        };
        self.invoker.invoke(&self.cfg.action, target, ticket);
        self.bus.publish(
            Event::now(EventKind::ActionInvoked)
                .with_action(self.cfg.action.clone())
                .with_record(target),
        );
    }

    fn apply_interval(&mut self, interval: std::time::Duration) {
        if interval == self.state.interval {
            return;
        }
        self.state.interval = interval;
        self.bus
            .publish(Event::now(EventKind::IntervalChanged).with_delay(interval));
        if self.running() {
            self.disarm();
            self.arm();
        }
    }

    fn apply_status(&mut self, wanted: bool) {
        if wanted == self.running() {
            return;
        }
        if wanted {
            self.arm();
        } else {
            self.disarm();
        }
    }

    fn cancel_handles(&mut self) {
        if let Some(handle) = self.state.delay.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.state.repeating.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn release_subscriptions(&mut self) {
        for handle in std::mem::take(&mut self.state.subs) {
            self.subs.unsubscribe(handle);
        }
    }

    fn resubscribe(&mut self) {
        let Some(id) = self.state.record.as_ref().map(Record::id) else {
            return;
        };
        if !self.cfg.has_overrides() {
            return;
        }
        let mut handles = vec![self.subs.subscribe(id, SubTarget::Record)];
        if let Some(attr) = self.cfg.status_attr.clone() {
            handles.push(self.subs.subscribe(id, SubTarget::Attribute(attr)));
        }
        if let Some(attr) = self.cfg.interval_attr.clone() {
            handles.push(self.subs.subscribe(id, SubTarget::Attribute(attr)));
        }
        self.state.subs = handles;
    }

    fn publish_armed(&self, target: RecordId, delay: std::time::Duration) {
        self.bus.publish(
            Event::now(EventKind::TimerArmed)
                .with_action(self.cfg.action.clone())
                .with_record(target)
                .with_delay(delay),
        );
    }
}
