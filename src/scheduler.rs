//! # Scheduling port: explicit one-shot and recurring timers.
//!
//! The controller never talks to an OS timer directly; it asks a
//! [`Scheduler`] for a [`TimerHandle`] and is later re-entered with that
//! handle when the timer elapses. This keeps the state machine synchronous
//! and lets tests substitute a virtual clock.
//!
//! Two implementations ship with the crate:
//! - [`VirtualScheduler`] (here) — a deterministic manual clock for tests and
//!   embedding into single-threaded hosts.
//! - [`TokioScheduler`](crate::TokioScheduler) — real timers on the tokio
//!   runtime, used by the driver.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Identity of one scheduled timer.
///
/// Unique per scheduler instance; a handle delivered after its timer was
/// cancelled simply matches nothing and is discarded by the controller.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a raw handle value. Intended for [`Scheduler`] implementors.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// # Timer scheduling contract.
///
/// Implementations allocate a fresh [`TimerHandle`] per call and deliver it
/// back to the host when the timer elapses. A recurring timer keeps the same
/// handle across firings.
pub trait Scheduler {
    /// Schedules a single firing after `delay`.
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle;

    /// Schedules a firing every `period`, first firing one full period from now.
    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle;

    /// Cancels a timer. Unknown or already-fired handles are a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug)]
struct Entry {
    handle: TimerHandle,
    due: Duration,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
    now: Duration,
    next: u64,
    pending: Vec<Entry>,
}

/// # Deterministic manual-clock scheduler.
///
/// Time only moves when [`VirtualScheduler::advance`] is called; the call
/// returns every handle that came due, in due order. Clones share the same
/// clock, so a test can keep one clone while the controller owns another.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use flowtimer::{Scheduler, VirtualScheduler};
///
/// let mut sched = VirtualScheduler::default();
/// let once = sched.schedule_once(Duration::from_millis(50));
/// let every = sched.schedule_repeating(Duration::from_millis(100));
///
/// assert_eq!(sched.advance(Duration::from_millis(49)), vec![]);
/// assert_eq!(sched.advance(Duration::from_millis(1)), vec![once]);
/// assert_eq!(sched.advance(Duration::from_millis(200)), vec![every, every]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct VirtualScheduler {
    inner: Rc<RefCell<Inner>>,
}

impl VirtualScheduler {
    /// Current virtual time (starts at zero).
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of timers currently pending.
    pub fn active(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Moves the clock forward, returning fired handles in due order.
    ///
    /// Recurring timers reschedule themselves and may appear multiple times
    /// in one call when the step spans several periods.
    pub fn advance(&mut self, step: Duration) -> Vec<TimerHandle> {
        let mut inner = self.inner.borrow_mut();
        let target = inner.now + step;
        let mut fired = Vec::new();

        loop {
            let next = inner
                .pending
                .iter()
                .enumerate()
                .filter(|(_, e)| e.due <= target)
                .min_by_key(|(_, e)| (e.due, e.handle.raw()))
                .map(|(i, _)| i);
            let Some(i) = next else { break };

            inner.now = inner.pending[i].due;
            fired.push(inner.pending[i].handle);
            match inner.pending[i].period {
                Some(period) => inner.pending[i].due += period,
                None => {
                    inner.pending.swap_remove(i);
                }
            }
        }

        inner.now = target;
        fired
    }

    fn alloc(inner: &mut Inner) -> TimerHandle {
        inner.next += 1;
        TimerHandle::new(inner.next)
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let handle = Self::alloc(&mut inner);
        let due = inner.now + delay;
        inner.pending.push(Entry {
            handle,
            due,
            period: None,
        });
        handle
    }

    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle {
        // A zero period would spin advance() forever.
        let period = period.max(Duration::from_millis(1));
        let mut inner = self.inner.borrow_mut();
        let handle = Self::alloc(&mut inner);
        let due = inner.now + period;
        inner.pending.push(Entry {
            handle,
            due,
            period: Some(period),
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|e| e.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_fires_exactly_at_due_time() {
        let mut sched = VirtualScheduler::default();
        let h = sched.schedule_once(Duration::from_millis(100));

        assert!(sched.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(sched.advance(Duration::from_millis(1)), vec![h]);
        assert!(sched.advance(Duration::from_millis(500)).is_empty());
        assert_eq!(sched.active(), 0);
    }

    #[test]
    fn test_repeating_fires_every_period() {
        let mut sched = VirtualScheduler::default();
        let h = sched.schedule_repeating(Duration::from_millis(30));

        assert_eq!(sched.advance(Duration::from_millis(30)), vec![h]);
        assert_eq!(sched.advance(Duration::from_millis(90)), vec![h, h, h]);
        assert_eq!(sched.active(), 1);
    }

    #[test]
    fn test_due_order_across_timers() {
        let mut sched = VirtualScheduler::default();
        let late = sched.schedule_once(Duration::from_millis(80));
        let early = sched.schedule_once(Duration::from_millis(20));

        assert_eq!(sched.advance(Duration::from_millis(100)), vec![early, late]);
    }

    #[test]
    fn test_cancel_is_unconditional() {
        let mut sched = VirtualScheduler::default();
        let h = sched.schedule_once(Duration::from_millis(10));
        sched.cancel(h);
        sched.cancel(h); // second cancel of the same handle is a no-op
        sched.cancel(TimerHandle::new(999));

        assert!(sched.advance(Duration::from_millis(50)).is_empty());
    }

    #[test]
    fn test_clones_share_the_clock() {
        let mut sched = VirtualScheduler::default();
        let mut owner = sched.clone();
        let h = owner.schedule_once(Duration::from_millis(40));

        assert_eq!(sched.advance(Duration::from_millis(40)), vec![h]);
        assert_eq!(owner.now(), Duration::from_millis(40));
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut sched = VirtualScheduler::default();
        let h = sched.schedule_repeating(Duration::ZERO);

        let fired = sched.advance(Duration::from_millis(5));
        assert_eq!(fired, vec![h; 5]);
    }
}
