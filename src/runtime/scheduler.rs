//! # Tokio-backed timer scheduling.
//!
//! Each armed timer is one spawned task racing its sleep (or interval tick)
//! against a per-timer [`CancellationToken`]. Elapsed handles are sent on an
//! unbounded channel; the driver feeds them back into the controller.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::scheduler::{Scheduler, TimerHandle};

/// [`Scheduler`] implementation on the tokio runtime.
///
/// Must be used from within a runtime context: every `schedule_*` call
/// spawns a timer task.
pub struct TokioScheduler {
    fired: mpsc::UnboundedSender<TimerHandle>,
    next: u64,
    active: HashMap<TimerHandle, CancellationToken>,
}

impl TokioScheduler {
    /// Creates a scheduler that reports elapsed timers on `fired`.
    pub fn new(fired: mpsc::UnboundedSender<TimerHandle>) -> Self {
        Self {
            fired,
            next: 0,
            active: HashMap::new(),
        }
    }

    fn alloc(&mut self) -> (TimerHandle, CancellationToken) {
        // spent one-shots cancel their own token, so this sweep keeps the
        // map from accumulating dead entries
        self.active.retain(|_, token| !token.is_cancelled());

        self.next += 1;
        let handle = TimerHandle::new(self.next);
        let token = CancellationToken::new();
        self.active.insert(handle, token.clone());
        (handle, token)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        let (handle, token) = self.alloc();
        let fired = self.fired.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {
                    let _ = fired.send(handle);
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        });
        handle
    }

    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle {
        // tokio::time::interval panics on a zero period
        let period = period.max(Duration::from_millis(1));
        let (handle, token) = self.alloc();
        let fired = self.fired.clone();
        tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        if fired.send(handle).is_err() {
                            break;
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(token) = self.active.remove(&handle) {
            token.cancel();
        }
    }
}
