//! # Runtime driver: the single logical event queue.
//!
//! [`TimerDriver::spawn`] puts one [`TimerController`] on its own task and
//! `select!`s over everything that may re-enter it: host commands, elapsed
//! timers, and action results. Messages are processed strictly one at a
//! time, so the controller never sees overlapping transitions — the ordering
//! guarantee the state machine relies on.
//!
//! ```text
//!  DriverHandle ──commands──►┌───────────────────────────┐
//!  TokioScheduler ──fired───►│ driver task (one at a time)│──► TimerController
//!  SpawnInvoker ──results───►└───────────────────────────┘
//!                                   │ events
//!                                   ▼
//!                          Bus ──► Subscribe fan-out
//! ```
//!
//! Cancelling the handle (or dropping it, which closes the command channel)
//! tears the controller down before the task exits: subscriptions released,
//! timers cancelled, nothing left able to fire later.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bus::Bus;
use crate::config::TimerConfig;
use crate::controller::TimerController;
use crate::error::{ActionError, DriverError};
use crate::record::{Record, RecordId};
use crate::runtime::invoker::SpawnInvoker;
use crate::runtime::scheduler::TokioScheduler;
use crate::subscribers::Subscribe;
use crate::subscriptions::{Notification, Subscriptions};

enum Command<R> {
    Bind(Option<R>),
    Changed(Notification),
    Teardown,
}

/// Factory for driver tasks.
pub struct TimerDriver;

impl TimerDriver {
    /// Spawns a controller task and returns its handle.
    ///
    /// `subscriptions` is the platform's change-notification registry,
    /// `action` the actual platform call executed per firing (its `bool`
    /// result feeds the keep-running/halt decision), and `subscribers`
    /// receive every lifecycle event from a dedicated listener task.
    pub fn spawn<R, U, F, Fut>(
        cfg: TimerConfig,
        subscriptions: U,
        action: F,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> DriverHandle<R>
    where
        R: Record + Send + 'static,
        U: Subscriptions + Send + 'static,
        F: FnMut(String, RecordId) -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, ActionError>> + Send + 'static,
    {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command<R>>();
        let (fired_tx, mut fired_rx) = mpsc::unbounded_channel();
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();

        let bus = Bus::new(64);
        if !subscribers.is_empty() {
            let mut rx = bus.subscribe();
            tokio::spawn(async move {
                while let Ok(ev) = rx.recv().await {
                    for sub in &subscribers {
                        sub.on_event(&ev).await;
                    }
                }
            });
        }

        let mut controller = TimerController::new(
            cfg,
            TokioScheduler::new(fired_tx),
            subscriptions,
            SpawnInvoker::new(result_tx, action),
            bus,
        );

        let token = CancellationToken::new();
        let child = token.clone();
        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    cmd = cmd_rx.recv() => match cmd {
                        Some(Command::Bind(record)) => controller.bind(record, || {}),
                        Some(Command::Changed(n)) => controller.on_notification(n),
                        Some(Command::Teardown) | None => break,
                    },
                    Some(handle) = fired_rx.recv() => controller.on_elapsed(handle),
                    Some((ticket, result)) = result_rx.recv() => {
                        controller.on_action_result(ticket, result);
                    }
                }
            }
            controller.teardown();
        });

        DriverHandle {
            tx: cmd_tx,
            token,
            join,
        }
    }
}

/// Handle to a running driver task.
pub struct DriverHandle<R> {
    tx: mpsc::UnboundedSender<Command<R>>,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl<R> DriverHandle<R> {
    /// Binds the controller to a new (possibly absent) context record.
    pub fn bind(&self, record: Option<R>) -> Result<(), DriverError> {
        self.tx
            .send(Command::Bind(record))
            .map_err(|_| DriverError::Closed)
    }

    /// Delivers a change notification from the binding layer.
    pub fn notify(&self, notification: Notification) -> Result<(), DriverError> {
        self.tx
            .send(Command::Changed(notification))
            .map_err(|_| DriverError::Closed)
    }

    /// Requests teardown. The driver task tears the controller down and
    /// exits; pending commands ahead of the request are still processed.
    pub fn teardown(&self) -> Result<(), DriverError> {
        self.tx
            .send(Command::Teardown)
            .map_err(|_| DriverError::Closed)
    }

    /// Cancels the driver task immediately, without draining the queue.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Waits for the driver task to finish.
    pub async fn join(self) {
        let _ = self.join.await;
    }
}
