//! # Action-invocation port.
//!
//! Firing the timer means dispatching a named server-side action against the
//! bound record. Dispatch is fire-and-forget: [`ActionInvoker::invoke`]
//! returns immediately and the platform later reports the outcome through
//! [`TimerController::on_action_result`](crate::TimerController::on_action_result),
//! echoing back the [`ActionTicket`] it was given.
//!
//! The ticket carries the controller's binding epoch. A result that arrives
//! after the controller was rebound or torn down carries a stale epoch and is
//! discarded — a late `false` from a previous binding must never stop the
//! timer of the current one.

use crate::record::RecordId;

/// Correlation token for one action invocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActionTicket {
    pub(crate) epoch: u64,
    pub(crate) seq: u64,
}

impl ActionTicket {
    /// Binding generation this invocation belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Per-controller invocation counter, for logging.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// # Action dispatch contract.
///
/// Implemented by the platform glue. `invoke` must not block; completion is
/// reported asynchronously with the same ticket.
pub trait ActionInvoker {
    /// Dispatches `action` against exactly one record, the currently bound one.
    fn invoke(&mut self, action: &str, target: RecordId, ticket: ActionTicket);
}
