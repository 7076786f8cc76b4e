//! # Async action-invocation adapter.
//!
//! [`SpawnInvoker`] turns an async closure — the actual platform call — into
//! the synchronous fire-and-forget [`ActionInvoker`] port: the future is
//! spawned, and its outcome is piped back to the driver together with the
//! ticket the controller issued.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::error::ActionError;
use crate::invoker::{ActionInvoker, ActionTicket};
use crate::record::RecordId;

/// Outcome message delivered back to the driver.
pub(crate) type ResultMsg = (ActionTicket, Result<bool, ActionError>);

type ActionFuture = Pin<Box<dyn Future<Output = Result<bool, ActionError>> + Send>>;

/// [`ActionInvoker`] over an async closure, in the spirit of a
/// function-backed task: state lives in the closure, the adapter only
/// dispatches.
pub struct SpawnInvoker {
    results: mpsc::UnboundedSender<ResultMsg>,
    call: Box<dyn FnMut(String, RecordId) -> ActionFuture + Send>,
}

impl SpawnInvoker {
    /// Wraps `call`; completions are reported on `results`.
    pub fn new<F, Fut>(results: mpsc::UnboundedSender<ResultMsg>, mut call: F) -> Self
    where
        F: FnMut(String, RecordId) -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, ActionError>> + Send + 'static,
    {
        Self {
            results,
            call: Box::new(move |action, target| Box::pin(call(action, target))),
        }
    }
}

impl ActionInvoker for SpawnInvoker {
    fn invoke(&mut self, action: &str, target: RecordId, ticket: ActionTicket) {
        let fut = (self.call)(action.to_owned(), target);
        let results = self.results.clone();
        tokio::spawn(async move {
            let result = fut.await;
            let _ = results.send((ticket, result));
        });
    }
}
