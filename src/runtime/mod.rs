//! # Tokio runtime glue.
//!
//! The controller itself is synchronous; this module supplies the pieces that
//! run it on tokio as a single logical event queue:
//!
//! - [`TokioScheduler`] — real one-shot/recurring timers backed by spawned
//!   tasks and cancellation tokens.
//! - [`SpawnInvoker`] — adapts an async closure into the fire-and-forget
//!   [`ActionInvoker`](crate::ActionInvoker) port.
//! - [`TimerDriver`] / [`DriverHandle`] — owns the controller on one spawned
//!   task and serializes commands, elapsed timers, and action results into it.

mod driver;
mod invoker;
mod scheduler;

pub use driver::{DriverHandle, TimerDriver};
pub use invoker::SpawnInvoker;
pub use scheduler::TokioScheduler;
