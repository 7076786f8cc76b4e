//! Error types used by the flowtimer controller and runtime driver.
//!
//! Two enums cover the failure surface:
//!
//! - [`ActionError`] — an action invocation itself failed (platform/network).
//! - [`DriverError`] — a command was sent to a driver that already stopped.
//!
//! Everything else the controller encounters is deliberately *not* an error:
//! an empty action name or an unbound record silently disables firing, and a
//! stale callback is detected and discarded. Failures degrade to "the timer
//! does not fire", never to a panic.

use thiserror::Error;

/// # Failure of an action invocation.
///
/// Reported back through `on_action_result`. The controller publishes an
/// [`EventKind::ActionFailed`](crate::EventKind::ActionFailed) event and
/// leaves the timer untouched; the next scheduled firing proceeds normally.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The platform rejected or failed the invocation.
    #[error("action invocation failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl ActionError {
    /// Creates a [`ActionError::Failed`] from any displayable error.
    pub fn failed(error: impl Into<String>) -> Self {
        ActionError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use flowtimer::ActionError;
    ///
    /// let err = ActionError::failed("connection refused");
    /// assert_eq!(err.as_label(), "action_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Failed { .. } => "action_failed",
        }
    }
}

/// # Errors produced by the runtime driver handle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The driver task has stopped; the command was not delivered.
    #[error("driver is no longer running")]
    Closed,
}
