//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [armed] action=RefreshDashboard record=record#7 delay=5s
//! [invoked] action=RefreshDashboard record=record#7
//! [halted] action=RefreshDashboard
//! [failed] action=RefreshDashboard err="gateway timeout"
//! [disarmed]
//! [torn-down]
//! ```

use async_trait::async_trait;

use crate::event::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TimerArmed => {
                println!(
                    "[armed] action={:?} record={:?} delay={:?}",
                    e.action, e.record, e.delay
                );
            }
            EventKind::TimerDisarmed => {
                println!("[disarmed]");
            }
            EventKind::ActionInvoked => {
                println!("[invoked] action={:?} record={:?}", e.action, e.record);
            }
            EventKind::ActionFailed => {
                println!("[failed] action={:?} err={:?}", e.action, e.error);
            }
            EventKind::ActionHalted => {
                println!("[halted] action={:?}", e.action);
            }
            EventKind::IntervalChanged => {
                println!("[interval-changed] interval={:?}", e.delay);
            }
            EventKind::StaleDropped => {
                println!("[stale-dropped]");
            }
            EventKind::Rebound => {
                println!("[rebound] record={:?}", e.record);
            }
            EventKind::TornDown => {
                println!("[torn-down]");
            }
        }
    }
}
