//! # Core subscriber trait.
//!
//! `Subscribe` is the extension point for plugging custom event handlers into
//! the runtime driver. The driver feeds every published
//! [`Event`](crate::Event) to each registered subscriber from a dedicated
//! listener task, so implementations never block the controller itself.

use async_trait::async_trait;

use crate::event::Event;

/// Contract for event subscribers.
///
/// Called from the driver's listener task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
