//! # Change-notification port.
//!
//! The binding layer notifies the controller when the bound record — or one
//! of the override attributes — changes. [`Subscriptions`] is the
//! registration side; deliveries come back as [`Notification`]s through the
//! host (see [`TimerController::on_notification`](crate::TimerController::on_notification)).
//!
//! At most three registrations exist per binding: the whole record, the
//! status attribute, and the interval attribute. The controller tears all of
//! them down before rebuilding on every rebind, so handles never leak across
//! bindings.

use crate::record::{AttrRef, RecordId};

/// Identity of one registered subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubHandle(u64);

impl SubHandle {
    /// Wraps a raw handle value. Intended for [`Subscriptions`] implementors.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// What a subscription watches.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SubTarget {
    /// The whole record: replace or delete.
    Record,
    /// One attribute of the record.
    Attribute(AttrRef),
}

/// # Subscription registry contract.
///
/// Implemented by the platform's binding layer. `unsubscribe` must tolerate
/// handles that are already gone.
pub trait Subscriptions {
    /// Registers interest in `target` on `record`.
    fn subscribe(&mut self, record: RecordId, target: SubTarget) -> SubHandle;

    /// Releases one registration.
    fn unsubscribe(&mut self, handle: SubHandle);
}

/// A delivered change notification.
///
/// Both variants re-derive the timer state from current attribute values; a
/// genuinely new record enters through the host's bind lifecycle call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Notification {
    /// The record itself was replaced or touched.
    Record,
    /// A single attribute changed.
    Attribute(AttrRef),
}
