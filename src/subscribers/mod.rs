//! # Event subscribers.
//!
//! Extension point for observing timer lifecycle [`Event`](crate::Event)s:
//! the [`Subscribe`] trait plus a built-in stdout [`LogWriter`] behind the
//! `logging` feature.

mod subscribe;

pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
