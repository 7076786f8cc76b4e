//! # Timer configuration.
//!
//! [`TimerConfig`] captures the construction-time settings of one timer:
//! the recurring period, one-shot and fire-immediately flags, the action to
//! invoke, and up to three attribute references that let the bound record
//! override the first delay, the period, and the running state at runtime.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use flowtimer::{AttrRef, TimerConfig};
//!
//! let mut cfg = TimerConfig::default();
//! cfg.action = "RefreshDashboard".into();
//! cfg.interval = Duration::from_secs(60);
//! cfg.status_attr = Some(AttrRef::new("TimerRunning"));
//!
//! assert!(!cfg.once);
//! assert!(cfg.start_at_once);
//! ```

use std::time::Duration;

use crate::record::AttrRef;

/// Settings for one timer controller, immutable after construction.
///
/// The effective period may still change at runtime when
/// [`TimerConfig::interval_attr`] is configured; the configured
/// [`TimerConfig::interval`] is the starting value.
#[derive(Clone, Debug)]
pub struct TimerConfig {
    /// Recurring period between firings.
    pub interval: Duration,
    /// Fire exactly once, then stop permanently.
    pub once: bool,
    /// Fire immediately upon arming, in addition to the scheduled firings.
    ///
    /// Ignored when `once` is set together with a first-interval attribute:
    /// that combination fires exactly once after the first interval.
    pub start_at_once: bool,
    /// Name of the action to invoke. Empty disables firing entirely.
    pub action: String,
    /// Attribute holding the delay before the first firing.
    pub first_interval_attr: Option<AttrRef>,
    /// Attribute overriding the recurring period.
    pub interval_attr: Option<AttrRef>,
    /// Attribute holding the desired running state (true = running).
    pub status_attr: Option<AttrRef>,
}

impl Default for TimerConfig {
    /// Provides the stock configuration:
    /// - `interval = 30s`
    /// - `once = false`
    /// - `start_at_once = true`
    /// - `action = ""` (disabled)
    /// - no override attributes
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            once: false,
            start_at_once: true,
            action: String::new(),
            first_interval_attr: None,
            interval_attr: None,
            status_attr: None,
        }
    }
}

impl TimerConfig {
    /// True when either runtime-override attribute is configured.
    ///
    /// Only then does the controller register change subscriptions on the
    /// bound record.
    pub(crate) fn has_overrides(&self) -> bool {
        self.status_attr.is_some() || self.interval_attr.is_some()
    }
}
