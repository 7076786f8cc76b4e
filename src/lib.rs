//! # flowtimer
//!
//! **Flowtimer** is a small library for timer-driven action invocation: it
//! repeatedly triggers a named server-side action ("microflow") against a
//! bound data record, with a configurable first delay, recurring interval,
//! one-shot mode, and external start/stop/retune through record attributes.
//!
//! The crate is the thin sequencing layer between a host's lifecycle
//! callbacks and a platform's action API — it owns the start/stop/reconfigure
//! state machine and nothing else. The platform pieces (data access, change
//! subscriptions, action dispatch, timers) are constructor-injected ports.
//!
//! ## Architecture
//! ```text
//!      host lifecycle                   platform
//!   bind / notify / teardown      Record   Subscriptions   ActionInvoker
//!            │                      ▲            ▲               ▲
//!            ▼                      │ get()      │ (re)subscribe │ invoke()
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  TimerController (state machine)                                      │
//! │  Idle ─► ArmedDelay ─► ArmedRecurring ─► Stopped ─► (arm again)       │
//! └──────┬──────────────────────────────────────────────────┬─────────────┘
//!        │ schedule_once / schedule_repeating / cancel      │ events
//!        ▼                                                  ▼
//!    Scheduler (VirtualScheduler | TokioScheduler)     Bus ─► Subscribe
//! ```
//!
//! Elapsed timers, change notifications, and action results all re-enter the
//! controller through synchronous calls, strictly one at a time. On tokio,
//! [`TimerDriver`] provides that single logical event queue; in tests (or a
//! single-threaded host) the [`VirtualScheduler`] makes every schedule fully
//! deterministic.
//!
//! ## Features
//! | Area             | Description                                               | Key types / traits                  |
//! |------------------|-----------------------------------------------------------|-------------------------------------|
//! | **Control**      | Bind, arm, disarm, reconcile, teardown                    | [`TimerController`], [`Phase`]      |
//! | **Configuration**| Interval, one-shot, fire-at-once, override attributes     | [`TimerConfig`]                     |
//! | **Ports**        | Data access, change subscriptions, action dispatch, timers| [`Record`], [`Subscriptions`], [`ActionInvoker`], [`Scheduler`] |
//! | **Runtime**      | Tokio driver realizing the event queue                    | [`TimerDriver`], [`DriverHandle`]   |
//! | **Observability**| Lifecycle events and subscriber fan-out                   | [`Event`], [`Bus`], [`Subscribe`]   |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! use flowtimer::{
//!     ActionInvoker, ActionTicket, AttrRef, AttrValue, Bus, Record, RecordId, SubHandle,
//!     SubTarget, Subscriptions, TimerConfig, TimerController, VirtualScheduler,
//! };
//!
//! struct Ctx;
//! impl Record for Ctx {
//!     fn id(&self) -> RecordId { RecordId::new(1) }
//!     fn get(&self, _attr: &AttrRef) -> Option<AttrValue> { None }
//! }
//!
//! struct NoSubs;
//! impl Subscriptions for NoSubs {
//!     fn subscribe(&mut self, _r: RecordId, _t: SubTarget) -> SubHandle { SubHandle::new(0) }
//!     fn unsubscribe(&mut self, _h: SubHandle) {}
//! }
//!
//! #[derive(Clone, Default)]
//! struct Count(Arc<Mutex<u32>>);
//! impl ActionInvoker for Count {
//!     fn invoke(&mut self, _action: &str, _target: RecordId, _ticket: ActionTicket) {
//!         *self.0.lock().unwrap() += 1;
//!     }
//! }
//!
//! let mut cfg = TimerConfig::default();
//! cfg.action = "Ping".into();
//! cfg.interval = Duration::from_secs(30);
//!
//! let mut clock = VirtualScheduler::default();
//! let count = Count::default();
//! let mut timer = TimerController::new(cfg, clock.clone(), NoSubs, count.clone(), Bus::new(8));
//!
//! // start_at_once defaults to true: binding fires immediately
//! timer.bind(Some(Ctx), || {});
//! assert_eq!(*count.0.lock().unwrap(), 1);
//!
//! // two more periods elapse
//! for handle in clock.advance(Duration::from_secs(60)) {
//!     timer.on_elapsed(handle);
//! }
//! assert_eq!(*count.0.lock().unwrap(), 3);
//! ```

mod bus;
mod config;
mod controller;
mod error;
mod event;
mod invoker;
mod record;
mod runtime;
mod scheduler;
mod state;
mod subscribers;
mod subscriptions;

// ---- Public re-exports ----

pub use bus::Bus;
pub use config::TimerConfig;
pub use controller::TimerController;
pub use error::{ActionError, DriverError};
pub use event::{Event, EventKind};
pub use invoker::{ActionInvoker, ActionTicket};
pub use record::{AttrRef, AttrValue, Record, RecordId};
pub use runtime::{DriverHandle, SpawnInvoker, TimerDriver, TokioScheduler};
pub use scheduler::{Scheduler, TimerHandle, VirtualScheduler};
pub use state::Phase;
pub use subscribers::Subscribe;
pub use subscriptions::{Notification, SubHandle, SubTarget, Subscriptions};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
