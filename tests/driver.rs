//! End-to-end tests of the tokio driver under a paused clock.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use flowtimer::{
    ActionError, AttrRef, AttrValue, Event, EventKind, Notification, Record, RecordId, SubHandle,
    SubTarget, Subscribe, Subscriptions, TimerConfig, TimerDriver,
};

#[derive(Clone)]
struct SharedRecord {
    id: RecordId,
    attrs: Arc<Mutex<HashMap<&'static str, AttrValue>>>,
}

impl SharedRecord {
    fn new(id: u64) -> Self {
        Self {
            id: RecordId::new(id),
            attrs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn set(&self, name: &'static str, value: AttrValue) {
        self.attrs.lock().unwrap().insert(name, value);
    }
}

impl Record for SharedRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn get(&self, attr: &AttrRef) -> Option<AttrValue> {
        self.attrs.lock().unwrap().get(attr.as_str()).cloned()
    }
}

#[derive(Clone, Default)]
struct CountingSubs {
    next: Arc<AtomicU64>,
    live: Arc<Mutex<HashSet<SubHandle>>>,
}

impl CountingSubs {
    fn live(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

impl Subscriptions for CountingSubs {
    fn subscribe(&mut self, _record: RecordId, _target: SubTarget) -> SubHandle {
        let handle = SubHandle::new(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        self.live.lock().unwrap().insert(handle);
        handle
    }

    fn unsubscribe(&mut self, handle: SubHandle) {
        self.live.lock().unwrap().remove(&handle);
    }
}

/// Lets the driver task and any spawned timer/action tasks run to quiescence
/// without moving the paused clock.
async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

fn counting_action(
    count: Arc<AtomicUsize>,
    keep_running: bool,
) -> impl FnMut(String, RecordId) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<bool, ActionError>> + Send>>
       + Send
       + 'static {
    move |_action, _target| {
        let count = count.clone();
        Box::pin(async move {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(keep_running)
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_driver_fires_immediately_then_on_interval() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut cfg = TimerConfig::default();
    cfg.action = "Ping".into();
    cfg.interval = Duration::from_millis(100);

    let driver = TimerDriver::spawn(
        cfg,
        CountingSubs::default(),
        counting_action(count.clone(), true),
        Vec::new(),
    );
    driver.bind(Some(SharedRecord::new(1))).unwrap();
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);

    tokio::time::advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 3);

    driver.shutdown();
    driver.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_once_mode_fires_exactly_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut cfg = TimerConfig::default();
    cfg.action = "Ping".into();
    cfg.interval = Duration::from_millis(50);
    cfg.once = true;

    let driver = TimerDriver::spawn(
        cfg,
        CountingSubs::default(),
        counting_action(count.clone(), true),
        Vec::new(),
    );
    driver.bind(Some(SharedRecord::new(1))).unwrap();
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    tokio::time::advance(Duration::from_millis(50)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    driver.shutdown();
    driver.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_halts_when_action_returns_false() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut cfg = TimerConfig::default();
    cfg.action = "Ping".into();
    cfg.interval = Duration::from_millis(100);

    let driver = TimerDriver::spawn(
        cfg,
        CountingSubs::default(),
        counting_action(count.clone(), false),
        Vec::new(),
    );
    driver.bind(Some(SharedRecord::new(1))).unwrap();
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // the falsy result disarmed the timer before the next period
    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    driver.shutdown();
    driver.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_status_attribute_stops_and_restarts() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut cfg = TimerConfig::default();
    cfg.action = "Ping".into();
    cfg.interval = Duration::from_millis(100);
    cfg.status_attr = Some(AttrRef::new("Running"));

    let record = SharedRecord::new(1);
    record.set("Running", AttrValue::Bool(true));

    let driver = TimerDriver::spawn(
        cfg,
        CountingSubs::default(),
        counting_action(count.clone(), true),
        Vec::new(),
    );
    driver.bind(Some(record.clone())).unwrap();
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    record.set("Running", AttrValue::Bool(false));
    driver
        .notify(Notification::Attribute(AttrRef::new("Running")))
        .unwrap();
    settle().await;

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    record.set("Running", AttrValue::Bool(true));
    driver
        .notify(Notification::Attribute(AttrRef::new("Running")))
        .unwrap();
    settle().await;
    // start_at_once fires again on the restart
    assert_eq!(count.load(Ordering::SeqCst), 2);

    driver.shutdown();
    driver.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_feeds_event_subscribers() {
    struct Recorder(Arc<Mutex<Vec<EventKind>>>);

    #[async_trait::async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.0.lock().unwrap().push(event.kind);
        }
    }

    let kinds = Arc::new(Mutex::new(Vec::new()));
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Recorder(kinds.clone()))];

    let count = Arc::new(AtomicUsize::new(0));
    let mut cfg = TimerConfig::default();
    cfg.action = "Ping".into();

    let driver = TimerDriver::spawn(
        cfg,
        CountingSubs::default(),
        counting_action(count.clone(), true),
        subscribers,
    );
    driver.bind(Some(SharedRecord::new(1))).unwrap();
    settle().await;

    let seen = kinds.lock().unwrap().clone();
    assert!(seen.contains(&EventKind::Rebound));
    assert!(seen.contains(&EventKind::ActionInvoked));
    assert!(seen.contains(&EventKind::TimerArmed));

    driver.shutdown();
    driver.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_teardown_releases_subscriptions_and_closes() {
    let count = Arc::new(AtomicUsize::new(0));
    let subs = CountingSubs::default();
    let mut cfg = TimerConfig::default();
    cfg.action = "Ping".into();
    cfg.status_attr = Some(AttrRef::new("Running"));

    let record = SharedRecord::new(1);
    record.set("Running", AttrValue::Bool(true));

    let driver = TimerDriver::spawn(
        cfg,
        subs.clone(),
        counting_action(count.clone(), true),
        Vec::new(),
    );
    driver.bind(Some(record)).unwrap();
    settle().await;
    assert_eq!(subs.live(), 2);

    driver.teardown().unwrap();
    settle().await;
    assert_eq!(subs.live(), 0);

    // the driver task is gone; further commands fail
    assert!(driver.bind(None).is_err());
    driver.join().await;
}
