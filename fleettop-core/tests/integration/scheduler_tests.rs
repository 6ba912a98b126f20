//! Scheduler loop tests driven by fake collectors and renderers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fleettop_core::monitoring::MetricsSnapshot;
use fleettop_core::scheduler::{
    Collector, MonitorTarget, PollScheduler, Renderer, SchedulerState,
};

struct Host(&'static str);

impl MonitorTarget for Host {
    fn name(&self) -> &str {
        self.0
    }
}

/// Counts collect calls and labels snapshots with the target name
struct RecordingCollector {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Collector<Host> for RecordingCollector {
    async fn collect(&mut self, target: &Host) -> MetricsSnapshot {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MetricsSnapshot {
            hostname: target.name().to_string(),
            ..MetricsSnapshot::default()
        }
    }
}

/// Records the (name, hostname) pairs it was asked to render
struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<(String, String)>>>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, name: &str, snapshot: &MetricsSnapshot) {
        self.rendered
            .lock()
            .expect("renderer lock")
            .push((name.to_string(), snapshot.hostname.clone()));
    }
}

#[tokio::test]
async fn test_first_sweep_runs_immediately() {
    let calls = Arc::new(AtomicUsize::new(0));
    let rendered = Arc::new(Mutex::new(Vec::new()));
    let (scheduler, handle) = PollScheduler::new(
        vec![Host("a"), Host("b")],
        RecordingCollector {
            calls: Arc::clone(&calls),
        },
        RecordingRenderer {
            rendered: Arc::clone(&rendered),
        },
    );
    // Long interval: only the immediate first sweep can happen
    let scheduler = scheduler.with_interval(Duration::from_secs(3600));
    let task = tokio::spawn(scheduler.run());

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.shutdown().await;
    let state = task.await.expect("scheduler task");

    assert_eq!(state, SchedulerState::Stopped);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let rendered = rendered.lock().expect("rendered lock");
    assert_eq!(
        *rendered,
        vec![
            ("a".to_string(), "a".to_string()),
            ("b".to_string(), "b".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_repeated_sweeps_at_interval() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, handle) = PollScheduler::new(
        vec![Host("a")],
        RecordingCollector {
            calls: Arc::clone(&calls),
        },
        RecordingRenderer {
            rendered: Arc::new(Mutex::new(Vec::new())),
        },
    );
    let scheduler = scheduler.with_interval(Duration::from_millis(20));
    let task = tokio::spawn(scheduler.run());

    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.shutdown().await;
    task.await.expect("scheduler task");

    // ~7 ticks elapsed; demand at least a few to avoid timing flakiness
    assert!(calls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_empty_fleet_idles_until_shutdown() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, handle) = PollScheduler::new(
        Vec::<Host>::new(),
        RecordingCollector {
            calls: Arc::clone(&calls),
        },
        RecordingRenderer {
            rendered: Arc::new(Mutex::new(Vec::new())),
        },
    );
    let scheduler = scheduler.with_interval(Duration::from_millis(10));
    let task = tokio::spawn(scheduler.run());

    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.shutdown().await;
    let state = task.await.expect("scheduler task");

    assert_eq!(state, SchedulerState::Stopped);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let (scheduler, handle) = PollScheduler::new(
        Vec::<Host>::new(),
        RecordingCollector {
            calls: Arc::new(AtomicUsize::new(0)),
        },
        RecordingRenderer {
            rendered: Arc::new(Mutex::new(Vec::new())),
        },
    );
    let task = tokio::spawn(scheduler.run());
    tokio::time::sleep(Duration::from_millis(20)).await;

    handle.shutdown().await;
    handle.shutdown().await;
    let state = task.await.expect("scheduler task");
    assert_eq!(state, SchedulerState::Stopped);

    // The scheduler is gone; a further shutdown must still be a no-op
    handle.shutdown().await;
}
